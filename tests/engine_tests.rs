mod common;

use astar_viz::path::{format_path, path_length};
use astar_viz::{
    run, run_marked, CellPos, CellState, EndpointProblem, Engine, EngineOptions, Grid, Outcome,
    SearchError, SearchStatus, StepEvent,
};
use common::{assert_walkable, bfs_distance, parse_layout, visualize_path};

/// Run between the grid's markers, collecting every callback event
fn traced_run(grid: &mut Grid) -> (Outcome, Vec<StepEvent>) {
    let mut events = Vec::new();
    let outcome = run_marked(
        grid.refresh_all_neighbors(),
        Some(&mut |_: &Grid, event: &StepEvent| events.push(*event)),
        || false,
    )
    .unwrap();
    (outcome, events)
}

fn expanded_cells(events: &[StepEvent]) -> Vec<CellPos> {
    events
        .iter()
        .filter_map(|event| match event {
            StepEvent::Expanded(pos) => Some(*pos),
            StepEvent::PathMarked(_) => None,
        })
        .collect()
}

fn expect_path(outcome: Outcome) -> Vec<CellPos> {
    match outcome {
        Outcome::PathFound(path) => path,
        other => panic!("expected a path, got {:?}", other),
    }
}

#[test]
fn open_grid_corner_to_corner() {
    let mut grid = parse_layout(
        "
        S....
        .....
        .....
        .....
        ....E
        ",
    )
    .unwrap();

    let (outcome, events) = traced_run(&mut grid);
    let path = expect_path(outcome);
    println!("{}", visualize_path(&grid, &path));

    assert_eq!(path.len(), 9);
    assert_eq!(path_length(&path), 8);
    assert_eq!(path[0], CellPos::new(0, 0));
    assert_eq!(path[8], CellPos::new(4, 4));
    for pair in path.windows(2) {
        assert_eq!(
            pair[1].row + pair[1].col,
            pair[0].row + pair[0].col + 1,
            "path is not monotonic: {}",
            format_path(&path)
        );
    }

    let marked: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, StepEvent::PathMarked(_)))
        .collect();
    assert_eq!(marked.len(), 7);
    let path_cells = grid.cells().filter(|c| c.state() == CellState::Path).count();
    assert_eq!(path_cells, 7);
    assert_eq!(grid.state(CellPos::new(0, 0)).unwrap(), CellState::Start);
    assert_eq!(grid.state(CellPos::new(4, 4)).unwrap(), CellState::End);
}

#[test]
fn single_gap_in_wall_is_used() {
    let mut grid = parse_layout(
        "
        S..
        #.#
        ..E
        ",
    )
    .unwrap();

    let path = expect_path(traced_run(&mut grid).0);
    assert!(path.contains(&CellPos::new(1, 1)), "{}", format_path(&path));
    assert_eq!(path_length(&path), 4);
    assert_walkable(&grid, &path);
}

#[test]
fn enclosed_start_has_no_path() {
    let mut grid = parse_layout(
        "
        .#...
        #S#..
        .#...
        .....
        ....E
        ",
    )
    .unwrap();

    let (outcome, events) = traced_run(&mut grid);
    assert_eq!(outcome, Outcome::NoPathExists);
    assert_eq!(expanded_cells(&events), vec![CellPos::new(1, 1)]);
    assert!(grid.cells().all(|c| c.state() != CellState::Path));
}

#[test]
fn cancelled_before_first_step() {
    let mut grid = parse_layout(
        "
        S...
        ....
        ....
        ...E
        ",
    )
    .unwrap();

    let mut calls = 0;
    let outcome = run_marked(
        grid.refresh_all_neighbors(),
        Some(&mut |_: &Grid, _: &StepEvent| calls += 1),
        || true,
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(calls, 0);
    assert!(grid.cells().all(|c| !c.state().is_search_mark()));
}

#[test]
fn cancellation_is_checked_every_step() {
    let mut grid = Grid::make(10, 100);
    let mut polls = 0;
    let mut expanded = 0;
    let outcome = run(
        grid.refresh_all_neighbors(),
        CellPos::new(0, 0),
        CellPos::new(9, 9),
        Some(&mut |_: &Grid, _: &StepEvent| expanded += 1),
        || {
            polls += 1;
            polls > 3
        },
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(expanded, 3);
}

#[test]
fn same_start_and_end_is_rejected() {
    let mut grid = Grid::make(5, 50);
    let err = run(
        grid.refresh_all_neighbors(),
        CellPos::new(2, 2),
        CellPos::new(2, 2),
        None,
        || false,
    )
    .unwrap_err();
    assert_eq!(
        err,
        SearchError::InvalidEndpoints(EndpointProblem::SameCell(CellPos::new(2, 2)))
    );
}

#[test]
fn unset_endpoints_are_rejected() {
    let mut grid = Grid::make(5, 50);
    let err = run_marked(grid.refresh_all_neighbors(), None, || false).unwrap_err();
    assert_eq!(err, SearchError::InvalidEndpoints(EndpointProblem::MissingStart));

    grid.set_start(CellPos::new(0, 0)).unwrap();
    let err = run_marked(grid.refresh_all_neighbors(), None, || false).unwrap_err();
    assert_eq!(err, SearchError::InvalidEndpoints(EndpointProblem::MissingEnd));

    grid.reset_cell(CellPos::new(0, 0)).unwrap();
    grid.set_end(CellPos::new(4, 4)).unwrap();
    let err = run_marked(grid.refresh_all_neighbors(), None, || false).unwrap_err();
    assert_eq!(err, SearchError::InvalidEndpoints(EndpointProblem::MissingStart));
}

#[test]
fn identical_runs_expand_identical_sequences() {
    let layout = "
        S.....#.
        .####.#.
        ....#...
        .##.#.#.
        .#..#.#.
        .#.##.#.
        .#....#.
        ...#...E
        ";
    let mut first = parse_layout(layout).unwrap();
    let mut second = parse_layout(layout).unwrap();

    let (outcome_a, events_a) = traced_run(&mut first);
    let (outcome_b, events_b) = traced_run(&mut second);

    assert_eq!(outcome_a, outcome_b);
    assert_eq!(events_a, events_b);
    assert_eq!(first.to_ascii(), second.to_ascii());
}

#[test]
fn maze_path_matches_breadth_first_distance() {
    let mut grid = parse_layout(
        "
        S.#.......
        .##.####..
        ....#..#..
        ###.#.##.#
        ..#...#...
        .####.#.#.
        ......#.#.
        .######.#.
        ........#E
        ########..
        ",
    )
    .unwrap();

    let start = grid.start().unwrap();
    let end = grid.end().unwrap();
    let expected = bfs_distance(&grid, start, end).expect("layout has a path");

    let path = expect_path(traced_run(&mut grid).0);
    println!("{}", visualize_path(&grid, &path));
    assert_eq!(path_length(&path), expected);
    assert_walkable(&grid, &path);
}

#[test]
fn callback_sees_open_neighbors_before_closing() {
    let mut grid = Grid::make(6, 60);
    grid.set_start(CellPos::new(0, 0)).unwrap();
    grid.set_end(CellPos::new(5, 5)).unwrap();

    let mut checked = 0;
    let outcome = run_marked(
        grid.refresh_all_neighbors(),
        Some(&mut |grid: &Grid, event: &StepEvent| {
            if let StepEvent::Expanded(pos) = event {
                assert_ne!(grid.state(*pos).unwrap(), CellState::Closed);
                for neighbor in grid.cell(*pos).unwrap().neighbors() {
                    assert_ne!(grid.state(*neighbor).unwrap(), CellState::Free);
                }
                checked += 1;
            }
        }),
        || false,
    )
    .unwrap();

    assert!(matches!(outcome, Outcome::PathFound(_)));
    assert!(checked > 0);
    assert!(grid.cells().any(|c| c.state() == CellState::Closed));
}

#[test]
fn stepping_by_hand_matches_run() {
    let layout = "
        S...#
        .##.#
        ....#
        .#...
        ...#E
        ";
    let mut stepped = parse_layout(layout).unwrap();
    let mut batch = parse_layout(layout).unwrap();

    let mut engine = Engine::from_markers(stepped.refresh_all_neighbors(), EngineOptions::default()).unwrap();
    let mut expanded = Vec::new();
    let outcome = loop {
        match engine.step() {
            astar_viz::Step::Expanded(pos) => expanded.push(pos),
            astar_viz::Step::Finished(outcome) => break outcome,
        }
    };
    assert_eq!(engine.status(), SearchStatus::Succeeded);
    assert_eq!(engine.expanded(), expanded.len());

    let (batch_outcome, events) = traced_run(&mut batch);
    assert_eq!(outcome, batch_outcome);
    assert_eq!(expanded, expanded_cells(&events));
    assert_eq!(stepped.to_ascii(), batch.to_ascii());
}

#[test]
fn grid_can_be_searched_again_after_clearing_marks() {
    let mut grid = parse_layout(
        "
        S...
        .##.
        .#..
        ...E
        ",
    )
    .unwrap();

    let first = expect_path(traced_run(&mut grid).0);
    grid.clear_search_marks();
    grid.set_wall(CellPos::new(3, 2)).unwrap();
    let second = expect_path(traced_run(&mut grid).0);

    assert_eq!(path_length(&first), 6);
    assert_eq!(path_length(&second), 6);
    assert!(!second.contains(&CellPos::new(3, 2)));
}

#[test]
fn explicit_endpoints_leave_grid_markers_alone() {
    let mut grid = Grid::make(5, 50);
    grid.set_start(CellPos::new(0, 0)).unwrap();
    grid.set_end(CellPos::new(4, 4)).unwrap();

    let outcome = run(
        grid.refresh_all_neighbors(),
        CellPos::new(0, 0),
        CellPos::new(2, 2),
        None,
        || false,
    )
    .unwrap();
    assert!(matches!(outcome, Outcome::PathFound(_)));
    assert_eq!(grid.start(), Some(CellPos::new(0, 0)));
    assert_eq!(grid.end(), Some(CellPos::new(4, 4)));
    assert_eq!(grid.state(CellPos::new(4, 4)).unwrap(), CellState::End);
    assert_eq!(grid.state(CellPos::new(2, 2)).unwrap(), CellState::End);

    grid.clear_search_marks();
    let outcome = run(
        grid.refresh_all_neighbors(),
        CellPos::new(2, 2),
        CellPos::new(0, 0),
        None,
        || false,
    )
    .unwrap();
    assert!(matches!(outcome, Outcome::PathFound(_)));
    assert_eq!(grid.start(), Some(CellPos::new(0, 0)));
    assert_eq!(grid.end(), Some(CellPos::new(4, 4)));
    assert_eq!(grid.state(CellPos::new(0, 0)).unwrap(), CellState::Start);
    assert_eq!(grid.state(CellPos::new(4, 4)).unwrap(), CellState::End);
    assert_eq!(grid.state(CellPos::new(2, 2)).unwrap(), CellState::Free);
    let starts = grid.cells().filter(|c| c.state() == CellState::Start).count();
    assert_eq!(starts, 1);
}

#[test]
fn walled_start_is_rejected() {
    let mut grid = Grid::make(4, 40);
    grid.set_wall(CellPos::new(1, 1)).unwrap();
    let err = run(
        grid.refresh_all_neighbors(),
        CellPos::new(1, 1),
        CellPos::new(3, 3),
        None,
        || false,
    )
    .unwrap_err();
    assert_eq!(
        err,
        SearchError::InvalidEndpoints(EndpointProblem::Wall(CellPos::new(1, 1)))
    );
}

#[test]
fn cheaper_route_to_pending_cell_expands_it_once() {
    let mut grid = parse_layout(
        "
        #.#.#
        ...#E
        S#...
        ...##
        ..##.
        ",
    )
    .unwrap();

    let (outcome, events) = traced_run(&mut grid);
    let expanded = expanded_cells(&events);

    // (3,2) is opened from (2,2) at cost 5, then reached from (3,1) at cost 3
    // while still pending
    assert_eq!(
        expanded,
        vec![
            CellPos::new(2, 0),
            CellPos::new(1, 0),
            CellPos::new(1, 1),
            CellPos::new(1, 2),
            CellPos::new(3, 0),
            CellPos::new(0, 1),
            CellPos::new(2, 2),
            CellPos::new(3, 1),
            CellPos::new(2, 3),
            CellPos::new(3, 2),
            CellPos::new(2, 4),
        ]
    );
    let mut seen = std::collections::HashSet::new();
    assert!(expanded.iter().all(|pos| seen.insert(*pos)));

    let path = expect_path(outcome);
    assert_eq!(path_length(&path), 7);
    assert_walkable(&grid, &path);
}
