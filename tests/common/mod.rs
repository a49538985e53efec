#![allow(dead_code)]

use astar_viz::{CellPos, CellState, Grid};
use std::collections::{HashSet, VecDeque};

/// Build a grid from a square text layout
/// Format:
/// - S: start
/// - E: end
/// - #: wall
/// - .: free cell
pub fn parse_layout(layout: &str) -> Result<Grid, Box<dyn std::error::Error>> {
    let lines: Vec<&str> = layout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let rows = lines.len();
    if rows == 0 {
        return Err("No grid lines found in layout".into());
    }

    let mut grid = Grid::make(rows, (rows * 10) as u32);
    for (row, line) in lines.iter().enumerate() {
        if line.chars().count() != rows {
            return Err(format!("Row {} is not {} cells wide", row, rows).into());
        }
        for (col, ch) in line.chars().enumerate() {
            let pos = CellPos::new(row, col);
            match ch {
                'S' => {
                    grid.set_start(pos)?;
                }
                'E' => {
                    grid.set_end(pos)?;
                }
                '#' => {
                    grid.set_wall(pos)?;
                }
                '.' => {}
                other => return Err(format!("Unknown layout character '{}'", other).into()),
            }
        }
    }
    Ok(grid)
}

/// Shortest number of moves between two cells by breadth-first search
pub fn bfs_distance(grid: &Grid, start: CellPos, end: CellPos) -> Option<usize> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([(start, 0)]);

    while let Some((pos, dist)) = queue.pop_front() {
        if pos == end {
            return Some(dist);
        }
        for next in grid.neighbors_of(pos) {
            if seen.insert(next) {
                queue.push_back((next, dist + 1));
            }
        }
    }
    None
}

/// Check that consecutive cells are orthogonally adjacent and none is a wall
pub fn assert_walkable(grid: &Grid, path: &[CellPos]) {
    for pair in path.windows(2) {
        let step = pair[0].row.abs_diff(pair[1].row) + pair[0].col.abs_diff(pair[1].col);
        assert_eq!(step, 1, "{} -> {} is not a single move", pair[0], pair[1]);
    }
    for pos in path {
        assert_ne!(grid.state(*pos).unwrap(), CellState::Wall, "path crosses wall at {}", pos);
    }
}

/// Visualize a path on a grid
pub fn visualize_path(grid: &Grid, path: &[CellPos]) -> String {
    let on_path: HashSet<&CellPos> = path.iter().collect();
    let mut result = String::new();
    for row in 0..grid.rows() {
        for col in 0..grid.rows() {
            let pos = CellPos::new(row, col);
            let symbol = match grid.state(pos).unwrap() {
                CellState::Start => 'S',
                CellState::End => 'E',
                CellState::Wall => '#',
                _ if on_path.contains(&pos) => '*',
                _ => '.',
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}
