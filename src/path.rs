use crate::cell::{CellPos, CellState};
use crate::engine::StepEvent;
use crate::grid::Grid;
use std::collections::HashMap;

/// Follow predecessors back from `end` and return the path ordered start -> end.
///
/// Only meaningful once `end` has been reached; the walk stops at the first
/// cell without a predecessor, which is the start of the search.
pub fn reconstruct(came_from: &HashMap<CellPos, CellPos>, end: CellPos) -> Vec<CellPos> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Mark every cell strictly between the endpoints as Path, walking back from the goal
pub fn mark_path(grid: &mut Grid, path: &[CellPos], on_step: &mut dyn FnMut(&Grid, &StepEvent)) {
    if path.len() < 3 {
        return;
    }
    for &pos in path[1..path.len() - 1].iter().rev() {
        grid.mark(pos, CellState::Path);
        on_step(&*grid, &StepEvent::PathMarked(pos));
    }
}

/// Number of moves along a path
pub fn path_length(path: &[CellPos]) -> usize {
    path.len().saturating_sub(1)
}

/// Format path for display
pub fn format_path(path: &[CellPos]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    path.iter()
        .map(|pos| pos.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
