use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a cell inside a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        CellPos { row, col }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Semantic state of a cell. Mapping a state to a color is the renderer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Free,
    Wall,
    /// Discovered, waiting in the frontier
    Open,
    /// Expanded
    Closed,
    Start,
    End,
    Path,
}

impl CellState {
    /// Single character used by `Grid::to_ascii`
    pub fn symbol(self) -> char {
        match self {
            CellState::Free => '.',
            CellState::Wall => '#',
            CellState::Open => 'o',
            CellState::Closed => 'x',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Path => '*',
        }
    }

    /// Open, Closed and Path are written by a search and cleared before the next one
    pub fn is_search_mark(self) -> bool {
        matches!(self, CellState::Open | CellState::Closed | CellState::Path)
    }
}

/// A single grid unit
///
/// The adjacency list is a snapshot taken by `Grid::refresh_all_neighbors`;
/// it is stale as soon as a wall changes anywhere around the cell.
#[derive(Debug, Clone)]
pub struct Cell {
    pos: CellPos,
    state: CellState,
    neighbors: Vec<CellPos>,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Cell {
            pos: CellPos::new(row, col),
            state: CellState::Free,
            neighbors: Vec::new(),
        }
    }

    pub fn pos(&self) -> CellPos {
        self.pos
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_wall(&self) -> bool {
        self.state == CellState::Wall
    }

    /// Adjacency as of the last refresh, ordered down, up, left, right
    pub fn neighbors(&self) -> &[CellPos] {
        &self.neighbors
    }

    /// Unconditional overwrite. Start/End uniqueness is enforced by the grid.
    pub fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    pub fn reset(&mut self) {
        self.set_state(CellState::Free);
    }

    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<CellPos>) {
        self.neighbors = neighbors;
    }
}
