use crate::cell::CellPos;
use std::fmt;

/// Errors raised by grid lookups and edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Coordinates outside `[0, rows)` on either axis
    OutOfBounds { row: usize, col: usize, rows: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfBounds { row, col, rows } => write!(
                f,
                "cell ({}, {}) is outside the {}x{} grid",
                row, col, rows, rows
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Why a pair of endpoints was rejected before a run started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointProblem {
    MissingStart,
    MissingEnd,
    SameCell(CellPos),
    Wall(CellPos),
    OutOfBounds(CellPos),
}

impl fmt::Display for EndpointProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointProblem::MissingStart => write!(f, "no start cell is set"),
            EndpointProblem::MissingEnd => write!(f, "no end cell is set"),
            EndpointProblem::SameCell(pos) => write!(f, "start and end are both {}", pos),
            EndpointProblem::Wall(pos) => write!(f, "endpoint {} is a wall", pos),
            EndpointProblem::OutOfBounds(pos) => write!(f, "endpoint {} is outside the grid", pos),
        }
    }
}

/// Errors raised when starting a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    InvalidEndpoints(EndpointProblem),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidEndpoints(problem) => write!(f, "invalid endpoints: {}", problem),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<EndpointProblem> for SearchError {
    fn from(problem: EndpointProblem) -> Self {
        SearchError::InvalidEndpoints(problem)
    }
}

/// An out-of-bounds endpoint is an endpoint problem, not a grid failure
impl From<GridError> for SearchError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::OutOfBounds { row, col, .. } => {
                SearchError::InvalidEndpoints(EndpointProblem::OutOfBounds(CellPos::new(row, col)))
            }
        }
    }
}

pub type GridResult<T> = Result<T, GridError>;
pub type SearchResult<T> = Result<T, SearchError>;
