pub mod action_log;
pub mod cell;
pub mod config;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod grid;
pub mod heuristic;
pub mod path;

pub use cell::{Cell, CellPos, CellState};
pub use engine::{run, run_marked, Engine, EngineOptions, Outcome, SearchStatus, Step, StepEvent};
pub use error::{EndpointProblem, GridError, SearchError};
pub use grid::{Grid, Prepared};
pub use heuristic::manhattan;
