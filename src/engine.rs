//! A* search over a prepared grid.
//!
//! [`Engine`] performs one expansion per [`Engine::step`] call so a renderer
//! can draw between steps; [`run`] drives an engine to completion with an
//! optional per-step callback and a cooperative cancellation probe.

use crate::cell::{CellPos, CellState};
use crate::error::{EndpointProblem, SearchError, SearchResult};
use crate::frontier::Frontier;
use crate::grid::{Grid, Prepared};
use crate::heuristic::manhattan;
use crate::path::{mark_path, reconstruct};
use log::{debug, trace, warn};
use std::collections::HashMap;

/// Lifecycle of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl SearchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SearchStatus::Succeeded | SearchStatus::Failed | SearchStatus::Cancelled
        )
    }
}

/// Terminal result of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Shortest path, start and end included
    PathFound(Vec<CellPos>),
    /// The frontier ran dry before reaching the end
    NoPathExists,
    /// Stopped by the cancellation probe
    Cancelled,
}

/// Reported to the step callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// All neighbors of this cell have been relaxed
    Expanded(CellPos),
    /// This cell was marked as part of the final path
    PathMarked(CellPos),
}

/// Result of a single `Engine::step`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Expanded(CellPos),
    Finished(Outcome),
}

#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Mark expanded cells Closed. Only visual; headless callers can skip it.
    pub mark_visited: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions { mark_visited: true }
    }
}

/// Scores and predecessors for one run, dropped as soon as the run ends
#[derive(Debug, Default)]
struct SearchState {
    g_score: HashMap<CellPos, u32>,
    f_score: HashMap<CellPos, u32>,
    came_from: HashMap<CellPos, CellPos>,
    frontier: Frontier,
}

impl SearchState {
    fn seeded(start: CellPos, end: CellPos) -> Self {
        let mut state = SearchState::default();
        let f = manhattan(start, end);
        state.g_score.insert(start, 0);
        state.f_score.insert(start, f);
        state.frontier.push(f, start);
        state
    }

    /// Missing entries stand for +infinity
    fn g(&self, pos: &CellPos) -> u32 {
        self.g_score.get(pos).copied().unwrap_or(u32::MAX)
    }
}

fn no_op(_: &Grid, _: &StepEvent) {}

/// A* search in progress over a borrowed grid
pub struct Engine<'g> {
    grid: &'g mut Grid,
    start: CellPos,
    end: CellPos,
    options: EngineOptions,
    status: SearchStatus,
    state: Option<SearchState>,
    outcome: Option<Outcome>,
    expanded: usize,
}

impl<'g> Engine<'g> {
    pub fn new(grid: Prepared<'g>, start: CellPos, end: CellPos) -> SearchResult<Self> {
        Self::with_options(grid, start, end, EngineOptions::default())
    }

    pub fn with_options(
        grid: Prepared<'g>,
        start: CellPos,
        end: CellPos,
        options: EngineOptions,
    ) -> SearchResult<Self> {
        if let Err(err) = validate_endpoints(&grid, start, end) {
            warn!("Rejected search {} -> {}: {}", start, end, err);
            return Err(err);
        }

        Ok(Engine {
            grid: grid.into_inner(),
            start,
            end,
            options,
            status: SearchStatus::Idle,
            state: Some(SearchState::seeded(start, end)),
            outcome: None,
            expanded: 0,
        })
    }

    /// Search between the grid's own Start and End markers
    pub fn from_markers(grid: Prepared<'g>, options: EngineOptions) -> SearchResult<Self> {
        let start = grid.start().ok_or(EndpointProblem::MissingStart)?;
        let end = grid.end().ok_or(EndpointProblem::MissingEnd)?;
        Self::with_options(grid, start, end, options)
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Cells expanded so far
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    pub fn start(&self) -> CellPos {
        self.start
    }

    pub fn end(&self) -> CellPos {
        self.end
    }

    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    /// Cells currently waiting in the frontier
    pub fn pending(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.frontier.len())
    }

    /// Stop the search. Grid marks stay as they are.
    pub fn cancel(&mut self) {
        if !self.status.is_terminal() {
            debug!("Search {} -> {} cancelled after {} expansions", self.start, self.end, self.expanded);
            self.finish(SearchStatus::Cancelled, Outcome::Cancelled);
        }
    }

    pub fn step(&mut self) -> Step {
        self.step_with(&mut no_op)
    }

    /// Expand one cell, reporting to `on_step` once its neighbors are relaxed
    /// (and once per marked path cell when the end is reached)
    pub fn step_with(&mut self, on_step: &mut dyn FnMut(&Grid, &StepEvent)) -> Step {
        if let Some(outcome) = &self.outcome {
            return Step::Finished(outcome.clone());
        }
        if self.status == SearchStatus::Idle {
            debug!("Search {} -> {} started", self.start, self.end);
            self.status = SearchStatus::Running;
        }

        let Some(state) = self.state.as_mut() else {
            return Step::Finished(Outcome::Cancelled);
        };

        let Some(current) = state.frontier.pop_min() else {
            debug!("Search {} -> {}: no path after {} expansions", self.start, self.end, self.expanded);
            return self.finish(SearchStatus::Failed, Outcome::NoPathExists);
        };

        if current == self.end {
            let path = reconstruct(&state.came_from, self.end);
            mark_path(self.grid, &path, on_step);
            // Paint the goal without moving the grid's own Start/End markers
            self.grid.mark(self.end, CellState::End);
            debug!(
                "Search {} -> {}: path of {} moves after {} expansions",
                self.start,
                self.end,
                path.len() - 1,
                self.expanded
            );
            return self.finish(SearchStatus::Succeeded, Outcome::PathFound(path));
        }

        let current_g = state.g(&current);
        let neighbors = match self.grid.cell(current) {
            Ok(cell) => cell.neighbors().to_vec(),
            Err(_) => Vec::new(),
        };

        for neighbor in neighbors {
            let tentative_g = current_g + 1;
            if tentative_g >= state.g(&neighbor) {
                continue;
            }
            let f = tentative_g + manhattan(neighbor, self.end);
            state.came_from.insert(neighbor, current);
            state.g_score.insert(neighbor, tentative_g);
            state.f_score.insert(neighbor, f);

            // A pending neighbor gets a fresh, lower entry and its old one goes stale
            let pending = state.frontier.contains(&neighbor);
            state.frontier.push(f, neighbor);
            if !pending {
                self.grid.mark(neighbor, CellState::Open);
            }
        }

        self.expanded += 1;
        trace!("Expanded {} (g={}, pending={})", current, current_g, state.frontier.len());
        on_step(&*self.grid, &StepEvent::Expanded(current));

        if self.options.mark_visited && current != self.start {
            self.grid.mark(current, CellState::Closed);
        }
        Step::Expanded(current)
    }

    /// Step until a terminal outcome, checking `cancel_requested` before every step
    pub fn run_to_end(
        &mut self,
        mut on_step: Option<&mut dyn FnMut(&Grid, &StepEvent)>,
        mut cancel_requested: impl FnMut() -> bool,
    ) -> Outcome {
        loop {
            if cancel_requested() {
                self.cancel();
            }
            let step = match on_step.as_mut() {
                Some(callback) => self.step_with(&mut **callback),
                None => self.step(),
            };
            if let Step::Finished(outcome) = step {
                return outcome;
            }
        }
    }

    fn finish(&mut self, status: SearchStatus, outcome: Outcome) -> Step {
        self.status = status;
        self.state = None;
        self.outcome = Some(outcome.clone());
        Step::Finished(outcome)
    }
}

fn validate_endpoints(grid: &Grid, start: CellPos, end: CellPos) -> SearchResult<()> {
    let start_cell = grid.cell(start)?;
    let end_cell = grid.cell(end)?;
    if start == end {
        return Err(SearchError::InvalidEndpoints(EndpointProblem::SameCell(start)));
    }
    for cell in [start_cell, end_cell] {
        if cell.is_wall() {
            return Err(SearchError::InvalidEndpoints(EndpointProblem::Wall(cell.pos())));
        }
    }
    Ok(())
}

/// Run A* from `start` to `end` to completion.
///
/// `on_step` is called after every expansion and for every path cell marked
/// on success. `cancel_requested` is polled before every step; returning true
/// ends the run with `Outcome::Cancelled`.
pub fn run(
    grid: Prepared<'_>,
    start: CellPos,
    end: CellPos,
    on_step: Option<&mut dyn FnMut(&Grid, &StepEvent)>,
    cancel_requested: impl FnMut() -> bool,
) -> SearchResult<Outcome> {
    let mut engine = Engine::new(grid, start, end)?;
    Ok(engine.run_to_end(on_step, cancel_requested))
}

/// `run` between the grid's Start and End markers
pub fn run_marked(
    grid: Prepared<'_>,
    on_step: Option<&mut dyn FnMut(&Grid, &StepEvent)>,
    cancel_requested: impl FnMut() -> bool,
) -> SearchResult<Outcome> {
    let mut engine = Engine::from_markers(grid, EngineOptions::default())?;
    Ok(engine.run_to_end(on_step, cancel_requested))
}
