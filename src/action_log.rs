use std::collections::HashMap;
use std::time::Instant;

use log::info;
use serde::{Deserialize, Serialize};

use crate::cell::CellPos;

/// Action phase - whether the action is starting or finishing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionPhase {
    Start,
    Finish,
}

/// How a search run ended, as recorded in the log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunResult {
    PathFound { moves: usize },
    NoPath,
    Cancelled,
    Rejected { reason: String },
}

/// Controller actions that edit the grid or run a search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    SetStart { cell: CellPos },
    SetEnd { cell: CellPos },
    PaintWall { cell: CellPos },
    ResetCell { cell: CellPos },
    /// Every cell back to Free (rows)
    ClearGrid { rows: usize },
    /// Search between the current endpoints
    RunSearch { start: Option<CellPos>, end: Option<CellPos> },
    /// Logged with the Finish phase of a RunSearch
    SearchResult { result: RunResult, expanded: usize },
    CopyLayout,
}

/// Logged action with timestamp and phase
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedAction {
    /// Milliseconds since start
    pub timestamp_ms: u64,
    pub action: Action,
    pub phase: ActionPhase,
}

/// Action logger
pub struct ActionLog {
    start_time: Instant,
    actions: Vec<LoggedAction>,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        ActionLog {
            start_time: Instant::now(),
            actions: Vec::new(),
        }
    }

    /// Log an action with current timestamp and phase
    pub fn log(&mut self, action: Action, phase: ActionPhase) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.actions.push(LoggedAction {
            timestamp_ms,
            action,
            phase,
        });
    }

    pub fn log_start(&mut self, action: Action) {
        self.log(action, ActionPhase::Start);
    }

    pub fn log_finish(&mut self, action: Action) {
        self.log(action, ActionPhase::Finish);
    }

    /// Log an instantaneous edit as a start/finish pair
    pub fn log_edit(&mut self, action: Action) {
        self.log_start(action.clone());
        self.log_finish(action);
    }

    pub fn actions(&self) -> &[LoggedAction] {
        &self.actions
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.actions)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Write every entry to the log at info level, with run durations
    pub fn print_with_durations(&self) {
        info!("=== Action Log ({} events) ===", self.actions.len());

        let mut start_times: HashMap<String, u64> = HashMap::new();

        for (i, logged) in self.actions.iter().enumerate() {
            let action_key = format!("{:?}", logged.action);

            match logged.phase {
                ActionPhase::Start => {
                    start_times.insert(action_key, logged.timestamp_ms);
                    info!("[{:6}ms] #{:3} START  {:?}", logged.timestamp_ms, i + 1, logged.action);
                }
                ActionPhase::Finish => match start_times.remove(&action_key) {
                    Some(start_ms) => info!(
                        "[{:6}ms] #{:3} FINISH {:?} [duration: {}ms]",
                        logged.timestamp_ms,
                        i + 1,
                        logged.action,
                        logged.timestamp_ms - start_ms
                    ),
                    None => info!(
                        "[{:6}ms] #{:3} FINISH {:?}",
                        logged.timestamp_ms,
                        i + 1,
                        logged.action
                    ),
                },
            }
        }
        info!("=== End of Log ===");
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut walls = 0;
        let mut resets = 0;
        let mut endpoint_moves = 0;
        let mut clears = 0;
        let mut paths_found = 0;
        let mut no_path = 0;
        let mut cancelled = 0;
        let mut total_expanded = 0;

        // Only count finish events to get actual completed action counts
        for logged in self.actions.iter().filter(|l| l.phase == ActionPhase::Finish) {
            match &logged.action {
                Action::PaintWall { .. } => walls += 1,
                Action::ResetCell { .. } => resets += 1,
                Action::SetStart { .. } | Action::SetEnd { .. } => endpoint_moves += 1,
                Action::ClearGrid { .. } => clears += 1,
                Action::SearchResult { result, expanded } => {
                    total_expanded += expanded;
                    match result {
                        RunResult::PathFound { .. } => paths_found += 1,
                        RunResult::NoPath => no_path += 1,
                        RunResult::Cancelled => cancelled += 1,
                        RunResult::Rejected { .. } => {}
                    }
                }
                _ => {}
            }
        }

        let duration = self.actions.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Session Duration: {}ms\n\
             Total Events: {}\n\
             Grid Edits: {} walls, {} resets, {} endpoint moves, {} clears\n\
             Searches: {} paths found, {} without path, {} cancelled ({} cells expanded)",
            duration,
            self.actions.len(),
            walls,
            resets,
            endpoint_moves,
            clears,
            paths_found,
            no_path,
            cancelled,
            total_expanded
        )
    }
}
