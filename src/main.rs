use arboard::Clipboard;
use astar_viz::action_log::{Action, ActionLog, RunResult};
use astar_viz::config::{Config, ConfigSource, VisualConfig};
use astar_viz::{CellPos, CellState, Engine, Grid, Outcome, Step};
use log::{info, warn};
use macroquad::prelude::*;

/// Color for a cell state. End turns purple once a search has reached it.
fn state_color(state: CellState, reached_end: bool) -> Color {
    match state {
        CellState::Free => Color::from_rgba(255, 255, 255, 255),
        CellState::Wall => Color::from_rgba(0, 0, 0, 255),
        CellState::Open => Color::from_rgba(0, 255, 0, 255),
        CellState::Closed => Color::from_rgba(255, 0, 0, 255),
        CellState::Path => Color::from_rgba(0, 0, 255, 255),
        CellState::Start => Color::from_rgba(255, 165, 0, 255),
        CellState::End if reached_end => Color::from_rgba(128, 0, 128, 255),
        CellState::End => Color::from_rgba(64, 225, 208, 255),
    }
}

fn draw_grid(grid: &Grid, visual: &VisualConfig, reached_end: bool) {
    clear_background(Color::from_rgba(
        visual.background_r,
        visual.background_g,
        visual.background_b,
        255,
    ));

    let size = grid.cell_size as f32;
    for cell in grid.cells() {
        let pos = cell.pos();
        draw_rectangle(
            pos.col as f32 * size,
            pos.row as f32 * size,
            size,
            size,
            state_color(cell.state(), reached_end),
        );
    }

    if visual.show_grid_lines {
        let extent = grid.canvas_size() as f32;
        let line_color = Color::from_rgba(128, 128, 128, 255);
        for i in 0..=grid.rows() {
            let offset = i as f32 * size;
            draw_line(0.0, offset, extent, offset, 1.0, line_color);
            draw_line(offset, 0.0, offset, extent, 1.0, line_color);
        }
    }
}

/// Interactive editing and search state
struct Controller {
    grid: Grid,
    config: Config,
    action_log: ActionLog,
    /// Open/Closed/Path marks from the last run are still on the grid
    has_results: bool,
    reached_end: bool,
}

impl Controller {
    fn new(config: Config) -> Self {
        Controller {
            grid: Grid::make(config.grid.rows, config.grid.width),
            config,
            action_log: ActionLog::new(),
            has_results: false,
            reached_end: false,
        }
    }

    fn clear_results(&mut self) {
        if self.has_results {
            self.grid.clear_search_marks();
            self.has_results = false;
            self.reached_end = false;
        }
    }

    fn handle_mouse(&mut self) {
        let left = is_mouse_button_down(MouseButton::Left);
        let right = is_mouse_button_down(MouseButton::Right);
        if !left && !right {
            return;
        }

        let (mouse_x, mouse_y) = mouse_position();
        let Some(pos) = self.grid.cell_from_pixel(mouse_x, mouse_y) else {
            return;
        };

        self.clear_results();
        if left {
            self.paint(pos);
        } else {
            self.erase(pos);
        }
    }

    /// Left click: place start, then end, then walls
    fn paint(&mut self, pos: CellPos) {
        let start = self.grid.start();
        let end = self.grid.end();

        let edit = if start.is_none() && end != Some(pos) {
            self.grid
                .set_start(pos)
                .map(|changed| changed.then_some(Action::SetStart { cell: pos }))
        } else if end.is_none() && start != Some(pos) {
            self.grid
                .set_end(pos)
                .map(|changed| changed.then_some(Action::SetEnd { cell: pos }))
        } else if start != Some(pos) && end != Some(pos) {
            self.grid
                .set_wall(pos)
                .map(|changed| changed.then_some(Action::PaintWall { cell: pos }))
        } else {
            Ok(None)
        };

        match edit {
            Ok(Some(action)) => self.action_log.log_edit(action),
            Ok(None) => {}
            Err(e) => warn!("Ignoring click: {}", e),
        }
    }

    /// Right click: back to Free, dropping start/end if the cell held them
    fn erase(&mut self, pos: CellPos) {
        match self.grid.reset_cell(pos) {
            Ok(true) => self.action_log.log_edit(Action::ResetCell { cell: pos }),
            Ok(false) => {}
            Err(e) => warn!("Ignoring click: {}", e),
        }
    }

    fn clear(&mut self) {
        self.grid.clear();
        self.has_results = false;
        self.reached_end = false;
        self.action_log.log_edit(Action::ClearGrid {
            rows: self.grid.rows(),
        });
        info!("Grid cleared");
    }

    /// Animate a search between the current endpoints.
    /// Returns true if Escape or a window close arrived meanwhile.
    async fn run_search(&mut self) -> bool {
        self.clear_results();

        let run_action = Action::RunSearch {
            start: self.grid.start(),
            end: self.grid.end(),
        };
        self.action_log.log_start(run_action.clone());

        let options = self.config.search.engine_options();
        let steps_per_frame = self.config.search.steps_per_frame.max(1);
        let mut quit = false;

        let (result, expanded) = match Engine::from_markers(self.grid.refresh_all_neighbors(), options) {
            Err(e) => {
                warn!("Cannot start search: {}", e);
                (RunResult::Rejected { reason: e.to_string() }, 0)
            }
            Ok(mut engine) => {
                let outcome = loop {
                    if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
                        quit = true;
                        engine.cancel();
                    }

                    let mut finished = None;
                    for _ in 0..steps_per_frame {
                        if let Step::Finished(outcome) = engine.step() {
                            finished = Some(outcome);
                            break;
                        }
                    }

                    draw_grid(engine.grid(), &self.config.visual, false);
                    next_frame().await;

                    if let Some(outcome) = finished {
                        break outcome;
                    }
                };

                let result = match &outcome {
                    Outcome::PathFound(path) => {
                        info!("Path found: {} moves, {} cells expanded", path.len() - 1, engine.expanded());
                        RunResult::PathFound { moves: path.len() - 1 }
                    }
                    Outcome::NoPathExists => {
                        info!("No path exists ({} cells expanded)", engine.expanded());
                        RunResult::NoPath
                    }
                    Outcome::Cancelled => {
                        info!("Search cancelled after {} cells", engine.expanded());
                        RunResult::Cancelled
                    }
                };
                (result, engine.expanded())
            }
        };

        self.reached_end = matches!(result, RunResult::PathFound { .. });
        self.has_results = !matches!(result, RunResult::Rejected { .. });
        self.action_log.log_finish(run_action);
        self.action_log
            .log_finish(Action::SearchResult { result, expanded });
        quit
    }

    fn copy_to_clipboard(&mut self) {
        let layout = self.grid.to_ascii();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(layout) {
                    warn!("Failed to copy to clipboard: {}", e);
                } else {
                    info!("Grid layout copied to clipboard");
                    self.action_log.log_edit(Action::CopyLayout);
                    // Clipboard managers need a moment to take ownership before the handle drops
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => warn!("Failed to access clipboard: {}", e),
        }
    }

    fn draw(&self) {
        draw_grid(&self.grid, &self.config.visual, self.reached_end);
    }

    fn shutdown(&self) {
        self.action_log.print_with_durations();
        info!("{}", self.action_log.summary());

        if self.config.logging.enable_action_log {
            let path = &self.config.logging.action_log_path;
            match self.action_log.save_to_file(path) {
                Ok(()) => info!("Action log saved to {}", path),
                Err(e) => warn!("Failed to save action log to {}: {}", path, e),
            }
        }
    }
}

fn window_conf() -> Conf {
    let (config, _) = Config::load();
    let side = config.grid.width as i32;
    Conf {
        window_title: config.visual.window_title,
        window_width: side,
        window_height: side,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let (config, source) = Config::load();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    match &source {
        ConfigSource::File(path) => info!("Loaded configuration from {}", path),
        ConfigSource::Missing(path) => info!("No {} found, using default configuration", path),
        ConfigSource::Invalid { path, reason } => {
            warn!("Failed to parse {}: {}", path, reason);
            warn!("Using default configuration");
        }
    }
    info!(
        "{}x{} grid on a {}px canvas. Left click: start, end, walls. Right click: erase. \
         Space: search. C: clear. Y: copy layout. Esc: quit",
        config.grid.rows, config.grid.rows, config.grid.width
    );

    prevent_quit();
    let mut controller = Controller::new(config);

    loop {
        if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
            break;
        }

        controller.handle_mouse();

        if is_key_pressed(KeyCode::Space) && controller.run_search().await {
            break;
        }
        if is_key_pressed(KeyCode::C) {
            controller.clear();
        }
        if is_key_pressed(KeyCode::Y) {
            controller.copy_to_clipboard();
        }

        controller.draw();
        next_frame().await
    }

    controller.shutdown();
}
