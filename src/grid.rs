use crate::cell::{Cell, CellPos, CellState};
use crate::error::{GridError, GridResult};
use std::ops::Deref;

/// Square grid owning its cells in row-major order
///
/// Holds at most one Start and one End cell. Walls and endpoints are edited by
/// the controller between runs; search marks (Open/Closed/Path) are written by
/// the engine.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    /// Side of one cell in pixels, for renderers
    pub cell_size: u32,
    cells: Vec<Cell>,
    start: Option<CellPos>,
    end: Option<CellPos>,
}

impl Grid {
    /// Create a `rows` x `rows` grid with every cell Free and no adjacency computed
    pub fn make(rows: usize, width: u32) -> Self {
        let mut cells = Vec::with_capacity(rows * rows);
        for row in 0..rows {
            for col in 0..rows {
                cells.push(Cell::new(row, col));
            }
        }

        Grid {
            rows,
            cell_size: width.checked_div(rows as u32).unwrap_or(0),
            cells,
            start: None,
            end: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width of the drawn area in pixels
    pub fn canvas_size(&self) -> u32 {
        self.cell_size * self.rows as u32
    }

    pub fn start(&self) -> Option<CellPos> {
        self.start
    }

    pub fn end(&self) -> Option<CellPos> {
        self.end
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.rows
    }

    fn index(&self, row: usize, col: usize) -> GridResult<usize> {
        if row >= self.rows || col >= self.rows {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
            });
        }
        Ok(row * self.rows + col)
    }

    pub fn cell_at(&self, row: usize, col: usize) -> GridResult<&Cell> {
        let idx = self.index(row, col)?;
        Ok(&self.cells[idx])
    }

    pub(crate) fn cell_at_mut(&mut self, row: usize, col: usize) -> GridResult<&mut Cell> {
        let idx = self.index(row, col)?;
        Ok(&mut self.cells[idx])
    }

    pub fn cell(&self, pos: CellPos) -> GridResult<&Cell> {
        self.cell_at(pos.row, pos.col)
    }

    pub fn state(&self, pos: CellPos) -> GridResult<CellState> {
        self.cell(pos).map(Cell::state)
    }

    /// Iterate cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Live adjacency of `pos`: in-bounds, non-wall cells ordered down, up, left, right
    pub fn neighbors_of(&self, pos: CellPos) -> Vec<CellPos> {
        let mut neighbors = Vec::with_capacity(4);
        let candidates = [
            (pos.row + 1 < self.rows).then(|| CellPos::new(pos.row + 1, pos.col)),
            pos.row.checked_sub(1).map(|row| CellPos::new(row, pos.col)),
            pos.col.checked_sub(1).map(|col| CellPos::new(pos.row, col)),
            (pos.col + 1 < self.rows).then(|| CellPos::new(pos.row, pos.col + 1)),
        ];

        for candidate in candidates.into_iter().flatten() {
            if let Ok(cell) = self.cell(candidate) {
                if !cell.is_wall() {
                    neighbors.push(candidate);
                }
            }
        }
        neighbors
    }

    /// Recompute every cell's adjacency and hand out the handle a search needs
    pub fn refresh_all_neighbors(&mut self) -> Prepared<'_> {
        let adjacency: Vec<Vec<CellPos>> = self
            .cells
            .iter()
            .map(|cell| self.neighbors_of(cell.pos()))
            .collect();

        for (cell, neighbors) in self.cells.iter_mut().zip(adjacency) {
            cell.set_neighbors(neighbors);
        }

        Prepared { grid: self }
    }

    /// Overwrite a cell's state, keeping the start/end markers consistent
    fn assign(&mut self, pos: CellPos, state: CellState) -> GridResult<bool> {
        let cell = self.cell_at_mut(pos.row, pos.col)?;
        let previous = cell.state();
        if previous == state {
            return Ok(false);
        }
        cell.set_state(state);

        if self.start == Some(pos) && state != CellState::Start {
            self.start = None;
        }
        if self.end == Some(pos) && state != CellState::End {
            self.end = None;
        }
        Ok(true)
    }

    /// Mark `pos` as a wall. Returns whether anything changed.
    pub fn set_wall(&mut self, pos: CellPos) -> GridResult<bool> {
        self.assign(pos, CellState::Wall)
    }

    /// Move the start marker to `pos`; the previous start becomes Free
    pub fn set_start(&mut self, pos: CellPos) -> GridResult<bool> {
        self.index(pos.row, pos.col)?;
        if let Some(previous) = self.start.filter(|&p| p != pos) {
            self.assign(previous, CellState::Free)?;
        }
        let changed = self.assign(pos, CellState::Start)?;
        self.start = Some(pos);
        Ok(changed)
    }

    /// Move the end marker to `pos`; the previous end becomes Free
    pub fn set_end(&mut self, pos: CellPos) -> GridResult<bool> {
        self.index(pos.row, pos.col)?;
        if let Some(previous) = self.end.filter(|&p| p != pos) {
            self.assign(previous, CellState::Free)?;
        }
        let changed = self.assign(pos, CellState::End)?;
        self.end = Some(pos);
        Ok(changed)
    }

    /// Return a single cell to Free, dropping the start/end marker it held
    pub fn reset_cell(&mut self, pos: CellPos) -> GridResult<bool> {
        self.assign(pos, CellState::Free)
    }

    /// Every cell Free, no endpoints
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
            cell.set_neighbors(Vec::new());
        }
        self.start = None;
        self.end = None;
    }

    /// Drop Open/Closed/Path marks from a previous run, keeping walls and endpoints.
    /// A goal painted by a run that was not the End marker is dropped too.
    pub fn clear_search_marks(&mut self) {
        let end = self.end;
        for cell in &mut self.cells {
            let painted_goal = cell.state() == CellState::End && end != Some(cell.pos());
            if cell.state().is_search_mark() || painted_goal {
                cell.reset();
            }
        }
    }

    /// Write a search mark. Endpoints keep their own state.
    pub(crate) fn mark(&mut self, pos: CellPos, state: CellState) {
        if let Ok(cell) = self.cell_at_mut(pos.row, pos.col) {
            if !matches!(cell.state(), CellState::Start | CellState::End) {
                cell.set_state(state);
            }
        }
    }

    /// Map a pixel position on the canvas to the cell under it
    pub fn cell_from_pixel(&self, x: f32, y: f32) -> Option<CellPos> {
        if self.cell_size == 0 || x < 0.0 || y < 0.0 {
            return None;
        }
        let size = self.cell_size as f32;
        let pos = CellPos::new((y / size) as usize, (x / size) as usize);
        self.contains(pos).then_some(pos)
    }

    /// One line per row, one symbol per cell (see `CellState::symbol`)
    pub fn to_ascii(&self) -> String {
        let mut result = String::with_capacity(self.rows * (self.rows + 1));
        for row in self.cells.chunks(self.rows.max(1)) {
            for cell in row {
                result.push(cell.state().symbol());
            }
            result.push('\n');
        }
        result
    }
}

/// A grid whose adjacency was refreshed and which stays borrowed for one run
///
/// Only `Grid::refresh_all_neighbors` creates one, so a search can never
/// start on stale neighbors, and the grid cannot be edited while it lives.
#[derive(Debug)]
pub struct Prepared<'g> {
    grid: &'g mut Grid,
}

impl<'g> Prepared<'g> {
    pub(crate) fn into_inner(self) -> &'g mut Grid {
        self.grid
    }
}

impl Deref for Prepared<'_> {
    type Target = Grid;

    fn deref(&self) -> &Grid {
        &*self.grid
    }
}
