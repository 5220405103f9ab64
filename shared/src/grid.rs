use std::ops::Index;

use rand::Rng;

use crate::error::{Error, Result};
use crate::geometry::GridGeometry;
use crate::pattern::Pattern;

/// One square of the board.
///
/// `was_alive` holds the liveness before the most recent step or edit, so a
/// cell is dirty exactly when the two fields differ.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub alive: bool,
    pub was_alive: bool,
}

impl Cell {
    pub fn is_dirty(&self) -> bool {
        self.alive != self.was_alive
    }

    /// Records the current liveness as the previous one and sets the new value.
    pub(crate) fn transition(&mut self, alive: bool) {
        self.was_alive = self.alive;
        self.alive = alive;
    }
}

/// Receives the cells that changed since the last step or edit.
pub trait CellPainter {
    fn paint(&mut self, row: usize, col: usize, alive: bool);
}

/// A rectangular, row-major board of cells. The shape never changes after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    cols: usize,
}

impl Grid {
    /// A dead board where every cell counts as dirty, so the first repaint
    /// covers the whole grid.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid { rows, cols });
        }
        let cell = Cell {
            alive: false,
            was_alive: true,
        };
        Ok(Grid {
            cells: vec![vec![cell; cols]; rows],
            cols,
        })
    }

    pub fn from_geometry(geometry: &GridGeometry) -> Result<Self> {
        Grid::new(geometry.rows(), geometry.cols())
    }

    pub fn from_rows(cells: Vec<Vec<Cell>>) -> Result<Self> {
        let cols = cells.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(Error::EmptyGrid {
                rows: cells.len(),
                cols,
            });
        }
        if let Some((row, found)) = cells
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(Error::RaggedGrid {
                row,
                expected: cols,
                found,
            });
        }
        Ok(Grid { cells, cols })
    }

    /// A dead board of the given size with `pattern` stamped at `(row, col)`.
    pub fn with_pattern(rows: usize, cols: usize, pattern: &Pattern, row: usize, col: usize) -> Result<Self> {
        let mut grid = Grid::new(rows, cols)?;
        grid.place(pattern, row, col)?;
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|cells| cells.get(col))
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(|cell| cell.alive)
    }

    pub fn live_count(&self) -> usize {
        self.iter().filter(|(_, _, cell)| cell.alive).count()
    }

    pub fn row_slices(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| cells.iter().enumerate().map(move |(col, cell)| (row, col, cell)))
    }

    /// Cells whose liveness changed in the most recent step or edit.
    pub fn dirty_cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        self.iter().filter(|(_, _, cell)| cell.is_dirty())
    }

    /// Hands every dirty cell to `painter` and returns how many there were.
    pub fn repaint_dirty<P: CellPainter + ?Sized>(&self, painter: &mut P) -> usize {
        let mut painted = 0;
        for (row, col, cell) in self.dirty_cells() {
            painter.paint(row, col, cell.alive);
            painted += 1;
        }
        painted
    }

    /// Forgets all pending transitions.
    pub(crate) fn mark_clean(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.was_alive = cell.alive;
        }
    }

    /// Sets one cell, recording the transition like a step would.
    pub fn set_alive(&mut self, row: usize, col: usize, alive: bool) -> Result<()> {
        self.cell_mut(row, col)?.transition(alive);
        Ok(())
    }

    /// Brings the cells of `pattern` to life with its top-left corner at `(row, col)`.
    /// Cells outside the pattern's live set are left alone.
    pub fn place(&mut self, pattern: &Pattern, row: usize, col: usize) -> Result<()> {
        let (rows, cols) = self.shape();
        if row + pattern.rows() > rows || col + pattern.cols() > cols {
            return Err(Error::CellOutOfBounds {
                row: row + pattern.rows().saturating_sub(1),
                col: col + pattern.cols().saturating_sub(1),
                rows,
                cols,
            });
        }
        for &(dr, dc) in pattern.live_cells() {
            self.cells[row + dr][col + dc].transition(true);
        }
        Ok(())
    }

    /// Places `pattern` in the middle of the board.
    pub fn place_centered(&mut self, pattern: &Pattern) -> Result<()> {
        let row = self.rows().saturating_sub(pattern.rows()) / 2;
        let col = self.cols.saturating_sub(pattern.cols()) / 2;
        self.place(pattern, row, col)
    }

    /// Each cell comes alive with probability `density`, clamped to `[0, 1]`;
    /// NaN counts as 0.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R, density: f64) {
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        for cell in self.cells.iter_mut().flatten() {
            cell.transition(rng.random_bool(density));
        }
    }

    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.transition(false);
        }
    }

    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell> {
        let (rows, cols) = self.shape();
        self.cells
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(Error::CellOutOfBounds { row, col, rows, cols })
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Cell]> + '_ {
        self.cells.iter_mut().map(Vec::as_mut_slice)
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, (row, col): (usize, usize)) -> &Cell {
        &self.cells[row][col]
    }
}
