use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pixel layout of the board: the grid's logical size and the size of one cell.
///
/// The grid size is always a whole number of cells; whatever does not fit is
/// cut off when the geometry is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub struct GridGeometry {
    grid_width: f32,
    grid_height: f32,
    cell_width: f32,
    cell_height: f32,
    #[serde(skip_serializing)]
    rows: usize,
    #[serde(skip_serializing)]
    cols: usize,
}

#[derive(Deserialize)]
struct RawGeometry {
    grid_width: f32,
    grid_height: f32,
    cell_width: f32,
    cell_height: f32,
}

impl TryFrom<RawGeometry> for GridGeometry {
    type Error = Error;

    fn try_from(raw: RawGeometry) -> Result<Self> {
        GridGeometry::new(raw.grid_width, raw.grid_height, raw.cell_width, raw.cell_height)
    }
}

impl GridGeometry {
    pub fn new(grid_width: f32, grid_height: f32, cell_width: f32, cell_height: f32) -> Result<Self> {
        let valid_cell = |size: f32| size.is_finite() && size > 0.0;
        if !valid_cell(cell_width) || !valid_cell(cell_height) {
            return Err(Error::InvalidCellSize {
                width: cell_width,
                height: cell_height,
            });
        }

        // Remainder pixels are not part of the playable grid
        let cols = (grid_width / cell_width).floor();
        let rows = (grid_height / cell_height).floor();
        if !(cols.is_finite() && rows.is_finite() && cols >= 1.0 && rows >= 1.0) {
            return Err(Error::EmptyGrid {
                rows: rows.max(0.0) as usize,
                cols: cols.max(0.0) as usize,
            });
        }

        Ok(GridGeometry {
            grid_width: cols * cell_width,
            grid_height: rows * cell_height,
            cell_width,
            cell_height,
            rows: rows as usize,
            cols: cols as usize,
        })
    }

    pub fn grid_width(&self) -> f32 {
        self.grid_width
    }

    pub fn grid_height(&self) -> f32 {
        self.grid_height
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Width over height of the playable grid.
    pub fn aspect_ratio(&self) -> f32 {
        self.grid_width / self.grid_height
    }
}

impl Default for GridGeometry {
    /// A 600x600 board of 60x60 cells.
    fn default() -> Self {
        GridGeometry {
            grid_width: 600.0,
            grid_height: 600.0,
            cell_width: 60.0,
            cell_height: 60.0,
            rows: 10,
            cols: 10,
        }
    }
}
