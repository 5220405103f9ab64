use eframe::egui::{Color32, ColorImage};
use life_shared::{CellPainter, Grid};

pub const ALIVE_COLOR: Color32 = Color32::from_rgb(200, 200, 200);
pub const DEAD_COLOR: Color32 = Color32::from_rgb(20, 20, 20);

/// One pixel per cell. Only cells the grid reports as changed are repainted.
pub struct CellCanvas {
    image: ColorImage,
    stale: bool,
}

impl CellCanvas {
    pub fn new(rows: usize, cols: usize) -> Self {
        CellCanvas {
            image: ColorImage::new([cols, rows], DEAD_COLOR),
            stale: true,
        }
    }

    /// Applies the grid's pending transitions. Call after every step or edit.
    pub fn sync(&mut self, grid: &Grid) -> usize {
        let painted = grid.repaint_dirty(self);
        if painted > 0 {
            self.stale = true;
        }
        painted
    }

    /// The image to upload, if anything changed since the last upload.
    pub fn take_update(&mut self) -> Option<ColorImage> {
        if !self.stale {
            return None;
        }
        self.stale = false;
        Some(self.image.clone())
    }

    pub fn pixel(&self, row: usize, col: usize) -> Color32 {
        self.image[(col, row)]
    }
}

impl CellPainter for CellCanvas {
    fn paint(&mut self, row: usize, col: usize, alive: bool) {
        self.image[(col, row)] = if alive { ALIVE_COLOR } else { DEAD_COLOR };
    }
}
