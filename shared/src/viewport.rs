//! Hit testing for a grid drawn inside a viewport of arbitrary size.
//!
//! The grid is scaled uniformly to fit and centered, so whenever the viewport's
//! aspect ratio differs from the grid's there is an empty margin on one axis:
//!
//! ```text
//! +--------+--------+--------+      +--------+
//! |        |        |        |      | margin |
//! | margin |  grid  | margin |      +--------+
//! |        |        |        |      |  grid  |
//! +--------+--------+--------+      +--------+
//!                                   | margin |
//!                                   +--------+
//! ```

use log::trace;

use crate::error::{Error, Result};
use crate::geometry::GridGeometry;

/// Which pair of viewport edges carries the empty margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginAxis {
    /// The viewport is relatively taller than the grid.
    TopBottom,
    /// The viewport is relatively wider than the grid, or matches it.
    LeftRight,
}

/// Where a pointer landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerHit {
    Cell { row: usize, col: usize },
    /// In the margin or past the grid's far edge.
    Outside,
}

impl PointerHit {
    pub fn is_valid(&self) -> bool {
        matches!(self, PointerHit::Cell { .. })
    }

    pub fn cell(&self) -> Option<(usize, usize)> {
        match *self {
            PointerHit::Cell { row, col } => Some((row, col)),
            PointerHit::Outside => None,
        }
    }
}

/// The uniform-scale, centered placement of a grid inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub axis: MarginAxis,
    /// Size of each of the two margins, in viewport pixels.
    pub margin: f32,
    /// Viewport pixels per grid pixel.
    pub scale: f32,
    viewport_width: f32,
    viewport_height: f32,
    cell_width: f32,
    cell_height: f32,
    rows: usize,
    cols: usize,
}

impl Letterbox {
    pub fn fit(viewport_width: f32, viewport_height: f32, geometry: &GridGeometry) -> Result<Self> {
        let usable = |size: f32| size.is_finite() && size > 0.0;
        if !usable(viewport_width) || !usable(viewport_height) {
            return Err(Error::InvalidViewport {
                width: viewport_width,
                height: viewport_height,
            });
        }

        let screen_ratio = viewport_width / viewport_height;
        let grid_ratio = geometry.aspect_ratio();

        let (axis, scale, margin) = if screen_ratio < grid_ratio {
            // Grid spans the full width
            let actual_grid_height = viewport_width / grid_ratio;
            (
                MarginAxis::TopBottom,
                viewport_width / geometry.grid_width(),
                (viewport_height - actual_grid_height) / 2.0,
            )
        } else {
            // Grid spans the full height
            let actual_grid_width = viewport_height * grid_ratio;
            (
                MarginAxis::LeftRight,
                viewport_height / geometry.grid_height(),
                (viewport_width - actual_grid_width) / 2.0,
            )
        };

        Ok(Letterbox {
            axis,
            margin,
            scale,
            viewport_width,
            viewport_height,
            cell_width: geometry.cell_width(),
            cell_height: geometry.cell_height(),
            rows: geometry.rows(),
            cols: geometry.cols(),
        })
    }

    /// Top-left corner of the grid in viewport coordinates.
    pub fn origin(&self) -> (f32, f32) {
        match self.axis {
            MarginAxis::TopBottom => (0.0, self.margin),
            MarginAxis::LeftRight => (self.margin, 0.0),
        }
    }

    /// On-screen size of one cell.
    pub fn cell_size(&self) -> (f32, f32) {
        (self.cell_width * self.scale, self.cell_height * self.scale)
    }

    /// On-screen size of the whole grid.
    pub fn grid_size(&self) -> (f32, f32) {
        let (cell_width, cell_height) = self.cell_size();
        (cell_width * self.cols as f32, cell_height * self.rows as f32)
    }

    /// Top-left corner of a cell in viewport coordinates.
    pub fn cell_origin(&self, row: usize, col: usize) -> (f32, f32) {
        let (x, y) = self.origin();
        let (cell_width, cell_height) = self.cell_size();
        (x + col as f32 * cell_width, y + row as f32 * cell_height)
    }

    /// Cell boundary lines as `(start, end)` pairs: every column edge from top
    /// to bottom, then every row edge from left to right.
    pub fn grid_lines(&self) -> impl Iterator<Item = ((f32, f32), (f32, f32))> + '_ {
        let (left, top) = self.origin();
        let (width, height) = self.grid_size();
        let columns = (0..=self.cols).map(move |col| {
            let (x, _) = self.cell_origin(0, col);
            ((x, top), (x, top + height))
        });
        let rows = (0..=self.rows).map(move |row| {
            let (_, y) = self.cell_origin(row, 0);
            ((left, y), (left + width, y))
        });
        columns.chain(rows)
    }

    /// Inverts the placement for a pointer in viewport coordinates.
    ///
    /// A pointer exactly on the margin edge belongs to the grid.
    pub fn locate(&self, pointer_x: f32, pointer_y: f32) -> PointerHit {
        let (cell_width, cell_height) = self.cell_size();

        let (col, row) = match self.axis {
            MarginAxis::TopBottom => {
                if pointer_y < self.margin || pointer_y > self.viewport_height - self.margin {
                    trace!("pointer y {pointer_y} falls in the top/bottom margin");
                    return PointerHit::Outside;
                }
                (pointer_x / cell_width, (pointer_y - self.margin) / cell_height)
            }
            MarginAxis::LeftRight => {
                if pointer_x < self.margin || pointer_x > self.viewport_width - self.margin {
                    trace!("pointer x {pointer_x} falls in the left/right margin");
                    return PointerHit::Outside;
                }
                ((pointer_x - self.margin) / cell_width, pointer_y / cell_height)
            }
        };

        // Also catches NaN and the far edge, where the division lands exactly on `rows`/`cols`
        let (col, row) = (col.floor(), row.floor());
        if !(col >= 0.0 && row >= 0.0 && col < self.cols as f32 && row < self.rows as f32) {
            trace!("pointer ({pointer_x}, {pointer_y}) resolves outside the grid");
            return PointerHit::Outside;
        }

        PointerHit::Cell {
            row: row as usize,
            col: col as usize,
        }
    }
}

/// Maps a pointer position in a `viewport_width` x `viewport_height` viewport to
/// the grid cell underneath it.
pub fn map_pointer_to_cell(
    pointer_x: f32,
    pointer_y: f32,
    viewport_width: f32,
    viewport_height: f32,
    geometry: &GridGeometry,
) -> Result<PointerHit> {
    Ok(Letterbox::fit(viewport_width, viewport_height, geometry)?.locate(pointer_x, pointer_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_viewport_has_no_margin() {
        let fit = Letterbox::fit(600.0, 600.0, &GridGeometry::default()).unwrap();
        assert_eq!(fit.axis, MarginAxis::LeftRight);
        assert_eq!(fit.margin, 0.0);
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.grid_size(), (600.0, 600.0));
    }

    #[test]
    fn tall_viewport_gets_top_and_bottom_margins() {
        let fit = Letterbox::fit(300.0, 500.0, &GridGeometry::default()).unwrap();
        assert_eq!(fit.axis, MarginAxis::TopBottom);
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.margin, 100.0);
        assert_eq!(fit.origin(), (0.0, 100.0));
        assert_eq!(fit.cell_origin(2, 3), (90.0, 160.0));
    }

    #[test]
    fn wide_viewport_gets_side_margins() {
        let geometry = GridGeometry::new(800.0, 400.0, 40.0, 40.0).unwrap();
        let fit = Letterbox::fit(1000.0, 200.0, &geometry).unwrap();
        assert_eq!(fit.axis, MarginAxis::LeftRight);
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.margin, 300.0);
        assert_eq!(fit.cell_size(), (20.0, 20.0));
    }

    #[test]
    fn cell_origin_round_trips_through_locate() {
        let geometry = GridGeometry::new(800.0, 400.0, 40.0, 40.0).unwrap();
        let fit = Letterbox::fit(500.0, 700.0, &geometry).unwrap();
        let (cell_width, cell_height) = fit.cell_size();
        for (row, col) in [(0, 0), (3, 17), (9, 19)] {
            let (x, y) = fit.cell_origin(row, col);
            let hit = fit.locate(x + cell_width / 2.0, y + cell_height / 2.0);
            assert_eq!(hit, PointerHit::Cell { row, col });
        }
    }

    #[test]
    fn grid_lines_frame_every_cell() {
        let geometry = GridGeometry::new(120.0, 60.0, 30.0, 30.0).unwrap();
        let fit = Letterbox::fit(240.0, 240.0, &geometry).unwrap();
        // scale 2, 60px margins above and below
        let lines: Vec<_> = fit.grid_lines().collect();
        assert_eq!(lines.len(), 5 + 3);
        assert_eq!(lines[0], ((0.0, 60.0), (0.0, 180.0)));
        assert_eq!(lines[4], ((240.0, 60.0), (240.0, 180.0)));
        assert_eq!(lines[5], ((0.0, 60.0), (240.0, 60.0)));
        assert_eq!(lines[7], ((0.0, 180.0), (240.0, 180.0)));
    }

    #[test]
    fn far_edges_are_outside() {
        let fit = Letterbox::fit(600.0, 600.0, &GridGeometry::default()).unwrap();
        assert_eq!(fit.locate(600.0, 10.0), PointerHit::Outside);
        assert_eq!(fit.locate(10.0, 600.0), PointerHit::Outside);
        assert_eq!(fit.locate(599.9, 599.9), PointerHit::Cell { row: 9, col: 9 });
    }

    #[test]
    fn negative_and_nan_pointers_are_outside() {
        let fit = Letterbox::fit(300.0, 500.0, &GridGeometry::default()).unwrap();
        assert_eq!(fit.locate(-1.0, 200.0), PointerHit::Outside);
        assert_eq!(fit.locate(f32::NAN, 200.0), PointerHit::Outside);
    }

    #[test]
    fn degenerate_viewports_are_errors() {
        let geometry = GridGeometry::default();
        for (width, height) in [(0.0, 600.0), (600.0, 0.0), (-10.0, 600.0), (f32::INFINITY, 600.0)] {
            assert_eq!(
                map_pointer_to_cell(1.0, 1.0, width, height, &geometry).unwrap_err(),
                Error::InvalidViewport { width, height }
            );
        }
    }

    #[test]
    fn hit_helpers() {
        assert!(PointerHit::Cell { row: 1, col: 2 }.is_valid());
        assert_eq!(PointerHit::Cell { row: 1, col: 2 }.cell(), Some((1, 2)));
        assert!(!PointerHit::Outside.is_valid());
        assert_eq!(PointerHit::Outside.cell(), None);
    }
}
