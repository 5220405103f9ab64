/**
* A live cell dies if it has fewer than two live neighbors.
* A live cell with two or three live neighbors lives on to the next generation.
* A live cell with more than three live neighbors dies.
* A dead cell will be brought back to live if it has exactly three live neighbors.
*
* The board has hard edges: nothing wraps around.
*/
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod pattern;
pub mod simulation;
pub mod ticker;
pub mod viewport;

pub use error::{Error, Result};
pub use geometry::GridGeometry;
pub use grid::{Cell, CellPainter, Grid};
pub use pattern::Pattern;
pub use simulation::{lock_recovering, Simulation, TickOutcome};
pub use ticker::Ticker;
pub use viewport::{map_pointer_to_cell, Letterbox, MarginAxis, PointerHit};
