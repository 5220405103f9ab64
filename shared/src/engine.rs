use log::debug;

use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};

/// Count the live cells among the eight neighbors of `(row, col)`.
///
/// The board has hard edges: positions off the grid are simply absent, so a
/// corner cell has at most three neighbors.
pub fn count_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let mut count = 0;

    for dr in [-1isize, 0, 1] {
        for dc in [-1isize, 0, 1] {
            if dr == 0 && dc == 0 {
                // Skip the current cell
                continue;
            }

            let (Some(neighbor_row), Some(neighbor_col)) = (row.checked_add_signed(dr), col.checked_add_signed(dc)) else {
                continue;
            };
            if grid.is_alive(neighbor_row, neighbor_col) {
                count += 1;
            }
        }
    }

    count
}

/// The Life rule for a single cell.
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    match (alive, neighbors) {
        (true, 2..=3) => true, // Survives
        (false, 3) => true,    // Becomes alive
        _ => false,            // Dies or remains dead
    }
}

/// Advance `current` by one generation into a freshly allocated grid.
pub fn step(current: &Grid) -> Grid {
    let mut next = current.clone();
    write_generation(current, &mut next);
    next
}

/// Advance `current` by one generation, writing every cell of `next`.
///
/// Returns whether any cell changed liveness. Both buffers must have the same
/// shape.
pub fn step_into(current: &Grid, next: &mut Grid) -> Result<bool> {
    if current.shape() != next.shape() {
        return Err(Error::DimensionMismatch {
            expected: current.shape(),
            found: next.shape(),
        });
    }
    Ok(write_generation(current, next))
}

fn write_generation(current: &Grid, next: &mut Grid) -> bool {
    let mut changed = false;

    for (row, (cells, next_cells)) in current.row_slices().zip(next.rows_mut()).enumerate() {
        for (col, (cell, next_cell)) in cells.iter().zip(next_cells.iter_mut()).enumerate() {
            let alive = next_state(cell.alive, count_neighbors(current, row, col));
            changed |= alive != cell.alive;
            *next_cell = Cell {
                alive,
                was_alive: cell.alive,
            };
        }
    }

    changed
}

/// Flip a single cell, recording its previous state for the renderer.
pub fn toggle_cell(grid: &mut Grid, row: usize, col: usize) -> Result<()> {
    let cell = grid.cell_mut(row, col)?;
    cell.transition(!cell.alive);
    debug!("toggled cell ({row}, {col}) to {}", if cell.alive { "alive" } else { "dead" });
    Ok(())
}
