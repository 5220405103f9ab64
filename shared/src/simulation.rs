use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};
use rand::Rng;

use crate::engine;
use crate::error::{Error, Result};
use crate::geometry::GridGeometry;
use crate::grid::Grid;
use crate::pattern::Pattern;
use crate::viewport::map_pointer_to_cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Paused,
    Advanced { generation: u64, changed: bool },
}

/// Owns the authoritative grid plus the run/pause state.
///
/// Each generation is written into a second buffer which then becomes the
/// current grid in a single swap, so readers never see a half-written board.
/// Share it between a ticker and an input handler behind one `Mutex`.
#[derive(Debug, Clone)]
pub struct Simulation {
    geometry: GridGeometry,
    current: Grid,
    next: Grid,
    running: bool,
    generation: u64,
}

impl Simulation {
    /// A paused simulation with an empty board.
    pub fn new(geometry: GridGeometry) -> Result<Self> {
        let grid = Grid::from_geometry(&geometry)?;
        Simulation::with_grid(geometry, grid)
    }

    pub fn with_grid(geometry: GridGeometry, grid: Grid) -> Result<Self> {
        let expected = (geometry.rows(), geometry.cols());
        if grid.shape() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: grid.shape(),
            });
        }
        Ok(Simulation {
            geometry,
            next: grid.clone(),
            current: grid,
            running: false,
            generation: 0,
        })
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            debug!("simulation {}", if running { "resumed" } else { "paused" });
        }
        self.running = running;
    }

    /// Returns the new state.
    pub fn toggle_running(&mut self) -> bool {
        self.set_running(!self.running);
        self.running
    }

    /// Called by the timer source; does nothing while paused.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if !self.running {
            return Ok(TickOutcome::Paused);
        }
        self.advance()
    }

    /// Computes one generation regardless of the run flag.
    pub fn advance(&mut self) -> Result<TickOutcome> {
        let changed = engine::step_into(&self.current, &mut self.next)?;
        std::mem::swap(&mut self.current, &mut self.next);
        self.generation += 1;
        debug!(
            "generation {}: {} live cells{}",
            self.generation,
            self.current.live_count(),
            if changed { "" } else { " (stable)" }
        );
        Ok(TickOutcome::Advanced {
            generation: self.generation,
            changed,
        })
    }

    pub fn toggle(&mut self, row: usize, col: usize) -> Result<()> {
        engine::toggle_cell(&mut self.current, row, col)
    }

    /// Maps a pointer in viewport coordinates to a cell and toggles it.
    ///
    /// Returns the toggled cell, or `None` when the pointer missed the grid.
    pub fn click(
        &mut self,
        pointer_x: f32,
        pointer_y: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Result<Option<(usize, usize)>> {
        let hit = map_pointer_to_cell(pointer_x, pointer_y, viewport_width, viewport_height, &self.geometry)?;
        let Some((row, col)) = hit.cell() else {
            return Ok(None);
        };
        self.toggle(row, col)?;
        Ok(Some((row, col)))
    }

    /// Stamps `pattern` in the middle of the board.
    pub fn place_centered(&mut self, pattern: &Pattern) -> Result<()> {
        self.current.place_centered(pattern)
    }

    /// Reseeds the board and restarts the generation count.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R, density: f64) {
        self.current.randomize(rng, density);
        self.generation = 0;
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.generation = 0;
    }
}

/// Locks `mutex`, taking the value back if a previous holder panicked.
pub fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("recovering poisoned lock");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn blinker_simulation() -> Simulation {
        let geometry = GridGeometry::new(500.0, 500.0, 100.0, 100.0).unwrap();
        let grid = Grid::with_pattern(5, 5, &Pattern::blinker(), 2, 1).unwrap();
        Simulation::with_grid(geometry, grid).unwrap()
    }

    #[test]
    fn starts_paused_and_ignores_ticks() {
        let mut simulation = blinker_simulation();
        let before = simulation.grid().clone();
        assert_eq!(simulation.tick().unwrap(), TickOutcome::Paused);
        assert_eq!(simulation.grid(), &before);
        assert_eq!(simulation.generation(), 0);
    }

    #[test]
    fn running_ticks_advance_and_swap() {
        let mut simulation = blinker_simulation();
        assert!(simulation.toggle_running());
        assert_eq!(
            simulation.tick().unwrap(),
            TickOutcome::Advanced {
                generation: 1,
                changed: true
            }
        );
        assert!(simulation.grid().is_alive(1, 2));
        assert!(simulation.grid().is_alive(3, 2));
        assert!(!simulation.grid().is_alive(2, 1));

        simulation.tick().unwrap();
        assert!(simulation.grid().is_alive(2, 1));
        assert_eq!(simulation.generation(), 2);
    }

    #[test]
    fn advance_ignores_the_pause_flag() {
        let mut simulation = blinker_simulation();
        assert!(matches!(simulation.advance().unwrap(), TickOutcome::Advanced { generation: 1, .. }));
        assert!(!simulation.is_running());
    }

    #[test]
    fn toggle_between_ticks_survives_the_swap() {
        let mut simulation = blinker_simulation();
        simulation.advance().unwrap();
        simulation.toggle(0, 0).unwrap();
        assert!(simulation.grid()[(0, 0)].is_dirty());
        // A lone cell in the corner dies on the next generation
        simulation.advance().unwrap();
        assert!(simulation.grid()[(0, 0)].was_alive);
        assert!(!simulation.grid().is_alive(0, 0));
    }

    #[test]
    fn click_maps_then_toggles() {
        let mut simulation = blinker_simulation();
        // 1000x500 viewport: scale 1, 250px side margins
        assert_eq!(simulation.click(260.0, 10.0, 1000.0, 500.0).unwrap(), Some((0, 0)));
        assert!(simulation.grid().is_alive(0, 0));

        let before = simulation.grid().clone();
        assert_eq!(simulation.click(100.0, 10.0, 1000.0, 500.0).unwrap(), None);
        assert_eq!(simulation.grid(), &before);

        assert!(simulation.click(1.0, 1.0, 0.0, 500.0).is_err());
    }

    #[test]
    fn rejects_grid_that_does_not_match_geometry() {
        let err = Simulation::with_grid(GridGeometry::default(), Grid::new(3, 3).unwrap()).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: (10, 10),
                found: (3, 3)
            }
        );
    }

    #[test]
    fn place_centered_seeds_the_current_board() {
        let geometry = GridGeometry::new(500.0, 500.0, 100.0, 100.0).unwrap();
        let mut simulation = Simulation::new(geometry).unwrap();
        simulation.place_centered(&Pattern::blinker()).unwrap();
        assert_eq!(simulation.grid().live_count(), 3);
        assert!(simulation.grid()[(2, 1)].is_dirty());
        simulation.advance().unwrap();
        assert!(simulation.grid().is_alive(1, 2));
    }

    #[test]
    fn clear_resets_generation() {
        let mut simulation = blinker_simulation();
        simulation.advance().unwrap();
        simulation.clear();
        assert_eq!(simulation.generation(), 0);
        assert_eq!(simulation.grid().live_count(), 0);
    }

    #[test]
    fn lock_recovering_survives_a_poisoned_mutex() {
        let shared = Arc::new(Mutex::new(blinker_simulation()));
        let poisoner = Arc::clone(&shared);
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("renderer blew up");
        })
        .join();
        assert!(shared.is_poisoned());
        assert_eq!(lock_recovering(&shared).generation(), 0);
    }
}
