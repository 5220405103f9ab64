use crate::error::{Error, Result};

/// A small arrangement of live cells, positioned relative to its own top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    live: Vec<(usize, usize)>,
    rows: usize,
    cols: usize,
}

impl Pattern {
    /// Parses the plaintext format: `O` or `*` is alive, `.` is dead and lines
    /// starting with `!` are comments. Short lines are padded with dead cells.
    pub fn parse(text: &str) -> Result<Self> {
        let mut live = Vec::new();
        let mut rows = 0;
        let mut cols = 0;

        for (index, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.starts_with('!') {
                continue;
            }
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    'O' | '*' => live.push((rows, col)),
                    '.' => {}
                    found => {
                        return Err(Error::InvalidPattern {
                            line: index + 1,
                            found,
                        })
                    }
                }
            }
            cols = cols.max(line.chars().count());
            rows += 1;
        }

        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid { rows, cols });
        }
        Ok(Pattern { live, rows, cols })
    }

    /// Repeated coordinates are kept once.
    pub fn from_cells(cells: &[(usize, usize)]) -> Self {
        let mut live = cells.to_vec();
        live.sort_unstable();
        live.dedup();
        let rows = live.iter().map(|&(row, _)| row + 1).max().unwrap_or(0);
        let cols = live.iter().map(|&(_, col)| col + 1).max().unwrap_or(0);
        Pattern { live, rows, cols }
    }

    /// 2x2 still life.
    pub fn block() -> Self {
        Pattern::from_cells(&[(0, 0), (0, 1), (1, 0), (1, 1)])
    }

    /// Horizontal period-2 oscillator.
    pub fn blinker() -> Self {
        Pattern::from_cells(&[(0, 0), (0, 1), (0, 2)])
    }

    /// Travels one cell down and to the right every four generations.
    pub fn glider() -> Self {
        Pattern::from_cells(&[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn live_cells(&self) -> &[(usize, usize)] {
        &self.live
    }
}
