use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Precondition violations. An out-of-grid click is not one of these, see
/// [`crate::viewport::PointerHit::Outside`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("cell size must be positive and finite, got {width}x{height}")]
    InvalidCellSize { width: f32, height: f32 },
    #[error("grid has no playable cells ({rows} rows, {cols} cols)")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("grid shapes differ: {expected:?} (rows, cols) expected, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("viewport must have a positive, finite size, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("pattern line {line}: unexpected character {found:?}")]
    InvalidPattern { line: usize, found: char },
}
