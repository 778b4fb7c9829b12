use thiserror::Error;

/// Errors raised by the vector substrate: dimension mismatches on input and
/// internal invariant violations that indicate a bug in a caller rather than
/// a bad dataset.
#[derive(Debug, Error)]
pub enum Error {
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("point id {id} out of range for a store of {size} points")]
    PointOutOfRange { id: u32, size: usize },

    #[error("internal invariant violated: {0}")]
    Internal(String),
}
