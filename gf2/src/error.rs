use thiserror::Error;

/// Errors raised by checked accessors and by constructors that take external data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("index ({row}, {column}) out of range for matrix of shape {shape:?}")]
    IndexOutOfRange {
        row: usize,
        column: usize,
        shape: (usize, usize),
    },
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: usize, length: usize },
    #[error("malformed bit data: {0}")]
    Format(String),
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl Error {
    /// True for the out-of-range access variants.
    #[must_use]
    pub fn is_index_error(&self) -> bool {
        matches!(self, Error::IndexOutOfRange { .. } | Error::IndexOutOfBounds { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
