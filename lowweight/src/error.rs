use thiserror::Error;

/// Failures of loading, transforming or searching a code.
///
/// A search that spends its whole budget without reaching the target weight is not an error;
/// it ends with [`SearchStatus::Exhausted`](crate::SearchStatus::Exhausted).
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed code matrix: {0}")]
    Format(String),
    #[error(transparent)]
    Index(gf2::Error),
    #[error("rank error: {0}")]
    Rank(String),
    #[error("no nonzero codeword exists in a code of dimension zero")]
    NotFound,
    #[error("bit pattern is not a codeword of the generator matrix")]
    NotACodeword,
    #[error("dimension mismatch: expected {expected}, found {found}")]
    Dimension { expected: usize, found: usize },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid parameters: {0}")]
    Config(String),
}

impl From<gf2::Error> for Error {
    fn from(error: gf2::Error) -> Self {
        match error {
            gf2::Error::Format(message) => Error::Format(message),
            gf2::Error::DimensionMismatch { expected, found } => Error::Dimension { expected, found },
            index_error => Error::Index(index_error),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Config(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
