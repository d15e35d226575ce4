use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by the data core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("unknown sheet `{0}`")]
    UnknownPartition(String),

    #[error("unexpected layout: {0}")]
    Format(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Whether the error came from enumerating or loading the data source
    /// (as opposed to a utility contract violation).
    pub fn is_load_error(&self) -> bool {
        !matches!(self, Error::InvalidArgument(_))
    }
}
