use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading data files or writing exports.
#[derive(Debug, Error)]
pub enum LensError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the in-memory CSV buffer failed.
    #[error("CSV write error: {0}")]
    CsvWrite(std::io::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl LensError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LensError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reasons a query response cannot be turned into a displayable result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The service reported failure; carries its message.
    #[error("{0}")]
    Rejected(String),

    /// The service reported success but declared no columns.
    #[error("No column headers received from server")]
    NoHeaders,
}

pub type Result<T> = std::result::Result<T, LensError>;
