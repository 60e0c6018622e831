//! Output error types

use thiserror::Error;

/// Errors that can occur while writing summary artifacts
#[derive(Error, Debug)]
pub enum OutputError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// CSV export failed
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<serde_json::Error> for OutputError {
    fn from(err: serde_json::Error) -> Self {
        OutputError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for OutputError {
    fn from(err: csv::Error) -> Self {
        OutputError::Csv(err.to_string())
    }
}

/// Result type alias for output operations
pub type OutputResult<T> = Result<T, OutputError>;
