//! Ingest error types
//!
//! Every variant here is fatal for a run: no summary is produced once one
//! of these surfaces.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while streaming an export
#[derive(Error, Debug)]
pub enum IngestError {
    /// Input file does not exist
    #[error("Input not found: {0:?}")]
    InputMissing(PathBuf),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not well-formed XML
    #[error("Malformed input at byte {position}: {message}")]
    MalformedInput { position: u64, message: String },

    /// ZIP archive could not be read
    #[error("Archive error: {0}")]
    Archive(String),

    /// ZIP archive has no `export.xml` entry
    #[error("No export.xml found in archive {0:?}")]
    ExportNotFound(PathBuf),
}

impl IngestError {
    pub(crate) fn malformed(position: u64, message: impl Into<String>) -> Self {
        IngestError::MalformedInput {
            position,
            message: message.into(),
        }
    }
}

impl From<zip::result::ZipError> for IngestError {
    fn from(err: zip::result::ZipError) -> Self {
        IngestError::Archive(err.to_string())
    }
}

/// Result type alias for ingest operations
pub type IngestResult<T> = Result<T, IngestError>;
