//! # Batch Errors

use thiserror::Error;

/// Result type for batch construction and CSV reading
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors raised while building a batch
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("CSV error in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("Expected a JSON object or an array of objects, got {0}")]
    NotTabular(&'static str),

    #[error("Row {0} is not a JSON object")]
    RowNotObject(usize),
}
