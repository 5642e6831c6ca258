//! Error types for export and presentation aggregates.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while exporting or summarizing views.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to create the export directory or write the file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A view lacks a column the aggregate needs.
    #[error("column '{column}' not found in view")]
    MissingColumn { column: String },

    /// Unknown export format name.
    #[error("unknown export format '{0}' (expected csv or txt)")]
    UnknownFormat(String),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::error::PolarsError> for OutputError {
    fn from(err: polars::error::PolarsError) -> Self {
        OutputError::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
