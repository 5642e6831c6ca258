//! Error types for table loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a load.
///
/// Every variant is fatal: downstream stages assume every table is present,
/// so a partial table set is never returned.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Source Errors ===
    /// Database file could not be opened.
    #[error("failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A query against the database failed.
    #[error("query failed on table '{table}': {source}")]
    Query {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a CSV file with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// The source does not expose the requested table.
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    // === DataFrame Errors ===
    /// A batch could not be appended to the rows already read.
    #[error("failed to assemble table '{table}': {message}")]
    Assemble { table: String, message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::error::PolarsError> for IngestError {
    fn from(err: polars::error::PolarsError) -> Self {
        IngestError::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
