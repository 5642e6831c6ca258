//! Error types for the transform and merge stages.

use thiserror::Error;

/// Errors that abort the transform or merge stage.
///
/// Per-row problems (unparseable timestamps, non-numeric ages) never surface
/// here; they become missing values.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A table the stage joins against is absent.
    #[error("required table '{table}' is missing")]
    MissingTable { table: String },

    /// A link column the stage joins on is absent.
    #[error("required column '{column}' is missing from table '{table}'")]
    MissingColumn { table: String, column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::error::PolarsError> for TransformError {
    fn from(err: polars::error::PolarsError) -> Self {
        TransformError::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
