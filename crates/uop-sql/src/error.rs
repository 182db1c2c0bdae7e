//! Error types for statement execution.

use thiserror::Error;
use uop_sql_core::SqlError;

/// Errors raised by executors and collections.
#[derive(Debug, Error)]
pub enum Error {
    /// Statement generation failed.
    #[error(transparent)]
    Sql(#[from] SqlError),

    /// Database error from sqlx, passed through unchanged.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The SQL references a parameter with no binding.
    #[error("no value bound for parameter '{0}'")]
    MissingParameter(String),

    /// A bound value cannot be sent to the backend.
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),
}

/// Result type alias for execution.
pub type Result<T> = std::result::Result<T, Error>;
