//! Error types for criteria compilation and statement building.

use thiserror::Error;

/// Errors raised while resolving schemas or generating SQL.
#[derive(Debug, Error)]
pub enum SqlError {
    /// Unrecognized operator key, malformed leaf, or malformed combinator.
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),

    /// Abstract type name with no backend column type.
    #[error("unknown column type: {0}")]
    UnknownType(String),

    /// Two different values were bound under the same parameter name.
    #[error("parameter '{0}' is bound to conflicting values")]
    ParameterCollision(String),

    /// A column was declared twice in one table.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// The operation needs a primary key and the table has none.
    #[error("table '{0}' has no primary key")]
    MissingPrimaryKey(String),

    /// UPDATE called without any modified column.
    #[error("update requires at least one modified column")]
    EmptyUpdate,

    /// Schema source could not be turned into a table schema.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, SqlError>;
