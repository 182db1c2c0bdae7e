//! Document-style collections over SQL backends.
//!
//! `uop-sql` runs the statements generated by [`uop_sql_core`]:
//!
//! - **Executor** - runs `(sql, bindings)` pairs and returns rows as maps
//! - **Collection** - find/count/insert/update/remove over one table
//! - **SQLite** - an executor on top of `sqlx`
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use uop_sql::prelude::*;
//!
//! # async fn run() -> uop_sql::error::Result<()> {
//! let executor = SqliteExecutor::connect("sqlite::memory:", 1).await?;
//! let users = executor.collection(&json!({
//!     "name": "users",
//!     "attributes": {"id": "uuid", "name": "string", "age": "int"}
//! }))?;
//! users.create_table().await?;
//!
//! let adults = users
//!     .find(Some(&json!({"$gte": {"age": 18}})), &Select::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod error;
pub mod executor;
pub mod value;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::collection::Collection;
    pub use crate::error::{Error, Result};
    pub use crate::executor::{to_positional, Executor, SqliteExecutor};
    pub use crate::value::SqlValue;
    pub use uop_sql_core::{
        AbstractType, Bindings, ParamStyle, Row, SchemaDescriptor, SchemaSource, Select,
        StatementBuilder, TableSchema,
    };
}
