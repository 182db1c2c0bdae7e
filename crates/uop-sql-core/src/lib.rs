//! # uop-sql-core
//!
//! Turns document-style filter criteria and logical table schemas into
//! parameterized SQL text plus a named binding map.
//!
//! This crate provides:
//! - A criteria compiler for the operator-keyed filter mapping
//!   (`$and`, `$or`, `$gt`, `like`, `in`, `endswith`, ...)
//! - A statement builder for CREATE/SELECT/COUNT/INSERT/UPDATE/DELETE
//! - A type map from abstract column types to backend column types
//! - A JSON codec for backends without native JSON columns
//!
//! Nothing here performs I/O. The output is handed to an executor.
//!
//! ## Compiling criteria
//!
//! ```rust
//! use serde_json::json;
//! use uop_sql_core::CriteriaCompiler;
//!
//! let criteria = json!({"$and": [{"$gt": {"age": 18}}, {"$lt": {"age": 65}}]});
//! let (clause, bindings) = CriteriaCompiler::default().compile(Some(&criteria)).unwrap();
//!
//! assert_eq!(clause, "(age > %(age_1)s AND age < %(age_2)s)");
//! assert_eq!(bindings.get("age_1"), Some(&json!(18)));
//! assert_eq!(bindings.get("age_2"), Some(&json!(65)));
//! ```
//!
//! ## Building statements
//!
//! ```rust
//! use serde_json::json;
//! use uop_sql_core::{AbstractType, StatementBuilder, TableSchema};
//!
//! let schema = TableSchema::builder("users")
//!     .column("id", AbstractType::Uuid)
//!     .column("name", AbstractType::String)
//!     .build()
//!     .unwrap();
//!
//! let (sql, _) = StatementBuilder::new(&schema)
//!     .delete(Some(&json!({"endswith": {"name": "son"}})))
//!     .unwrap();
//!
//! assert_eq!(sql, "DELETE FROM users WHERE name LIKE %(name_1)s");
//! ```

pub mod builder;
pub mod codec;
pub mod criteria;
pub mod error;
pub mod params;
pub mod schema;
pub mod types;

pub use builder::{Select, StatementBuilder};
pub use codec::{JsonCodec, Row};
pub use criteria::{Combinator, CriteriaCompiler, CriteriaNode, OperatorKind};
pub use error::{Result, SqlError};
pub use params::{Bindings, ParamStyle};
pub use schema::{ColumnSpec, Model, ModelSource, SchemaDescriptor, SchemaSource, TableSchema};
pub use types::{AbstractType, TypeMap};
