//! Statement builder.
//!
//! Generates DDL and parameterized DML for one [`TableSchema`]. Every
//! statement that takes criteria returns its SQL together with the
//! [`Bindings`] the executor must supply.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use uop_sql_core::{AbstractType, Select, StatementBuilder, TableSchema};
//!
//! let schema = TableSchema::builder("users")
//!     .column("id", AbstractType::Uuid)
//!     .column("age", AbstractType::Int)
//!     .build()
//!     .unwrap();
//!
//! let (sql, bindings) = StatementBuilder::new(&schema)
//!     .select(
//!         Some(&json!({"$gte": {"age": 18}})),
//!         &Select::new().columns(&["id"]).limit(10),
//!     )
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT id FROM users WHERE age >= %(age_1)s LIMIT 10");
//! assert_eq!(bindings.len(), 1);
//! ```
//!
//! Identifiers are emitted unquoted. Table and column names must come from
//! trusted schema definitions, never from user input.

mod create;
mod delete;
mod insert;
mod select;
mod update;

pub use select::Select;
pub use update::MOD_PREFIX;

use crate::criteria::CriteriaCompiler;
use crate::params::ParamStyle;
use crate::schema::TableSchema;
use crate::types::TypeMap;

/// Builds statements for one table.
#[derive(Debug, Clone)]
pub struct StatementBuilder<'a> {
    schema: &'a TableSchema,
    compiler: CriteriaCompiler,
    type_map: TypeMap,
}

impl<'a> StatementBuilder<'a> {
    /// Creates a builder with `%(name)s` placeholders and the default type map.
    #[must_use]
    pub fn new(schema: &'a TableSchema) -> Self {
        Self {
            schema,
            compiler: CriteriaCompiler::default(),
            type_map: TypeMap::default(),
        }
    }

    /// Sets the placeholder style.
    #[must_use]
    pub const fn param_style(mut self, style: ParamStyle) -> Self {
        self.compiler = CriteriaCompiler::new(style);
        self
    }

    /// Sets the type map used for DDL.
    #[must_use]
    pub const fn type_map(mut self, type_map: TypeMap) -> Self {
        self.type_map = type_map;
        self
    }

    /// The table this builder targets.
    #[must_use]
    pub const fn schema(&self) -> &'a TableSchema {
        self.schema
    }

    const fn style(&self) -> ParamStyle {
        self.compiler.style()
    }
}

/// Appends ` WHERE <clause>` unless the clause is empty.
fn push_where(sql: &mut String, clause: &str) {
    if !clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }
}
