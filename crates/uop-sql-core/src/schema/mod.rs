//! Resolved table schemas.
//!
//! A [`TableSchema`] is the ordered column-name to abstract-type table every
//! statement is generated from. Column order is the declaration order and
//! drives the positional pairing of INSERT columns and placeholders.

mod source;

pub use source::{Model, ModelSource, SchemaDescriptor, SchemaSource};

use std::collections::HashSet;

use crate::error::{Result, SqlError};
use crate::types::AbstractType;

/// Column name of the implicit primary key.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// A single column: name and abstract type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Abstract type.
    pub ty: AbstractType,
}

impl ColumnSpec {
    /// Creates a column spec.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: AbstractType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// An ordered, immutable table description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnSpec>,
    primary_key: Option<String>,
    json_supported: bool,
}

impl TableSchema {
    /// Starts building a schema for table `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> TableSchemaBuilder {
        TableSchemaBuilder {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            json_supported: false,
        }
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Primary key column, if any.
    #[must_use]
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// Whether the backend stores JSON natively.
    #[must_use]
    pub const fn json_supported(&self) -> bool {
        self.json_supported
    }

    /// Returns the schema with the native JSON flag replaced.
    #[must_use]
    pub const fn with_json_supported(mut self, supported: bool) -> Self {
        self.json_supported = supported;
        self
    }

    /// Looks up a column's abstract type.
    #[must_use]
    pub fn column_type(&self, name: &str) -> Option<AbstractType> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.ty)
    }

    /// Returns true when `name` is a JSON column.
    #[must_use]
    pub fn is_json(&self, name: &str) -> bool {
        self.column_type(name) == Some(AbstractType::Json)
    }
}

/// Builder for [`TableSchema`].
#[derive(Debug, Clone)]
pub struct TableSchemaBuilder {
    name: String,
    columns: Vec<ColumnSpec>,
    primary_key: Option<String>,
    json_supported: bool,
}

impl TableSchemaBuilder {
    /// Appends a column.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, ty: AbstractType) -> Self {
        self.columns.push(ColumnSpec::new(name, ty));
        self
    }

    /// Appends several columns.
    #[must_use]
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnSpec>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Sets the primary key column. Defaults to `id` when present.
    #[must_use]
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = Some(name.into());
        self
    }

    /// Declares native JSON support.
    #[must_use]
    pub const fn json_supported(mut self, supported: bool) -> Self {
        self.json_supported = supported;
        self
    }

    /// Validates and builds the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidSchema`] for an empty name or column list
    /// or a primary key naming no column, and [`SqlError::DuplicateColumn`]
    /// when a column is declared twice.
    pub fn build(self) -> Result<TableSchema> {
        if self.name.is_empty() {
            return Err(SqlError::InvalidSchema(String::from("table name is empty")));
        }
        if self.columns.is_empty() {
            return Err(SqlError::InvalidSchema(format!(
                "table '{}' has no columns",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SqlError::DuplicateColumn(column.name.clone()));
            }
        }

        let primary_key = match self.primary_key {
            Some(pk) if seen.contains(pk.as_str()) => Some(pk),
            Some(pk) => {
                return Err(SqlError::InvalidSchema(format!(
                    "primary key '{pk}' is not a column of '{}'",
                    self.name
                )));
            }
            None => seen
                .contains(DEFAULT_PRIMARY_KEY)
                .then(|| String::from(DEFAULT_PRIMARY_KEY)),
        };

        Ok(TableSchema {
            name: self.name,
            columns: self.columns,
            primary_key,
            json_supported: self.json_supported,
        })
    }
}
