//! Schema sources.
//!
//! Callers describe tables in different shapes: a plain JSON mapping, a
//! deserialized descriptor, or a Rust type with static column metadata.
//! Each shape implements [`SchemaSource`] and resolves to a [`TableSchema`].

use std::marker::PhantomData;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ColumnSpec, TableSchema};
use crate::error::{Result, SqlError};
use crate::types::AbstractType;

/// Anything that can be resolved into a [`TableSchema`].
pub trait SchemaSource {
    /// Resolves the source, declaring whether the backend stores JSON natively.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::UnknownType`] for unmapped type names and
    /// [`SqlError::InvalidSchema`] for malformed sources.
    fn resolve(&self, json_supported: bool) -> Result<TableSchema>;
}

impl SchemaSource for TableSchema {
    fn resolve(&self, json_supported: bool) -> Result<TableSchema> {
        Ok(self.clone().with_json_supported(json_supported))
    }
}

/// A deserializable table description.
///
/// ```json
/// {"name": "users", "attributes": {"id": "uuid", "name": "string"}, "primary_key": "id"}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDescriptor {
    /// Table name.
    pub name: String,
    /// Column name to abstract type name, in declaration order.
    #[serde(alias = "columns")]
    pub attributes: Map<String, Value>,
    /// Optional primary key override.
    #[serde(default)]
    pub primary_key: Option<String>,
}

impl SchemaDescriptor {
    /// Parses a descriptor from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Json`] when the text is not a valid descriptor.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl SchemaSource for SchemaDescriptor {
    fn resolve(&self, json_supported: bool) -> Result<TableSchema> {
        let columns = self
            .attributes
            .iter()
            .map(|(name, ty)| {
                let type_name = ty.as_str().ok_or_else(|| {
                    SqlError::InvalidSchema(format!("type of column '{name}' must be a string"))
                })?;
                Ok(ColumnSpec::new(name.clone(), type_name.parse()?))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut builder = TableSchema::builder(self.name.clone())
            .columns(columns)
            .json_supported(json_supported);
        if let Some(pk) = &self.primary_key {
            builder = builder.primary_key(pk.clone());
        }
        builder.build()
    }
}

impl SchemaSource for Value {
    fn resolve(&self, json_supported: bool) -> Result<TableSchema> {
        let descriptor: SchemaDescriptor = serde_json::from_value(self.clone())?;
        descriptor.resolve(json_supported)
    }
}

/// A bare `{column: type}` mapping paired with a table name.
impl SchemaSource for (&str, &Map<String, Value>) {
    fn resolve(&self, json_supported: bool) -> Result<TableSchema> {
        SchemaDescriptor {
            name: self.0.to_string(),
            attributes: self.1.clone(),
            primary_key: None,
        }
        .resolve(json_supported)
    }
}

/// Static table metadata attached to a Rust type.
///
/// ```rust
/// use uop_sql_core::{AbstractType, Model, ModelSource, SchemaSource};
///
/// struct User;
///
/// impl Model for User {
///     const NAME: &'static str = "users";
///     const COLUMNS: &'static [(&'static str, AbstractType)] =
///         &[("id", AbstractType::Uuid), ("name", AbstractType::String)];
/// }
///
/// let schema = ModelSource::<User>::new().resolve(false).unwrap();
/// assert_eq!(schema.name(), "users");
/// ```
pub trait Model {
    /// The SQL table name.
    const NAME: &'static str;

    /// Columns in declaration order.
    const COLUMNS: &'static [(&'static str, AbstractType)];

    /// The primary key column, if not `id`.
    const PRIMARY_KEY: Option<&'static str> = None;
}

/// Adapts a [`Model`] type into a [`SchemaSource`].
#[derive(Debug)]
pub struct ModelSource<M>(PhantomData<M>);

impl<M: Model> ModelSource<M> {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<M: Model> Default for ModelSource<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> SchemaSource for ModelSource<M> {
    fn resolve(&self, json_supported: bool) -> Result<TableSchema> {
        let mut builder = TableSchema::builder(M::NAME)
            .columns(M::COLUMNS.iter().map(|(name, ty)| ColumnSpec::new(*name, *ty)))
            .json_supported(json_supported);
        if let Some(pk) = M::PRIMARY_KEY {
            builder = builder.primary_key(pk);
        }
        builder.build()
    }
}
