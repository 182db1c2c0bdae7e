//! Abstract column types and their backend column types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlError};

/// A domain-level column type, independent of any backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbstractType {
    /// Bounded character data.
    #[serde(alias = "str")]
    String,
    /// Integer.
    Int,
    /// Floating point.
    Float,
    /// Boolean.
    Bool,
    /// Structured JSON data.
    Json,
    /// UUID stored as text.
    Uuid,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Unbounded text.
    Text,
    /// Seconds since the epoch.
    Epoch,
    /// Date stored as an epoch number.
    Date,
    /// Datetime stored as an epoch number.
    Datetime,
    /// Wide numeric.
    Long,
}

impl AbstractType {
    /// All abstract types, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::String,
        Self::Int,
        Self::Float,
        Self::Bool,
        Self::Json,
        Self::Uuid,
        Self::Email,
        Self::Phone,
        Self::Text,
        Self::Epoch,
        Self::Date,
        Self::Datetime,
        Self::Long,
    ];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Json => "json",
            Self::Uuid => "uuid",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Text => "text",
            Self::Epoch => "epoch",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for AbstractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbstractType {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "str" {
            return Ok(Self::String);
        }
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| SqlError::UnknownType(s.to_string()))
    }
}

/// Maps abstract types to backend column types.
///
/// JSON columns map to `native_json` when the table declares native JSON
/// support and to `json_fallback` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    native_json: &'static str,
    json_fallback: &'static str,
}

impl Default for TypeMap {
    fn default() -> Self {
        Self {
            native_json: "JSONB",
            json_fallback: "TEXT",
        }
    }
}

impl TypeMap {
    /// Creates the default type map (`JSONB`, falling back to `TEXT`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the native JSON column type.
    #[must_use]
    pub const fn native_json(mut self, column_type: &'static str) -> Self {
        self.native_json = column_type;
        self
    }

    /// Overrides the column type used for JSON without native support.
    #[must_use]
    pub const fn json_fallback(mut self, column_type: &'static str) -> Self {
        self.json_fallback = column_type;
        self
    }

    /// Returns the backend column type for `ty`.
    #[must_use]
    pub const fn column_type(&self, ty: AbstractType, json_supported: bool) -> &'static str {
        match ty {
            AbstractType::Json if json_supported => self.native_json,
            AbstractType::Json => self.json_fallback,
            AbstractType::String | AbstractType::Email => "VARCHAR(255)",
            AbstractType::Phone => "VARCHAR(50)",
            AbstractType::Uuid => "VARCHAR(36)",
            AbstractType::Text => "TEXT",
            AbstractType::Int => "INTEGER",
            AbstractType::Float | AbstractType::Epoch | AbstractType::Date | AbstractType::Datetime => {
                "FLOAT"
            }
            AbstractType::Long => "DOUBLE",
            AbstractType::Bool => "BOOLEAN",
        }
    }

    /// Resolves a type name straight to a backend column type.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::UnknownType`] for names outside the mapping.
    pub fn resolve(&self, type_name: &str, json_supported: bool) -> Result<&'static str> {
        let ty: AbstractType = type_name.parse()?;
        Ok(self.column_type(ty, json_supported))
    }
}
