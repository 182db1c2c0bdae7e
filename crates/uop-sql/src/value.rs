//! Conversion between JSON binding values and SQLite values.

use serde_json::{Number, Value};
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::query::Query;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use uop_sql_core::Row;

use crate::error::{Error, Result};

/// A scalar value as SQLite stores it.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Converts a bound JSON value.
    ///
    /// Objects and arrays are bound as their JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for numbers that fit neither
    /// `i64` nor `f64`.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .ok_or_else(|| Error::UnsupportedValue(n.to_string())),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Ok(Self::Text(value.to_string())),
        }
    }

    /// Converts back to JSON. Blobs become byte arrays; NaN becomes null.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(b),
            Self::Int(n) => Value::Number(n.into()),
            Self::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s),
            Self::Blob(bytes) => Value::Array(bytes.into_iter().map(Value::from).collect()),
        }
    }

    /// Binds this value as the next positional parameter.
    pub(crate) fn bind_to<'q>(
        self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            Self::Null => query.bind(None::<String>),
            Self::Bool(b) => query.bind(b),
            Self::Int(n) => query.bind(n),
            Self::Float(f) => query.bind(f),
            Self::Text(s) => query.bind(s),
            Self::Blob(bytes) => query.bind(bytes),
        }
    }
}

/// Reads a SQLite row into a column-keyed map.
///
/// Values are decoded by their storage class, so booleans come back as
/// integers.
pub(crate) fn decode_row(row: &SqliteRow) -> Result<Row> {
    let mut out = Row::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;
        let value = if raw.is_null() {
            SqlValue::Null
        } else {
            let storage = raw.type_info().name().to_string();
            match storage.as_str() {
                "INTEGER" => SqlValue::Int(row.try_get_unchecked(idx)?),
                "REAL" => SqlValue::Float(row.try_get_unchecked(idx)?),
                "BOOLEAN" => SqlValue::Bool(row.try_get_unchecked(idx)?),
                "BLOB" => SqlValue::Blob(row.try_get_unchecked(idx)?),
                _ => SqlValue::Text(row.try_get_unchecked(idx)?),
            }
        };
        out.insert(column.name().to_string(), value.into_json());
    }
    Ok(out)
}
