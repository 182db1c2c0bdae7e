//! JSON column shim for backends without native JSON storage.
//!
//! Under native support both directions are the identity. Otherwise JSON
//! columns are written as JSON text and parsed back when rows are read.
//! SQL NULL is never encoded.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::schema::TableSchema;

/// A row or value map keyed by column name.
pub type Row = Map<String, Value>;

/// Encodes and decodes JSON-typed columns of one table.
#[derive(Debug, Clone, Copy)]
pub struct JsonCodec<'a> {
    schema: &'a TableSchema,
}

impl<'a> JsonCodec<'a> {
    /// Creates a codec for `schema`.
    #[must_use]
    pub const fn new(schema: &'a TableSchema) -> Self {
        Self { schema }
    }

    const fn active(self) -> bool {
        !self.schema.json_supported()
    }

    /// Replaces every JSON column value with its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SqlError::Json`] if a value cannot be serialized.
    pub fn encode(&self, values: Row) -> Result<Row> {
        if !self.active() {
            return Ok(values);
        }
        values
            .into_iter()
            .map(|(column, value)| {
                if self.schema.is_json(&column) && !value.is_null() {
                    let text = serde_json::to_string(&value)?;
                    Ok((column, Value::String(text)))
                } else {
                    Ok((column, value))
                }
            })
            .collect()
    }

    /// Parses JSON column text back into structured values.
    ///
    /// `None` (no row found) stays `None`. Missing JSON columns are left
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SqlError::Json`] if stored text is not valid JSON.
    pub fn decode(&self, row: Option<Row>) -> Result<Option<Row>> {
        let Some(mut row) = row else {
            return Ok(None);
        };
        if !self.active() {
            return Ok(Some(row));
        }
        for (column, value) in &mut row {
            if !self.schema.is_json(column) {
                continue;
            }
            match value {
                Value::String(text) => {
                    let parsed: Value = serde_json::from_str(text)?;
                    *value = parsed;
                }
                Value::Null => {}
                other => {
                    warn!(
                        table = %self.schema.name(),
                        column = %column,
                        value = %other,
                        "JSON column holds a non-text value, leaving as is"
                    );
                }
            }
        }
        Ok(Some(row))
    }
}
