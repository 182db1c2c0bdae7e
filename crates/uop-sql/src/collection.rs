//! Document-style collections over one table.
//!
//! A [`Collection`] pairs a resolved [`TableSchema`] with an [`Executor`].
//! Values going in pass through the JSON codec. Rows coming out are decoded,
//! boolean columns are restored, and whole numbers stored in REAL columns
//! (`float`, `epoch`, `date`, `datetime`, `long`) come back as integers.

use serde_json::Value;
use tracing::debug;
use uop_sql_core::{
    AbstractType, Bindings, JsonCodec, Row, Select, StatementBuilder, TableSchema,
};

use crate::error::Result;
use crate::executor::Executor;

/// Largest float magnitude that still converts to an integer exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// CRUD access to one table.
#[derive(Debug, Clone)]
pub struct Collection<E> {
    executor: E,
    schema: TableSchema,
}

impl<E: Executor> Collection<E> {
    /// Creates a collection.
    ///
    /// The schema's native JSON flag is replaced by the executor's, so the
    /// codec always matches what the backend stores.
    #[must_use]
    pub fn new(executor: E, schema: TableSchema) -> Self {
        let schema = schema.with_json_supported(executor.json_supported());
        Self { executor, schema }
    }

    /// The table schema.
    #[must_use]
    pub const fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// The executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    fn builder(&self) -> StatementBuilder<'_> {
        StatementBuilder::new(&self.schema).param_style(self.executor.param_style())
    }

    fn codec(&self) -> JsonCodec<'_> {
        JsonCodec::new(&self.schema)
    }

    fn process_row(&self, row: Row) -> Result<Row> {
        let mut row = self.codec().decode(Some(row))?.unwrap_or_default();
        for column in self.schema.columns() {
            let Some(value) = row.get_mut(&column.name) else {
                continue;
            };
            match column.ty {
                AbstractType::Bool => {
                    if let Some(n) = value.as_i64() {
                        *value = Value::Bool(n != 0);
                    }
                }
                AbstractType::Float
                | AbstractType::Epoch
                | AbstractType::Date
                | AbstractType::Datetime
                | AbstractType::Long => {
                    if let Some(whole) = whole_number(value) {
                        *value = whole;
                    }
                }
                _ => {}
            }
        }
        Ok(row)
    }

    async fn fetch(&self, sql: &str, bindings: &Bindings) -> Result<Vec<Row>> {
        let rows = self.executor.fetch_all(sql, bindings).await?;
        rows.into_iter().map(|row| self.process_row(row)).collect()
    }

    /// Creates the table.
    ///
    /// # Errors
    ///
    /// Returns the executor's error when the DDL fails.
    pub async fn create_table(&self) -> Result<()> {
        let sql = self.builder().create_table();
        self.executor.execute(&sql, &Bindings::new()).await?;
        debug!(table = %self.schema.name(), "Created table");
        Ok(())
    }

    /// Counts rows matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid criteria or a failed query.
    pub async fn count(&self, criteria: Option<&Value>) -> Result<u64> {
        let (sql, bindings) = self.builder().count(criteria)?;
        let rows = self.executor.fetch_all(&sql, &bindings).await?;
        let count = rows
            .first()
            .and_then(|row| row.values().next())
            .and_then(Value::as_u64)
            .unwrap_or(0);
        Ok(count)
    }

    /// Inserts one row. Columns absent from `data` are inserted as NULL.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding or the insert fails.
    pub async fn insert(&self, data: Row) -> Result<u64> {
        let mut data = self.codec().encode(data)?;
        for column in self.schema.columns() {
            data.entry(column.name.clone()).or_insert(Value::Null);
        }
        let sql = self.builder().insert();
        self.executor.execute(&sql, &Bindings::from(data)).await
    }

    /// Applies `mods` to rows matching `criteria` and returns the affected count.
    ///
    /// # Errors
    ///
    /// Returns an error for empty `mods`, invalid criteria, parameter
    /// collisions or a failed update.
    pub async fn update(&self, criteria: Option<&Value>, mods: Row) -> Result<u64> {
        let mods = self.codec().encode(mods)?;
        let (sql, bindings) = self.builder().update(criteria, &mods)?;
        self.executor.execute(&sql, &bindings).await
    }

    /// Deletes rows matching `criteria` and returns the affected count.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid criteria or a failed delete.
    pub async fn remove(&self, criteria: Option<&Value>) -> Result<u64> {
        let (sql, bindings) = self.builder().delete(criteria)?;
        self.executor.execute(&sql, &bindings).await
    }

    /// Looks a row up by primary key.
    ///
    /// # Errors
    ///
    /// Returns an error when the table has no primary key or the query fails.
    pub async fn get(&self, id: Value) -> Result<Option<Row>> {
        let (sql, bindings) = self.builder().get_by_id(id)?;
        Ok(self.fetch(&sql, &bindings).await?.into_iter().next())
    }

    /// Returns rows matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid criteria or a failed query.
    pub async fn find(&self, criteria: Option<&Value>, select: &Select) -> Result<Vec<Row>> {
        let (sql, bindings) = self.builder().select(criteria, select)?;
        self.fetch(&sql, &bindings).await
    }

    /// Returns the first row matching `criteria`, projected to `columns`
    /// (all columns when empty).
    ///
    /// # Errors
    ///
    /// Returns an error for invalid criteria or a failed query.
    pub async fn find_one(
        &self,
        criteria: Option<&Value>,
        columns: &[&str],
    ) -> Result<Option<Row>> {
        let select = Select::new().columns(columns).limit(1);
        Ok(self.find(criteria, &select).await?.into_iter().next())
    }

    /// Returns the bare values of `column` for rows matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid criteria or a failed query.
    pub async fn find_scalars(
        &self,
        criteria: Option<&Value>,
        column: &str,
        select: Select,
    ) -> Result<Vec<Value>> {
        let select = select.columns(&[column]);
        let rows = self.find(criteria, &select).await?;
        Ok(rows
            .into_iter()
            .map(|mut row| row.remove(column).unwrap_or(Value::Null))
            .collect())
    }

    /// Returns true when at least one row matches `criteria`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid criteria or a failed query.
    pub async fn exists(&self, criteria: Option<&Value>) -> Result<bool> {
        Ok(self.find_one(criteria, &[]).await?.is_some())
    }
}

/// Returns the integer form of a float holding a whole number.
#[allow(clippy::cast_possible_truncation)]
fn whole_number(value: &Value) -> Option<Value> {
    let f = value.as_f64().filter(|_| value.is_f64())?;
    (f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT).then(|| Value::from(f as i64))
}
