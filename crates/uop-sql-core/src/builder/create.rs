//! CREATE TABLE generation.

use tracing::debug;

use super::StatementBuilder;

impl StatementBuilder<'_> {
    /// Generates `CREATE TABLE <name> (<col> <type>[ PRIMARY KEY], ...)`.
    ///
    /// Columns appear in schema order. JSON columns use the native JSON
    /// type only when the schema declares support.
    #[must_use]
    pub fn create_table(&self) -> String {
        let json_supported = self.schema.json_supported();
        let primary_key = self.schema.primary_key();

        let columns: Vec<String> = self
            .schema
            .columns()
            .iter()
            .map(|column| {
                let column_type = self.type_map.column_type(column.ty, json_supported);
                if primary_key == Some(column.name.as_str()) {
                    format!("{} {column_type} PRIMARY KEY", column.name)
                } else {
                    format!("{} {column_type}", column.name)
                }
            })
            .collect();

        let sql = format!("CREATE TABLE {} ({})", self.schema.name(), columns.join(", "));
        debug!(table = %self.schema.name(), sql = %sql, "Built CREATE TABLE");
        sql
    }
}
