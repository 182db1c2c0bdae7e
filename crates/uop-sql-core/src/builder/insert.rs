//! INSERT generation.

use tracing::debug;

use super::StatementBuilder;

impl StatementBuilder<'_> {
    /// Generates `INSERT INTO <name> (<cols>) VALUES (<placeholders>)`.
    ///
    /// Every schema column is listed in declaration order. Each placeholder
    /// is named after its column, so the values are bound as a row keyed by
    /// column name.
    #[must_use]
    pub fn insert(&self) -> String {
        let columns = self.schema.columns();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        let placeholders: Vec<String> = names.iter().map(|n| self.style().placeholder(n)).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.schema.name(),
            names.join(", "),
            placeholders.join(", ")
        );
        debug!(table = %self.schema.name(), sql = %sql, "Built INSERT");
        sql
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::fixtures::people;
    use crate::params::ParamStyle;
    use crate::StatementBuilder;

    #[test]
    fn test_insert() {
        let schema = people();
        assert_eq!(
            StatementBuilder::new(&schema).insert(),
            "INSERT INTO people (id, name, age, profile) \
             VALUES (%(id)s, %(name)s, %(age)s, %(profile)s)"
        );
    }

    #[test]
    fn test_insert_named_style() {
        let schema = people();
        assert_eq!(
            StatementBuilder::new(&schema)
                .param_style(ParamStyle::Named)
                .insert(),
            "INSERT INTO people (id, name, age, profile) VALUES (:id, :name, :age, :profile)"
        );
    }
}
