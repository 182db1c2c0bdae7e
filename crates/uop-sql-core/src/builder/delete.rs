//! DELETE generation.

use serde_json::Value;
use tracing::debug;

use super::{push_where, StatementBuilder};
use crate::error::Result;
use crate::params::Bindings;

impl StatementBuilder<'_> {
    /// Generates `DELETE FROM <name> [WHERE ...]`.
    ///
    /// **Warning**: empty criteria delete every row.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SqlError::InvalidCriteria`] for malformed criteria.
    pub fn delete(&self, criteria: Option<&Value>) -> Result<(String, Bindings)> {
        let (clause, bindings) = self.compiler.compile(criteria)?;
        let mut sql = format!("DELETE FROM {}", self.schema.name());
        push_where(&mut sql, &clause);
        debug!(table = %self.schema.name(), sql = %sql, "Built DELETE");
        Ok((sql, bindings))
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::fixtures::people;
    use crate::StatementBuilder;
    use serde_json::json;

    #[test]
    fn test_delete_all() {
        let schema = people();
        let (sql, bindings) = StatementBuilder::new(&schema).delete(None).unwrap();
        assert_eq!(sql, "DELETE FROM people");
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_delete_with_or() {
        let schema = people();
        let (sql, bindings) = StatementBuilder::new(&schema)
            .delete(Some(&json!({
                "$or": [{"endswith": {"name": "son"}}, {"in": {"age": [1, 2]}}]
            })))
            .unwrap();
        assert_eq!(
            sql,
            "DELETE FROM people WHERE (name LIKE %(name_1)s OR age IN %(age_1)s)"
        );
        assert_eq!(bindings.get("name_1"), Some(&json!("%son")));
        assert_eq!(bindings.get("age_1"), Some(&json!([1, 2])));
    }
}
