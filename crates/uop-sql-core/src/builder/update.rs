//! UPDATE generation.

use serde_json::Value;
use tracing::debug;

use super::{push_where, StatementBuilder};
use crate::codec::Row;
use crate::error::{Result, SqlError};
use crate::params::{parameter_stem, Bindings};

/// Prefix of the parameter names bound for SET values.
///
/// Keeps `SET` parameters apart from the `<property>_<n>` names the
/// criteria compiler generates.
pub const MOD_PREFIX: &str = "mod__";

impl StatementBuilder<'_> {
    /// Generates `UPDATE <name> SET <col> = <placeholder>, ... [WHERE ...]`.
    ///
    /// SET values are bound under `mod__<col>`, with characters outside
    /// `[A-Za-z0-9_]` replaced by `_`. The returned bindings hold
    /// both the criteria bindings and the SET values. `mods` values are
    /// bound as given; JSON encoding is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::EmptyUpdate`] when `mods` is empty,
    /// [`SqlError::InvalidCriteria`] for malformed criteria and
    /// [`SqlError::ParameterCollision`] when a SET parameter clashes with a
    /// criteria parameter bound to a different value.
    pub fn update(&self, criteria: Option<&Value>, mods: &Row) -> Result<(String, Bindings)> {
        if mods.is_empty() {
            return Err(SqlError::EmptyUpdate);
        }

        let (clause, mut bindings) = self.compiler.compile(criteria)?;

        let mut assignments = Vec::with_capacity(mods.len());
        for (column, value) in mods {
            let name = format!("{MOD_PREFIX}{}", parameter_stem(column));
            assignments.push(format!("{column} = {}", self.style().placeholder(&name)));
            bindings.bind(name, value.clone())?;
        }

        let mut sql = format!(
            "UPDATE {} SET {}",
            self.schema.name(),
            assignments.join(", ")
        );
        push_where(&mut sql, &clause);
        debug!(table = %self.schema.name(), sql = %sql, "Built UPDATE");
        Ok((sql, bindings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::fixtures::people;
    use crate::schema::TableSchema;
    use crate::types::AbstractType;
    use serde_json::json;

    fn mods(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_update_without_criteria() {
        let schema = people();
        let (sql, bindings) = StatementBuilder::new(&schema)
            .update(None, &mods(json!({"age": 40})))
            .unwrap();
        assert_eq!(sql, "UPDATE people SET age = %(mod__age)s");
        assert_eq!(bindings.get("mod__age"), Some(&json!(40)));
    }

    #[test]
    fn test_update_same_column_in_criteria_and_set() {
        let schema = people();
        let (sql, bindings) = StatementBuilder::new(&schema)
            .update(
                Some(&json!({"$lt": {"age": 18}})),
                &mods(json!({"age": 18, "name": "minor"})),
            )
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE people SET age = %(mod__age)s, name = %(mod__name)s WHERE age < %(age_1)s"
        );
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings.get("age_1"), Some(&json!(18)));
        assert_eq!(bindings.get("mod__age"), Some(&json!(18)));
    }

    #[test]
    fn test_update_requires_mods() {
        let schema = people();
        let err = StatementBuilder::new(&schema)
            .update(None, &Row::new())
            .unwrap_err();
        assert!(matches!(err, SqlError::EmptyUpdate));
    }

    #[test]
    fn test_update_parameter_collision() {
        let schema = TableSchema::builder("odd")
            .column("mod__x", AbstractType::Int)
            .column("x", AbstractType::Int)
            .build()
            .unwrap();
        let err = StatementBuilder::new(&schema)
            .update(
                Some(&json!({"$eq": {"mod__x": 1}})),
                &mods(json!({"x_1": 2})),
            )
            .unwrap_err();
        assert!(matches!(err, SqlError::ParameterCollision(ref n) if n == "mod__x_1"));
    }

    #[test]
    fn test_update_qualified_column() {
        let schema = people();
        let (sql, bindings) = StatementBuilder::new(&schema)
            .update(None, &mods(json!({"people.age": 41})))
            .unwrap();
        assert_eq!(sql, "UPDATE people SET people.age = %(mod__people_age)s");
        assert_eq!(bindings.get("mod__people_age"), Some(&json!(41)));
    }
}
