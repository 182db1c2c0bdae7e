//! Criteria to WHERE-clause compilation.

use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use super::CriteriaNode;
use crate::error::Result;
use crate::params::{parameter_stem, Bindings, ParamStyle};

/// Compiles criteria mappings into a boolean SQL expression and bindings.
///
/// Each compilation numbers parameters per property (`age_1`, `age_2`, ...)
/// with its own counter, so compiling is deterministic and needs no locking.
/// Characters that cannot appear in a placeholder are replaced by `_`
/// (`users.age` binds as `users_age_1`).
#[derive(Debug, Clone, Copy, Default)]
pub struct CriteriaCompiler {
    style: ParamStyle,
}

impl CriteriaCompiler {
    /// Creates a compiler emitting `style` placeholders.
    #[must_use]
    pub const fn new(style: ParamStyle) -> Self {
        Self { style }
    }

    /// The placeholder style in use.
    #[must_use]
    pub const fn style(&self) -> ParamStyle {
        self.style
    }

    /// Compiles a criteria mapping.
    ///
    /// `None`, `null` and `{}` compile to an empty clause with no bindings;
    /// callers then omit `WHERE` entirely.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SqlError::InvalidCriteria`] for malformed criteria.
    pub fn compile(&self, criteria: Option<&Value>) -> Result<(String, Bindings)> {
        let Some(criteria) = criteria else {
            return Ok((String::new(), Bindings::new()));
        };
        CriteriaNode::parse(criteria)?.map_or_else(
            || Ok((String::new(), Bindings::new())),
            |node| self.compile_node(&node),
        )
    }

    /// Compiles an already parsed criteria tree.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SqlError::InvalidCriteria`] when an operand has the
    /// wrong shape for its operator.
    pub fn compile_node(&self, node: &CriteriaNode) -> Result<(String, Bindings)> {
        let mut compilation = Compilation {
            style: self.style,
            counts: HashMap::new(),
            bindings: Bindings::new(),
        };
        let clause = compilation.emit(node)?;
        trace!(clause = %clause, params = compilation.bindings.len(), "Compiled criteria");
        Ok((clause, compilation.bindings))
    }
}

/// State scoped to one compilation.
struct Compilation {
    style: ParamStyle,
    counts: HashMap<String, usize>,
    bindings: Bindings,
}

impl Compilation {
    fn param_name(&mut self, property: &str) -> String {
        let stem = parameter_stem(property);
        let count = self.counts.entry(stem.clone()).or_insert(0);
        *count += 1;
        format!("{stem}_{count}")
    }

    fn emit(&mut self, node: &CriteriaNode) -> Result<String> {
        match node {
            CriteriaNode::Leaf {
                op,
                property,
                value,
            } => {
                let bound = op.bind_value(property, value)?;
                let name = self.param_name(property);
                let placeholder = self.style.placeholder(&name);
                self.bindings.bind(name, bound)?;
                Ok(format!("{property} {} {placeholder}", op.sql()))
            }
            CriteriaNode::Compound {
                combinator,
                children,
            } => {
                let parts = children
                    .iter()
                    .map(|child| self.emit(child))
                    .collect::<Result<Vec<_>>>()?;
                let joiner = format!(" {} ", combinator.sql());
                Ok(format!("({})", parts.join(&joiner)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::OperatorKind;
    use crate::SqlError;
    use serde_json::json;

    fn compile(criteria: &Value) -> (String, Bindings) {
        CriteriaCompiler::default().compile(Some(criteria)).unwrap()
    }

    #[test]
    fn test_empty_criteria() {
        let compiler = CriteriaCompiler::default();
        assert_eq!(compiler.compile(None).unwrap(), (String::new(), Bindings::new()));
        assert_eq!(
            compiler.compile(Some(&json!({}))).unwrap(),
            (String::new(), Bindings::new())
        );
        assert_eq!(
            compiler.compile(Some(&Value::Null)).unwrap(),
            (String::new(), Bindings::new())
        );
    }

    #[test]
    fn test_comparison_operators() {
        for (key, sql) in [
            ("$gt", ">"),
            ("$gte", ">="),
            ("$lt", "<"),
            ("$lte", "<="),
            ("$eq", "="),
            ("$ne", "!="),
            ("like", "LIKE"),
            ("not like", "NOT LIKE"),
        ] {
            let (clause, bindings) = compile(&json!({key: {"score": 10}}));
            assert_eq!(clause, format!("score {sql} %(score_1)s"));
            assert_eq!(bindings.get("score_1"), Some(&json!(10)));
        }
    }

    #[test]
    fn test_in_binds_sequence() {
        let (clause, bindings) = compile(&json!({"in": {"status": ["new", "open"]}}));
        assert_eq!(clause, "status IN %(status_1)s");
        assert_eq!(bindings.get("status_1"), Some(&json!(["new", "open"])));

        let (clause, _) = compile(&json!({"not in": {"status": ["closed"]}}));
        assert_eq!(clause, "status NOT IN %(status_1)s");
    }

    #[test]
    fn test_in_requires_sequence() {
        let err = CriteriaCompiler::default()
            .compile(Some(&json!({"in": {"status": "new"}})))
            .unwrap_err();
        assert!(matches!(err, SqlError::InvalidCriteria(_)));
    }

    #[test]
    fn test_endswith() {
        let (clause, bindings) = compile(&json!({"endswith": {"name": "son"}}));
        assert_eq!(clause, "name LIKE %(name_1)s");
        assert_eq!(bindings.get("name_1"), Some(&json!("%son")));
    }

    #[test]
    fn test_endswith_rejects_structured_suffix() {
        assert!(CriteriaCompiler::default()
            .compile(Some(&json!({"endswith": {"name": ["son"]}})))
            .is_err());
    }

    #[test]
    fn test_and_range() {
        let (clause, bindings) =
            compile(&json!({"$and": [{"$gt": {"age": 18}}, {"$lt": {"age": 65}}]}));
        assert_eq!(clause, "(age > %(age_1)s AND age < %(age_2)s)");
        assert_eq!(bindings.get("age_1"), Some(&json!(18)));
        assert_eq!(bindings.get("age_2"), Some(&json!(65)));
    }

    #[test]
    fn test_nested_or_inside_and() {
        let (clause, bindings) = compile(&json!({
            "$and": [
                {"$or": [{"$eq": {"kind": "a"}}, {"$eq": {"kind": "b"}}]},
                {"$gte": {"age": 21}}
            ]
        }));
        assert_eq!(
            clause,
            "((kind = %(kind_1)s OR kind = %(kind_2)s) AND age >= %(age_1)s)"
        );
        assert_eq!(bindings.len(), 3);
    }

    #[test]
    fn test_implicit_and_keeps_key_order() {
        let (clause, _) = compile(&json!({"$lt": {"b": 1}, "$gt": {"a": 2}}));
        assert_eq!(clause, "(b < %(b_1)s AND a > %(a_1)s)");
    }

    #[test]
    fn test_single_child_combinator_parenthesized() {
        let (clause, _) = compile(&json!({"$or": [{"$eq": {"a": 1}}]}));
        assert_eq!(clause, "(a = %(a_1)s)");
    }

    #[test]
    fn test_named_style() {
        let (clause, _) = CriteriaCompiler::new(ParamStyle::Named)
            .compile(Some(&json!({"$eq": {"id": 4}})))
            .unwrap();
        assert_eq!(clause, "id = :id_1");
    }

    #[test]
    fn test_counter_is_per_compilation() {
        let compiler = CriteriaCompiler::default();
        let criteria = json!({"$eq": {"id": 4}});
        let first = compiler.compile(Some(&criteria)).unwrap();
        let second = compiler.compile(Some(&criteria)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.0, "id = %(id_1)s");
    }

    #[test]
    fn test_compile_node_directly() {
        let node = CriteriaNode::leaf(OperatorKind::Ne, "state", json!("gone"));
        let (clause, bindings) = CriteriaCompiler::default().compile_node(&node).unwrap();
        assert_eq!(clause, "state != %(state_1)s");
        assert_eq!(bindings.get("state_1"), Some(&json!("gone")));
    }

    #[test]
    fn test_qualified_property_gets_safe_parameter() {
        let (clause, bindings) = compile(&json!({"$eq": {"users.age": 3}}));
        assert_eq!(clause, "users.age = %(users_age_1)s");
        assert_eq!(bindings.get("users_age_1"), Some(&json!(3)));
    }

    #[test]
    fn test_sanitized_stems_share_counter() {
        let (clause, bindings) =
            compile(&json!({"$eq": {"users.age": 3}, "$gt": {"users_age": 1}}));
        assert_eq!(
            clause,
            "(users.age = %(users_age_1)s AND users_age > %(users_age_2)s)"
        );
        assert_eq!(bindings.len(), 2);
    }
}
