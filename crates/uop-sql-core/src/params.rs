//! Placeholder styles and parameter binding maps.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SqlError};

/// The named-placeholder convention used in generated SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamStyle {
    /// `%(name)s`
    #[default]
    Pyformat,
    /// `:name`
    Named,
}

impl ParamStyle {
    /// Returns the placeholder for `name`.
    #[must_use]
    pub fn placeholder(self, name: &str) -> String {
        match self {
            Self::Pyformat => format!("%({name})s"),
            Self::Named => format!(":{name}"),
        }
    }
}

/// Turns a column reference into a placeholder-safe parameter stem.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`, so `users.age`
/// binds as `users_age`.
pub(crate) fn parameter_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Parameter name to literal value, scoped to one statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, Value>);

impl Bindings {
    /// Creates an empty binding map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` under `name`.
    ///
    /// Rebinding the same value is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::ParameterCollision`] when `name` already holds a
    /// different value.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> Result<()> {
        match self.0.entry(name.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            btree_map::Entry::Occupied(slot) if *slot.get() == value => Ok(()),
            btree_map::Entry::Occupied(slot) => {
                Err(SqlError::ParameterCollision(slot.key().clone()))
            }
        }
    }

    /// Moves every binding of `other` into `self`.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::ParameterCollision`] on the first conflicting name.
    pub fn merge(&mut self, other: Self) -> Result<()> {
        for (name, value) in other.0 {
            self.bind(name, value)?;
        }
        Ok(())
    }

    /// Returns the value bound under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over bindings in name order.
    #[must_use]
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl IntoIterator for Bindings {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Bindings {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<BTreeMap<String, Value>> for Bindings {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl From<serde_json::Map<String, Value>> for Bindings {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_styles() {
        assert_eq!(ParamStyle::Pyformat.placeholder("age_1"), "%(age_1)s");
        assert_eq!(ParamStyle::Named.placeholder("age_1"), ":age_1");
        assert_eq!(ParamStyle::default(), ParamStyle::Pyformat);
    }

    #[test]
    fn test_parameter_stem() {
        assert_eq!(parameter_stem("age"), "age");
        assert_eq!(parameter_stem("users.age"), "users_age");
        assert_eq!(parameter_stem("first name"), "first_name");
    }

    #[test]
    fn test_bind_same_value_twice() {
        let mut bindings = Bindings::new();
        bindings.bind("name_1", json!("ann")).unwrap();
        bindings.bind("name_1", json!("ann")).unwrap();
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_bind_conflicting_value() {
        let mut bindings = Bindings::new();
        bindings.bind("name_1", json!("ann")).unwrap();
        let err = bindings.bind("name_1", json!("bob")).unwrap_err();
        assert!(matches!(err, SqlError::ParameterCollision(ref n) if n == "name_1"));
        assert_eq!(bindings.get("name_1"), Some(&json!("ann")));
    }

    #[test]
    fn test_merge() {
        let mut left = Bindings::new();
        left.bind("a", json!(1)).unwrap();
        let mut right = Bindings::new();
        right.bind("b", json!(2)).unwrap();
        left.merge(right).unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(
            serde_json::to_value(&left).unwrap(),
            json!({"a": 1, "b": 2})
        );
    }
}
