//! Criteria mappings and their parsed form.
//!
//! Callers filter with a nested, operator-keyed mapping:
//!
//! | Key | Meaning |
//! |---|---|
//! | `$and`, `$or` | combinator over a sequence of sub-criteria |
//! | `$gt`, `$gte`, `$lt`, `$lte`, `$eq`, `$ne` | comparison against `{property: value}` |
//! | `like`, `not like` | pattern match, value used verbatim |
//! | `in`, `not in` | membership, value is a sequence |
//! | `endswith` | suffix match, value bound as `%value` |
//!
//! A mapping with several keys is an implicit AND of its entries.

mod compiler;

pub use compiler::CriteriaCompiler;

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{Result, SqlError};

/// Leaf operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// `$gt`
    Gt,
    /// `$gte`
    Gte,
    /// `$lt`
    Lt,
    /// `$lte`
    Lte,
    /// `$eq`
    Eq,
    /// `$ne`
    Ne,
    /// `like`
    Like,
    /// `not like`
    NotLike,
    /// `in`
    In,
    /// `not in`
    NotIn,
    /// `endswith`
    EndsWith,
}

impl OperatorKind {
    const ALL: [Self; 11] = [
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Eq,
        Self::Ne,
        Self::Like,
        Self::NotLike,
        Self::In,
        Self::NotIn,
        Self::EndsWith,
    ];

    /// The key used in criteria mappings.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
            Self::Eq => "$eq",
            Self::Ne => "$ne",
            Self::Like => "like",
            Self::NotLike => "not like",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::EndsWith => "endswith",
        }
    }

    /// The SQL operator emitted for this kind.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Like | Self::EndsWith => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
        }
    }

    /// Checks the operand shape and returns the value to bind.
    fn bind_value(self, property: &str, value: &Value) -> Result<Value> {
        match self {
            Self::In | Self::NotIn if !value.is_array() => Err(SqlError::InvalidCriteria(format!(
                "'{}' on '{property}' expects a sequence, found {value}",
                self.key()
            ))),
            Self::EndsWith => {
                let suffix = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    other => {
                        return Err(SqlError::InvalidCriteria(format!(
                            "'endswith' on '{property}' expects a string suffix, found {other}"
                        )))
                    }
                };
                Ok(Value::String(format!("%{suffix}")))
            }
            _ => Ok(value.clone()),
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for OperatorKind {
    type Err = SqlError;

    fn from_str(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.key() == key)
            .ok_or_else(|| SqlError::InvalidCriteria(format!("unrecognized operator '{key}'")))
    }
}

/// Boolean join of sub-clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `$and`
    And,
    /// `$or`
    Or,
}

impl Combinator {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "$and" => Some(Self::And),
            "$or" => Some(Self::Or),
            _ => None,
        }
    }

    /// The SQL keyword.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// A parsed criteria tree.
///
/// A `Leaf` always names exactly one property and one value. A `Compound`
/// always has at least one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaNode {
    /// Single property comparison.
    Leaf {
        /// Operator.
        op: OperatorKind,
        /// Column the operator applies to.
        property: String,
        /// Operand, as supplied by the caller.
        value: Value,
    },
    /// AND/OR over sub-criteria.
    Compound {
        /// Join keyword.
        combinator: Combinator,
        /// Sub-criteria, in order.
        children: Vec<CriteriaNode>,
    },
}

impl CriteriaNode {
    /// Creates a leaf.
    #[must_use]
    pub fn leaf(op: OperatorKind, property: impl Into<String>, value: Value) -> Self {
        Self::Leaf {
            op,
            property: property.into(),
            value,
        }
    }

    /// Parses a criteria mapping.
    ///
    /// `null` and `{}` parse to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidCriteria`] for non-mapping input,
    /// unrecognized keys, malformed leaves and malformed combinators.
    pub fn parse(criteria: &Value) -> Result<Option<Self>> {
        match criteria {
            Value::Null => Ok(None),
            Value::Object(map) => Self::parse_map(map),
            other => Err(SqlError::InvalidCriteria(format!(
                "criteria must be a mapping, found {other}"
            ))),
        }
    }

    fn parse_map(map: &Map<String, Value>) -> Result<Option<Self>> {
        let mut entries = map.iter();
        match (entries.next(), entries.next()) {
            (None, _) => Ok(None),
            (Some((key, value)), None) => Self::parse_entry(key, value).map(Some),
            _ => {
                let children = map
                    .iter()
                    .map(|(key, value)| Self::parse_entry(key, value))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(Self::Compound {
                    combinator: Combinator::And,
                    children,
                }))
            }
        }
    }

    fn parse_entry(key: &str, value: &Value) -> Result<Self> {
        if let Some(combinator) = Combinator::from_key(key) {
            let Value::Array(items) = value else {
                return Err(SqlError::InvalidCriteria(format!(
                    "'{key}' expects a sequence of criteria, found {value}"
                )));
            };
            let mut children = Vec::with_capacity(items.len());
            for item in items {
                if let Some(child) = Self::parse(item)? {
                    children.push(child);
                }
            }
            if children.is_empty() {
                return Err(SqlError::InvalidCriteria(format!(
                    "'{key}' needs at least one non-empty criteria"
                )));
            }
            return Ok(Self::Compound {
                combinator,
                children,
            });
        }

        let op: OperatorKind = key.parse()?;
        let operand = value.as_object().and_then(|map| {
            let mut entries = map.iter();
            match (entries.next(), entries.next()) {
                (Some(entry), None) => Some(entry),
                _ => None,
            }
        });
        let Some((property, operand)) = operand else {
            return Err(SqlError::InvalidCriteria(format!(
                "'{key}' expects exactly one {{property: value}} pair, found {value}"
            )));
        };
        Ok(Self::leaf(op, property.clone(), operand.clone()))
    }
}
