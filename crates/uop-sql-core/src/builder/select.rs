//! SELECT and COUNT generation.

use serde_json::Value;
use tracing::debug;

use super::{push_where, StatementBuilder};
use crate::criteria::{CriteriaNode, OperatorKind};
use crate::error::{Result, SqlError};
use crate::params::Bindings;

/// Projection, ordering and limit for a SELECT.
///
/// An empty projection selects `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    columns: Vec<String>,
    order_by: Vec<String>,
    limit: Option<u64>,
}

impl Select {
    /// Selects every column, unordered and unlimited.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the projection to `cols`.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Adds ascending ORDER BY columns.
    #[must_use]
    pub fn order_by(mut self, cols: &[&str]) -> Self {
        self.order_by.extend(cols.iter().map(|s| String::from(*s)));
        self
    }

    /// Adds descending ORDER BY columns.
    #[must_use]
    pub fn order_by_desc(mut self, cols: &[&str]) -> Self {
        self.order_by.extend(cols.iter().map(|s| format!("{s} DESC")));
        self
    }

    /// Sets the LIMIT.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// The projected columns, empty for `*`.
    #[must_use]
    pub fn projection(&self) -> &[String] {
        &self.columns
    }

    /// The LIMIT, if any.
    #[must_use]
    pub const fn limit_value(&self) -> Option<u64> {
        self.limit
    }
}

impl StatementBuilder<'_> {
    /// Generates `SELECT <cols|*> FROM <name> [WHERE ...] [ORDER BY ...] [LIMIT n]`.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidCriteria`] for malformed criteria.
    pub fn select(&self, criteria: Option<&Value>, select: &Select) -> Result<(String, Bindings)> {
        let (clause, bindings) = self.compiler.compile(criteria)?;

        let mut sql = String::from("SELECT ");
        if select.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&select.columns.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(self.schema.name());
        push_where(&mut sql, &clause);

        if !select.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&select.order_by.join(", "));
        }

        if let Some(n) = select.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        debug!(table = %self.schema.name(), sql = %sql, "Built SELECT");
        Ok((sql, bindings))
    }

    /// Generates `SELECT COUNT(*) FROM <name> [WHERE ...]`.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidCriteria`] for malformed criteria.
    pub fn count(&self, criteria: Option<&Value>) -> Result<(String, Bindings)> {
        let (clause, bindings) = self.compiler.compile(criteria)?;
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.schema.name());
        push_where(&mut sql, &clause);
        debug!(table = %self.schema.name(), sql = %sql, "Built COUNT");
        Ok((sql, bindings))
    }

    /// Generates a primary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::MissingPrimaryKey`] when the table has no primary key.
    pub fn get_by_id(&self, id: Value) -> Result<(String, Bindings)> {
        let primary_key = self
            .schema
            .primary_key()
            .ok_or_else(|| SqlError::MissingPrimaryKey(self.schema.name().to_string()))?;
        let node = CriteriaNode::leaf(OperatorKind::Eq, primary_key, id);
        let (clause, bindings) = self.compiler.compile_node(&node)?;
        let mut sql = format!("SELECT * FROM {}", self.schema.name());
        push_where(&mut sql, &clause);
        debug!(table = %self.schema.name(), sql = %sql, "Built primary key lookup");
        Ok((sql, bindings))
    }
}
