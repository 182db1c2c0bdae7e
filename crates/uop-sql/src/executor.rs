//! Statement executors.
//!
//! The core hands over `(sql, bindings)` pairs; an [`Executor`] runs them
//! and returns rows as column-keyed maps. [`SqliteExecutor`] is the
//! bundled implementation on top of `sqlx`.

use std::future::Future;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;
use uop_sql_core::{Bindings, ParamStyle, Row, SchemaSource};

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::value::{decode_row, SqlValue};

/// Runs generated statements against a backend.
pub trait Executor: Send + Sync {
    /// Placeholder style the executor understands.
    fn param_style(&self) -> ParamStyle;

    /// Whether the backend stores JSON natively.
    fn json_supported(&self) -> bool;

    /// Runs a statement and returns the number of affected rows.
    fn execute(&self, sql: &str, bindings: &Bindings) -> impl Future<Output = Result<u64>> + Send;

    /// Runs a query and returns every row.
    fn fetch_all(
        &self,
        sql: &str,
        bindings: &Bindings,
    ) -> impl Future<Output = Result<Vec<Row>>> + Send;
}

// Matches any `%(...)s` so malformed names surface as missing parameters.
static PYFORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%\((?P<name>[^()\s]*)\)s").expect("valid placeholder pattern")
});

static NAMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":(?P<name>[A-Za-z_][A-Za-z0-9_]*)").expect("valid placeholder pattern")
});

fn placeholder_pattern(style: ParamStyle) -> &'static Regex {
    match style {
        ParamStyle::Pyformat => &PYFORMAT,
        ParamStyle::Named => &NAMED,
    }
}

/// Rewrites named placeholders into positional `?` markers.
///
/// Returns the rewritten SQL and the values in marker order. A sequence
/// bound right after `IN`/`NOT IN` expands into `(?, ?, ...)`.
///
/// # Errors
///
/// Returns [`Error::MissingParameter`] when a placeholder has no binding,
/// including placeholders whose name is not a plain identifier.
pub fn to_positional(
    sql: &str,
    style: ParamStyle,
    bindings: &Bindings,
) -> Result<(String, Vec<SqlValue>)> {
    let mut out = String::with_capacity(sql.len());
    let mut params = Vec::with_capacity(bindings.len());
    let mut last = 0;

    for caps in placeholder_pattern(style).captures_iter(sql) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
            continue;
        };
        out.push_str(&sql[last..whole.start()]);
        last = whole.end();

        let value = bindings
            .get(name.as_str())
            .ok_or_else(|| Error::MissingParameter(name.as_str().to_string()))?;

        match value {
            Value::Array(items) if out.trim_end().ends_with("IN") => {
                let markers = vec!["?"; items.len()].join(", ");
                out.push('(');
                out.push_str(&markers);
                out.push(')');
                for item in items {
                    params.push(SqlValue::from_json(item)?);
                }
            }
            other => {
                out.push('?');
                params.push(SqlValue::from_json(other)?);
            }
        }
    }
    out.push_str(&sql[last..]);

    Ok((out, params))
}

/// Executor backed by a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
    style: ParamStyle,
}

impl SqliteExecutor {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            style: ParamStyle::default(),
        }
    }

    /// Connects to `url` with up to `max_connections` connections.
    ///
    /// In-memory databases are per connection, so use one connection for
    /// `sqlite::memory:`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] when the connection fails.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Sets the placeholder style of incoming statements.
    #[must_use]
    pub const fn with_param_style(mut self, style: ParamStyle) -> Self {
        self.style = style;
        self
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Resolves `source` and opens a collection over it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sql`] when the schema cannot be resolved.
    pub fn collection<S: SchemaSource>(&self, source: &S) -> Result<Collection<Self>> {
        let schema = source.resolve(self.json_supported())?;
        Ok(Collection::new(self.clone(), schema))
    }
}

impl Executor for SqliteExecutor {
    fn param_style(&self) -> ParamStyle {
        self.style
    }

    fn json_supported(&self) -> bool {
        false
    }

    async fn execute(&self, sql: &str, bindings: &Bindings) -> Result<u64> {
        let (sql, params) = to_positional(sql, self.style, bindings)?;
        debug!(sql = %sql, params = params.len(), "Executing SQL");

        let query = params
            .into_iter()
            .fold(sqlx::query(&sql), |query, value| value.bind_to(query));
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn fetch_all(&self, sql: &str, bindings: &Bindings) -> Result<Vec<Row>> {
        let (sql, params) = to_positional(sql, self.style, bindings)?;
        debug!(sql = %sql, params = params.len(), "Fetching rows");

        let query = params
            .into_iter()
            .fold(sqlx::query(&sql), |query, value| value.bind_to(query));
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }
}
