//! uop-sql CLI
//!
//! Prints the SQL and bindings generated for a table schema and criteria,
//! and optionally runs the statement against a SQLite database.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use uop_sql::prelude::*;

/// Generate parameterized SQL from document-style criteria.
#[derive(Parser)]
#[command(name = "uop-sql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Table schema descriptor (JSON file).
    #[arg(short, long, env = "UOP_SQL_SCHEMA")]
    schema: PathBuf,

    /// Placeholder style of the generated SQL.
    #[arg(long, value_enum, default_value_t = Style::Pyformat)]
    style: Style,

    /// Declare native JSON column support.
    #[arg(long)]
    json_native: bool,

    /// Run the statement instead of only printing it.
    #[arg(short = 'x', long)]
    execute: bool,

    /// Database URL used with --execute.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Style {
    /// `%(name)s`
    Pyformat,
    /// `:name`
    Named,
}

impl From<Style> for ParamStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Pyformat => Self::Pyformat,
            Style::Named => Self::Named,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// CREATE TABLE for the schema.
    Create,

    /// SELECT matching rows.
    Select {
        /// Criteria mapping (JSON).
        #[arg(short, long)]
        criteria: Option<String>,

        /// Columns to project (comma separated).
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// ORDER BY columns (comma separated).
        #[arg(long, value_delimiter = ',')]
        order_by: Vec<String>,

        /// LIMIT.
        #[arg(short, long)]
        limit: Option<u64>,
    },

    /// COUNT matching rows.
    Count {
        /// Criteria mapping (JSON).
        #[arg(short, long)]
        criteria: Option<String>,
    },

    /// INSERT one row.
    Insert {
        /// Column values (JSON mapping).
        #[arg(long)]
        values: String,
    },

    /// UPDATE matching rows.
    Update {
        /// Criteria mapping (JSON).
        #[arg(short, long)]
        criteria: Option<String>,

        /// Column modifications (JSON mapping).
        #[arg(short, long)]
        mods: String,
    },

    /// DELETE matching rows.
    Delete {
        /// Criteria mapping (JSON).
        #[arg(short, long)]
        criteria: Option<String>,
    },

    /// SELECT one row by primary key.
    Get {
        /// Primary key value (JSON, or a bare string).
        id: String,
    },
}

fn parse_json(label: &str, text: &str) -> anyhow::Result<Value> {
    serde_json::from_str(text).with_context(|| format!("{label} is not valid JSON"))
}

fn parse_criteria(text: Option<&str>) -> anyhow::Result<Option<Value>> {
    text.map(|t| parse_json("criteria", t)).transpose()
}

fn parse_row(label: &str, text: &str) -> anyhow::Result<Row> {
    match parse_json(label, text)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("{label} must be a JSON mapping, found {other}"),
    }
}

fn print_rows(rows: &[Row]) -> anyhow::Result<()> {
    for row in rows {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}

/// A subcommand with its JSON arguments parsed.
enum Request {
    Create,
    Select {
        criteria: Option<Value>,
        select: Select,
    },
    Count {
        criteria: Option<Value>,
    },
    Insert {
        values: Row,
    },
    Update {
        criteria: Option<Value>,
        mods: Row,
    },
    Delete {
        criteria: Option<Value>,
    },
    Get {
        id: Value,
    },
}

impl Request {
    fn parse(command: Commands) -> anyhow::Result<Self> {
        Ok(match command {
            Commands::Create => Self::Create,
            Commands::Select {
                criteria,
                columns,
                order_by,
                limit,
            } => {
                let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                let order_by: Vec<&str> = order_by.iter().map(String::as_str).collect();
                let mut select = Select::new().columns(&columns).order_by(&order_by);
                if let Some(n) = limit {
                    select = select.limit(n);
                }
                Self::Select {
                    criteria: parse_criteria(criteria.as_deref())?,
                    select,
                }
            }
            Commands::Count { criteria } => Self::Count {
                criteria: parse_criteria(criteria.as_deref())?,
            },
            Commands::Insert { values } => Self::Insert {
                values: parse_row("values", &values)?,
            },
            Commands::Update { criteria, mods } => Self::Update {
                criteria: parse_criteria(criteria.as_deref())?,
                mods: parse_row("mods", &mods)?,
            },
            Commands::Delete { criteria } => Self::Delete {
                criteria: parse_criteria(criteria.as_deref())?,
            },
            // Bare strings are accepted as ids without JSON quoting.
            Commands::Get { id } => Self::Get {
                id: serde_json::from_str(&id).unwrap_or_else(|_| Value::String(id)),
            },
        })
    }

    /// Prints the generated SQL and, when present, the bindings as JSON.
    fn print_statement(&self, schema: &TableSchema, style: ParamStyle) -> anyhow::Result<()> {
        let builder = StatementBuilder::new(schema).param_style(style);
        let (sql, bindings) = match self {
            Self::Create => (builder.create_table(), Bindings::new()),
            Self::Select { criteria, select } => builder.select(criteria.as_ref(), select)?,
            Self::Count { criteria } => builder.count(criteria.as_ref())?,
            Self::Insert { values } => (builder.insert(), Bindings::from(values.clone())),
            Self::Update { criteria, mods } => builder.update(criteria.as_ref(), mods)?,
            Self::Delete { criteria } => builder.delete(criteria.as_ref())?,
            Self::Get { id } => builder.get_by_id(id.clone())?,
        };

        println!("{sql}");
        if !bindings.is_empty() {
            println!("{}", serde_json::to_string_pretty(&bindings)?);
        }
        Ok(())
    }

    async fn execute(self, collection: &Collection<SqliteExecutor>) -> anyhow::Result<()> {
        match self {
            Self::Create => {
                collection.create_table().await?;
                info!(table = %collection.schema().name(), "Table created");
            }
            Self::Select { criteria, select } => {
                print_rows(&collection.find(criteria.as_ref(), &select).await?)?;
            }
            Self::Count { criteria } => {
                println!("{}", collection.count(criteria.as_ref()).await?);
            }
            Self::Insert { values } => {
                let rows = collection.insert(values).await?;
                info!(rows, "Inserted");
            }
            Self::Update { criteria, mods } => {
                let rows = collection.update(criteria.as_ref(), mods).await?;
                info!(rows, "Updated");
            }
            Self::Delete { criteria } => {
                let rows = collection.remove(criteria.as_ref()).await?;
                info!(rows, "Deleted");
            }
            Self::Get { id } => {
                if let Some(row) = collection.get(id).await? {
                    print_rows(&[row])?;
                }
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let text = std::fs::read_to_string(&cli.schema)
        .with_context(|| format!("reading schema {}", cli.schema.display()))?;
    let descriptor = SchemaDescriptor::from_json(&text)?;
    let style = ParamStyle::from(cli.style);
    let request = Request::parse(cli.command)?;

    if !cli.execute {
        let schema = descriptor.resolve(cli.json_native)?;
        return request.print_statement(&schema, style);
    }

    info!(database = %cli.database, "Connecting");
    let executor = SqliteExecutor::connect(&cli.database, 5)
        .await?
        .with_param_style(style);
    if cli.json_native && !executor.json_supported() {
        warn!("SQLite stores JSON as text, ignoring --json-native");
    }

    // The executor decides JSON support for executed statements.
    let collection = executor.collection(&descriptor)?;
    request.print_statement(collection.schema(), style)?;
    request.execute(&collection).await
}
