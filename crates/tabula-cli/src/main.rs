//! tabula CLI
//!
//! Parses engine DDL dumps offline and pages through SQLite tables.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use tabula_core::{
    ddl, BrowserConfig, ConnectionContext, DialectKind, Direction, FilterGroup, SqlValue,
    TableBrowser,
};
use tabula_sqlite::SqliteConnection;

/// Normalize table schemas and page through tables.
#[derive(Parser)]
#[command(name = "tabula")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Page size used when a command does not give one.
    #[arg(long, env = "TABULA_PAGE_SIZE", default_value_t = 20)]
    page_size: u64,

    /// Upper bound for page sizes.
    #[arg(long, default_value_t = 1000)]
    max_page_size: u64,

    /// Skip row counts.
    #[arg(long)]
    no_count: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a DDL file and print its columns as JSON.
    Columns {
        /// DDL dialect: mysql, postgres or oracle (engine names accepted).
        #[arg(long)]
        dialect: DialectKind,

        /// Table name used in messages.
        #[arg(short, long, default_value = "table")]
        table: String,

        /// File holding the DDL text.
        file: PathBuf,
    },

    /// Print a readable schema for a table.
    Schema {
        /// Table name.
        #[arg(short, long)]
        table: String,
    },

    /// Print one offset page.
    Page {
        /// Table name.
        #[arg(short, long)]
        table: String,

        /// Page number, from 1.
        #[arg(short, long, default_value_t = 1)]
        page: u64,

        /// Rows per page.
        #[arg(short, long)]
        size: Option<u64>,

        /// Filter group as JSON.
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Print one keyset page.
    Scroll {
        /// Table name.
        #[arg(short, long)]
        table: String,

        /// Primary-key column.
        #[arg(long, default_value = "id")]
        pk: String,

        /// Cursor value; omit for the first page.
        #[arg(short, long)]
        cursor: Option<String>,

        /// Page backwards from the cursor.
        #[arg(long)]
        prev: bool,

        /// Rows per page.
        #[arg(short, long)]
        size: Option<u64>,

        /// Filter group as JSON.
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Print the cursor that starts a page.
    PageId {
        /// Table name.
        #[arg(short, long)]
        table: String,

        /// Primary-key column.
        #[arg(long, default_value = "id")]
        pk: String,

        /// Page number, from 1.
        #[arg(short, long)]
        page: u64,

        /// Rows per page.
        #[arg(short, long)]
        size: Option<u64>,
    },
}

fn parse_filter(raw: Option<&str>) -> anyhow::Result<Option<FilterGroup>> {
    raw.map(|json| serde_json::from_str(json).context("invalid --filter JSON"))
        .transpose()
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
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Commands::Columns {
        dialect,
        table,
        file,
    } = &cli.command
    {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?;
        let columns = ddl::parse_columns(*dialect, table, &text)?;
        if columns.is_empty() && !ddl::has_column_section(&text) {
            info!("No column section found in {}", file.display());
        }
        println!("{}", serde_json::to_string_pretty(&columns)?);
        return Ok(());
    }

    let config = BrowserConfig::default()
        .with_default_page_size(cli.page_size)
        .with_max_page_size(cli.max_page_size)
        .with_count_rows(!cli.no_count);
    debug!(?config, database = %cli.database, "connecting");
    let conn = SqliteConnection::connect(&cli.database).await?;
    let browser = TableBrowser::with_config(conn, config);
    let ctx = ConnectionContext::new();

    match cli.command {
        Commands::Columns { .. } => {}

        Commands::Schema { table } => {
            println!("{}", browser.get_table_schema(&ctx, &table).await?);
        }

        Commands::Page {
            table,
            page,
            size,
            filter,
        } => {
            let filter = parse_filter(filter.as_deref())?;
            let page = browser
                .get_table_data(&ctx, &table, page, size, filter.as_ref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }

        Commands::Scroll {
            table,
            pk,
            cursor,
            prev,
            size,
            filter,
        } => {
            let filter = parse_filter(filter.as_deref())?;
            let cursor = cursor.as_deref().map(SqlValue::parse_literal);
            let direction = if prev { Direction::Prev } else { Direction::Next };
            let page = browser
                .get_table_data_by_id(&ctx, &table, &pk, cursor, size, direction, filter.as_ref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }

        Commands::PageId {
            table,
            pk,
            page,
            size,
        } => {
            let cursor = browser
                .get_page_id_by_page_number(&ctx, &table, &pk, page, size)
                .await?;
            if let Some(value) = cursor {
                println!("{}", serde_json::to_string(&value)?);
            } else {
                info!("Page 1 starts without a cursor.");
            }
        }
    }

    Ok(())
}
