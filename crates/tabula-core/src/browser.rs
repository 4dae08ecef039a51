//! The uniform table-browsing contract.
//!
//! [`Connection`] is the driver seam: it runs structured queries and hands
//! back DDL text or catalog columns. [`TableBrowser`] builds every browsing
//! operation on top of it, so an engine only has to implement the seam.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::column::{ColumnInfo, ColumnKey};
use crate::config::BrowserConfig;
use crate::context::ConnectionContext;
use crate::ddl;
use crate::dialect::DialectKind;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::filter::FilterGroup;
use crate::pagination::{
    finish_keyset_page, plan_keyset_page, plan_offset_page, plan_page_seek, resolve_size,
    resolve_window, Direction, PageCursor,
};
use crate::query::{CountQuery, SelectQuery};
use crate::value::{Row, SqlValue};

/// A live connection to one database engine.
///
/// The returned futures are `Send` so a browser can be driven from a
/// multi-threaded runtime. Implementations may use `async fn`.
pub trait Connection: Send + Sync {
    /// Returns the engine behind this connection.
    fn engine(&self) -> Engine;

    /// Runs a select and returns its rows in result order.
    fn fetch_rows(
        &self,
        ctx: &ConnectionContext,
        query: &SelectQuery,
    ) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Counts the rows matching a count query.
    fn count_rows(
        &self,
        ctx: &ConnectionContext,
        query: &CountQuery,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Returns the engine's DDL text for `table`.
    fn table_ddl(
        &self,
        ctx: &ConnectionContext,
        table: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Returns columns from the engine's structured catalog.
    ///
    /// Only engines whose [`Engine::ddl_kind`] is [`DialectKind::Generic`]
    /// need to implement this.
    fn catalog_columns(
        &self,
        ctx: &ConnectionContext,
        table: &str,
    ) -> impl Future<Output = Result<Vec<ColumnInfo>>> + Send {
        let _ = (ctx, table);
        let engine = self.engine();
        async move {
            Err(Error::UnsupportedOperation {
                engine: engine.name(),
                operation: "catalog columns",
            })
        }
    }
}

/// Number of rows matching a page's filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RowCount {
    /// Counted.
    Exact(u64),
    /// Not counted, reported as `-1`.
    Unknown,
}

impl RowCount {
    /// Returns the count, or `-1` when unknown.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Exact(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Self::Unknown => -1,
        }
    }
}

impl From<i64> for RowCount {
    fn from(n: i64) -> Self {
        u64::try_from(n).map_or(Self::Unknown, Self::Exact)
    }
}

impl From<RowCount> for i64 {
    fn from(count: RowCount) -> Self {
        count.as_i64()
    }
}

/// One offset page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Rows of the page.
    pub rows: Vec<Row>,
    /// Rows matching the filter.
    pub total: RowCount,
    /// Page number, from 1.
    pub page: u64,
    /// Effective page size.
    pub page_size: u64,
}

/// One keyset page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeysetPage {
    /// Rows in ascending key order.
    pub rows: Vec<Row>,
    /// Rows matching the filter, ignoring the cursor.
    pub total: RowCount,
    /// Cursor for the following page (`NEXT`).
    pub next_cursor: Option<SqlValue>,
    /// Cursor for the preceding page (`PREV`).
    pub prev_cursor: Option<SqlValue>,
}

/// Browses tables over any [`Connection`].
pub struct TableBrowser<C> {
    conn: C,
    config: BrowserConfig,
}

impl<C: Connection> TableBrowser<C> {
    /// Creates a browser with the default configuration.
    #[must_use]
    pub fn new(conn: C) -> Self {
        Self::with_config(conn, BrowserConfig::default())
    }

    /// Creates a browser with `config`.
    #[must_use]
    pub const fn with_config(conn: C, config: BrowserConfig) -> Self {
        Self { conn, config }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &C {
        &self.conn
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &BrowserConfig {
        &self.config
    }

    fn engine(&self) -> Engine {
        self.conn.engine()
    }

    /// Returns the canonical columns of `table`.
    ///
    /// Text dialects parse the engine's DDL; generic engines read their
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDialect`] if the engine has neither a
    /// text dialect nor a catalog, or the connection's error.
    pub async fn get_table_columns(
        &self,
        ctx: &ConnectionContext,
        table: &str,
    ) -> Result<Vec<ColumnInfo>> {
        match self.engine().ddl_kind() {
            DialectKind::Generic => match self.conn.catalog_columns(ctx, table).await {
                Err(Error::UnsupportedOperation { .. }) => Err(Error::UnsupportedDialect {
                    table: table.to_string(),
                    dialect: DialectKind::Generic,
                }),
                other => other,
            },
            kind => {
                let text = self.conn.table_ddl(ctx, table).await?;
                debug!(table, engine = %self.engine(), dialect = %kind, "parsing table DDL");
                ddl::parse_columns(kind, table, &text)
            }
        }
    }

    /// Returns a human-readable `CREATE TABLE` rebuilt from the canonical
    /// columns. It is meant for display and is not guaranteed to execute.
    ///
    /// # Errors
    ///
    /// Fails like [`TableBrowser::get_table_columns`].
    pub async fn get_table_schema(&self, ctx: &ConnectionContext, table: &str) -> Result<String> {
        let columns = self.get_table_columns(ctx, table).await?;
        Ok(render_schema(self.engine(), table, &columns))
    }

    /// Returns the first primary-key column, if the table has one the
    /// engine can report.
    async fn primary_key(&self, ctx: &ConnectionContext, table: &str) -> Result<Option<String>> {
        match self.get_table_columns(ctx, table).await {
            Ok(columns) => Ok(columns.into_iter().find(ColumnInfo::is_primary).map(|c| c.name)),
            Err(Error::UnsupportedDialect { .. } | Error::UnsupportedOperation { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn count(
        &self,
        ctx: &ConnectionContext,
        table: &str,
        filter: Option<&FilterGroup>,
    ) -> Result<RowCount> {
        if !self.config.count_rows || !self.engine().supports_count() {
            return Ok(RowCount::Unknown);
        }
        let query = CountQuery::new(ctx.current_database(), table, filter);
        Ok(RowCount::Exact(self.conn.count_rows(ctx, &query).await?))
    }

    fn require_keyset(&self) -> Result<()> {
        let engine = self.engine();
        if engine.supports_keyset() {
            Ok(())
        } else {
            Err(Error::UnsupportedOperation {
                engine: engine.name(),
                operation: "keyset pagination",
            })
        }
    }

    /// Returns page `page` (from 1) of `table` by offset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPage`] or [`Error::InvalidPageSize`] for a
    /// bad window, [`Error::InvalidFilter`] for a bad filter, or the
    /// connection's error.
    pub async fn get_table_data(
        &self,
        ctx: &ConnectionContext,
        table: &str,
        page: u64,
        page_size: Option<u64>,
        filter: Option<&FilterGroup>,
    ) -> Result<Page> {
        let size = resolve_window(
            page,
            page_size,
            self.config.default_page_size,
            self.config.max_page_size,
        )?;
        let pk = self.primary_key(ctx, table).await?;
        let query = plan_offset_page(table, pk.as_deref(), page, size, filter)
            .schema(ctx.current_database());
        debug!(table, engine = %self.engine(), page, size, "fetching offset page");

        let rows = self.conn.fetch_rows(ctx, &query).await?;
        let total = self.count(ctx, table, filter).await?;
        Ok(Page {
            rows,
            total,
            page,
            page_size: size,
        })
    }

    /// Returns one keyset page of `table` ordered by `primary_key`.
    ///
    /// Without a cursor, `NEXT` returns the first page. `PREV` returns the
    /// rows strictly before the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOperation`] for engines without a stable
    /// row order, [`Error::MissingCursor`] for `PREV` without a cursor, or
    /// the connection's error.
    #[allow(clippy::too_many_arguments)]
    pub async fn get_table_data_by_id(
        &self,
        ctx: &ConnectionContext,
        table: &str,
        primary_key: &str,
        cursor: Option<SqlValue>,
        page_size: Option<u64>,
        direction: Direction,
        filter: Option<&FilterGroup>,
    ) -> Result<KeysetPage> {
        self.require_keyset()?;
        let size = resolve_size(page_size, self.config.default_page_size, self.config.max_page_size)?;
        let cursor = PageCursor {
            primary_key_column: primary_key.to_string(),
            last_value: cursor,
            direction,
        };
        let query = plan_keyset_page(table, &cursor, size, filter)?.schema(ctx.current_database());
        debug!(
            table,
            engine = %self.engine(),
            %direction,
            cursor = ?cursor.value(),
            size,
            "fetching keyset page"
        );

        let rows = self.conn.fetch_rows(ctx, &query).await?;
        let window = finish_keyset_page(direction, primary_key, rows);
        let total = self.count(ctx, table, filter).await?;
        Ok(KeysetPage {
            rows: window.rows,
            total,
            next_cursor: window.next_cursor,
            prev_cursor: window.prev_cursor,
        })
    }

    /// Returns the `NEXT` cursor that starts page `page` (from 1).
    ///
    /// Page 1 has no cursor and is answered without touching the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageOutOfRange`] when the table has too few rows,
    /// [`Error::InvalidPage`] for page 0, [`Error::UnsupportedOperation`]
    /// for engines without a stable row order, or the connection's error.
    pub async fn get_page_id_by_page_number(
        &self,
        ctx: &ConnectionContext,
        table: &str,
        primary_key: &str,
        page: u64,
        page_size: Option<u64>,
    ) -> Result<Option<SqlValue>> {
        self.require_keyset()?;
        let size = resolve_window(
            page,
            page_size,
            self.config.default_page_size,
            self.config.max_page_size,
        )?;
        let Some(seek) = plan_page_seek(table, primary_key, page, size) else {
            return Ok(None);
        };
        let seek = seek.schema(ctx.current_database());
        debug!(table, engine = %self.engine(), page, size, offset = seek.offset, "seeking page start");

        let rows = self.conn.fetch_rows(ctx, &seek).await?;
        rows.first()
            .and_then(|row| row.get(primary_key))
            .filter(|v| !v.is_null())
            .cloned()
            .map(Some)
            .ok_or_else(|| Error::PageOutOfRange {
                table: table.to_string(),
                page,
            })
    }

    /// Selects the database or schema later operations run against.
    pub fn switch_database(&self, ctx: &ConnectionContext, database: &str) {
        debug!(engine = %self.engine(), database, "switch database");
        ctx.switch_database(database);
    }
}

/// Renders columns as a readable `CREATE TABLE`.
fn render_schema(engine: Engine, table: &str, columns: &[ColumnInfo]) -> String {
    let dialect = engine.dialect();
    let primary: Vec<String> = columns
        .iter()
        .filter(|c| c.is_primary())
        .map(|c| dialect.quote_identifier(&c.name))
        .collect();

    let mut lines: Vec<String> = columns
        .iter()
        .map(|c| {
            let mut line = format!("  {}", dialect.quote_identifier(&c.name));
            if !c.data_type.is_empty() {
                line.push(' ');
                line.push_str(&c.data_type);
            }
            if !c.nullable {
                line.push_str(" NOT NULL");
            }
            if !c.default_value.is_empty() {
                line.push_str(" DEFAULT ");
                line.push_str(&c.default_value);
            }
            if c.key == ColumnKey::Unique {
                line.push_str(" UNIQUE");
            }
            line
        })
        .collect();
    if !primary.is_empty() {
        lines.push(format!("  PRIMARY KEY ({})", primary.join(", ")));
    }

    format!(
        "CREATE TABLE {} (\n{}\n);",
        dialect.quote_identifier(table),
        lines.join(",\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_count_sentinel() {
        assert_eq!(serde_json::to_string(&RowCount::Unknown).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&RowCount::Exact(25)).unwrap(), "25");
        assert_eq!(RowCount::from(-1), RowCount::Unknown);
        assert_eq!(RowCount::from(3), RowCount::Exact(3));
    }

    #[test]
    fn test_render_schema() {
        let columns = vec![
            ColumnInfo::new("id", "bigint").not_null().key(ColumnKey::Primary),
            ColumnInfo::new("email", "varchar(255)").key(ColumnKey::Unique),
            ColumnInfo::new("status", "text").not_null().default_value("'on'"),
        ];
        assert_eq!(
            render_schema(Engine::Postgres, "users", &columns),
            "CREATE TABLE \"users\" (\n  \"id\" bigint NOT NULL,\n  \
             \"email\" varchar(255) UNIQUE,\n  \"status\" text NOT NULL DEFAULT 'on',\n  \
             PRIMARY KEY (\"id\")\n);"
        );
    }
}
