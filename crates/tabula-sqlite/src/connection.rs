//! [`Connection`] over an sqlx SQLite pool.
//!
//! SQLite keeps column metadata in its catalog, so columns come from
//! `PRAGMA table_info` and `PRAGMA index_list` rather than from parsing the
//! stored `CREATE TABLE` text.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row as _;
use tracing::debug;

use tabula_core::{
    ColumnInfo, ColumnKey, Connection, ConnectionContext, CountQuery, Engine, Row, SelectQuery,
    SqlValue,
};

use crate::error::{Result, SqliteError};
use crate::row::{bind_value, decode_row};

/// A SQLite database behind a connection pool.
#[derive(Debug, Clone)]
pub struct SqliteConnection {
    pool: SqlitePool,
}

impl SqliteConnection {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `url`. In-memory databases get a single connection
    /// so every query sees the same database.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::Database`] if the database cannot be opened.
    pub async fn connect(url: &str) -> Result<Self> {
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        debug!(url, max_connections, "opened sqlite pool");
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn run_select(&self, sql: &str, args: Vec<SqlValue>) -> Result<Vec<Row>> {
        debug!(engine = "sqlite", sql, args = args.len(), "executing select");
        let mut query = sqlx::query(sql);
        for arg in args {
            query = bind_value(query, arg);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| decode_row(row).map_err(SqliteError::from))
            .collect()
    }

    async fn run_count(&self, sql: &str, args: Vec<SqlValue>) -> Result<u64> {
        debug!(engine = "sqlite", sql, args = args.len(), "executing count");
        let mut query = sqlx::query(sql);
        for arg in args {
            query = bind_value(query, arg);
        }
        let row = query.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get(0)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn read_ddl(&self, schema: Option<&str>, table: &str) -> Result<String> {
        let master = schema.map_or_else(
            || String::from("sqlite_master"),
            |schema| format!("{}.sqlite_master", quote(schema)),
        );
        let sql = format!("SELECT sql FROM {master} WHERE type = 'table' AND name = ?");
        let ddl: Option<(Option<String>,)> = sqlx::query_as(&sql)
            .bind(table)
            .fetch_optional(&self.pool)
            .await?;
        ddl.and_then(|(sql,)| sql)
            .ok_or_else(|| SqliteError::TableNotFound(table.to_string()))
    }

    async fn read_catalog(&self, schema: Option<&str>, table: &str) -> Result<Vec<ColumnInfo>> {
        let prefix = schema.map(|s| format!("{}.", quote(s))).unwrap_or_default();

        let info: Vec<(i64, String, String, i64, Option<String>, i64)> =
            sqlx::query_as(&format!("PRAGMA {prefix}table_info({})", quote(table)))
                .fetch_all(&self.pool)
                .await?;
        if info.is_empty() {
            return Err(SqliteError::TableNotFound(table.to_string()));
        }

        let unique = self.single_column_unique(&prefix, table).await?;
        let columns = info
            .into_iter()
            .map(|(_cid, name, data_type, notnull, default, pk)| {
                let key = if pk > 0 {
                    ColumnKey::Primary
                } else if unique.contains(&name) {
                    ColumnKey::Unique
                } else {
                    ColumnKey::None
                };
                let default_value = default
                    .filter(|d| !d.eq_ignore_ascii_case("NULL"))
                    .unwrap_or_default();
                ColumnInfo {
                    name,
                    data_type,
                    nullable: notnull == 0,
                    default_value,
                    key,
                }
            })
            .collect::<Vec<_>>();
        debug!(engine = "sqlite", table, columns = columns.len(), "read catalog columns");
        Ok(columns)
    }

    /// Columns that alone form a unique index other than the primary key.
    async fn single_column_unique(&self, prefix: &str, table: &str) -> Result<Vec<String>> {
        let indexes = sqlx::query(&format!("PRAGMA {prefix}index_list({})", quote(table)))
            .fetch_all(&self.pool)
            .await?;

        let mut unique = Vec::new();
        for index in indexes {
            let name: String = index.try_get("name")?;
            let is_unique: i64 = index.try_get("unique")?;
            let origin: String = index.try_get("origin")?;
            if is_unique == 0 || origin == "pk" {
                continue;
            }
            let cols = sqlx::query(&format!("PRAGMA {prefix}index_info({})", quote(&name)))
                .fetch_all(&self.pool)
                .await?;
            if let [col] = cols.as_slice() {
                let column: Option<String> = col.try_get("name")?;
                unique.extend(column);
            }
        }
        Ok(unique)
    }
}

fn quote(name: &str) -> String {
    Engine::Sqlite.dialect().quote_identifier(name)
}

impl Connection for SqliteConnection {
    fn engine(&self) -> Engine {
        Engine::Sqlite
    }

    async fn fetch_rows(
        &self,
        _ctx: &ConnectionContext,
        query: &SelectQuery,
    ) -> tabula_core::Result<Vec<Row>> {
        let (sql, args) = query.to_sql(self.engine().dialect())?;
        Ok(self.run_select(&sql, args).await?)
    }

    async fn count_rows(
        &self,
        _ctx: &ConnectionContext,
        query: &CountQuery,
    ) -> tabula_core::Result<u64> {
        let (sql, args) = query.to_sql(self.engine().dialect())?;
        Ok(self.run_count(&sql, args).await?)
    }

    async fn table_ddl(&self, ctx: &ConnectionContext, table: &str) -> tabula_core::Result<String> {
        Ok(self.read_ddl(ctx.current_database().as_deref(), table).await?)
    }

    async fn catalog_columns(
        &self,
        ctx: &ConnectionContext,
        table: &str,
    ) -> tabula_core::Result<Vec<ColumnInfo>> {
        Ok(self
            .read_catalog(ctx.current_database().as_deref(), table)
            .await?)
    }
}
