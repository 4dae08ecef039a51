#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use tabula_core::{
    ColumnInfo, Connection, ConnectionContext, CountQuery, Engine, Error, Result, Row,
    SelectQuery, SqlValue, TableBrowser,
};

/// A connection over rows held in memory. Queries are rendered for the
/// engine's dialect and then evaluated structurally.
pub struct MemoryConnection {
    pub engine: Engine,
    pub rows: Vec<Row>,
    pub ddl: String,
    pub catalog: Option<Vec<ColumnInfo>>,
    pub fetches: AtomicUsize,
    pub counts: AtomicUsize,
    pub last_select: Mutex<Option<(SelectQuery, String)>>,
    pub last_count: Mutex<Option<(CountQuery, String)>>,
}

impl MemoryConnection {
    pub fn new(engine: Engine, rows: Vec<Row>) -> Self {
        Self {
            engine,
            rows,
            ddl: String::new(),
            catalog: None,
            fetches: AtomicUsize::new(0),
            counts: AtomicUsize::new(0),
            last_select: Mutex::new(None),
            last_count: Mutex::new(None),
        }
    }

    pub fn with_ddl(mut self, ddl: &str) -> Self {
        self.ddl = ddl.to_string();
        self
    }

    pub fn with_catalog(mut self, columns: Vec<ColumnInfo>) -> Self {
        self.catalog = Some(columns);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// The last select this connection ran, with its rendered SQL.
    pub fn last_select(&self) -> Option<(SelectQuery, String)> {
        self.last_select.lock().clone()
    }

    /// The last count this connection ran, with its rendered SQL.
    pub fn last_count(&self) -> Option<(CountQuery, String)> {
        self.last_count.lock().clone()
    }
}

impl Connection for MemoryConnection {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn fetch_rows(&self, _ctx: &ConnectionContext, query: &SelectQuery) -> Result<Vec<Row>> {
        let (sql, _) = query.to_sql(self.engine.dialect())?;
        *self.last_select.lock() = Some((query.clone(), sql));
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(query.apply(&self.rows))
    }

    async fn count_rows(&self, _ctx: &ConnectionContext, query: &CountQuery) -> Result<u64> {
        let (sql, _) = query.to_sql(self.engine.dialect())?;
        *self.last_count.lock() = Some((query.clone(), sql));
        self.counts.fetch_add(1, Ordering::SeqCst);
        Ok(query.apply(&self.rows))
    }

    async fn table_ddl(&self, _ctx: &ConnectionContext, _table: &str) -> Result<String> {
        Ok(self.ddl.clone())
    }

    async fn catalog_columns(&self, _ctx: &ConnectionContext, _table: &str) -> Result<Vec<ColumnInfo>> {
        self.catalog.clone().ok_or(Error::UnsupportedOperation {
            engine: self.engine.name(),
            operation: "catalog columns",
        })
    }
}

/// Rows `id = 1..=n` with a name and an alternating status.
pub fn numbered_rows(n: i64) -> Vec<Row> {
    (1..=n)
        .map(|i| {
            Row::from_iter([
                ("id".to_string(), SqlValue::Int(i)),
                ("name".to_string(), SqlValue::Text(format!("user{i}"))),
                (
                    "status".to_string(),
                    SqlValue::from(if i % 2 == 0 { "on" } else { "off" }),
                ),
            ])
        })
        .collect()
}

pub const USERS_DDL: &str = "CREATE TABLE `users` (
  `id` bigint NOT NULL AUTO_INCREMENT,
  `name` varchar(64) NOT NULL,
  `status` varchar(8) DEFAULT 'off',
  PRIMARY KEY (`id`)
) ENGINE=InnoDB";

/// A browser over `numbered_rows(n)` on `engine`.
pub fn browser(engine: Engine, n: i64) -> TableBrowser<MemoryConnection> {
    TableBrowser::new(MemoryConnection::new(engine, numbered_rows(n)).with_ddl(USERS_DDL))
}

/// Extracts the `id` column of each row.
pub fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .map(|row| match row.get("id") {
            Some(SqlValue::Int(i)) => *i,
            other => panic!("row without integer id: {other:?}"),
        })
        .collect()
}
