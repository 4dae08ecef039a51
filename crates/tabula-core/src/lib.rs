//! # tabula-core
//!
//! Schema normalization and cross-engine table paging.
//!
//! The crate turns the `CREATE TABLE` text that MySQL-, PostgreSQL- and
//! Oracle-style engines print into one canonical column model, and pages
//! through tables with offset or primary-key keyset semantics regardless of
//! the engine behind the connection.
//!
//! ## Parsing DDL
//!
//! ```rust
//! use tabula_core::{ddl, ColumnKey, DialectKind};
//!
//! let columns = ddl::parse_columns(
//!     DialectKind::Postgres,
//!     "users",
//!     "id bigint NOT NULL, name varchar(100) DEFAULT 'x'::text, PRIMARY KEY (id)",
//! )
//! .unwrap();
//!
//! assert_eq!(columns[0].key, ColumnKey::Primary);
//! assert_eq!(columns[1].default_value, "'x'");
//! ```
//!
//! ## Compiling filters
//!
//! ```rust
//! use tabula_core::dialect::PostgresDialect;
//! use tabula_core::{FilterCondition, FilterGroup, FilterOperator};
//!
//! let filter = FilterGroup::and()
//!     .with_condition(FilterCondition::new("name", FilterOperator::Like, "ann"))
//!     .with_condition(FilterCondition::is_not_null("email"));
//! let compiled = filter.compile(&PostgresDialect::new()).unwrap();
//!
//! assert_eq!(compiled.clause, r#""name" LIKE $1 AND "email" IS NOT NULL"#);
//! ```
//!
//! ## Browsing
//!
//! A driver implements [`Connection`]; [`TableBrowser`] provides column
//! listing, schema display, offset pages, keyset pages and page-number
//! jumps on top of it.

pub mod browser;
pub mod column;
pub mod config;
pub mod context;
pub mod ddl;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod value;

pub use browser::{Connection, KeysetPage, Page, RowCount, TableBrowser};
pub use column::{ColumnInfo, ColumnKey};
pub use config::BrowserConfig;
pub use context::ConnectionContext;
pub use dialect::{Dialect, DialectKind};
pub use engine::Engine;
pub use error::{Error, Result};
pub use filter::{CompiledFilter, FilterCondition, FilterGroup, FilterLogic, FilterOperator};
pub use pagination::{Direction, PageCursor};
pub use query::{CountQuery, SelectQuery};
pub use value::{Row, SqlValue, ToSqlValue};
