//! SQL dialect support.
//!
//! Engines disagree on identifier quoting, bind placeholders, and how a
//! page window is written. [`Dialect`] captures those differences for the
//! filter compiler and the query renderer. [`DialectKind`] is the separate,
//! closed tag that picks the DDL field extractor for an engine.

mod clickhouse;
mod generic;
mod mssql;
mod mysql;
mod oracle;
mod postgres;

pub use clickhouse::ClickHouseDialect;
pub use generic::GenericDialect;
pub use mssql::MssqlDialect;
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which DDL field-extractor family applies to an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// Backtick-quoted `SHOW CREATE TABLE` output.
    MySql,
    /// Bare identifiers, `PRIMARY KEY (...)` clause, `::type` casts.
    Postgres,
    /// Double-quoted identifiers, `IDENTITY(seed, increment)` columns.
    Oracle,
    /// Engines that expose a structured catalog and never parse DDL text.
    Generic,
}

impl DialectKind {
    /// Returns the dialect name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Oracle => "oracle",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" | "clickhouse" => Ok(Self::MySql),
            "postgres" | "postgresql" | "pg" | "opengauss" | "highgo" => Ok(Self::Postgres),
            "oracle" | "dameng" | "dm" | "kingbase" => Ok(Self::Oracle),
            "generic" | "sqlite" => Ok(Self::Generic),
            other => Err(format!("unknown dialect: {other}")),
        }
    }
}

/// How identifiers are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierQuote {
    /// `` `name` ``
    Backtick,
    /// `"name"`
    Double,
    /// `[name]`
    Bracket,
}

impl IdentifierQuote {
    /// Returns the opening and closing quote characters.
    #[must_use]
    pub const fn chars(self) -> (char, char) {
        match self {
            Self::Backtick => ('`', '`'),
            Self::Double => ('"', '"'),
            Self::Bracket => ('[', ']'),
        }
    }

    /// Quotes `name`, doubling any embedded closing quote.
    #[must_use]
    pub fn quote(self, name: &str) -> String {
        let (open, close) = self.chars();
        let escaped = name.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }
}

/// How bound values appear in statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Positional `?`.
    Question,
    /// Numbered `$1`, `$2`, ...
    Dollar,
    /// No bind parameters: values are inlined as escaped literals.
    Inline,
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quoting style.
    fn identifier_quote(&self) -> IdentifierQuote {
        IdentifierQuote::Double
    }

    /// Returns the parameter placeholder style.
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Question
    }

    /// Returns the multi-character wildcard used by `LIKE`.
    fn like_wildcard(&self) -> char {
        '%'
    }

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        self.identifier_quote().quote(name)
    }

    /// Returns true if a row window is only valid after an `ORDER BY`.
    fn window_requires_order(&self) -> bool {
        false
    }

    /// Renders the row window that closes a SELECT.
    fn limit_clause(&self, limit: u64, offset: Option<u64>) -> String {
        match offset {
            Some(offset) if offset > 0 => format!("LIMIT {limit} OFFSET {offset}"),
            _ => format!("LIMIT {limit}"),
        }
    }
}
