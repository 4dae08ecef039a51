//! Supported database engines and their capabilities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dialect::{
    ClickHouseDialect, Dialect, DialectKind, GenericDialect, MssqlDialect, MySqlDialect,
    OracleDialect, PostgresDialect,
};

const MYSQL: MySqlDialect = MySqlDialect::new();
const POSTGRES: PostgresDialect = PostgresDialect::new();
const ORACLE: OracleDialect = OracleDialect::new();
const GENERIC: GenericDialect = GenericDialect::new();
const MSSQL: MssqlDialect = MssqlDialect::new();
const CLICKHOUSE: ClickHouseDialect = ClickHouseDialect::new();

/// A database engine behind a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// MySQL.
    MySql,
    /// MariaDB.
    MariaDb,
    /// PostgreSQL.
    Postgres,
    /// openGauss, PostgreSQL-compatible.
    OpenGauss,
    /// HighGo, PostgreSQL-compatible.
    HighGo,
    /// Dameng (DM), Oracle-compatible with `IDENTITY` columns.
    Dameng,
    /// Kingbase, Oracle-compatible with `IDENTITY` columns.
    Kingbase,
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    SqlServer,
    /// ClickHouse column store.
    ClickHouse,
    /// MongoDB document store.
    MongoDb,
    /// Redis key-value store.
    Redis,
}

impl Engine {
    /// All engines, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::MySql,
        Self::MariaDb,
        Self::Postgres,
        Self::OpenGauss,
        Self::HighGo,
        Self::Dameng,
        Self::Kingbase,
        Self::Sqlite,
        Self::SqlServer,
        Self::ClickHouse,
        Self::MongoDb,
        Self::Redis,
    ];

    /// Returns the engine name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
            Self::Postgres => "postgres",
            Self::OpenGauss => "opengauss",
            Self::HighGo => "highgo",
            Self::Dameng => "dameng",
            Self::Kingbase => "kingbase",
            Self::Sqlite => "sqlite",
            Self::SqlServer => "sqlserver",
            Self::ClickHouse => "clickhouse",
            Self::MongoDb => "mongodb",
            Self::Redis => "redis",
        }
    }

    /// Returns the DDL extractor family for this engine.
    ///
    /// SQLite, SQL Server and the document stores expose structured
    /// catalogs and never go through DDL text.
    #[must_use]
    pub const fn ddl_kind(self) -> DialectKind {
        match self {
            Self::MySql | Self::MariaDb | Self::ClickHouse => DialectKind::MySql,
            Self::Postgres | Self::OpenGauss | Self::HighGo => DialectKind::Postgres,
            Self::Dameng | Self::Kingbase => DialectKind::Oracle,
            Self::Sqlite | Self::SqlServer | Self::MongoDb | Self::Redis => DialectKind::Generic,
        }
    }

    /// Returns the SQL dialect used to render queries.
    #[must_use]
    pub const fn dialect(self) -> &'static dyn Dialect {
        match self {
            Self::MySql | Self::MariaDb => &MYSQL,
            Self::Postgres | Self::OpenGauss | Self::HighGo => &POSTGRES,
            Self::Dameng | Self::Kingbase => &ORACLE,
            Self::SqlServer => &MSSQL,
            Self::ClickHouse => &CLICKHOUSE,
            Self::Sqlite | Self::MongoDb | Self::Redis => &GENERIC,
        }
    }

    /// Returns true if rows have a stable primary-key order for keyset
    /// paging.
    #[must_use]
    pub const fn supports_keyset(self) -> bool {
        !matches!(self, Self::Redis)
    }

    /// Returns true if a filtered row count is cheap enough to run per page.
    #[must_use]
    pub const fn supports_count(self) -> bool {
        !matches!(self, Self::ClickHouse)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "mariadb" => Ok(Self::MariaDb),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "opengauss" => Ok(Self::OpenGauss),
            "highgo" => Ok(Self::HighGo),
            "dameng" | "dm" => Ok(Self::Dameng),
            "kingbase" => Ok(Self::Kingbase),
            "sqlite" => Ok(Self::Sqlite),
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            "clickhouse" => Ok(Self::ClickHouse),
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown engine: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_kinds() {
        assert_eq!(Engine::MariaDb.ddl_kind(), DialectKind::MySql);
        assert_eq!(Engine::HighGo.ddl_kind(), DialectKind::Postgres);
        assert_eq!(Engine::Kingbase.ddl_kind(), DialectKind::Oracle);
        assert_eq!(Engine::Sqlite.ddl_kind(), DialectKind::Generic);
    }

    #[test]
    fn test_capabilities() {
        let no_keyset: Vec<Engine> = Engine::ALL
            .into_iter()
            .filter(|e| !e.supports_keyset())
            .collect();
        assert_eq!(no_keyset, vec![Engine::Redis]);
        assert!(!Engine::ClickHouse.supports_count());
        assert!(Engine::Postgres.supports_count());
    }

    #[test]
    fn test_dialects() {
        assert_eq!(Engine::OpenGauss.dialect().name(), "postgresql");
        assert_eq!(Engine::SqlServer.dialect().quote_identifier("t"), "[t]");
        assert_eq!(Engine::ClickHouse.dialect().quote_identifier("t"), "`t`");
    }

    #[test]
    fn test_round_trip_names() {
        for engine in Engine::ALL {
            assert_eq!(engine.name().parse::<Engine>(), Ok(engine));
        }
    }
}
