//! PostgreSQL dialect.

use super::{Dialect, PlaceholderStyle};

/// PostgreSQL-family dialect: double-quoted identifiers, `$n` placeholders.
///
/// Used for PostgreSQL, openGauss and HighGo.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Dollar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_dialect() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.quote_identifier("order"), "\"order\"");
        assert_eq!(dialect.placeholder_style(), PlaceholderStyle::Dollar);
    }
}
