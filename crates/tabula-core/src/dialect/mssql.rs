//! SQL Server dialect.

use super::{Dialect, IdentifierQuote};

/// SQL Server dialect: bracket identifiers and `OFFSET ... FETCH` windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MssqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn identifier_quote(&self) -> IdentifierQuote {
        IdentifierQuote::Bracket
    }

    fn window_requires_order(&self) -> bool {
        true
    }

    fn limit_clause(&self, limit: u64, offset: Option<u64>) -> String {
        format!(
            "OFFSET {} ROWS FETCH NEXT {limit} ROWS ONLY",
            offset.unwrap_or(0)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mssql_window() {
        let dialect = MssqlDialect::new();
        assert_eq!(dialect.quote_identifier("from"), "[from]");
        assert_eq!(
            dialect.limit_clause(10, None),
            "OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
        );
        assert_eq!(
            dialect.limit_clause(1, Some(19)),
            "OFFSET 19 ROWS FETCH NEXT 1 ROWS ONLY"
        );
    }
}
