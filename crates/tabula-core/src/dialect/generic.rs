//! Generic SQL dialect.

use super::Dialect;

/// A generic SQL dialect using ANSI SQL quoting and `?` placeholders.
///
/// Also serves SQLite.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{IdentifierQuote, PlaceholderStyle};

    #[test]
    fn test_generic_dialect() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.identifier_quote(), IdentifierQuote::Double);
        assert_eq!(dialect.placeholder_style(), PlaceholderStyle::Question);
        assert_eq!(dialect.limit_clause(10, None), "LIMIT 10");
        assert_eq!(dialect.limit_clause(10, Some(0)), "LIMIT 10");
        assert_eq!(dialect.limit_clause(10, Some(20)), "LIMIT 10 OFFSET 20");
    }
}
