//! ClickHouse dialect.

use super::{Dialect, IdentifierQuote, PlaceholderStyle};

/// ClickHouse dialect: backtick identifiers, values inlined as literals.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClickHouseDialect;

impl ClickHouseDialect {
    /// Creates a new ClickHouse dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for ClickHouseDialect {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    fn identifier_quote(&self) -> IdentifierQuote {
        IdentifierQuote::Backtick
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Inline
    }
}
