//! Oracle-compatible dialect (Dameng, Kingbase).

use super::Dialect;

/// Oracle-compatible dialect: double-quoted identifiers, `?` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDialect;

impl OracleDialect {
    /// Creates a new Oracle-compatible dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }
}
