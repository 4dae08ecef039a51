//! PostgreSQL-family extractor: PostgreSQL, openGauss and HighGo.
//!
//! Defaults come back the way `pg_get_expr` prints them, so a literal
//! carries a trailing `::type` cast. The cast is dropped; anything that
//! calls a function is kept verbatim.

use super::lexer::{tokenize, TokenKind};
use super::{extract_with, ColumnSyntax};
use crate::column::RawColumn;

const SYNTAX: ColumnSyntax = ColumnSyntax {
    type_stops: &[
        &["NOT", "NULL"],
        &["NULL"],
        &["DEFAULT"],
        &["PRIMARY", "KEY"],
        &["CONSTRAINT"],
        &["UNIQUE"],
        &["REFERENCES"],
        &["CHECK"],
        &["COLLATE"],
        &["GENERATED"],
    ],
    default_terminators: &[
        "NOT NULL",
        "NULL",
        "PRIMARY KEY",
        "CONSTRAINT",
        "UNIQUE",
        "REFERENCES",
        "CHECK",
        "COLLATE",
        "GENERATED",
    ],
    identity_markers: &["IDENTITY"],
    clean_default: sanitize_default,
};

pub(super) fn extract(ddl: &str) -> Vec<RawColumn> {
    extract_with(ddl, &SYNTAX)
}

/// Drops the top-level `::type` cast from a default, unless a function is
/// called before it.
pub fn sanitize_default(expr: &str) -> String {
    let tokens = tokenize(expr);
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen => {
                let is_call = i > 0 && matches!(tokens[i - 1].kind, TokenKind::Word(_));
                if is_call {
                    return expr.to_string();
                }
                depth += 1;
            }
            TokenKind::RightParen => depth = depth.saturating_sub(1),
            TokenKind::DoubleColon if depth == 0 => {
                return expr[..token.span.start].trim_end().to_string();
            }
            _ => {}
        }
    }
    expr.to_string()
}
