//! DDL field extraction.
//!
//! Turns engine-generated `CREATE TABLE` text into [`ColumnInfo`] records.
//! All dialects share one tokenizer, one item classifier and one
//! default-value scanner; a dialect only contributes the keywords that end
//! a type, the tokens that end a default, and how a default is cleaned up.

pub mod describe;
pub mod lexer;
mod mysql;
mod oracle;
mod postgres;
pub mod primary_key;
pub mod scanner;

pub use describe::{from_describe_rows, DescribeRow};
pub use primary_key::resolve_keys;
pub use scanner::{scan_default, DefaultScan};

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::column::{normalize, ColumnInfo, RawColumn};
use crate::dialect::DialectKind;
use crate::error::{Error, Result};

use lexer::{find_words, split_items, table_body, tokenize, Token, TokenKind};

/// Keyword sets that shape one dialect's column definitions.
pub(crate) struct ColumnSyntax {
    /// Word runs that end the type text.
    pub type_stops: &'static [&'static [&'static str]],
    /// Terminators handed to the default-value scanner.
    pub default_terminators: &'static [&'static str],
    /// Words that mark an identity / auto-increment column.
    pub identity_markers: &'static [&'static str],
    /// Post-processing for the scanned default expression.
    pub clean_default: fn(&str) -> String,
}

/// A top-level entry of a table body.
pub(crate) enum Item<'t> {
    /// A column definition: name token first.
    Column(&'t [Token]),
    /// A key, index or constraint definition.
    Constraint(&'t [Token]),
}

/// Classifies one comma-separated entry of a table body.
pub(crate) fn classify(item: &[Token]) -> Item<'_> {
    let first = &item[0];
    if first.is_quoted() {
        return Item::Column(item);
    }
    let TokenKind::Word(word) = &first.kind else {
        return Item::Constraint(item);
    };

    let second = item.get(1);
    let next_is = |w: &str| second.is_some_and(|t| t.is_word(w));
    let next_opens =
        second.is_some_and(|t| t.kind == TokenKind::LeftParen || t.is_quoted());

    let constraint = match word.to_ascii_uppercase().as_str() {
        "CONSTRAINT" | "NOT" => true,
        "PRIMARY" | "FOREIGN" => next_is("KEY"),
        "UNIQUE" => next_is("KEY") || next_is("INDEX") || next_is("NULLS") || next_opens,
        "CHECK" | "EXCLUDE" => next_opens || next_is("USING"),
        "CLUSTER" => next_is("PRIMARY") || next_is("UNIQUE") || next_is("KEY"),
        "KEY" | "INDEX" | "FULLTEXT" | "SPATIAL" => {
            next_opens
                || next_is("KEY")
                || next_is("INDEX")
                || find_words(item, &["TYPE"]).is_some()
        }
        "PROJECTION" => second.is_some_and(|t| matches!(t.kind, TokenKind::Word(_))),
        _ => false,
    };

    if constraint {
        Item::Constraint(item)
    } else {
        Item::Column(item)
    }
}

/// Returns the body items of `tokens`, classified.
pub(crate) fn items(tokens: &[Token]) -> Vec<Item<'_>> {
    split_items(table_body(tokens))
        .into_iter()
        .map(classify)
        .collect()
}

/// Extracts raw columns using a dialect's syntax. Names seen twice keep
/// their first definition.
pub(crate) fn extract_with(ddl: &str, syntax: &ColumnSyntax) -> Vec<RawColumn> {
    let tokens = tokenize(ddl);
    let mut seen = IndexSet::new();
    let mut columns = Vec::new();

    for item in items(&tokens) {
        let Item::Column(item) = item else { continue };
        let Some(name) = item[0].ident() else { continue };
        if !seen.insert(name.to_string()) {
            warn!(column = name, "duplicate column definition ignored");
            continue;
        }
        columns.push(column_from_item(ddl, item, syntax));
    }
    columns
}

fn column_from_item(ddl: &str, item: &[Token], syntax: &ColumnSyntax) -> RawColumn {
    let name = item[0].ident().unwrap_or_default().to_string();
    let rest = &item[1..];

    let type_end = syntax
        .type_stops
        .iter()
        .filter_map(|stop| find_words(rest, stop))
        .min()
        .unwrap_or(rest.len());
    let type_text = if type_end == 0 {
        String::new()
    } else {
        ddl[rest[0].span.start..rest[type_end - 1].span.end]
            .trim()
            .to_string()
    };

    let default_text = match (default_keyword(rest), rest.last()) {
        (Some(at), Some(last)) => {
            let fragment = &ddl[rest[at].span.end..last.span.end];
            let scan = scan_default(fragment, syntax.default_terminators);
            (syntax.clean_default)(scan.expr)
        }
        _ => String::new(),
    };

    let identity = syntax
        .identity_markers
        .iter()
        .any(|marker| find_words(rest, &[*marker]).is_some())
        || find_words(rest, &["PRIMARY", "KEY"]).is_some();

    RawColumn {
        name,
        type_text,
        default_text,
        not_null: find_words(rest, &["NOT", "NULL"]).is_some(),
        identity,
        unique: find_words(rest, &["UNIQUE"]).is_some(),
    }
}

/// Finds the `DEFAULT` that opens a column default. `BY DEFAULT` in
/// identity generation and `SET DEFAULT` in foreign-key actions are not
/// defaults.
fn default_keyword(rest: &[Token]) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = find_words(&rest[from..], &["DEFAULT"]) {
        let at = from + found;
        let after_keyword = at
            .checked_sub(1)
            .is_some_and(|prev| rest[prev].is_word("BY") || rest[prev].is_word("SET"));
        if !after_keyword {
            return Some(at);
        }
        from = at + 1;
    }
    None
}

/// Removes the quotes of a default that is exactly one string literal.
pub(crate) fn unquote_literal(expr: &str) -> String {
    let tokens = tokenize(expr);
    let single_literal = expr.len() >= 2
        && tokens.len() == 2
        && tokens[0].kind == TokenKind::String
        && tokens[0].span.end == expr.len()
        && expr.ends_with('\'');
    if !single_literal {
        return expr.to_string();
    }
    let inner = &expr[1..expr.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek().copied()) {
            ('\'', Some('\'')) | ('\\', Some('\'' | '\\')) => {
                out.extend(chars.next());
            }
            _ => out.push(c),
        }
    }
    out
}

/// Extracts raw column tuples for a text dialect.
///
/// Returns `None` for [`DialectKind::Generic`], which has no text form.
#[must_use]
pub fn extract(kind: DialectKind, ddl: &str) -> Option<Vec<RawColumn>> {
    match kind {
        DialectKind::MySql => Some(mysql::extract(ddl)),
        DialectKind::Postgres => Some(postgres::extract(ddl)),
        DialectKind::Oracle => Some(oracle::extract(ddl)),
        DialectKind::Generic => None,
    }
}

/// Parses the columns of `table` from its DDL text.
///
/// A DDL text with no column definitions yields an empty list. Use
/// [`has_column_section`] to tell an empty table from unusable text.
///
/// # Errors
///
/// Returns [`Error::UnsupportedDialect`] for [`DialectKind::Generic`].
pub fn parse_columns(kind: DialectKind, table: &str, ddl: &str) -> Result<Vec<ColumnInfo>> {
    let raw = extract(kind, ddl).ok_or_else(|| Error::UnsupportedDialect {
        table: table.to_string(),
        dialect: kind,
    })?;
    let keys = resolve_keys(ddl);
    let columns = normalize(raw, &keys);

    if columns.is_empty() && !ddl.trim().is_empty() {
        warn!(table, dialect = %kind, "no column definitions found in DDL");
    }
    debug!(
        table,
        dialect = %kind,
        columns = columns.len(),
        primary_key = ?keys.primary,
        "parsed table columns"
    );
    Ok(columns)
}

/// Returns true if `ddl` contains a column section at all: a bare column
/// list, or a `CREATE` statement with a parenthesized body.
#[must_use]
pub fn has_column_section(ddl: &str) -> bool {
    let tokens = tokenize(ddl);
    !table_body(&tokens).is_empty()
}
