//! Key resolution from DDL text.
//!
//! Primary keys show up three ways: a table-level `PRIMARY KEY (...)`
//! clause (possibly behind `CONSTRAINT name` or `NOT CLUSTER`), an inline
//! `PRIMARY KEY` on a column, or an identity / auto-increment column.

use indexmap::IndexSet;

use super::lexer::{find_words, tokenize, Token, TokenKind};
use super::{items, Item};
use crate::column::KeySet;

const IDENTITY_MARKERS: &[&str] = &["IDENTITY", "AUTO_INCREMENT", "AUTOINCREMENT"];

/// Resolves primary-key and single-column unique sets from DDL text.
#[must_use]
pub fn resolve_keys(ddl: &str) -> KeySet {
    let tokens = tokenize(ddl);
    let mut keys = KeySet::default();

    for (i, token) in tokens.iter().enumerate() {
        if token.is_word("PRIMARY") && tokens.get(i + 1).is_some_and(|t| t.is_word("KEY")) {
            if let Some(open) = list_open(&tokens, i + 2) {
                keys.primary.extend(column_list(&tokens, open));
            }
        } else if token.is_word("UNIQUE") {
            let mut at = i + 1;
            if tokens
                .get(at)
                .is_some_and(|t| t.is_word("KEY") || t.is_word("INDEX"))
            {
                at += 1;
            }
            if tokens.get(at).is_some_and(|t| t.kind != TokenKind::LeftParen && t.ident().is_some()) {
                at += 1;
            }
            if let Some(open) = list_open(&tokens, at) {
                let cols = column_list(&tokens, open);
                if cols.len() == 1 {
                    keys.unique.extend(cols);
                }
            }
        }
    }

    for item in items(&tokens) {
        let Item::Column(item) = item else { continue };
        let Some(name) = item[0].ident() else { continue };
        let rest = &item[1..];
        let identity = IDENTITY_MARKERS
            .iter()
            .any(|marker| find_words(rest, &[*marker]).is_some());
        let inline_pk = find_words(rest, &["PRIMARY", "KEY"])
            .is_some_and(|at| list_open(rest, at + 2).is_none());
        if identity || inline_pk {
            keys.primary.insert(name.to_string());
        }
    }

    keys
}

/// Returns `at` if the token there opens a parenthesized list.
fn list_open(tokens: &[Token], at: usize) -> Option<usize> {
    tokens
        .get(at)
        .filter(|t| t.kind == TokenKind::LeftParen)
        .map(|_| at)
}

/// Collects the leading identifier of each element in the list opened at
/// `open`. Sort orders and prefix lengths are skipped.
fn column_list(tokens: &[Token], open: usize) -> IndexSet<String> {
    let mut names = IndexSet::new();
    let mut depth = 0usize;
    let mut expect_name = true;

    for token in &tokens[open..] {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            TokenKind::Comma if depth == 1 => expect_name = true,
            _ if depth == 1 && expect_name => {
                if let Some(name) = token.ident() {
                    names.insert(name.to_string());
                }
                expect_name = false;
            }
            _ => {}
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary(ddl: &str) -> Vec<String> {
        resolve_keys(ddl).primary.into_iter().collect()
    }

    #[test]
    fn test_table_level_clause() {
        assert_eq!(
            primary("id bigint NOT NULL, name text, PRIMARY KEY (id)"),
            vec!["id"]
        );
    }

    #[test]
    fn test_composite_key_with_sort_order() {
        let ddl = "CREATE TABLE t (`a` int, `b` varchar(10), PRIMARY KEY (`a` DESC, `b`(4)))";
        assert_eq!(primary(ddl), vec!["a", "b"]);
    }

    #[test]
    fn test_constraint_and_cluster_forms() {
        assert_eq!(
            primary("a int, CONSTRAINT pk_t PRIMARY KEY (a)"),
            vec!["a"]
        );
        assert_eq!(
            primary("\"ID\" INT, NOT CLUSTER PRIMARY KEY(\"ID\")"),
            vec!["ID"]
        );
    }

    #[test]
    fn test_inline_and_identity() {
        assert_eq!(primary("id INTEGER PRIMARY KEY, b int"), vec!["id"]);
        assert_eq!(primary("\"id\" BIGINT IDENTITY(1,1) NOT NULL, b int"), vec!["id"]);
        assert_eq!(primary("`id` int AUTO_INCREMENT, b int"), vec!["id"]);
    }

    #[test]
    fn test_duplicate_mentions_dedup() {
        assert_eq!(
            primary("id int PRIMARY KEY, CONSTRAINT p PRIMARY KEY (id)"),
            vec!["id"]
        );
    }

    #[test]
    fn test_no_key() {
        assert!(primary("a int, b int").is_empty());
    }

    #[test]
    fn test_single_column_unique_only() {
        let keys = resolve_keys(
            "a int, b int, c int UNIQUE, UNIQUE KEY `uk_a` (`a`), CONSTRAINT u UNIQUE (a, b)",
        );
        let unique: Vec<String> = keys.unique.into_iter().collect();
        assert_eq!(unique, vec!["a"]);
    }
}
