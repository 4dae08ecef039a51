//! Default-value scanner.
//!
//! Recovers the expression that follows a `DEFAULT` keyword without a
//! grammar for it: the scanner only tracks parenthesis and bracket depth
//! and string quoting, and stops at the first place a column definition
//! can continue.

/// Result of scanning a default expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultScan<'a> {
    /// The expression, trimmed.
    pub expr: &'a str,
    /// Byte offset in the scanned fragment where the expression ends.
    pub end: usize,
}

/// Scans the default expression at the start of `fragment`.
///
/// `fragment` begins immediately after the `DEFAULT` keyword. The scan ends
/// at a bare comma, an unbalanced closing paren, or one of `terminators`
/// (case-insensitive word sequences such as `"NOT NULL"`) found outside
/// parentheses, brackets and strings, once at least one character of the expression
/// has been consumed. A type cast directly after a closing paren that
/// returns to depth zero is consumed and ends the scan.
#[must_use]
pub fn scan_default<'a>(fragment: &'a str, terminators: &[&str]) -> DefaultScan<'a> {
    let bytes = fragment.as_bytes();
    let start = fragment.len() - fragment.trim_start().len();
    let mut depth = 0usize;
    let mut brackets = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;

    let finish = move |end: usize| DefaultScan {
        expr: fragment[start..end].trim(),
        end,
    };

    while i < bytes.len() {
        let c = bytes[i];

        if let Some(q) = quote {
            if c == b'\\' {
                i += 2;
                continue;
            }
            if c == q {
                if bytes.get(i + 1) == Some(&q) {
                    i += 2;
                    continue;
                }
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            b'\'' | b'"' | b'`' => quote = Some(c),
            b'[' => brackets += 1,
            b']' => brackets = brackets.saturating_sub(1),
            b'(' => depth += 1,
            b')' => {
                if depth == 0 {
                    return finish(i);
                }
                depth -= 1;
                if depth == 0 && brackets == 0 {
                    let after = i + 1;
                    let next = skip_spaces(bytes, after);
                    if fragment[next..].starts_with("::") {
                        return finish(consume_cast(fragment, next, terminators));
                    }
                    if next >= bytes.len() || bytes[next] == b',' || bytes[next] == b')' {
                        return finish(after);
                    }
                }
            }
            b',' if depth == 0 && brackets == 0 => return finish(i),
            _ if depth == 0
                && brackets == 0
                && i > start
                && starts_word(bytes, i)
                && terminators
                    .iter()
                    .any(|t| terminator_len(fragment, i, t).is_some()) =>
            {
                return finish(i);
            }
            _ => {}
        }
        i += 1;
    }

    finish(fragment.len())
}

const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

const fn starts_word(bytes: &[u8], i: usize) -> bool {
    is_ident_byte(bytes[i]) && (i == 0 || !is_ident_byte(bytes[i - 1]))
}

const fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

const fn word_end(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_ident_byte(bytes[i]) {
        i += 1;
    }
    i
}

/// Returns the byte length of `terminator` if it occurs at `at` as whole
/// words separated by any whitespace.
pub(crate) fn terminator_len(text: &str, at: usize, terminator: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = at;
    for (n, word) in terminator.split_whitespace().enumerate() {
        if n > 0 {
            let next = skip_spaces(bytes, i);
            if next == i {
                return None;
            }
            i = next;
        }
        let end = i + word.len();
        if !text.get(i..end).is_some_and(|w| w.eq_ignore_ascii_case(word)) {
            return None;
        }
        if bytes.get(end).copied().is_some_and(is_ident_byte) {
            return None;
        }
        i = end;
    }
    Some(i - at)
}

/// Consumes `::type` casts starting at `at` and returns the end offset.
///
/// Multi-word type names (`character varying`) and `(n)` / `[]` suffixes
/// are part of the cast; the next terminator, comma or paren is not.
fn consume_cast(fragment: &str, at: usize, terminators: &[&str]) -> usize {
    let bytes = fragment.as_bytes();
    let mut i = at;
    let mut end = at;
    loop {
        let next = skip_spaces(bytes, i);
        if fragment[next..].starts_with("::") {
            i = skip_spaces(bytes, next + 2);
            let word = word_end(bytes, i);
            if word == i {
                return end;
            }
            i = word;
            end = i;
        } else if next < bytes.len()
            && is_ident_byte(bytes[next])
            && end > at
            && !terminators
                .iter()
                .any(|t| terminator_len(fragment, next, t).is_some())
        {
            i = word_end(bytes, next);
            end = i;
        } else if next < bytes.len() && bytes[next] == b'(' && end > at {
            let Some(close) = fragment[next..].find(')') else {
                return end;
            };
            i = next + close + 1;
            end = i;
        } else if fragment[next..].starts_with("[]") && end > at {
            i = next + 2;
            end = i;
        } else {
            return end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TERMINATORS: &[&str] = &["NOT NULL", "NULL", "PRIMARY KEY", "COMMENT"];

    fn scan(fragment: &str) -> &str {
        scan_default(fragment, TERMINATORS).expr
    }

    #[test]
    fn test_function_call_with_inner_cast() {
        let s = scan_default(" nextval('seq'::regclass), name int", TERMINATORS);
        assert_eq!(s.expr, "nextval('seq'::regclass)");
        assert_eq!(s.end, 25);
    }

    #[test]
    fn test_quoted_string_stops_at_comma() {
        assert_eq!(scan(" 'test', PRIMARY KEY (id)"), "'test'");
    }

    #[test]
    fn test_string_containing_terminators() {
        assert_eq!(scan(" 'a, NOT NULL (' NOT NULL"), "'a, NOT NULL ('");
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(scan(r" 'it\'s' COMMENT 'x'"), r"'it\'s'");
        assert_eq!(scan(" 'it''s', b"), "'it''s'");
    }

    #[test]
    fn test_bare_token_stops_at_terminator() {
        assert_eq!(scan(" 0 NOT NULL"), "0");
        assert_eq!(scan(" CURRENT_TIMESTAMP COMMENT 'created'"), "CURRENT_TIMESTAMP");
    }

    #[test]
    fn test_terminator_needs_word_boundary() {
        assert_eq!(scan(" NOT_NULLABLE_FLAG, x"), "NOT_NULLABLE_FLAG");
        assert_eq!(scan(" NULL"), "NULL");
    }

    #[test]
    fn test_closing_table_paren() {
        assert_eq!(scan(" 42\n)"), "42");
    }

    #[test]
    fn test_cast_after_paren_is_consumed() {
        assert_eq!(
            scan(" ('now'::text)::timestamp without time zone NOT NULL"),
            "('now'::text)::timestamp without time zone"
        );
        assert_eq!(scan(" (1)::numeric(10,2), x"), "(1)::numeric(10,2)");
    }

    #[test]
    fn test_parenthesized_arithmetic_continues() {
        assert_eq!(scan(" (1 + 2) * 3, x"), "(1 + 2) * 3");
    }

    #[test]
    fn test_array_constructor_is_balanced() {
        assert_eq!(
            scan(" ARRAY['a'::text, 'b'::text] NOT NULL"),
            "ARRAY['a'::text, 'b'::text]"
        );
        assert_eq!(scan(" ARRAY[(1), 2], x"), "ARRAY[(1), 2]");
        assert_eq!(scan(" '{}'::text[], x"), "'{}'::text[]");
    }

    #[test]
    fn test_multi_word_terminator_spacing() {
        assert_eq!(scan(" 5 NOT\n  NULL"), "5");
    }

    #[test]
    fn test_round_trip_ignores_trailing_terminators() {
        let exprs = ["uuid()", "'x,y'", "coalesce(a, (b))", "'('"];
        let tails = ["", ",", " NOT NULL", " PRIMARY KEY", ")"];
        for expr in exprs {
            for tail in tails {
                let fragment = format!(" {expr}{tail}");
                assert_eq!(scan(&fragment), expr, "fragment: {fragment}");
            }
        }
    }
}
