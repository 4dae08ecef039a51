//! Offset and keyset page planning.
//!
//! Planning is pure: each function turns a page request into a
//! [`SelectQuery`] and, for keyset pages, turns the fetched rows back into
//! a page with cursors. Executing the query is the connection's job.
//!
//! Keyset pages are ordered by the primary key ascending. A backward page
//! is fetched descending and reversed, so every page a caller sees is
//! ascending.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::FilterGroup;
use crate::query::{KeysetOp, SelectQuery, SortOrder};
use crate::value::{Row, SqlValue};

/// Keyset paging direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Rows after the cursor.
    #[default]
    Next,
    /// Rows before the cursor.
    Prev,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => write!(f, "NEXT"),
            Self::Prev => write!(f, "PREV"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NEXT" => Ok(Self::Next),
            "PREV" | "PREVIOUS" => Ok(Self::Prev),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// Position in a keyset-paged table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Primary-key column the cursor refers to.
    pub primary_key_column: String,
    /// Key value to continue from. Absent means the first page.
    #[serde(default)]
    pub last_value: Option<SqlValue>,
    /// Paging direction.
    #[serde(default)]
    pub direction: Direction,
}

impl PageCursor {
    /// Cursor for the first page.
    #[must_use]
    pub fn first(primary_key_column: impl Into<String>) -> Self {
        Self {
            primary_key_column: primary_key_column.into(),
            last_value: None,
            direction: Direction::Next,
        }
    }

    /// Cursor for the page after `value`.
    #[must_use]
    pub fn next(primary_key_column: impl Into<String>, value: SqlValue) -> Self {
        Self {
            primary_key_column: primary_key_column.into(),
            last_value: Some(value),
            direction: Direction::Next,
        }
    }

    /// Cursor for the page before `value`.
    #[must_use]
    pub fn prev(primary_key_column: impl Into<String>, value: SqlValue) -> Self {
        Self {
            primary_key_column: primary_key_column.into(),
            last_value: Some(value),
            direction: Direction::Prev,
        }
    }

    /// Returns the cursor value. A `Null` value counts as absent.
    #[must_use]
    pub fn value(&self) -> Option<&SqlValue> {
        self.last_value.as_ref().filter(|v| !v.is_null())
    }
}

/// Validates a page number and resolves the effective page size.
///
/// A missing size falls back to `default_size`; sizes above `max_size`
/// are clamped.
///
/// # Errors
///
/// Returns [`Error::InvalidPage`] for page 0 and [`Error::InvalidPageSize`]
/// if the resolved size is 0.
pub fn resolve_window(page: u64, size: Option<u64>, default_size: u64, max_size: u64) -> Result<u64> {
    if page == 0 {
        return Err(Error::InvalidPage { page });
    }
    resolve_size(size, default_size, max_size)
}

/// Resolves the effective page size, see [`resolve_window`].
///
/// # Errors
///
/// Returns [`Error::InvalidPageSize`] if the resolved size is 0.
pub fn resolve_size(size: Option<u64>, default_size: u64, max_size: u64) -> Result<u64> {
    let size = size.unwrap_or(default_size);
    if size == 0 {
        return Err(Error::InvalidPageSize { size });
    }
    Ok(size.min(max_size.max(1)))
}

/// Rows skipped before `page`.
const fn skip_rows(page: u64, size: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(size)
}

/// Plans an offset page.
///
/// Pages are ordered by the primary key when the table has one, so that
/// the window is stable between requests.
#[must_use]
pub fn plan_offset_page(
    table: &str,
    primary_key: Option<&str>,
    page: u64,
    size: u64,
    filter: Option<&FilterGroup>,
) -> SelectQuery {
    let mut query = SelectQuery::new(table, size)
        .filter(filter)
        .offset(skip_rows(page, size));
    if let Some(pk) = primary_key {
        query = query.order_by(pk, SortOrder::Asc);
    }
    query
}

/// Plans a keyset page.
///
/// # Errors
///
/// Returns [`Error::MissingCursor`] for a backward page without a value.
pub fn plan_keyset_page(
    table: &str,
    cursor: &PageCursor,
    size: u64,
    filter: Option<&FilterGroup>,
) -> Result<SelectQuery> {
    let pk = cursor.primary_key_column.as_str();
    let query = SelectQuery::new(table, size).filter(filter);

    let query = match (cursor.direction, cursor.value()) {
        (Direction::Next, None) => query.order_by(pk, SortOrder::Asc),
        (Direction::Next, Some(v)) => query
            .keyset(pk, KeysetOp::After, v.clone())
            .order_by(pk, SortOrder::Asc),
        (Direction::Prev, Some(v)) => query
            .keyset(pk, KeysetOp::Before, v.clone())
            .order_by(pk, SortOrder::Desc),
        (Direction::Prev, None) => {
            return Err(Error::MissingCursor {
                table: table.to_string(),
            })
        }
    };
    Ok(query)
}

/// Plans the one-row lookup that finds the cursor for `page`.
///
/// Returns `None` for page 1, which starts without a cursor.
#[must_use]
pub fn plan_page_seek(table: &str, primary_key: &str, page: u64, size: u64) -> Option<SelectQuery> {
    if page <= 1 {
        return None;
    }
    Some(
        SelectQuery::new(table, 1)
            .order_by(primary_key, SortOrder::Asc)
            .offset(skip_rows(page, size).saturating_sub(1)),
    )
}

/// Rows of one keyset page with the cursors around it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetWindow {
    /// Rows in ascending key order.
    pub rows: Vec<Row>,
    /// Key of the last row: continue with `NEXT`.
    pub next_cursor: Option<SqlValue>,
    /// Key of the first row: continue with `PREV`.
    pub prev_cursor: Option<SqlValue>,
}

/// Puts fetched keyset rows in ascending order and extracts the cursors.
#[must_use]
pub fn finish_keyset_page(direction: Direction, primary_key: &str, mut rows: Vec<Row>) -> KeysetWindow {
    if direction == Direction::Prev {
        rows.reverse();
    }
    let key_of = |row: Option<&Row>| {
        row.and_then(|r| r.get(primary_key))
            .filter(|v| !v.is_null())
            .cloned()
    };
    KeysetWindow {
        next_cursor: key_of(rows.last()),
        prev_cursor: key_of(rows.first()),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::MySqlDialect;

    fn sql(query: &SelectQuery) -> String {
        query.to_sql(&MySqlDialect::new()).unwrap().0
    }

    fn ids(range: std::ops::RangeInclusive<i64>) -> Vec<Row> {
        range
            .map(|i| Row::from_iter([("id".to_string(), SqlValue::Int(i))]))
            .collect()
    }

    #[test]
    fn test_first_page() {
        let q = plan_keyset_page("t", &PageCursor::first("id"), 10, None).unwrap();
        assert_eq!(sql(&q), "SELECT * FROM `t` ORDER BY `id` ASC LIMIT 10");
    }

    #[test]
    fn test_null_value_is_first_page() {
        let cursor = PageCursor::next("id", SqlValue::Null);
        let q = plan_keyset_page("t", &cursor, 10, None).unwrap();
        assert!(q.keyset.is_none());
    }

    #[test]
    fn test_prev_is_strict_and_descending() {
        let q = plan_keyset_page("t", &PageCursor::prev("id", SqlValue::Int(20)), 10, None).unwrap();
        assert_eq!(
            sql(&q),
            "SELECT * FROM `t` WHERE `id` < ? ORDER BY `id` DESC LIMIT 10"
        );
    }

    #[test]
    fn test_prev_without_cursor() {
        let cursor = PageCursor {
            primary_key_column: "id".into(),
            last_value: None,
            direction: Direction::Prev,
        };
        assert!(matches!(
            plan_keyset_page("t", &cursor, 10, None),
            Err(Error::MissingCursor { .. })
        ));
    }

    #[test]
    fn test_seek_offsets() {
        assert!(plan_page_seek("t", "id", 1, 10).is_none());
        let q = plan_page_seek("t", "id", 3, 10).unwrap();
        assert_eq!(sql(&q), "SELECT * FROM `t` ORDER BY `id` ASC LIMIT 1 OFFSET 19");
    }

    #[test]
    fn test_offset_page() {
        let q = plan_offset_page("t", Some("id"), 3, 10, None);
        assert_eq!(sql(&q), "SELECT * FROM `t` ORDER BY `id` ASC LIMIT 10 OFFSET 20");
        let q = plan_offset_page("t", None, 1, 10, None);
        assert_eq!(sql(&q), "SELECT * FROM `t` LIMIT 10");
    }

    #[test]
    fn test_window_validation() {
        assert!(matches!(resolve_window(0, None, 20, 100), Err(Error::InvalidPage { page: 0 })));
        assert!(matches!(
            resolve_window(1, Some(0), 20, 100),
            Err(Error::InvalidPageSize { size: 0 })
        ));
        assert_eq!(resolve_window(1, None, 20, 100).unwrap(), 20);
        assert_eq!(resolve_window(1, Some(5000), 20, 100).unwrap(), 100);
    }

    #[test]
    fn test_finish_prev_page_reverses_rows() {
        let mut fetched = ids(10..=19);
        fetched.reverse();
        let window = finish_keyset_page(Direction::Prev, "id", fetched);
        assert_eq!(window.rows[0]["id"], SqlValue::Int(10));
        assert_eq!(window.prev_cursor, Some(SqlValue::Int(10)));
        assert_eq!(window.next_cursor, Some(SqlValue::Int(19)));
    }

    #[test]
    fn test_finish_empty_page() {
        let window = finish_keyset_page(Direction::Next, "id", Vec::new());
        assert!(window.next_cursor.is_none());
        assert!(window.prev_cursor.is_none());
    }

    #[test]
    fn test_cursor_serde() {
        let cursor: PageCursor =
            serde_json::from_str(r#"{"primary_key_column":"id","last_value":20,"direction":"PREV"}"#)
                .unwrap();
        assert_eq!(cursor, PageCursor::prev("id", SqlValue::Int(20)));
    }
}
