//! Structured row queries and their per-dialect rendering.
//!
//! The pagination planners produce [`SelectQuery`] and [`CountQuery`]
//! values rather than SQL text. SQL backends render them with
//! [`SelectQuery::to_sql`]; backends without SQL evaluate them directly
//! over rows with [`SelectQuery::apply`].

use std::cmp::Ordering;

use crate::dialect::{Dialect, PlaceholderStyle};
use crate::error::Result;
use crate::filter::FilterGroup;
use crate::value::{Row, SqlValue};

/// Collects bound arguments while a statement is rendered.
///
/// Placeholders are numbered across the whole statement.
pub struct Binder<'d> {
    dialect: &'d dyn Dialect,
    args: Vec<SqlValue>,
}

impl<'d> Binder<'d> {
    /// Creates a binder for `dialect`.
    #[must_use]
    pub const fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            args: Vec::new(),
        }
    }

    /// Binds `value` and returns its placeholder text.
    pub fn bind(&mut self, value: SqlValue) -> String {
        match self.dialect.placeholder_style() {
            PlaceholderStyle::Question => {
                self.args.push(value);
                String::from("?")
            }
            PlaceholderStyle::Dollar => {
                self.args.push(value);
                format!("${}", self.args.len())
            }
            PlaceholderStyle::Inline => value.to_sql_inline(),
        }
    }

    /// Quotes an identifier for the dialect.
    #[must_use]
    pub fn quote(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    /// Returns the dialect's `LIKE` wildcard.
    #[must_use]
    pub fn like_wildcard(&self) -> char {
        self.dialect.like_wildcard()
    }

    /// Returns the collected arguments.
    #[must_use]
    pub fn into_args(self) -> Vec<SqlValue> {
        self.args
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Which side of the bound value a keyset page lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeysetOp {
    /// `column > value`
    After,
    /// `column < value`
    Before,
}

impl KeysetOp {
    /// Returns the SQL comparison operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::After => ">",
            Self::Before => "<",
        }
    }
}

/// The primary-key predicate of a keyset page.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetBound {
    /// Primary-key column.
    pub column: String,
    /// Comparison side.
    pub op: KeysetOp,
    /// Cursor value.
    pub value: SqlValue,
}

/// A single-column ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to sort by.
    pub column: String,
    /// Direction.
    pub order: SortOrder,
}

/// A `SELECT *` over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Schema or database qualifier.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// User filter, never empty when present.
    pub filter: Option<FilterGroup>,
    /// Keyset predicate, AND-ed with the filter.
    pub keyset: Option<KeysetBound>,
    /// Row order.
    pub order_by: Option<OrderBy>,
    /// Maximum number of rows.
    pub limit: u64,
    /// Rows to skip.
    pub offset: u64,
}

impl SelectQuery {
    /// Creates an unfiltered, unordered query with a limit.
    #[must_use]
    pub fn new(table: impl Into<String>, limit: u64) -> Self {
        Self {
            schema: None,
            table: table.into(),
            filter: None,
            keyset: None,
            order_by: None,
            limit,
            offset: 0,
        }
    }

    /// Sets the schema qualifier.
    #[must_use]
    pub fn schema(mut self, schema: Option<String>) -> Self {
        self.schema = schema;
        self
    }

    /// Sets the filter. Empty groups are dropped.
    #[must_use]
    pub fn filter(mut self, filter: Option<&FilterGroup>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty()).cloned();
        self
    }

    /// Sets the keyset predicate.
    #[must_use]
    pub fn keyset(mut self, column: &str, op: KeysetOp, value: SqlValue) -> Self {
        self.keyset = Some(KeysetBound {
            column: column.to_string(),
            op,
            value,
        });
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub fn order_by(mut self, column: &str, order: SortOrder) -> Self {
        self.order_by = Some(OrderBy {
            column: column.to_string(),
            order,
        });
        self
    }

    /// Sets the number of rows to skip.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Renders the statement and its arguments for `dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidFilter`] if the filter is malformed.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        let mut binder = Binder::new(dialect);
        let mut sql = format!(
            "SELECT * FROM {}",
            qualified(&binder, self.schema.as_deref(), &self.table)
        );

        let mut predicates = Vec::new();
        if let Some(filter) = &self.filter {
            if let Some(clause) = filter.render(&mut binder)? {
                if self.keyset.is_some() {
                    predicates.push(format!("({clause})"));
                } else {
                    predicates.push(clause);
                }
            }
        }
        if let Some(bound) = &self.keyset {
            let column = binder.quote(&bound.column);
            let placeholder = binder.bind(bound.value.clone());
            predicates.push(format!("{column} {} {placeholder}", bound.op.as_str()));
        }
        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }

        match &self.order_by {
            Some(order) => {
                sql.push_str(&format!(
                    " ORDER BY {} {}",
                    binder.quote(&order.column),
                    order.order.as_str()
                ));
            }
            None if dialect.window_requires_order() => sql.push_str(" ORDER BY (SELECT NULL)"),
            None => {}
        }

        sql.push(' ');
        sql.push_str(&dialect.limit_clause(self.limit, Some(self.offset)));
        Ok((sql, binder.into_args()))
    }

    /// Evaluates the query over in-memory rows.
    #[must_use]
    pub fn apply(&self, rows: &[Row]) -> Vec<Row> {
        let mut selected: Vec<Row> = rows
            .iter()
            .filter(|row| self.filter.as_ref().is_none_or(|f| f.matches(row)))
            .filter(|row| {
                self.keyset.as_ref().is_none_or(|bound| {
                    let cell = row.get(&bound.column).unwrap_or(&SqlValue::Null);
                    let wanted = match bound.op {
                        KeysetOp::After => Ordering::Greater,
                        KeysetOp::Before => Ordering::Less,
                    };
                    cell.compare(&bound.value) == Some(wanted)
                })
            })
            .cloned()
            .collect();

        if let Some(order) = &self.order_by {
            selected.sort_by(|a, b| {
                let x = a.get(&order.column).unwrap_or(&SqlValue::Null);
                let y = b.get(&order.column).unwrap_or(&SqlValue::Null);
                let ord = x.compare(y).unwrap_or(Ordering::Equal);
                match order.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        selected
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect()
    }
}

/// A filtered `SELECT COUNT(*)` over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct CountQuery {
    /// Schema or database qualifier.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
    /// User filter, never empty when present.
    pub filter: Option<FilterGroup>,
}

impl CountQuery {
    /// Creates a count over `table`. Empty filters are dropped.
    #[must_use]
    pub fn new(schema: Option<String>, table: impl Into<String>, filter: Option<&FilterGroup>) -> Self {
        Self {
            schema,
            table: table.into(),
            filter: filter.filter(|f| !f.is_empty()).cloned(),
        }
    }

    /// Renders the statement and its arguments for `dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidFilter`] if the filter is malformed.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        let mut binder = Binder::new(dialect);
        let mut sql = format!(
            "SELECT COUNT(*) FROM {}",
            qualified(&binder, self.schema.as_deref(), &self.table)
        );
        if let Some(filter) = &self.filter {
            if let Some(clause) = filter.render(&mut binder)? {
                sql.push_str(" WHERE ");
                sql.push_str(&clause);
            }
        }
        Ok((sql, binder.into_args()))
    }

    /// Counts matching in-memory rows.
    #[must_use]
    pub fn apply(&self, rows: &[Row]) -> u64 {
        let n = rows
            .iter()
            .filter(|row| self.filter.as_ref().is_none_or(|f| f.matches(row)))
            .count();
        u64::try_from(n).unwrap_or(u64::MAX)
    }
}

fn qualified(binder: &Binder<'_>, schema: Option<&str>, table: &str) -> String {
    schema.map_or_else(
        || binder.quote(table),
        |schema| format!("{}.{}", binder.quote(schema), binder.quote(table)),
    )
}
