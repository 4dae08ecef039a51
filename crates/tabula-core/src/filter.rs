//! Filter groups and their compilation to parameterized predicates.
//!
//! A [`FilterGroup`] is the user-facing filter model: conditions and nested
//! groups joined by one logic operator. It compiles to a WHERE clause body
//! plus bound arguments for any [`Dialect`], and can also be evaluated
//! against in-memory rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::query::Binder;
use crate::value::{Row, SqlValue, ToSqlValue};

/// Filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equal (=)
    #[serde(rename = "=")]
    Eq,
    /// Not equal (!=)
    #[serde(rename = "!=")]
    Ne,
    /// Greater than (>)
    #[serde(rename = ">")]
    Gt,
    /// Greater than or equal (>=)
    #[serde(rename = ">=")]
    Gte,
    /// Less than (<)
    #[serde(rename = "<")]
    Lt,
    /// Less than or equal (<=)
    #[serde(rename = "<=")]
    Lte,
    /// Substring match (LIKE)
    #[serde(rename = "LIKE", alias = "like")]
    Like,
    /// IS NULL
    #[serde(rename = "IS NULL", alias = "is null")]
    IsNull,
    /// IS NOT NULL
    #[serde(rename = "IS NOT NULL", alias = "is not null")]
    IsNotNull,
}

impl FilterOperator {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }

    /// Returns true for operators that take no value.
    #[must_use]
    pub const fn is_null_check(self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "=" | "==" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::Ne),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Gte),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Lte),
            "LIKE" => Ok(Self::Like),
            "IS NULL" => Ok(Self::IsNull),
            "IS NOT NULL" => Ok(Self::IsNotNull),
            _ => Err(Error::InvalidFilter(format!("unknown operator '{s}'"))),
        }
    }
}

/// How the members of a group are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterLogic {
    /// All members must hold.
    #[default]
    And,
    /// Any member must hold.
    Or,
}

impl FilterLogic {
    const fn separator(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// One `field op value` condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Column name.
    pub field: String,
    /// Operator.
    pub operator: FilterOperator,
    /// Comparison value; ignored by null checks.
    #[serde(default)]
    pub value: SqlValue,
}

impl FilterCondition {
    /// Creates a condition.
    #[must_use]
    pub fn new<V: ToSqlValue>(field: &str, operator: FilterOperator, value: V) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: value.to_sql_value(),
        }
    }

    /// Creates an `IS NULL` condition.
    #[must_use]
    pub fn is_null(field: &str) -> Self {
        Self::new(field, FilterOperator::IsNull, SqlValue::Null)
    }

    /// Creates an `IS NOT NULL` condition.
    #[must_use]
    pub fn is_not_null(field: &str) -> Self {
        Self::new(field, FilterOperator::IsNotNull, SqlValue::Null)
    }

    fn validate(&self) -> Result<()> {
        if self.field.trim().is_empty() {
            return Err(Error::InvalidFilter(String::from("empty field name")));
        }
        if !self.operator.is_null_check() && self.value.is_null() {
            return Err(Error::InvalidFilter(format!(
                "'{}' {} NULL: use IS NULL / IS NOT NULL",
                self.field, self.operator
            )));
        }
        Ok(())
    }

    fn render(&self, binder: &mut Binder<'_>) -> Result<String> {
        self.validate()?;
        let column = binder.quote(&self.field);
        let sql = match self.operator {
            FilterOperator::IsNull | FilterOperator::IsNotNull => {
                format!("{column} {}", self.operator)
            }
            FilterOperator::Like => {
                let w = binder.like_wildcard();
                let pattern = SqlValue::Text(format!("{w}{}{w}", self.value));
                format!("{column} LIKE {}", binder.bind(pattern))
            }
            op => {
                let placeholder = binder.bind(self.value.clone());
                format!("{column} {op} {placeholder}")
            }
        };
        Ok(sql)
    }

    /// Evaluates the condition against a row. Missing fields read as NULL.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(&self.field).unwrap_or(&SqlValue::Null);
        let ord = || cell.compare(&self.value);
        match self.operator {
            FilterOperator::IsNull => cell.is_null(),
            FilterOperator::IsNotNull => !cell.is_null(),
            FilterOperator::Like => {
                !cell.is_null() && cell.to_string().contains(&self.value.to_string())
            }
            FilterOperator::Eq => ord().is_some_and(std::cmp::Ordering::is_eq),
            FilterOperator::Ne => ord().is_some_and(std::cmp::Ordering::is_ne),
            FilterOperator::Gt => ord().is_some_and(std::cmp::Ordering::is_gt),
            FilterOperator::Gte => ord().is_some_and(std::cmp::Ordering::is_ge),
            FilterOperator::Lt => ord().is_some_and(std::cmp::Ordering::is_lt),
            FilterOperator::Lte => ord().is_some_and(std::cmp::Ordering::is_le),
        }
    }
}

/// Conditions and nested groups joined by one logic operator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Join operator.
    #[serde(default)]
    pub logic: FilterLogic,
    /// Leaf conditions.
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
    /// Nested groups, rendered in parentheses.
    #[serde(default)]
    pub groups: Vec<FilterGroup>,
}

/// A compiled WHERE clause body and its arguments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledFilter {
    /// Predicate text, empty when there is nothing to filter.
    pub clause: String,
    /// Bound arguments, in placeholder order.
    pub args: Vec<SqlValue>,
}

impl CompiledFilter {
    /// Returns true if the filter has no predicate.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }
}

impl FilterGroup {
    /// Creates an empty AND group.
    #[must_use]
    pub fn and() -> Self {
        Self::default()
    }

    /// Creates an empty OR group.
    #[must_use]
    pub fn or() -> Self {
        Self {
            logic: FilterLogic::Or,
            ..Self::default()
        }
    }

    /// Adds a condition.
    #[must_use]
    pub fn with_condition(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Adds a nested group.
    #[must_use]
    pub fn with_group(mut self, group: Self) -> Self {
        self.groups.push(group);
        self
    }

    /// Returns true if the group filters nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.groups.iter().all(Self::is_empty)
    }

    /// Compiles the group for `dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilter`] for an empty field name or a
    /// comparison against NULL.
    pub fn compile(&self, dialect: &dyn Dialect) -> Result<CompiledFilter> {
        let mut binder = Binder::new(dialect);
        let clause = self.render(&mut binder)?.unwrap_or_default();
        Ok(CompiledFilter {
            clause,
            args: binder.into_args(),
        })
    }

    /// Renders the group through a shared binder so placeholder numbering
    /// continues across the statement. Returns `None` for empty groups.
    pub(crate) fn render(&self, binder: &mut Binder<'_>) -> Result<Option<String>> {
        let mut parts = Vec::with_capacity(self.conditions.len() + self.groups.len());
        for condition in &self.conditions {
            parts.push(condition.render(binder)?);
        }
        for group in &self.groups {
            if let Some(nested) = group.render(binder)? {
                parts.push(format!("({nested})"));
            }
        }
        if parts.is_empty() {
            return Ok(None);
        }
        Ok(Some(parts.join(self.logic.separator())))
    }

    /// Evaluates the group against a row. Empty groups match everything.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        if self.is_empty() {
            return true;
        }
        let mut results = self
            .conditions
            .iter()
            .map(|c| c.matches(row))
            .chain(
                self.groups
                    .iter()
                    .filter(|g| !g.is_empty())
                    .map(|g| g.matches(row)),
            );
        match self.logic {
            FilterLogic::And => results.all(|r| r),
            FilterLogic::Or => results.any(|r| r),
        }
    }
}
