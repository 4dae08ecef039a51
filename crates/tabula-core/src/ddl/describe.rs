//! Normalization of `DESCRIBE` / `SHOW COLUMNS` result rows.
//!
//! MySQL-family engines can report columns as rows instead of DDL text.
//! Those rows already carry nullability and key flags; they only need to
//! be mapped onto [`ColumnInfo`].

use serde::{Deserialize, Serialize};

use crate::column::{ColumnInfo, ColumnKey};
use crate::value::{Row, SqlValue};

/// One row of `DESCRIBE table`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeRow {
    /// Column name.
    pub field: String,
    /// Column type as printed by the engine.
    #[serde(rename = "Type")]
    pub data_type: String,
    /// `YES` if the column is nullable.
    pub null: String,
    /// `PRI`, `UNI`, `MUL` or empty.
    pub key: String,
    /// Default value, unquoted. `None` when the engine prints NULL.
    pub default: Option<String>,
    /// Extra attributes such as `auto_increment`.
    pub extra: String,
}

impl DescribeRow {
    /// Reads a describe row from a generic result row. Column names are
    /// matched case-insensitively; missing cells read as empty.
    #[must_use]
    pub fn from_row(row: &Row) -> Self {
        let cell = |name: &str| {
            row.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        };
        let text = |name: &str| match cell(name) {
            Some(SqlValue::Null) | None => String::new(),
            Some(v) => v.to_string(),
        };
        Self {
            field: text("Field"),
            data_type: text("Type"),
            null: text("Null"),
            key: text("Key"),
            default: match cell("Default") {
                Some(SqlValue::Null) | None => None,
                Some(v) => Some(v.to_string()),
            },
            extra: text("Extra"),
        }
    }

    fn column_key(&self) -> ColumnKey {
        if self.key.eq_ignore_ascii_case("PRI")
            || self.extra.to_ascii_lowercase().contains("auto_increment")
        {
            ColumnKey::Primary
        } else if self.key.eq_ignore_ascii_case("UNI") {
            ColumnKey::Unique
        } else {
            ColumnKey::None
        }
    }
}

impl From<DescribeRow> for ColumnInfo {
    fn from(row: DescribeRow) -> Self {
        let key = row.column_key();
        let default_value = match row.default {
            Some(d) if !d.eq_ignore_ascii_case("NULL") => d,
            _ => String::new(),
        };
        Self {
            name: row.field,
            data_type: row.data_type,
            nullable: row.null.eq_ignore_ascii_case("YES"),
            default_value,
            key,
        }
    }
}

/// Maps describe rows to columns, in row order.
#[must_use]
pub fn from_describe_rows(rows: &[Row]) -> Vec<ColumnInfo> {
    rows.iter()
        .map(DescribeRow::from_row)
        .filter(|r| !r.field.is_empty())
        .map(ColumnInfo::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, SqlValue)]) -> Row {
        cells
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_describe_rows() {
        let rows = vec![
            row(&[
                ("Field", "id".into()),
                ("Type", "int".into()),
                ("Null", "NO".into()),
                ("Key", "PRI".into()),
                ("Default", SqlValue::Null),
                ("Extra", "auto_increment".into()),
            ]),
            row(&[
                ("field", "email".into()),
                ("type", "varchar(255)".into()),
                ("null", "YES".into()),
                ("key", "UNI".into()),
                ("default", "none@example.com".into()),
                ("extra", "".into()),
            ]),
        ];
        let cols = from_describe_rows(&rows);
        assert_eq!(
            cols[0],
            ColumnInfo::new("id", "int")
                .not_null()
                .key(ColumnKey::Primary)
        );
        assert_eq!(cols[1].key, ColumnKey::Unique);
        assert!(cols[1].nullable);
        assert_eq!(cols[1].default_value, "none@example.com");
    }

    #[test]
    fn test_deserialize_describe_row() {
        let json = r#"{"Field":"a","Type":"text","Null":"YES","Key":"","Default":null,"Extra":""}"#;
        let row: DescribeRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.data_type, "text");
        assert_eq!(row.default, None);
    }
}
