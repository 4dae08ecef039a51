//! The canonical column model and the normalizer that produces it.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Key membership of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnKey {
    /// Not part of a key.
    #[default]
    None,
    /// Member of the primary key.
    Primary,
    /// Sole member of a unique constraint.
    Unique,
}

impl ColumnKey {
    /// Returns the key as displayed in schema listings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Primary => "PRIMARY",
            Self::Unique => "UNIQUE",
        }
    }
}

/// Engine-independent description of one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Engine-native type spelling.
    #[serde(rename = "type")]
    pub data_type: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Raw default expression, empty if none.
    pub default_value: String,
    /// Key membership.
    pub key: ColumnKey,
}

impl ColumnInfo {
    /// Creates a nullable column without default or key.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            default_value: String::new(),
            key: ColumnKey::None,
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default expression.
    #[must_use]
    pub fn default_value(mut self, expr: impl Into<String>) -> Self {
        self.default_value = expr.into();
        self
    }

    /// Sets the key membership.
    #[must_use]
    pub const fn key(mut self, key: ColumnKey) -> Self {
        self.key = key;
        self
    }

    /// Returns true for primary-key columns.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        matches!(self.key, ColumnKey::Primary)
    }
}

/// A column definition as recovered by a dialect extractor, before key
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawColumn {
    /// Column name, unquoted.
    pub name: String,
    /// Type text with dialect adornments removed.
    pub type_text: String,
    /// Default expression, empty if none.
    pub default_text: String,
    /// A `NOT NULL` marker was present.
    pub not_null: bool,
    /// `IDENTITY`, `AUTO_INCREMENT` or an inline `PRIMARY KEY`.
    pub identity: bool,
    /// An inline `UNIQUE`.
    pub unique: bool,
}

/// Key sets resolved for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    /// Primary-key members, in first-seen order.
    pub primary: IndexSet<String>,
    /// Columns that alone form a unique constraint.
    pub unique: IndexSet<String>,
}

/// Merges extractor output with the resolved key sets.
///
/// Columns keep source order. A bare `NULL` default means no default.
#[must_use]
pub fn normalize(raw: Vec<RawColumn>, keys: &KeySet) -> Vec<ColumnInfo> {
    raw.into_iter()
        .map(|col| {
            let key = if col.identity || keys.primary.contains(&col.name) {
                ColumnKey::Primary
            } else if col.unique || keys.unique.contains(&col.name) {
                ColumnKey::Unique
            } else {
                ColumnKey::None
            };
            let default_value = if col.default_text.eq_ignore_ascii_case("NULL") {
                String::new()
            } else {
                col.default_text
            };
            ColumnInfo {
                name: col.name,
                data_type: col.type_text,
                nullable: !col.not_null,
                default_value,
                key,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawColumn {
        RawColumn {
            name: name.to_string(),
            type_text: "int".to_string(),
            ..RawColumn::default()
        }
    }

    #[test]
    fn test_key_precedence() {
        let mut keys = KeySet::default();
        keys.primary.insert("a".to_string());
        keys.unique.insert("a".to_string());
        keys.unique.insert("b".to_string());

        let mut c = raw("c");
        c.identity = true;
        let cols = normalize(vec![raw("a"), raw("b"), c, raw("d")], &keys);
        let key_of: Vec<ColumnKey> = cols.iter().map(|c| c.key).collect();
        assert_eq!(
            key_of,
            vec![
                ColumnKey::Primary,
                ColumnKey::Unique,
                ColumnKey::Primary,
                ColumnKey::None
            ]
        );
    }

    #[test]
    fn test_nullable_and_null_default() {
        let mut a = raw("a");
        a.not_null = true;
        a.default_text = "null".to_string();
        let cols = normalize(vec![a, raw("b")], &KeySet::default());
        assert!(!cols[0].nullable);
        assert_eq!(cols[0].default_value, "");
        assert!(cols[1].nullable);
    }

    #[test]
    fn test_serialized_shape() {
        let col = ColumnInfo::new("id", "bigint")
            .not_null()
            .key(ColumnKey::Primary);
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["type"], "bigint");
        assert_eq!(json["key"], "PRIMARY");
        assert_eq!(json["nullable"], false);
    }
}
