//! Conversion between SQLite rows and [`tabula_core::Row`].

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row as _, Sqlite, TypeInfo, ValueRef};
use tabula_core::{Row, SqlValue};

/// Binds a [`SqlValue`] parameter to a raw query.
pub fn bind_value<'q>(
    query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    value: SqlValue,
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
    }
}

/// Decodes a row by the storage class of each value. Blobs are surfaced as
/// lossy UTF-8 text.
pub fn decode_row(row: &SqliteRow) -> Result<Row, sqlx::Error> {
    let mut out = Row::with_capacity(row.len());
    for (i, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(i)?;
        let storage = if raw.is_null() {
            String::from("NULL")
        } else {
            raw.type_info().name().to_ascii_uppercase()
        };

        let value = match storage.as_str() {
            "NULL" => SqlValue::Null,
            "INTEGER" | "BIGINT" | "INT8" => SqlValue::Int(row.try_get_unchecked::<i64, _>(i)?),
            "BOOLEAN" => SqlValue::Bool(row.try_get_unchecked::<bool, _>(i)?),
            "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
                SqlValue::Float(row.try_get_unchecked::<f64, _>(i)?)
            }
            "BLOB" => {
                let bytes = row.try_get_unchecked::<Vec<u8>, _>(i)?;
                SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => SqlValue::Text(row.try_get_unchecked::<String, _>(i)?),
        };
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}
