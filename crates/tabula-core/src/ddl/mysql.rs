//! MySQL-family extractor: MySQL, MariaDB and ClickHouse `SHOW CREATE TABLE`.

use super::{extract_with, unquote_literal, ColumnSyntax};
use crate::column::RawColumn;

const SYNTAX: ColumnSyntax = ColumnSyntax {
    type_stops: &[
        &["NOT", "NULL"],
        &["NULL"],
        &["DEFAULT"],
        &["AUTO_INCREMENT"],
        &["COMMENT"],
        &["CHARACTER", "SET"],
        &["CHARSET"],
        &["COLLATE"],
        &["ON", "UPDATE"],
        &["GENERATED"],
        &["PRIMARY", "KEY"],
        &["UNIQUE"],
        &["INVISIBLE"],
        &["VISIBLE"],
        &["CODEC"],
        &["TTL"],
        &["MATERIALIZED"],
        &["ALIAS"],
        &["EPHEMERAL"],
    ],
    default_terminators: &[
        "NOT NULL",
        "NULL",
        "COMMENT",
        "ON UPDATE",
        "AUTO_INCREMENT",
        "COLLATE",
        "CHARACTER SET",
        "PRIMARY KEY",
        "UNIQUE",
        "INVISIBLE",
        "VISIBLE",
        "CODEC",
        "TTL",
    ],
    identity_markers: &["AUTO_INCREMENT"],
    clean_default: unquote_literal,
};

pub(super) fn extract(ddl: &str) -> Vec<RawColumn> {
    extract_with(ddl, &SYNTAX)
}
