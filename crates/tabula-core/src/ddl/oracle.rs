//! Oracle-style extractor: Dameng and Kingbase dumps with `IDENTITY` columns.

use super::{extract_with, unquote_literal, ColumnSyntax};
use crate::column::RawColumn;

const SYNTAX: ColumnSyntax = ColumnSyntax {
    type_stops: &[
        &["IDENTITY"],
        &["AUTO_INCREMENT"],
        &["DEFAULT"],
        &["NOT", "NULL"],
        &["NULL"],
        &["CONSTRAINT"],
        &["PRIMARY", "KEY"],
        &["UNIQUE"],
        &["CHECK"],
        &["REFERENCES"],
        &["GENERATED"],
        &["VISIBLE"],
        &["COMMENT"],
    ],
    default_terminators: &[
        "NOT NULL",
        "NULL",
        "IDENTITY",
        "CONSTRAINT",
        "PRIMARY KEY",
        "UNIQUE",
        "CHECK",
        "REFERENCES",
        "COMMENT",
    ],
    identity_markers: &["IDENTITY", "AUTO_INCREMENT"],
    clean_default: unquote_literal,
};

pub(super) fn extract(ddl: &str) -> Vec<RawColumn> {
    extract_with(ddl, &SYNTAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_column_list() {
        let cols = extract(
            "\"id\" BIGINT IDENTITY(1,1) NOT NULL, \"name\" VARCHAR(64 CHAR) DEFAULT 'x' NOT NULL",
        );
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].name, "id");
        assert_eq!(cols[0].type_text, "BIGINT");
        assert!(cols[0].identity);
        assert!(cols[0].not_null);
        assert_eq!(cols[0].default_text, "");

        assert_eq!(cols[1].name, "name");
        assert_eq!(cols[1].type_text, "VARCHAR(64 CHAR)");
        assert_eq!(cols[1].default_text, "x");
        assert!(!cols[1].identity);
    }

    #[test]
    fn test_dameng_create_table() {
        let ddl = "CREATE TABLE \"APP\".\"ITEMS\"
(
\"ID\" INT IDENTITY(1, 1) NOT NULL,
\"CODE\" VARCHAR2(20) NOT NULL,
\"PRICE\" NUMBER(10,2) DEFAULT 0,
\"CREATED\" TIMESTAMP(6) DEFAULT SYSDATE,
NOT CLUSTER PRIMARY KEY(\"ID\"),
CONSTRAINT \"UK_CODE\" UNIQUE(\"CODE\")) STORAGE(ON \"MAIN\", CLUSTERBTR) ;";
        let cols = extract(ddl);
        let names: Vec<&str> = cols.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "CODE", "PRICE", "CREATED"]);
        assert_eq!(cols[0].type_text, "INT");
        assert_eq!(cols[2].type_text, "NUMBER(10,2)");
        assert_eq!(cols[2].default_text, "0");
        assert_eq!(cols[3].default_text, "SYSDATE");
    }

    #[test]
    fn test_generated_identity_has_no_default() {
        let cols = extract(
            "\"id\" NUMBER GENERATED BY DEFAULT AS IDENTITY NOT NULL, \
             \"seq\" NUMBER GENERATED BY DEFAULT ON NULL AS IDENTITY, \
             \"name\" VARCHAR2(20) DEFAULT 'n/a' NOT NULL",
        );
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0].type_text, "NUMBER");
        assert_eq!(cols[0].default_text, "");
        assert!(cols[0].identity);
        assert!(cols[0].not_null);
        assert_eq!(cols[1].default_text, "");
        assert!(cols[1].identity);
        assert_eq!(cols[2].default_text, "n/a");
    }
}
