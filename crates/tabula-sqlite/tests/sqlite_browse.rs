use tabula_core::{
    ColumnKey, ConnectionContext, Direction, Error, FilterCondition, FilterGroup, FilterOperator,
    RowCount, SqlValue, TableBrowser,
};
use tabula_sqlite::SqliteConnection;

async fn seeded_browser(rows: i64) -> TableBrowser<SqliteConnection> {
    let conn = SqliteConnection::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");
    sqlx::query(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            status TEXT NOT NULL DEFAULT 'off'
        )",
    )
    .execute(conn.pool())
    .await
    .unwrap();
    for i in 1..=rows {
        sqlx::query("INSERT INTO users (id, email, name, status) VALUES (?, ?, ?, ?)")
            .bind(i)
            .bind(format!("user{i}@example.com"))
            .bind(format!("user {i}"))
            .bind(if i % 2 == 0 { "on" } else { "off" })
            .execute(conn.pool())
            .await
            .unwrap();
    }
    TableBrowser::new(conn)
}

fn ids(rows: &[tabula_core::Row]) -> Vec<i64> {
    rows.iter()
        .map(|row| match row.get("id") {
            Some(SqlValue::Int(i)) => *i,
            other => panic!("row without integer id: {other:?}"),
        })
        .collect()
}

#[tokio::test]
async fn test_catalog_columns() {
    let browser = seeded_browser(0).await;
    let ctx = ConnectionContext::new();

    let cols = browser.get_table_columns(&ctx, "users").await.unwrap();
    let names: Vec<&str> = cols.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "email", "name", "status"]);
    assert_eq!(cols[0].key, ColumnKey::Primary);
    assert_eq!(cols[1].key, ColumnKey::Unique);
    assert!(!cols[1].nullable);
    assert!(cols[2].nullable);
    assert_eq!(cols[3].default_value, "'off'");
}

#[tokio::test]
async fn test_schema_display() {
    let browser = seeded_browser(0).await;
    let ctx = ConnectionContext::new();

    let schema = browser.get_table_schema(&ctx, "users").await.unwrap();
    assert!(schema.starts_with("CREATE TABLE \"users\" ("));
    assert!(schema.contains("\"email\" TEXT NOT NULL UNIQUE"));
    assert!(schema.contains("PRIMARY KEY (\"id\")"));
}

#[tokio::test]
async fn test_keyset_walk() {
    let browser = seeded_browser(25).await;
    let ctx = ConnectionContext::new();

    let first = browser
        .get_table_data_by_id(&ctx, "users", "id", None, Some(10), Direction::Next, None)
        .await
        .unwrap();
    assert_eq!(ids(&first.rows), (1..=10).collect::<Vec<_>>());
    assert_eq!(first.total, RowCount::Exact(25));

    let second = browser
        .get_table_data_by_id(&ctx, "users", "id", first.next_cursor, Some(10), Direction::Next, None)
        .await
        .unwrap();
    assert_eq!(ids(&second.rows), (11..=20).collect::<Vec<_>>());

    let back = browser
        .get_table_data_by_id(&ctx, "users", "id", second.prev_cursor, Some(10), Direction::Prev, None)
        .await
        .unwrap();
    assert_eq!(ids(&back.rows), (1..=10).collect::<Vec<_>>());

    let cursor = browser
        .get_page_id_by_page_number(&ctx, "users", "id", 3, Some(10))
        .await
        .unwrap();
    assert_eq!(cursor, Some(SqlValue::Int(20)));
    let third = browser
        .get_table_data_by_id(&ctx, "users", "id", cursor, Some(10), Direction::Next, None)
        .await
        .unwrap();
    assert_eq!(ids(&third.rows), (21..=25).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_filtered_offset_page() {
    let browser = seeded_browser(25).await;
    let ctx = ConnectionContext::new();
    let filter = FilterGroup::and()
        .with_condition(FilterCondition::new("status", FilterOperator::Eq, "on"))
        .with_condition(FilterCondition::new("name", FilterOperator::Like, "user 1"));

    let page = browser
        .get_table_data(&ctx, "users", 1, Some(10), Some(&filter))
        .await
        .unwrap();
    assert_eq!(ids(&page.rows), vec![10, 12, 14, 16, 18]);
    assert_eq!(page.total, RowCount::Exact(5));
}

#[tokio::test]
async fn test_schema_qualified_queries() {
    let browser = seeded_browser(3).await;
    let ctx = ConnectionContext::new();
    browser.switch_database(&ctx, "main");

    let page = browser
        .get_table_data(&ctx, "users", 1, Some(10), None)
        .await
        .unwrap();
    assert_eq!(page.rows.len(), 3);
    assert_eq!(browser.get_table_columns(&ctx, "users").await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_missing_table_is_backend_error() {
    let browser = seeded_browser(0).await;
    let ctx = ConnectionContext::new();

    let err = browser.get_table_columns(&ctx, "ghosts").await.unwrap_err();
    assert!(matches!(err, Error::Backend { engine: "sqlite", .. }));
}
