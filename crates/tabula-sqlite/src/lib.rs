//! # tabula-sqlite
//!
//! SQLite connection for the tabula table browser.
//!
//! ```rust,no_run
//! use tabula_core::{ConnectionContext, Direction, TableBrowser};
//! use tabula_sqlite::SqliteConnection;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = SqliteConnection::connect("sqlite://app.db").await?;
//! let browser = TableBrowser::new(conn);
//! let ctx = ConnectionContext::new();
//!
//! let page = browser
//!     .get_table_data_by_id(&ctx, "users", "id", None, Some(50), Direction::Next, None)
//!     .await?;
//! println!("{} rows, next cursor {:?}", page.rows.len(), page.next_cursor);
//! # Ok(())
//! # }
//! ```

mod connection;
mod error;
mod row;

pub use connection::SqliteConnection;
pub use error::{Result, SqliteError};
