//! Error types for the SQLite connection.

/// Errors raised by the SQLite connection.
#[derive(Debug, thiserror::Error)]
pub enum SqliteError {
    /// Driver error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The table does not exist in the selected schema.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Query rendering failed before reaching the driver.
    #[error(transparent)]
    Core(#[from] tabula_core::Error),
}

impl From<SqliteError> for tabula_core::Error {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::Core(e) => e,
            other => Self::Backend {
                engine: "sqlite",
                message: other.to_string(),
            },
        }
    }
}

/// Result type for SQLite operations.
pub type Result<T> = std::result::Result<T, SqliteError>;
