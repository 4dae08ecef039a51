//! Error types for schema normalization and pagination.

use thiserror::Error;

use crate::dialect::DialectKind;

/// Errors returned by the normalization core and the table browser.
#[derive(Debug, Error)]
pub enum Error {
    /// No field extractor exists for the table's dialect.
    #[error("unsupported dialect {dialect} for table '{table}'")]
    UnsupportedDialect {
        /// Table whose columns were requested.
        table: String,
        /// Dialect that has no text extractor.
        dialect: DialectKind,
    },

    /// The engine cannot perform the requested operation.
    #[error("{operation} is not supported by {engine}")]
    UnsupportedOperation {
        /// Engine name.
        engine: &'static str,
        /// Operation name.
        operation: &'static str,
    },

    /// A backward page was requested without a cursor.
    #[error("previous page of '{table}' requested without a cursor")]
    MissingCursor {
        /// Table being paged.
        table: String,
    },

    /// Page numbers start at 1.
    #[error("invalid page number: {page}")]
    InvalidPage {
        /// The rejected page number.
        page: u64,
    },

    /// Page size must be at least 1.
    #[error("invalid page size: {size}")]
    InvalidPageSize {
        /// The rejected page size.
        size: u64,
    },

    /// The offset lookup found no row for the requested page.
    #[error("page {page} is past the end of '{table}'")]
    PageOutOfRange {
        /// Table being paged.
        table: String,
        /// Requested page number.
        page: u64,
    },

    /// A filter condition cannot be compiled.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// The underlying driver reported an error.
    #[error("{engine} error: {message}")]
    Backend {
        /// Engine name.
        engine: &'static str,
        /// Driver message.
        message: String,
    },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
