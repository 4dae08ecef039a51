//! Per-connection session state.

use parking_lot::RwLock;
use tracing::info;

/// Session state shared by every operation on one connection.
///
/// Readers take the current database concurrently; a switch takes the
/// write lock and excludes them.
#[derive(Debug, Default)]
pub struct ConnectionContext {
    current_database: RwLock<Option<String>>,
}

impl ConnectionContext {
    /// Creates a context without a selected database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with `database` selected.
    #[must_use]
    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            current_database: RwLock::new(Some(database.into())),
        }
    }

    /// Returns the selected database or schema.
    #[must_use]
    pub fn current_database(&self) -> Option<String> {
        self.current_database.read().clone()
    }

    /// Selects `database`. An empty name clears the selection.
    pub fn switch_database(&self, database: &str) {
        let next = (!database.is_empty()).then(|| database.to_string());
        let previous = std::mem::replace(&mut *self.current_database.write(), next.clone());
        info!(from = ?previous, to = ?next, "switching database");
    }
}
