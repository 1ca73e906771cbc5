// error.rs — Error types for goal graph persistence.

use sieben_goal::GoalError;
use thiserror::Error;

/// Errors that can occur while opening, migrating, loading or saving a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the directory holding the database file.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// A SQLite call failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A schema migration could not be applied.
    #[error("failed to apply migration {version} ({name}): {source}")]
    Migration {
        version: &'static str,
        name: &'static str,
        source: rusqlite::Error,
    },

    /// The stored rows do not form a valid goal graph.
    #[error("stored goal graph rejected: {0}")]
    Goal(#[from] GoalError),
}
