//! Unified error type for data layer

use thiserror::Error;

use crate::data::sqlite::SqliteError;

/// Error type for data layer operations
///
/// Wraps the SQLite backend's errors so callers outside `data` never match on
/// sqlx types directly.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A referenced row (e.g. the city of a listing) does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Write rejected by a uniqueness or reference rule
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl DataError {
    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Sqlite(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            _ => false,
        }
    }
}

impl From<SqliteError> for DataError {
    fn from(e: SqliteError) -> Self {
        match e {
            SqliteError::Database(e) => Self::Sqlite(e),
            SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                version,
                name,
                error,
            },
            SqliteError::Io(e) => Self::Io(e),
            SqliteError::NotFound(msg) => Self::NotFound(msg),
            SqliteError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}
