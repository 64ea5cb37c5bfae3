//! SQLite database service
//!
//! The listing store. Configured for a read-heavy public API with occasional
//! single-row admin writes:
//! - WAL mode for concurrent reads during writes
//! - In-memory temp storage for fast queries
//! - Automatic WAL checkpointing
//!
//! All schema definitions and migrations are managed here.

pub mod error;
pub mod filters;
mod migrations;
pub mod repositories;
mod repository_impl;
pub mod schema;
pub mod seed;

pub use error::SqliteError;
pub use sqlx::SqlitePool;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::log::LevelFilter;

use crate::core::config::DatabaseConfig;
use crate::core::constants::{
    SQLITE_BUSY_TIMEOUT_SECS, SQLITE_CACHE_SIZE, SQLITE_CHECKPOINT_INTERVAL_SECS,
    SQLITE_DB_FILENAME, SQLITE_WAL_AUTOCHECKPOINT,
};
use crate::core::storage::{AppStorage, DataSubdir};
use crate::utils::file::expand_path;

/// SQLite database service
///
/// Handles database initialization, connection pooling, and background tasks.
/// Should be created once at server startup and shared across all modules.
pub struct SqliteService {
    pool: SqlitePool,
}

impl SqliteService {
    /// Initialize the database service
    ///
    /// Creates the database file if it doesn't exist, configures connection
    /// options with optimized pragmas, and runs any pending migrations.
    pub async fn init(storage: &AppStorage, config: &DatabaseConfig) -> Result<Self, SqliteError> {
        let db_path = Self::db_path(storage, config);
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS))
            .pragma("cache_size", SQLITE_CACHE_SIZE)
            .pragma("temp_store", "MEMORY")
            .pragma("wal_autocheckpoint", SQLITE_WAL_AUTOCHECKPOINT)
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!(path = %db_path.display(), "SqliteService initialized");
        Ok(Self { pool })
    }

    /// Explicit `database.path` wins over `<data_dir>/sqlite/vitrina.db`
    pub fn db_path(storage: &AppStorage, config: &DatabaseConfig) -> PathBuf {
        match &config.path {
            Some(path) => expand_path(path),
            None => storage.subdir(DataSubdir::Sqlite).join(SQLITE_DB_FILENAME),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a SqliteService from an existing pool (primarily for testing)
    #[cfg(test)]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn checkpoint(&self) -> Result<(), SqliteError> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await?;
        tracing::debug!("WAL checkpoint completed");
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }

    pub fn start_checkpoint_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(SQLITE_CHECKPOINT_INTERVAL_SECS));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("WAL checkpoint task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = db.checkpoint().await {
                            tracing::warn!("WAL checkpoint failed: {}", e);
                        }
                    }
                }
            }
        })
    }
}

/// Single-connection in-memory pool with the schema applied
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    migrations::run_migrations(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;

    #[tokio::test]
    async fn test_init_creates_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let storage = AppStorage::at(dir.path().to_path_buf());
        let config = DatabaseConfig {
            path: Some(dir.path().join("nested/listings.db").display().to_string()),
            ..AppConfig::default().database
        };

        let service = Arc::new(SqliteService::init(&storage, &config).await.unwrap());
        assert!(dir.path().join("nested/listings.db").exists());

        service.checkpoint().await.unwrap();

        let (tx, rx) = watch::channel(false);
        let handle = service.start_checkpoint_task(rx);
        tx.send(true).unwrap();
        handle.await.unwrap();
        service.close().await;
    }

    #[test]
    fn test_default_db_path_is_under_data_dir() {
        let storage = AppStorage::at(PathBuf::from("/var/lib/vitrina"));
        let config = AppConfig::default().database;
        assert_eq!(
            SqliteService::db_path(&storage, &config),
            PathBuf::from("/var/lib/vitrina/sqlite").join(SQLITE_DB_FILENAME)
        );
    }
}
