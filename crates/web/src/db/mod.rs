//! Database operations for the grocery `SQLite` database.
//!
//! ## Tables
//!
//! - `users` - Site accounts with Argon2id password hashes
//! - `grocery_stores` - Stores (optional creator)
//! - `grocery_items` - Items, each belonging to exactly one store
//! - `shopping_list_items` - (user, item) membership rows
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/`, embedded at compile time,
//! and run via:
//! ```bash
//! cargo run -p grocery-cli -- migrate
//! ```

pub mod items;
pub mod shopping_list;
pub mod stores;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use items::ItemRepository;
pub use shopping_list::ShoppingListRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if it does not exist. Every connection has
/// foreign keys enforced and runs in WAL mode.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is malformed or the connection cannot be
/// established.
pub async fn connect(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Run all pending schema migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history does not
/// match the embedded files.
pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    tracing::info!("Running database migrations");
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations complete");
    Ok(())
}

/// Map a unique-constraint failure to [`RepositoryError::Conflict`].
fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_creates_tables() {
        let (pool, _dir) = test_support::test_pool().await;

        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();

        for expected in [
            "grocery_items",
            "grocery_stores",
            "shopping_list_items",
            "users",
        ] {
            assert!(names.contains(&expected), "missing table {expected}");
        }
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let (pool, _dir) = test_support::test_pool().await;
        migrate(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let (pool, _dir) = test_support::test_pool().await;

        let result = sqlx::query(
            "INSERT INTO grocery_items (name, price, category, photo_url, store_id, created_at, updated_at)
             VALUES ('Ghost', '1', 'other', 'http://x/y.jpg', 999, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }
}
