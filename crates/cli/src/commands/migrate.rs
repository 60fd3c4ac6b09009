//! Database migration command.
//!
//! Applies the embedded migrations from `crates/web/migrations/` and creates
//! the session table used by the web server.

use sqlx::SqlitePool;

use grocery_web::db;
use grocery_web::middleware::create_session_store;

use super::CommandError;

/// Run all migrations against the configured database.
///
/// # Errors
///
/// Returns an error if the database URL is missing or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    apply(&pool).await?;
    pool.close().await;
    tracing::info!("Migrations complete!");
    Ok(())
}

/// Apply schema migrations and the session table to `pool`.
pub(crate) async fn apply(pool: &SqlitePool) -> Result<(), CommandError> {
    db::migrate(pool).await?;
    create_session_store(pool).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_apply_is_repeatable() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("cli.db").display());
        let pool = db::connect(&SecretString::from(url)).await.unwrap();

        apply(&pool).await.unwrap();
        apply(&pool).await.unwrap();

        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tower_sessions'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
    }
}
