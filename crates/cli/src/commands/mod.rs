//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;
use sqlx::SqlitePool;
use thiserror::Error;

use grocery_web::db::{self, RepositoryError};
use grocery_web::services::auth::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Built-in demo data failed validation.
    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),

    /// User creation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Database URL from `GROCERY_DATABASE_URL`, falling back to `DATABASE_URL`.
fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("GROCERY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("GROCERY_DATABASE_URL"))
}

/// Connect to the configured database.
async fn connect() -> Result<SqlitePool, CommandError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    Ok(db::connect(&url).await?)
}
