//! User management commands.

use grocery_core::UserId;
use grocery_web::services::auth::AuthService;

use super::CommandError;

/// Create a user with an email and password.
///
/// # Errors
///
/// Returns an error if the email is invalid or taken, the password is too
/// short, or the database is unavailable.
pub async fn create(email: &str, password: &str) -> Result<UserId, CommandError> {
    let pool = super::connect().await?;

    let user = AuthService::new(&pool)
        .register_with_password(email, password)
        .await?;
    pool.close().await;

    tracing::info!(user_id = %user.id, email = %user.email, "User created");
    Ok(user.id)
}
