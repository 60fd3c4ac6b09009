//! Authentication route handlers.
//!
//! Failed submissions redirect back to the form with an `?error=<code>`
//! query parameter, which the page turns into a message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::auth::is_local_path;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, FlashMessage, User};
use crate::routes::{Page, flash};
use crate::services::auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

/// Query parameters for the auth pages.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub error: Option<String>,
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: Page,
    pub error: Option<String>,
    pub next: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: Page,
    pub error: Option<String>,
    pub min_password_length: usize,
}

/// Human-readable text for an `?error=` code.
#[must_use]
pub fn error_message(code: &str) -> String {
    match code {
        "invalid_credentials" => "Invalid email or password.".to_string(),
        "invalid_email" => "Please enter a valid email address.".to_string(),
        "user_exists" => "An account with this email already exists.".to_string(),
        "weak_password" => {
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters.")
        }
        "password_mismatch" => "Passwords do not match.".to_string(),
        "session" => "Could not start your session. Please try again.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Where to go after login: `next` when it is a local path, else home.
fn post_login_target(next: Option<&str>) -> &str {
    next.filter(|n| is_local_path(n)).unwrap_or("/")
}

fn login_error_redirect(code: &str, next: Option<&str>) -> Redirect {
    let mut url = format!("/auth/login?error={code}");
    if let Some(next) = next.filter(|n| is_local_path(n)) {
        url.push_str("&next=");
        url.push_str(&urlencoding::encode(next));
    }
    Redirect::to(&url)
}

async fn start_session(session: &Session, user: &User) -> Result<(), tower_sessions::session::Error> {
    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_current_user(session, &current).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Query(query): Query<AuthQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        page: Page::load(&session, user.as_ref()).await,
        error: query.error.as_deref().map(error_message),
        next: post_login_target(query.next.as_deref()).to_string(),
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = form.next.as_deref();

    let user = match AuthService::new(state.pool())
        .login_with_password(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            if matches!(e, AuthError::Repository(_) | AuthError::PasswordHash) {
                tracing::error!(error = %e, "Login failed");
            } else {
                tracing::info!(error = %e, "Login rejected");
            }
            return login_error_redirect(e.code(), next).into_response();
        }
    };

    if let Err(e) = start_session(&session, &user).await {
        tracing::error!(error = %e, "Failed to set session");
        return login_error_redirect("session", next).into_response();
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Redirect::to(post_login_target(next)).into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Query(query): Query<AuthQuery>,
) -> impl IntoResponse {
    RegisterTemplate {
        page: Page::load(&session, user.as_ref()).await,
        error: query.error.as_deref().map(error_message),
        min_password_length: MIN_PASSWORD_LENGTH,
    }
}

/// Handle registration form submission.
///
/// A successful registration logs the new user in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    let user = match AuthService::new(state.pool())
        .register_with_password(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            return Redirect::to(&format!("/auth/register?error={}", e.code())).into_response();
        }
    };
    tracing::info!(user_id = %user.id, "User registered");

    if let Err(e) = start_session(&session, &user).await {
        tracing::error!(error = %e, "Failed to set session after registration");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    flash(&session, FlashMessage::success("Welcome! Your account is ready.")).await;
    Redirect::to("/").into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "Failed to clear session");
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_login_target_rejects_foreign_urls() {
        assert_eq!(post_login_target(Some("/shopping_list")), "/shopping_list");
        assert_eq!(post_login_target(Some("https://evil.example.com")), "/");
        assert_eq!(post_login_target(Some("//evil.example.com")), "/");
        assert_eq!(post_login_target(None), "/");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(error_message("invalid_credentials"), "Invalid email or password.");
        assert_eq!(
            error_message("weak_password"),
            "Password must be at least 8 characters."
        );
        assert_eq!(
            error_message("no_such_code"),
            "Something went wrong. Please try again."
        );
    }
}
