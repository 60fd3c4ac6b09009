//! Authentication extractors.
//!
//! The logged-in user is a `CurrentUser` stored in the session at login.

use axum::{
    extract::FromRequestParts,
    http::{Method, StatusCode, Uri, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in user.
///
/// Anonymous requests are redirected to the login page, which sends the user
/// back to the original path afterwards.
///
/// # Example
///
/// ```rust,ignore
/// async fn shopping_list(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection for `RequireAuth`.
pub enum AuthRejection {
    /// Redirect to the login page, then back to `next`.
    RedirectToLogin { next: String },
    /// No session layer installed.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => Redirect::to(&login_url(&next)).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Login URL that returns to `next` afterwards.
#[must_use]
pub fn login_url(next: &str) -> String {
    format!("/auth/login?next={}", urlencoding::encode(next))
}

/// Whether `next` is safe to redirect to after login (a local path only).
#[must_use]
pub fn is_local_path(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}

/// Page to land on after logging in, given the request that was turned away.
///
/// Only a GET can be replayed by the post-login redirect. A refused
/// shopping list change returns to the item's page; any other refused
/// submission returns to the page serving that form.
#[must_use]
pub fn return_path(method: &Method, uri: &Uri) -> String {
    if *method == Method::GET {
        return uri
            .path_and_query()
            .map_or_else(|| uri.path().to_owned(), ToString::to_string);
    }

    let path = uri.path();
    ["/add_to_shopping_list/", "/remove_from_shopping_list/"]
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
        .map_or_else(|| path.to_owned(), |item_id| format!("/item/{item_id}"))
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AuthRejection::RedirectToLogin {
                next: return_path(&parts.method, &parts.uri),
            })?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store the logged-in user in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Clear the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url("/store/3"), "/auth/login?next=%2Fstore%2F3");
        assert_eq!(
            login_url("/item/1?x=y"),
            "/auth/login?next=%2Fitem%2F1%3Fx%3Dy"
        );
    }

    #[test]
    fn test_return_path_keeps_get_requests() {
        let uri: Uri = "/store/3?tab=items".parse().unwrap();
        assert_eq!(return_path(&Method::GET, &uri), "/store/3?tab=items");
    }

    #[test]
    fn test_return_path_sends_list_changes_to_item_page() {
        let add: Uri = "/add_to_shopping_list/7".parse().unwrap();
        let remove: Uri = "/remove_from_shopping_list/7".parse().unwrap();
        assert_eq!(return_path(&Method::POST, &add), "/item/7");
        assert_eq!(return_path(&Method::POST, &remove), "/item/7");
    }

    #[test]
    fn test_return_path_drops_query_of_form_posts() {
        let uri: Uri = "/store/3?x=y".parse().unwrap();
        assert_eq!(return_path(&Method::POST, &uri), "/store/3");
    }

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/shopping_list"));
        assert!(!is_local_path("//evil.example.com"));
        assert!(!is_local_path("https://evil.example.com"));
        assert!(!is_local_path("/\\evil.example.com"));
        assert!(!is_local_path(""));
    }
}
