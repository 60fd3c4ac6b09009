//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                  - Store listing (public)
//! GET  /health                            - Liveness check
//! GET  /health/ready                      - Readiness check (database round-trip)
//!
//! # Stores (requires auth)
//! GET  /new_store                         - Empty store form
//! POST /new_store                         - Create store
//! GET  /store/{store_id}                  - Store detail, its items and edit form
//! POST /store/{store_id}                  - Update store
//!
//! # Items (requires auth)
//! GET  /new_item                          - Empty item form
//! POST /new_item                          - Create item
//! GET  /item/{item_id}                    - Item detail and edit form
//! POST /item/{item_id}                    - Update item
//!
//! # Shopping list (requires auth)
//! POST /add_to_shopping_list/{item_id}    - Add item, back to the item page
//! POST /remove_from_shopping_list/{item_id} - Remove item, back to the list
//! GET  /shopping_list                     - Current user's list
//!
//! # Auth
//! GET  /auth/login                        - Login page
//! POST /auth/login                        - Login action
//! GET  /auth/register                     - Register page
//! POST /auth/register                     - Register action
//! POST /auth/logout                       - Logout action
//! ```

pub mod auth;
pub mod health;
pub mod home;
pub mod items;
pub mod shopping_list;
pub mod stores;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::middleware::{push_flash, take_flashes};
use crate::models::{CurrentUser, FlashMessage};
use crate::state::AppState;

/// Per-page chrome shared by every template: who is logged in and which
/// flash messages to show.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub user_email: Option<String>,
    pub flashes: Vec<FlashMessage>,
}

impl Page {
    /// Build the chrome for a rendered page, draining queued flashes.
    pub async fn load(session: &Session, user: Option<&CurrentUser>) -> Self {
        Self {
            user_email: user.map(|u| u.email.to_string()),
            flashes: take_flashes(session).await,
        }
    }
}

/// Queue a flash message. A session failure only costs the message.
pub(crate) async fn flash(session: &Session, message: FlashMessage) {
    if let Err(e) = push_flash(session, message).await {
        tracing::warn!(error = %e, "Failed to queue flash message");
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Stores
        .route(
            "/new_store",
            get(stores::new_store_page).post(stores::create_store),
        )
        .route(
            "/store/{store_id}",
            get(stores::store_detail).post(stores::update_store),
        )
        // Items
        .route("/new_item", get(items::new_item_page).post(items::create_item))
        .route(
            "/item/{item_id}",
            get(items::item_detail).post(items::update_item),
        )
        // Shopping list
        .route(
            "/add_to_shopping_list/{item_id}",
            post(shopping_list::add),
        )
        .route(
            "/remove_from_shopping_list/{item_id}",
            post(shopping_list::remove),
        )
        .route("/shopping_list", get(shopping_list::show))
        // Auth
        .nest("/auth", auth_routes())
}
