//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::StoreRepository;
use crate::error::AppError;
use crate::middleware::OptionalAuth;
use crate::models::GroceryStore;
use crate::routes::Page;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: Page,
    pub stores: Vec<GroceryStore>,
}

/// List every store.
#[instrument(skip(state, session, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    Ok(HomeTemplate {
        page: Page::load(&session, user.as_ref()).await,
        stores,
    })
}
