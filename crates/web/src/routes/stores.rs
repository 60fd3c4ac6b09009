//! Grocery store route handlers.
//!
//! Each page is a display/submit pair: GET renders the form, POST validates
//! it and either re-renders with field errors or commits and redirects.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use grocery_core::StoreId;

use crate::db::{ItemRepository, StoreRepository};
use crate::error::AppError;
use crate::forms::{FieldErrors, StoreForm};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, FlashMessage, GroceryItem, GroceryStore};
use crate::routes::{Page, flash};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// New store page template.
#[derive(Template, WebTemplate)]
#[template(path = "new_store.html")]
pub struct NewStoreTemplate {
    pub page: Page,
    pub form: StoreForm,
    pub errors: FieldErrors,
}

/// Store detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "store_detail.html")]
pub struct StoreDetailTemplate {
    pub page: Page,
    pub store: GroceryStore,
    pub items: Vec<GroceryItem>,
    pub form: StoreForm,
    pub errors: FieldErrors,
}

async fn render_detail(
    state: &AppState,
    session: &Session,
    user: &CurrentUser,
    store: GroceryStore,
    form: StoreForm,
    errors: FieldErrors,
) -> Result<StoreDetailTemplate, AppError> {
    let items = ItemRepository::new(state.pool())
        .list_for_store(store.id)
        .await?;

    Ok(StoreDetailTemplate {
        page: Page::load(session, Some(user)).await,
        store,
        items,
        form,
        errors,
    })
}

fn not_found(store_id: StoreId) -> AppError {
    AppError::NotFound(format!("store {store_id}"))
}

// =============================================================================
// New Store
// =============================================================================

/// Display the empty store form.
pub async fn new_store_page(RequireAuth(user): RequireAuth, session: Session) -> impl IntoResponse {
    NewStoreTemplate {
        page: Page::load(&session, Some(&user)).await,
        form: StoreForm::default(),
        errors: FieldErrors::new(),
    }
}

/// Handle store form submission.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn create_store(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<StoreForm>,
) -> Result<Response, AppError> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Store form rejected");
            return Ok(NewStoreTemplate {
                page: Page::load(&session, Some(&user)).await,
                form,
                errors,
            }
            .into_response());
        }
    };

    let store = StoreRepository::new(state.pool())
        .create(&input, Some(user.id))
        .await?;
    tracing::info!(store_id = %store.id, title = %store.title, "Store created");

    flash(&session, FlashMessage::success(format!("Created store \"{}\".", store.title))).await;
    Ok(Redirect::to(&format!("/store/{}", store.id)).into_response())
}

// =============================================================================
// Store Detail
// =============================================================================

/// Display a store with its items and a pre-populated edit form.
#[instrument(skip(state, session, user))]
pub async fn store_detail(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(store_id): Path<StoreId>,
) -> Result<Response, AppError> {
    let store = StoreRepository::new(state.pool())
        .get_by_id(store_id)
        .await?
        .ok_or_else(|| not_found(store_id))?;

    let form = StoreForm::from_store(&store);
    let page = render_detail(&state, &session, &user, store, form, FieldErrors::new()).await?;
    Ok(page.into_response())
}

/// Handle store edit submission.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn update_store(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(store_id): Path<StoreId>,
    Form(form): Form<StoreForm>,
) -> Result<Response, AppError> {
    let stores = StoreRepository::new(state.pool());
    let store = stores
        .get_by_id(store_id)
        .await?
        .ok_or_else(|| not_found(store_id))?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let page = render_detail(&state, &session, &user, store, form, errors).await?;
            return Ok(page.into_response());
        }
    };

    let store = stores
        .update(store_id, &input)
        .await?
        .ok_or_else(|| not_found(store_id))?;
    tracing::info!(store_id = %store.id, "Store updated");

    flash(&session, FlashMessage::success(format!("Updated store \"{}\".", store.title))).await;
    Ok(Redirect::to(&format!("/store/{}", store.id)).into_response())
}
