//! Grocery item route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use grocery_core::ItemId;

use crate::db::{ItemRepository, ShoppingListRepository, StoreRepository};
use crate::error::AppError;
use crate::forms::{FieldErrors, ItemForm, SelectOption};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, FlashMessage, GroceryStore, ItemWithStore};
use crate::routes::{Page, flash};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// New item page template.
#[derive(Template, WebTemplate)]
#[template(path = "new_item.html")]
pub struct NewItemTemplate {
    pub page: Page,
    pub form: ItemForm,
    pub errors: FieldErrors,
    pub category_options: Vec<SelectOption>,
    pub store_options: Vec<SelectOption>,
}

impl NewItemTemplate {
    async fn build(
        session: &Session,
        user: &CurrentUser,
        stores: &[GroceryStore],
        form: ItemForm,
        errors: FieldErrors,
    ) -> Self {
        Self {
            page: Page::load(session, Some(user)).await,
            category_options: form.category_options(),
            store_options: form.store_options(stores),
            form,
            errors,
        }
    }
}

/// Item detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "item_detail.html")]
pub struct ItemDetailTemplate {
    pub page: Page,
    pub entry: ItemWithStore,
    pub on_list: bool,
    pub form: ItemForm,
    pub errors: FieldErrors,
    pub category_options: Vec<SelectOption>,
    pub store_options: Vec<SelectOption>,
}

async fn render_detail(
    state: &AppState,
    session: &Session,
    user: &CurrentUser,
    entry: ItemWithStore,
    stores: &[GroceryStore],
    form: ItemForm,
    errors: FieldErrors,
) -> Result<ItemDetailTemplate, AppError> {
    let on_list = ShoppingListRepository::new(state.pool())
        .contains(user.id, entry.item.id)
        .await?;

    Ok(ItemDetailTemplate {
        page: Page::load(session, Some(user)).await,
        entry,
        on_list,
        category_options: form.category_options(),
        store_options: form.store_options(stores),
        form,
        errors,
    })
}

fn not_found(item_id: ItemId) -> AppError {
    AppError::NotFound(format!("item {item_id}"))
}

// =============================================================================
// New Item
// =============================================================================

/// Display the empty item form.
pub async fn new_item_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;
    Ok(NewItemTemplate::build(&session, &user, &stores, ItemForm::default(), FieldErrors::new()).await)
}

/// Handle item form submission.
///
/// The store choice is checked against the stores that exist right now.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn create_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<ItemForm>,
) -> Result<Response, AppError> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    let input = match form.validate(&stores) {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Item form rejected");
            let page = NewItemTemplate::build(&session, &user, &stores, form, errors).await;
            return Ok(page.into_response());
        }
    };

    let item = ItemRepository::new(state.pool())
        .create(&input, Some(user.id))
        .await?;
    tracing::info!(item_id = %item.id, store_id = %item.store_id, "Item created");

    flash(&session, FlashMessage::success(format!("Created item \"{}\".", item.name))).await;
    Ok(Redirect::to(&format!("/item/{}", item.id)).into_response())
}

// =============================================================================
// Item Detail
// =============================================================================

/// Display an item, its store and a pre-populated edit form.
#[instrument(skip(state, session, user))]
pub async fn item_detail(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(item_id): Path<ItemId>,
) -> Result<Response, AppError> {
    let entry = ItemRepository::new(state.pool())
        .get_with_store(item_id)
        .await?
        .ok_or_else(|| not_found(item_id))?;
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    let form = ItemForm::from_item(&entry.item);
    let page = render_detail(
        &state,
        &session,
        &user,
        entry,
        &stores,
        form,
        FieldErrors::new(),
    )
    .await?;
    Ok(page.into_response())
}

/// Handle item edit submission.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(item_id): Path<ItemId>,
    Form(form): Form<ItemForm>,
) -> Result<Response, AppError> {
    let items = ItemRepository::new(state.pool());
    let entry = items
        .get_with_store(item_id)
        .await?
        .ok_or_else(|| not_found(item_id))?;
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    let input = match form.validate(&stores) {
        Ok(input) => input,
        Err(errors) => {
            let page = render_detail(&state, &session, &user, entry, &stores, form, errors).await?;
            return Ok(page.into_response());
        }
    };

    let item = items
        .update(item_id, &input)
        .await?
        .ok_or_else(|| not_found(item_id))?;
    tracing::info!(item_id = %item.id, store_id = %item.store_id, "Item updated");

    flash(&session, FlashMessage::success(format!("Updated item \"{}\".", item.name))).await;
    Ok(Redirect::to(&format!("/item/{}", item.id)).into_response())
}
