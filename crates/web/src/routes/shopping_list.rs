//! Shopping list route handlers.
//!
//! Adding is idempotent. Removing something that is not on the list is
//! reported to the user and changes nothing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use grocery_core::ItemId;

use crate::db::{ItemRepository, ShoppingListRepository};
use crate::error::{AppError, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::{FlashMessage, GroceryItem, ItemWithStore};
use crate::routes::{Page, flash};
use crate::state::AppState;

/// Shopping list page template.
#[derive(Template, WebTemplate)]
#[template(path = "shopping_list.html")]
pub struct ShoppingListTemplate {
    pub page: Page,
    pub entries: Vec<ItemWithStore>,
}

async fn existing_item(state: &AppState, item_id: ItemId) -> Result<GroceryItem, AppError> {
    ItemRepository::new(state.pool())
        .get_by_id(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {item_id}")))
}

/// Put an item on the current user's list.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(item_id): Path<ItemId>,
) -> Result<Redirect, AppError> {
    let item = existing_item(&state, item_id).await?;

    let inserted = ShoppingListRepository::new(state.pool())
        .add(user.id, item.id)
        .await?;

    let item_id_str = item.id.to_string();
    add_breadcrumb(
        "shopping_list",
        "Item added",
        Some(&[("item_id", item_id_str.as_str())]),
    );

    let message = if inserted {
        tracing::info!(item_id = %item.id, "Added to shopping list");
        format!("Added \"{}\" to your shopping list.", item.name)
    } else {
        format!("\"{}\" is already on your shopping list.", item.name)
    };
    flash(&session, FlashMessage::success(message)).await;

    Ok(Redirect::to(&format!("/item/{}", item.id)))
}

/// Take an item off the current user's list.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(item_id): Path<ItemId>,
) -> Result<Redirect, AppError> {
    let item = existing_item(&state, item_id).await?;

    let removed = ShoppingListRepository::new(state.pool())
        .remove(user.id, item.id)
        .await?;

    let message = if removed {
        let item_id_str = item.id.to_string();
        add_breadcrumb(
            "shopping_list",
            "Item removed",
            Some(&[("item_id", item_id_str.as_str())]),
        );
        tracing::info!(item_id = %item.id, "Removed from shopping list");
        FlashMessage::success(format!("Removed \"{}\" from your shopping list.", item.name))
    } else {
        tracing::debug!(item_id = %item.id, "Remove requested for item not on list");
        FlashMessage::error(format!("\"{}\" is not on your shopping list.", item.name))
    };
    flash(&session, message).await;

    Ok(Redirect::to("/shopping_list"))
}

/// Display the current user's list.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let entries = ShoppingListRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(ShoppingListTemplate {
        page: Page::load(&session, Some(&user)).await,
        entries,
    })
}
