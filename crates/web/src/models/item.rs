//! Grocery item domain types.

use chrono::{DateTime, Utc};

use grocery_core::{ItemCategory, ItemId, Price, StoreId, UserId};

/// A grocery item sold at exactly one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroceryItem {
    pub id: ItemId,
    /// Display name, at most 80 characters.
    pub name: String,
    pub price: Price,
    pub category: ItemCategory,
    /// Absolute http(s) URL of the item photo.
    pub photo_url: String,
    /// Store the item belongs to.
    pub store_id: StoreId,
    /// User who created the item, if known.
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An item together with the title of its store (one JOIN, no lazy lookups).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemWithStore {
    pub item: GroceryItem,
    pub store_title: String,
}

/// Validated item attributes, produced by [`crate::forms::ItemForm::validate`].
///
/// `store_id` has already been checked against the stores that existed at
/// validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub price: Price,
    pub category: ItemCategory,
    pub photo_url: String,
    pub store_id: StoreId,
}
