//! Grocery store domain types.

use chrono::{DateTime, Utc};

use grocery_core::{StoreId, UserId};

/// A grocery store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroceryStore {
    pub id: StoreId,
    /// Display name, at most 80 characters.
    pub title: String,
    /// Street address, at most 200 characters.
    pub address: String,
    /// User who created the store, if known.
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated store attributes, produced by [`crate::forms::StoreForm::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInput {
    pub title: String,
    pub address: String,
}
