//! Grocery item repository.
//!
//! Prices and categories are stored as text and re-parsed through the core
//! types on the way out, so a hand-edited row surfaces as
//! `RepositoryError::DataCorruption` instead of a bogus value.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use grocery_core::{ItemCategory, ItemId, Price, StoreId, UserId};

use super::RepositoryError;
use crate::models::{GroceryItem, ItemInput, ItemWithStore};

const ITEM_COLUMNS: &str = "i.id, i.name, i.price, i.category, i.photo_url, i.store_id, \
                            i.created_by, i.created_at, i.updated_at";

#[derive(sqlx::FromRow)]
pub(super) struct ItemRow {
    id: i64,
    name: String,
    price: String,
    category: String,
    photo_url: String,
    store_id: i64,
    created_by: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
pub(super) struct ItemWithStoreRow {
    #[sqlx(flatten)]
    item: ItemRow,
    store_title: String,
}

impl TryFrom<ItemRow> for GroceryItem {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let price = Price::parse(&row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for item {}: {e}", row.id))
        })?;
        let category = row.category.parse::<ItemCategory>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid category for item {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ItemId::new(row.id),
            name: row.name,
            price,
            category,
            photo_url: row.photo_url,
            store_id: StoreId::new(row.store_id),
            created_by: row.created_by.map(UserId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<ItemWithStoreRow> for ItemWithStore {
    type Error = RepositoryError;

    fn try_from(row: ItemWithStoreRow) -> Result<Self, Self::Error> {
        Ok(Self {
            item: GroceryItem::try_from(row.item)?,
            store_title: row.store_title,
        })
    }
}

/// Repository for grocery item operations.
pub struct ItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Items sold at `store_id`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails and
    /// `RepositoryError::DataCorruption` if a row cannot be parsed.
    pub async fn list_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<GroceryItem>, RepositoryError> {
        sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM grocery_items i
             WHERE i.store_id = ?
             ORDER BY i.name COLLATE NOCASE, i.id"
        ))
        .bind(store_id.as_i64())
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(GroceryItem::try_from)
        .collect()
    }

    /// Look up an item by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails and
    /// `RepositoryError::DataCorruption` if the row cannot be parsed.
    pub async fn get_by_id(&self, id: ItemId) -> Result<Option<GroceryItem>, RepositoryError> {
        sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM grocery_items i WHERE i.id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?
        .map(GroceryItem::try_from)
        .transpose()
    }

    /// Look up an item together with its store's title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails and
    /// `RepositoryError::DataCorruption` if the row cannot be parsed.
    pub async fn get_with_store(
        &self,
        id: ItemId,
    ) -> Result<Option<ItemWithStore>, RepositoryError> {
        sqlx::query_as::<_, ItemWithStoreRow>(&format!(
            "SELECT {ITEM_COLUMNS}, s.title AS store_title
             FROM grocery_items i
             JOIN grocery_stores s ON s.id = i.store_id
             WHERE i.id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?
        .map(ItemWithStore::try_from)
        .transpose()
    }

    /// Insert a new item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign-key failure when the store vanished after validation).
    #[instrument(skip(self, input), fields(name = %input.name, store_id = %input.store_id))]
    pub async fn create(
        &self,
        input: &ItemInput,
        created_by: Option<UserId>,
    ) -> Result<GroceryItem, RepositoryError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            INSERT INTO grocery_items
                (name, price, category, photo_url, store_id, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, price, category, photo_url, store_id,
                      created_by, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(input.price.to_plain_string())
        .bind(input.category.as_str())
        .bind(&input.photo_url)
        .bind(input.store_id.as_i64())
        .bind(created_by.map(|id| id.as_i64()))
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        GroceryItem::try_from(row)
    }

    /// Overwrite every editable field of an item.
    ///
    /// Returns `None` when no item has this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: ItemId,
        input: &ItemInput,
    ) -> Result<Option<GroceryItem>, RepositoryError> {
        sqlx::query_as::<_, ItemRow>(
            r"
            UPDATE grocery_items
            SET name = ?, price = ?, category = ?, photo_url = ?, store_id = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, name, price, category, photo_url, store_id,
                      created_by, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(input.price.to_plain_string())
        .bind(input.category.as_str())
        .bind(&input.photo_url)
        .bind(input.store_id.as_i64())
        .bind(Utc::now())
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?
        .map(GroceryItem::try_from)
        .transpose()
    }
}
