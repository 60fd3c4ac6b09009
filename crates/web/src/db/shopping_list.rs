//! Shopping list membership repository.
//!
//! The `(user_id, item_id)` primary key makes membership a set: adding twice
//! leaves a single row, removing an absent pair touches nothing.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use grocery_core::{ItemId, UserId};

use super::RepositoryError;
use super::items::ItemWithStoreRow;
use crate::models::ItemWithStore;

/// Repository for per-user shopping list membership.
pub struct ShoppingListRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShoppingListRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Put `item_id` on the user's list.
    ///
    /// Returns `false` if it was already there.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self))]
    pub async fn add(&self, user_id: UserId, item_id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO shopping_list_items (user_id, item_id, added_at)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id, item_id) DO NOTHING
            ",
        )
        .bind(user_id.as_i64())
        .bind(item_id.as_i64())
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Take `item_id` off the user's list.
    ///
    /// Returns `false` if it was not on the list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: UserId, item_id: ItemId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM shopping_list_items WHERE user_id = ? AND item_id = ?")
                .bind(user_id.as_i64())
                .bind(item_id.as_i64())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Whether `item_id` is on the user's list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contains(&self, user_id: UserId, item_id: ItemId) -> Result<bool, RepositoryError> {
        let (found,): (i64,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM shopping_list_items WHERE user_id = ? AND item_id = ?)",
        )
        .bind(user_id.as_i64())
        .bind(item_id.as_i64())
        .fetch_one(self.pool)
        .await?;

        Ok(found != 0)
    }

    /// Every item on the user's list, with store titles, ordered by item name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails and
    /// `RepositoryError::DataCorruption` if an item row cannot be parsed.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ItemWithStore>, RepositoryError> {
        sqlx::query_as::<_, ItemWithStoreRow>(
            r"
            SELECT i.id, i.name, i.price, i.category, i.photo_url, i.store_id,
                   i.created_by, i.created_at, i.updated_at,
                   s.title AS store_title
            FROM shopping_list_items l
            JOIN grocery_items i ON i.id = l.item_id
            JOIN grocery_stores s ON s.id = i.store_id
            WHERE l.user_id = ?
            ORDER BY i.name COLLATE NOCASE, i.id
            ",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(ItemWithStore::try_from)
        .collect()
    }
}
