//! Grocery store repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use grocery_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::{GroceryStore, StoreInput};

const STORE_COLUMNS: &str = "id, title, address, created_by, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct StoreRow {
    id: i64,
    title: String,
    address: String,
    created_by: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for GroceryStore {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            title: row.title,
            address: row.address,
            created_by: row.created_by.map(UserId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for grocery store operations.
pub struct StoreRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All stores, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<GroceryStore>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM grocery_stores ORDER BY title COLLATE NOCASE, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(GroceryStore::from).collect())
    }

    /// Look up a store by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: StoreId) -> Result<Option<GroceryStore>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM grocery_stores WHERE id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(GroceryStore::from))
    }

    /// Insert a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(
        &self,
        input: &StoreInput,
        created_by: Option<UserId>,
    ) -> Result<GroceryStore, RepositoryError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            r"
            INSERT INTO grocery_stores (title, address, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {STORE_COLUMNS}
            "
        ))
        .bind(&input.title)
        .bind(&input.address)
        .bind(created_by.map(|id| id.as_i64()))
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Overwrite a store's title and address.
    ///
    /// Returns `None` when no store has this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: StoreId,
        input: &StoreInput,
    ) -> Result<Option<GroceryStore>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            r"
            UPDATE grocery_stores
            SET title = ?, address = ?, updated_at = ?
            WHERE id = ?
            RETURNING {STORE_COLUMNS}
            "
        ))
        .bind(&input.title)
        .bind(&input.address)
        .bind(Utc::now())
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(GroceryStore::from))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;

    fn input(title: &str, address: &str) -> StoreInput {
        StoreInput {
            title: title.to_owned(),
            address: address.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (pool, _dir) = test_pool().await;
        let repo = StoreRepository::new(&pool);

        let store = repo
            .create(&input("Corner Mart", "1 Main St"), None)
            .await
            .unwrap();
        let fetched = repo.get_by_id(store.id).await.unwrap().unwrap();

        assert_eq!(fetched.title, "Corner Mart");
        assert_eq!(fetched.address, "1 Main St");
        assert_eq!(fetched.created_by, None);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (pool, _dir) = test_pool().await;
        let repo = StoreRepository::new(&pool);
        assert!(repo.get_by_id(StoreId::new(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_sorted_by_title() {
        let (pool, _dir) = test_pool().await;
        let repo = StoreRepository::new(&pool);
        repo.create(&input("zed's", "2 Side St"), None).await.unwrap();
        repo.create(&input("Acme", "3 High St"), None).await.unwrap();

        let titles: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Acme".to_owned(), "zed's".to_owned()]);
    }

    #[tokio::test]
    async fn test_update_changes_fields_and_keeps_id() {
        let (pool, _dir) = test_pool().await;
        let repo = StoreRepository::new(&pool);
        let store = repo
            .create(&input("Corner Mart", "1 Main St"), None)
            .await
            .unwrap();

        let updated = repo
            .update(store.id, &input("Corner Market", "1 Main St"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, store.id);
        assert_eq!(updated.title, "Corner Market");
        assert_eq!(updated.address, "1 Main St");
        assert_eq!(updated.created_at, store.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_none() {
        let (pool, _dir) = test_pool().await;
        let repo = StoreRepository::new(&pool);
        let result = repo
            .update(StoreId::new(9), &input("Nope", "Nowhere"))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
