//! Seed the database with a demo store and items.
//!
//! Running it again is a no-op once the demo store exists.

use sqlx::SqlitePool;

use grocery_core::{ItemCategory, Price};
use grocery_web::db::{ItemRepository, StoreRepository};
use grocery_web::models::{ItemInput, StoreInput};

use super::CommandError;

const DEMO_STORE_TITLE: &str = "Corner Mart";
const DEMO_STORE_ADDRESS: &str = "1 Main St";

/// (name, price, category, photo)
const DEMO_ITEMS: [(&str, &str, ItemCategory, &str); 4] = [
    (
        "Milk",
        "3.50",
        ItemCategory::Dairy,
        "https://images.example.com/milk.jpg",
    ),
    (
        "Sourdough Loaf",
        "5.25",
        ItemCategory::Bakery,
        "https://images.example.com/sourdough.jpg",
    ),
    (
        "Bananas",
        "0.79",
        ItemCategory::Produce,
        "https://images.example.com/bananas.jpg",
    ),
    (
        "Frozen Peas",
        "2.10",
        ItemCategory::Frozen,
        "https://images.example.com/peas.jpg",
    ),
];

/// Insert the demo data into the configured database.
///
/// # Errors
///
/// Returns an error if the database is unavailable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let inserted = seed(&pool).await?;
    pool.close().await;

    if inserted == 0 {
        tracing::info!("Demo data already present, nothing to do");
    } else {
        tracing::info!(items = inserted, "Seeded demo store");
    }
    Ok(())
}

/// Insert the demo store and its items. Returns the number of items inserted.
pub(crate) async fn seed(pool: &SqlitePool) -> Result<usize, CommandError> {
    let stores = StoreRepository::new(pool);
    if stores
        .list_all()
        .await?
        .iter()
        .any(|s| s.title == DEMO_STORE_TITLE)
    {
        return Ok(0);
    }

    let store = stores
        .create(
            &StoreInput {
                title: DEMO_STORE_TITLE.to_owned(),
                address: DEMO_STORE_ADDRESS.to_owned(),
            },
            None,
        )
        .await?;

    let items = ItemRepository::new(pool);
    for (name, price, category, photo_url) in DEMO_ITEMS {
        let price = Price::parse(price)
            .map_err(|e| CommandError::InvalidSeed(format!("price {price}: {e}")))?;
        items
            .create(
                &ItemInput {
                    name: name.to_owned(),
                    price,
                    category,
                    photo_url: photo_url.to_owned(),
                    store_id: store.id,
                },
                None,
            )
            .await?;
    }

    Ok(DEMO_ITEMS.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use tempfile::TempDir;

    use super::*;
    use grocery_web::db;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("seed.db").display());
        let pool = db::connect(&SecretString::from(url)).await.unwrap();
        db::migrate(&pool).await.unwrap();

        assert_eq!(seed(&pool).await.unwrap(), DEMO_ITEMS.len());
        assert_eq!(seed(&pool).await.unwrap(), 0);

        let stores = StoreRepository::new(&pool).list_all().await.unwrap();
        assert_eq!(stores.len(), 1);
        let items = ItemRepository::new(&pool)
            .list_for_store(stores[0].id)
            .await
            .unwrap();
        assert_eq!(items.len(), DEMO_ITEMS.len());
    }
}
