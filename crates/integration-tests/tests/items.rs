//! Item creation, display and editing over HTTP.

use reqwest::StatusCode;

use grocery_core::{ItemCategory, ItemId, Price};
use grocery_integration_tests::{TestApp, see_other};
use grocery_web::db::{ItemRepository, StoreRepository};

#[tokio::test]
async fn test_new_item_persists_numeric_price() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;
    let store_id = app.create_store("Corner Mart", "1 Main St").await;
    let store = store_id.to_string();

    let response = app
        .post_form(
            "/new_item",
            &[
                ("name", "Milk"),
                ("price", "3.50"),
                ("category", "dairy"),
                ("photo_url", "http://x/milk.jpg"),
                ("store", &store),
            ],
        )
        .await;
    let location = see_other(&response);
    let item_id: ItemId = location
        .strip_prefix("/item/")
        .expect("item url")
        .parse()
        .expect("item id");

    let item = ItemRepository::new(&app.pool)
        .get_by_id(item_id)
        .await
        .expect("query")
        .expect("item exists");
    assert_eq!(item.name, "Milk");
    assert_eq!(item.price, Price::parse("3.50").expect("price"));
    assert_eq!(item.category, ItemCategory::Dairy);
    assert_eq!(item.store_id, store_id);

    let body = app.page(&location).await;
    assert!(body.contains("Milk"));
    assert!(body.contains("Corner Mart"));
    assert!(body.contains("$3.50"));
}

#[tokio::test]
async fn test_item_with_unknown_store_is_rejected() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;
    let store_id = app.create_store("Corner Mart", "1 Main St").await;

    let response = app
        .post_form(
            "/new_item",
            &[
                ("name", "Milk"),
                ("price", "3.50"),
                ("category", "dairy"),
                ("photo_url", "http://x/milk.jpg"),
                ("store", "9999"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("body");
    assert!(body.contains("Not a valid choice."));

    let items = ItemRepository::new(&app.pool)
        .list_for_store(store_id)
        .await
        .expect("query");
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_item_field_errors_are_reported() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;
    let store_id = app.create_store("Corner Mart", "1 Main St").await;
    let store = store_id.to_string();

    let response = app
        .post_form(
            "/new_item",
            &[
                ("name", "Milk"),
                ("price", "cheap"),
                ("category", "candy"),
                ("photo_url", "not a url"),
                ("store", &store),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("body");
    assert!(body.contains("Not a valid decimal value."));
    assert!(body.contains("Not a valid choice."));
    assert!(body.contains("Invalid URL."));
    // Submitted values survive the re-render
    assert!(body.contains("value=\"Milk\""));
}

#[tokio::test]
async fn test_negative_price_is_rejected() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;
    let store_id = app.create_store("Corner Mart", "1 Main St").await;
    let store = store_id.to_string();

    let response = app
        .post_form(
            "/new_item",
            &[
                ("name", "Milk"),
                ("price", "-1.00"),
                ("category", "dairy"),
                ("photo_url", "http://x/milk.jpg"),
                ("store", &store),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .text()
            .await
            .expect("body")
            .contains("Price cannot be negative.")
    );
}

#[tokio::test]
async fn test_update_item_moves_it_between_stores() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;
    let first = app.create_store("Corner Mart", "1 Main St").await;
    let second = app.create_store("Fresh Co", "2 Side St").await;
    let item_id = app.create_item("Milk", "3.50", first).await;
    let second_str = second.to_string();

    let path = format!("/item/{item_id}");
    let response = app
        .post_form(
            &path,
            &[
                ("name", "Oat Milk"),
                ("price", "4.25"),
                ("category", "pantry"),
                ("photo_url", "https://x/oat.jpg"),
                ("store", &second_str),
            ],
        )
        .await;
    assert_eq!(see_other(&response), path);

    let item = ItemRepository::new(&app.pool)
        .get_by_id(item_id)
        .await
        .expect("query")
        .expect("item exists");
    assert_eq!(item.name, "Oat Milk");
    assert_eq!(item.price.to_string(), "$4.25");
    assert_eq!(item.category, ItemCategory::Pantry);
    assert_eq!(item.photo_url, "https://x/oat.jpg");
    assert_eq!(item.store_id, second);

    let stores = StoreRepository::new(&app.pool);
    assert!(stores.get_by_id(first).await.expect("query").is_some());
    let first_items = ItemRepository::new(&app.pool)
        .list_for_store(first)
        .await
        .expect("query");
    assert!(first_items.is_empty());
}

#[tokio::test]
async fn test_item_page_preselects_current_values() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;
    let store_id = app.create_store("Corner Mart", "1 Main St").await;
    let item_id = app.create_item("Milk", "3.50", store_id).await;

    let body = app.page(&format!("/item/{item_id}")).await;
    assert!(body.contains("<option value=\"dairy\" selected>Dairy</option>"));
    assert!(body.contains(&format!(
        "<option value=\"{store_id}\" selected>Corner Mart</option>"
    )));
    assert!(body.contains("Add to Shopping List"));
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;

    let response = app.get("/item/424242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
