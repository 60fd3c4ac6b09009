//! Store creation, display and editing over HTTP.

use reqwest::StatusCode;

use grocery_core::StoreId;
use grocery_integration_tests::{TestApp, see_other};
use grocery_web::db::StoreRepository;

#[tokio::test]
async fn test_new_store_redirects_to_detail_page() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;

    let response = app
        .post_form(
            "/new_store",
            &[("title", "Corner Mart"), ("address", "1 Main St")],
        )
        .await;
    let location = see_other(&response);
    assert!(location.starts_with("/store/"), "{location}");

    let body = app.page(&location).await;
    assert!(body.contains("Corner Mart"));
    assert!(body.contains("1 Main St"));
    assert!(body.contains("Created store"));
}

#[tokio::test]
async fn test_new_store_is_persisted_with_creator() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;

    let store_id = app.create_store("Corner Mart", "1 Main St").await;

    let store = StoreRepository::new(&app.pool)
        .get_by_id(store_id)
        .await
        .expect("query")
        .expect("store exists");
    assert_eq!(store.title, "Corner Mart");
    assert_eq!(store.address, "1 Main St");
    assert!(store.created_by.is_some());
}

#[tokio::test]
async fn test_invalid_store_form_rerenders_with_errors() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;

    let long_title = "x".repeat(81);
    let response = app
        .post_form("/new_store", &[("title", &long_title), ("address", "")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("body");
    assert!(body.contains("Field cannot be longer than 80 characters."));
    assert!(body.contains("This field is required."));

    let stores = StoreRepository::new(&app.pool).list_all().await.expect("query");
    assert!(stores.is_empty());
}

#[tokio::test]
async fn test_update_title_keeps_address_and_id() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;
    let store_id = app.create_store("Corner Mart", "1 Main St").await;

    let path = format!("/store/{store_id}");
    let response = app
        .post_form(&path, &[("title", "Corner Market"), ("address", "1 Main St")])
        .await;
    assert_eq!(see_other(&response), path);

    let store = StoreRepository::new(&app.pool)
        .get_by_id(store_id)
        .await
        .expect("query")
        .expect("store exists");
    assert_eq!(store.id, store_id);
    assert_eq!(store.title, "Corner Market");
    assert_eq!(store.address, "1 Main St");
}

#[tokio::test]
async fn test_invalid_update_leaves_store_unchanged() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;
    let store_id = app.create_store("Corner Mart", "1 Main St").await;

    let response = app
        .post_form(
            &format!("/store/{store_id}"),
            &[("title", ""), ("address", "2 Side St")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let store = StoreRepository::new(&app.pool)
        .get_by_id(store_id)
        .await
        .expect("query")
        .expect("store exists");
    assert_eq!(store.title, "Corner Mart");
    assert_eq!(store.address, "1 Main St");
}

#[tokio::test]
async fn test_store_page_lists_its_items() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;
    let store_id = app.create_store("Corner Mart", "1 Main St").await;
    app.create_item("Milk", "3.50", store_id).await;

    let body = app.page(&format!("/store/{store_id}")).await;
    assert!(body.contains("Milk"));
    assert!(body.contains("$3.50"));
}

#[tokio::test]
async fn test_unknown_store_is_not_found() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;

    let missing = StoreId::new(999);
    let response = app.get(&format!("/store/{missing}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post_form(
            &format!("/store/{missing}"),
            &[("title", "Ghost"), ("address", "Nowhere")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_store_id_is_bad_request() {
    let app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;

    let response = app.get("/store/corner-mart").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_home_lists_stores_publicly() {
    let mut app = TestApp::spawn().await;
    app.sign_up("shopper@example.com").await;
    app.create_store("Corner Mart", "1 Main St").await;
    app.forget_session();

    let body = app.page("/").await;
    assert!(body.contains("Corner Mart"));
    assert!(body.contains("Log In"));
}
