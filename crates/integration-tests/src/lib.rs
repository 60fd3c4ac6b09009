//! End-to-end test harness for the grocery list app.
//!
//! Each [`TestApp`] is a real server on an ephemeral port, backed by its own
//! temp-file `SQLite` database, driven with a cookie-keeping `reqwest`
//! client that does not follow redirects (tests assert on them).
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p grocery-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;

use reqwest::{Client, Response, StatusCode, header::LOCATION, redirect};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tempfile::TempDir;

use grocery_core::{ItemId, StoreId};
use grocery_web::config::GroceryConfig;
use grocery_web::db;
use grocery_web::middleware::create_session_store;
use grocery_web::state::AppState;

/// Password used by [`TestApp::sign_up`].
pub const TEST_PASSWORD: &str = "correct horse battery";

/// A running application with its own database.
pub struct TestApp {
    pub address: SocketAddr,
    pub pool: SqlitePool,
    pub client: Client,
    _dir: TempDir,
}

impl TestApp {
    /// Start a fresh application.
    pub async fn spawn() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("grocery.db").display());
        let database_url = SecretString::from(url);

        let pool = db::connect(&database_url)
            .await
            .expect("Failed to open test database");
        db::migrate(&pool).await.expect("Failed to migrate");
        let session_store = create_session_store(&pool)
            .await
            .expect("Failed to create session table");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let address = listener.local_addr().expect("Failed to read local addr");

        let config = GroceryConfig {
            database_url,
            host: address.ip(),
            port: address.port(),
            base_url: format!("http://{address}"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let router = grocery_web::app(AppState::new(config, pool.clone()), session_store);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            pool,
            client: new_client(),
            _dir: dir,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.address)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// GET a page and return its body, asserting 200.
    pub async fn page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        response.text().await.expect("Failed to read body")
    }

    /// Register `email` (which also logs the client in).
    pub async fn sign_up(&self, email: &str) {
        let response = self
            .post_form(
                "/auth/register",
                &[
                    ("email", email),
                    ("password", TEST_PASSWORD),
                    ("password_confirm", TEST_PASSWORD),
                ],
            )
            .await;
        assert_eq!(see_other(&response), "/");
    }

    /// Drop the current session by starting over with an empty cookie jar.
    pub fn forget_session(&mut self) {
        self.client = new_client();
    }

    /// Create a store through the form and return its id.
    pub async fn create_store(&self, title: &str, address: &str) -> StoreId {
        let response = self
            .post_form("/new_store", &[("title", title), ("address", address)])
            .await;
        id_from_location(&see_other(&response), "/store/")
            .parse()
            .expect("Store id in redirect")
    }

    /// Create an item through the form and return its id.
    pub async fn create_item(&self, name: &str, price: &str, store_id: StoreId) -> ItemId {
        let store = store_id.to_string();
        let response = self
            .post_form(
                "/new_item",
                &[
                    ("name", name),
                    ("price", price),
                    ("category", "dairy"),
                    ("photo_url", "http://x/milk.jpg"),
                    ("store", &store),
                ],
            )
            .await;
        id_from_location(&see_other(&response), "/item/")
            .parse()
            .expect("Item id in redirect")
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Assert a `303 See Other` and return its `Location`.
#[must_use]
pub fn see_other(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", response.url());
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Location header")
        .to_string()
}

/// The trailing id of `location`, which must start with `prefix`.
#[must_use]
pub fn id_from_location<'a>(location: &'a str, prefix: &str) -> &'a str {
    location
        .strip_prefix(prefix)
        .unwrap_or_else(|| panic!("{location} does not start with {prefix}"))
}
