//! Integration tests for the Dewdrop storefront.
//!
//! Each test starts the full storefront router on an ephemeral loopback port
//! and talks to it over HTTP with a cookie-aware client, so every client is a
//! separate shopper.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dewdrop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart` - Cart lines, quantities, and totals
//! - `quiz` - Step-by-step quiz, recommendations, and history
//! - `search` - Search, recent searches, and trending products
//! - `sessions` - Shopper isolation and persisted data

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use dewdrop_storefront::config::{LatencyConfig, StorefrontConfig};
use dewdrop_storefront::state::AppState;
use dewdrop_storefront::storage::{FileStore, MemoryStore, SharedStore};
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running storefront and a client acting as one shopper.
pub struct TestContext {
    pub client: Client,
    addr: SocketAddr,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start a storefront with in-memory persistence and no simulated latency.
    pub async fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new())).await
    }

    /// Start a storefront that writes shopper data under `dir`.
    pub async fn with_data_dir(dir: &Path) -> Self {
        Self::with_store(Arc::new(FileStore::new(dir))).await
    }

    /// Start a storefront over `store`.
    pub async fn with_store(store: SharedStore) -> Self {
        Self::with_config(test_config(), store).await
    }

    /// Start a storefront with an explicit configuration.
    pub async fn with_config(config: StorefrontConfig, store: SharedStore) -> Self {
        let state = AppState::with_store(config, store);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read test listener address");

        let server = tokio::spawn(async move {
            axum::serve(listener, dewdrop_storefront::app(state))
                .await
                .expect("Test server error");
        });

        Self {
            client: shopper_client(),
            addr,
            server,
        }
    }

    /// Absolute URL for `path` on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A client with its own cookie jar, i.e. a different shopper.
    #[must_use]
    pub fn new_shopper(&self) -> Client {
        shopper_client()
    }

    /// GET `path` as the default shopper and parse the JSON body.
    pub async fn get_json(&self, path: &str) -> Value {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        assert!(resp.status().is_success(), "GET {path}: {}", resp.status());
        resp.json().await.expect("Invalid JSON response")
    }

    /// Add a product to the default shopper's cart and return the cart.
    pub async fn add_to_cart(&self, item: &Value) -> Value {
        let resp = self
            .client
            .post(self.url("/cart/items"))
            .json(item)
            .send()
            .await
            .expect("Request failed");
        assert!(resp.status().is_success(), "add to cart: {}", resp.status());
        resp.json().await.expect("Invalid JSON response")
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Default configuration for tests: no latency, plain HTTP.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        latency: LatencyConfig::none(),
        ..StorefrontConfig::default()
    }
}

fn shopper_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Parse a serialized price.
///
/// # Panics
///
/// Panics if `value` is not a decimal string.
#[must_use]
pub fn price(value: &Value) -> Decimal {
    value
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| panic!("not a price: {value}"))
}

/// Build a decimal from cents.
#[must_use]
pub fn cents(amount: i64) -> Decimal {
    Decimal::new(amount, 2)
}

/// A cart candidate body.
#[must_use]
pub fn cart_item(id: &str, price: &str, discounted_price: Option<&str>) -> Value {
    serde_json::json!({
        "id": id,
        "name": format!("Product {id}"),
        "image": format!("/products/{id}.jpg"),
        "category": "Skincare",
        "price": price,
        "discountedPrice": discounted_price,
    })
}
