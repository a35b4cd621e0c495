//! Integration tests for Cartwheel.
//!
//! Tests drive the full storefront router in-process with
//! `tower::ServiceExt::oneshot`; no server or network is needed.
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests
//! ```

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use cartwheel_core::{Catalog, CatalogError, KeyValueStore, MemoryStore};
use cartwheel_storefront::config::StorefrontConfig;
use cartwheel_storefront::state::{AppState, CatalogState};
use tower::ServiceExt;

/// A three-product catalog document used across tests.
pub const TEST_CATALOG: &str = r#"[
    {"name": "Waffle with Berries", "category": "Waffle", "price": 6.5,
     "image": {"thumbnail": "/img/waffle-thumbnail.jpg", "mobile": "/img/waffle-mobile.jpg",
               "tablet": "/img/waffle-tablet.jpg", "desktop": "/img/waffle-desktop.jpg"}},
    {"name": "Classic Tiramisu", "category": "Tiramisu", "price": 5.5,
     "image": {"thumbnail": "/img/tiramisu-thumbnail.jpg", "mobile": "/img/tiramisu-mobile.jpg",
               "tablet": "/img/tiramisu-tablet.jpg", "desktop": "/img/tiramisu-desktop.jpg"}},
    {"name": "Macaron Mix of Five", "category": "Macaron", "price": 8.0,
     "image": {"thumbnail": "/img/macaron-thumbnail.jpg", "mobile": "/img/macaron-mobile.jpg",
               "tablet": "/img/macaron-tablet.jpg", "desktop": "/img/macaron-desktop.jpg"}}
]"#;

/// Parse [`TEST_CATALOG`].
///
/// # Errors
///
/// Returns `CatalogError` if the fixture is invalid.
pub fn test_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_json(TEST_CATALOG)
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a response header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// An in-process storefront backed by an in-memory cart store.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    router: Router,
}

impl TestApp {
    /// Build an app whose catalog is still loading.
    #[must_use]
    pub fn loading() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Build an app over an existing store; the catalog is still loading.
    #[must_use]
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        let config = StorefrontConfig::from_vars(|_| None)
            .unwrap_or_else(|e| panic!("default configuration is invalid: {e}"));
        let state = AppState::new(config, Arc::clone(&store));
        let router = cartwheel_storefront::app(state.clone());
        Self {
            state,
            store,
            router,
        }
    }

    /// Build an app with [`TEST_CATALOG`] loaded.
    pub async fn ready() -> Self {
        let app = Self::loading();
        let catalog = test_catalog().unwrap_or_else(|e| panic!("test catalog is invalid: {e}"));
        app.state
            .set_catalog(CatalogState::Ready(Arc::new(catalog)))
            .await;
        app
    }

    /// Build an app whose catalog failed to load.
    pub async fn failed() -> Self {
        let app = Self::loading();
        app.state.set_catalog(CatalogState::Failed).await;
        app
    }

    /// The raw saved cart document, if any.
    #[must_use]
    pub fn saved_cart(&self) -> Option<String> {
        self.store.get("cart").ok().flatten()
    }

    /// Send a GET request.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::get(uri)
            .body(Body::empty())
            .unwrap_or_else(|e| panic!("invalid request {uri}: {e}"));
        self.send(request).await
    }

    /// Send a form-encoded POST request.
    pub async fn post(&self, uri: &str, form: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap_or_else(|e| panic!("invalid request {uri}: {e}"));
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| match e {});

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|e| panic!("failed to read body: {e}"));

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
