//! Cartwheel storefront library.
//!
//! Serves the product grid, cart panel and order confirmation dialog as
//! server-rendered HTMX fragments over the core cart model.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::{AppState, CatalogState};

/// Build the full application router for `state`.
///
/// Sentry layers are left to the binary so tests can drive the router
/// without a client.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog has loaded.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog().await {
        CatalogState::Ready(_) => StatusCode::OK,
        CatalogState::Loading | CatalogState::Failed => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use cartwheel_core::MemoryStore;
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    fn test_state() -> AppState {
        let config = StorefrontConfig::from_vars(|_| None).unwrap();
        AppState::new(config, MemoryStore::new())
    }

    #[tokio::test]
    async fn test_health_and_request_id() {
        let response = app(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(middleware::REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_readiness_waits_for_catalog() {
        let state = test_state();
        let ready = || Request::get("/health/ready").body(Body::empty()).unwrap();

        let response = app(state.clone()).oneshot(ready()).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state
            .set_catalog(CatalogState::Ready(std::sync::Arc::new(
                cartwheel_core::Catalog::from_products(Vec::new()),
            )))
            .await;
        let response = app(state).oneshot(ready()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
