//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Page: grid, cart panel, badge, dialog slot
//!
//! # Products
//! GET  /products/grid          - Grid fragment (loading / cards / error)
//! GET  /products/images        - Image swaps for ?width=N (HTMX out-of-band)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel fragment
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/add               - Add one unit (returns cart refresh)
//! POST /cart/update            - Set quantity (returns cart refresh)
//! POST /cart/remove            - Remove line (returns cart refresh)
//!
//! # Order dialog
//! POST /order/confirm          - Open dialog if the cart has items
//! POST /order/dismiss          - Backdrop click / Escape
//! POST /order/new              - Clear cart and close dialog
//! ```
//!
//! Cart refresh responses carry the cart panel plus out-of-band swaps of the
//! count badge and every product card, and an `HX-Trigger: cart-updated` header.

pub mod cart;
pub mod home;
pub mod order;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/grid", get(products::grid))
        .route("/images", get(products::images))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the order dialog routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/confirm", post(order::confirm))
        .route("/dismiss", post(order::dismiss))
        .route("/new", post(order::start_new))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Order dialog routes
        .nest("/order", order_routes())
}
