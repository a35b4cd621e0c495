//! Page route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::error::Result;

use crate::routes::cart::CartView;
use crate::routes::order::ModalView;
use crate::routes::products::{GridView, resize_debounce_ms};
use crate::state::AppState;

/// Page template.
#[derive(Template)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub grid: GridView,
    pub cart: CartView,
    pub count: u64,
    pub modal: ModalView,
    pub oob: bool,
    pub panel_oob: bool,
    pub resize_debounce_ms: u128,
}

/// Display the page.
///
/// The cart panel and badge render from the restored cart even while the
/// catalog is still loading.
///
/// # Errors
///
/// Returns `Template` if the page fails to render.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Html<String>> {
    let catalog = state.catalog().await;
    let shopper = state.shopper().await;

    let page = HomeTemplate {
        grid: GridView::new(&catalog, &shopper),
        cart: CartView::from(&shopper.cart),
        count: shopper.cart.total_items(),
        modal: ModalView::from(&*shopper),
        oob: false,
        panel_oob: false,
        resize_debounce_ms: resize_debounce_ms(),
    };

    Ok(Html(page.render()?))
}
