//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation answers with the full refresh: the cart panel, plus
//! out-of-band swaps of the count badge and every product card.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use cartwheel_core::{Cart, CartLine, PanelMode, ProductHandle};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::products::{ProductCardView, card_views};
use crate::state::{AppState, CatalogState, Shopper};

/// HTMX event fired after every cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub handle: String,
    pub name: String,
    pub thumbnail: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    /// Quantity submitted by the decrement control.
    pub decrease_to: i64,
    /// Quantity submitted by the increment control.
    pub increase_to: i64,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub mode: PanelMode,
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Returns true if the empty-cart placeholder should be shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mode == PanelMode::Empty
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            mode: cart.panel_mode(),
            items: cart.lines().map(CartItemView::from).collect(),
            total: cart.total_price().display(),
            item_count: cart.total_items(),
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        let quantity = line.quantity.get();
        Self {
            handle: line.product.handle.to_string(),
            name: line.product.name.clone(),
            thumbnail: line.product.image.thumbnail.clone(),
            quantity,
            price: line.product.price.display(),
            line_price: line.line_total().display(),
            decrease_to: i64::from(quantity) - 1,
            increase_to: i64::from(quantity) + 1,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub handle: String,
}

/// Update cart form data.
///
/// The quantity is kept as submitted and read with [`Self::quantity`].
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub handle: String,
    pub quantity: String,
}

impl UpdateCartForm {
    /// The requested quantity.
    ///
    /// Integers beyond the `i64` range clamp to its bounds; the cart then
    /// saturates or removes the line as usual.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the quantity is not an integer.
    pub fn quantity(&self) -> Result<i64> {
        let raw = self.quantity.trim();
        if let Ok(quantity) = raw.parse::<i64>() {
            return Ok(quantity);
        }

        let (negative, digits) = match raw.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::BadRequest(format!("invalid quantity {raw:?}")));
        }

        Ok(if negative { i64::MIN } else { i64::MAX })
    }
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub handle: String,
}

/// Cart panel fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
    pub panel_oob: bool,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
    pub oob: bool,
}

/// Full cart refresh template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_refresh.html")]
pub struct CartRefreshTemplate {
    pub cart: CartView,
    pub count: u64,
    pub cards: Vec<ProductCardView>,
    pub oob: bool,
    pub panel_oob: bool,
}

impl CartRefreshTemplate {
    /// Build the refresh for the shopper's current cart.
    ///
    /// With `panel_oob` the panel is swapped out-of-band too, for responses
    /// whose main target is elsewhere.
    #[must_use]
    pub fn new(catalog: &CatalogState, shopper: &Shopper, panel_oob: bool) -> Self {
        Self {
            cart: CartView::from(&shopper.cart),
            count: shopper.cart.total_items(),
            cards: card_views(catalog, shopper),
            oob: true,
            panel_oob,
        }
    }
}

/// Wrap a refresh with the cart-updated trigger header.
fn refreshed(template: CartRefreshTemplate) -> Response {
    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        template,
    )
        .into_response()
}

/// Display the cart panel.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let shopper = state.shopper().await;
    CartPanelTemplate {
        cart: CartView::from(&shopper.cart),
        panel_oob: false,
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    let shopper = state.shopper().await;
    CartCountTemplate {
        count: shopper.cart.total_items(),
        oob: false,
    }
}

/// Add one unit of a catalog product to the cart (HTMX).
///
/// The cart stores the catalog's copy of the product.
///
/// # Errors
///
/// Returns `CatalogUnavailable` while the catalog is not loaded, and
/// `NotFound` for an unknown handle.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let catalog = state.catalog().await;
    let CatalogState::Ready(products) = &catalog else {
        return Err(AppError::CatalogUnavailable);
    };

    let handle = ProductHandle::new(form.handle);
    let product = products
        .get(&handle)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))?;

    add_breadcrumb("cart", "Added item", Some(&[("handle", handle.as_str())]));

    let mut shopper = state.shopper().await;
    shopper.cart.add_item(product);

    Ok(refreshed(CartRefreshTemplate::new(&catalog, &shopper, false)))
}

/// Update cart item quantity (HTMX).
///
/// Unknown handles are ignored; zero or negative quantities remove the line.
///
/// # Errors
///
/// Returns `BadRequest` if the quantity is not an integer.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let quantity = form.quantity()?;
    let catalog = state.catalog().await;
    let handle = ProductHandle::new(form.handle);

    let mut shopper = state.shopper().await;
    shopper.cart.update_quantity(&handle, quantity);

    Ok(refreshed(CartRefreshTemplate::new(&catalog, &shopper, false)))
}

/// Remove item from cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let catalog = state.catalog().await;
    let handle = ProductHandle::new(form.handle);

    let mut shopper = state.shopper().await;
    shopper.cart.remove_item(&handle);

    refreshed(CartRefreshTemplate::new(&catalog, &shopper, false))
}
