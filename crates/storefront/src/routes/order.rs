//! Order confirmation dialog route handlers.
//!
//! The dialog renders into `#modal-slot`. Confirming only opens a summary;
//! starting a new order empties the cart and closes it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use cartwheel_core::{ModalEvent, confirm_order, start_new_order};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::routes::cart::{CART_UPDATED_EVENT, CartItemView, CartView};
use crate::routes::products::{ProductCardView, card_views};
use crate::state::{AppState, Shopper};

/// Dialog display data for templates.
#[derive(Clone)]
pub struct ModalView {
    pub open: bool,
    pub scroll_locked: bool,
    pub items: Vec<CartItemView>,
    pub total: String,
}

impl From<&Shopper> for ModalView {
    fn from(shopper: &Shopper) -> Self {
        let summary = CartView::from(&shopper.cart);
        Self {
            open: shopper.modal.is_open(),
            scroll_locked: shopper.modal.scroll_locked(),
            items: summary.items,
            total: summary.total,
        }
    }
}

/// Dismissal form data.
///
/// Sent with `target=backdrop` / `target=content` for clicks, or `key=<name>`
/// for key presses.
#[derive(Debug, Deserialize)]
pub struct DismissForm {
    pub target: Option<String>,
    pub key: Option<String>,
}

impl DismissForm {
    /// Translate the form into a dialog event.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if neither a known click target nor a key is given.
    pub fn event(self) -> Result<ModalEvent> {
        if let Some(key) = self.key {
            return Ok(ModalEvent::KeyDown(key));
        }
        match self.target.as_deref() {
            Some("backdrop") => Ok(ModalEvent::BackdropClick),
            Some("content") => Ok(ModalEvent::ContentClick),
            Some(other) => Err(AppError::BadRequest(format!("unknown target {other:?}"))),
            None => Err(AppError::BadRequest("missing target or key".to_string())),
        }
    }
}

/// Dialog fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_modal.html")]
pub struct OrderModalTemplate {
    pub modal: ModalView,
}

/// Closed dialog plus full cart refresh, after starting a new order.
#[derive(Template, WebTemplate)]
#[template(path = "partials/new_order.html")]
pub struct NewOrderTemplate {
    pub modal: ModalView,
    pub cart: CartView,
    pub count: u64,
    pub cards: Vec<ProductCardView>,
    pub oob: bool,
    pub panel_oob: bool,
}

/// Open the confirmation dialog if the cart has items (HTMX).
#[instrument(skip(state))]
pub async fn confirm(State(state): State<AppState>) -> impl IntoResponse {
    let mut guard = state.shopper().await;
    let shopper = &mut *guard;

    if confirm_order(&shopper.cart, &mut shopper.modal) {
        tracing::info!(
            total_items = shopper.cart.total_items(),
            "Order confirmation opened"
        );
    } else {
        tracing::debug!("Ignoring order confirmation for empty cart");
    }

    OrderModalTemplate {
        modal: ModalView::from(&*shopper),
    }
}

/// Apply a dismissal trigger to the dialog (HTMX).
///
/// # Errors
///
/// Returns `BadRequest` for an unrecognised trigger.
#[instrument(skip(state))]
pub async fn dismiss(
    State(state): State<AppState>,
    Form(form): Form<DismissForm>,
) -> Result<impl IntoResponse> {
    let event = form.event()?;

    let mut shopper = state.shopper().await;
    if shopper.modal.handle(&event) {
        tracing::debug!(?event, "Order dialog dismissed");
    }

    Ok(OrderModalTemplate {
        modal: ModalView::from(&*shopper),
    })
}

/// Empty the cart and close the dialog (HTMX).
#[instrument(skip(state))]
pub async fn start_new(State(state): State<AppState>) -> Response {
    let catalog = state.catalog().await;
    let mut guard = state.shopper().await;
    let shopper = &mut *guard;

    start_new_order(&mut shopper.cart, &mut shopper.modal);
    tracing::info!("Started new order");

    let template = NewOrderTemplate {
        modal: ModalView::from(&*shopper),
        cart: CartView::from(&shopper.cart),
        count: shopper.cart.total_items(),
        cards: card_views(&catalog, shopper),
        oob: true,
        panel_oob: true,
    };

    (AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]), template).into_response()
}
