//! Product grid route handlers.
//!
//! Cards are decorated from the in-memory cart by handle; nothing is read back
//! out of rendered markup.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use cartwheel_core::{Breakpoint, CardState, Product, RESIZE_DEBOUNCE};
use serde::Deserialize;
use tracing::instrument;

use crate::state::{AppState, CatalogState, Shopper};

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub handle: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image: String,
    pub selected: bool,
    pub cta_label: String,
}

impl ProductCardView {
    /// Build a card for `product` in the given cart state and viewport.
    #[must_use]
    pub fn new(product: &Product, state: CardState, breakpoint: Breakpoint) -> Self {
        let (selected, cta_label) = match state {
            CardState::Available => (false, "Add to Cart".to_string()),
            CardState::Selected(quantity) => (true, format!("Added ({quantity})")),
        };

        Self {
            handle: product.handle.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.display(),
            image: product.image.for_breakpoint(breakpoint).to_string(),
            selected,
            cta_label,
        }
    }
}

/// Product grid display data for templates.
#[derive(Clone, Default)]
pub struct GridView {
    pub loading: bool,
    pub failed: bool,
    pub cards: Vec<ProductCardView>,
}

impl GridView {
    /// Build the grid for the current catalog state.
    #[must_use]
    pub fn new(catalog: &CatalogState, shopper: &Shopper) -> Self {
        match catalog {
            CatalogState::Loading => Self {
                loading: true,
                ..Self::default()
            },
            CatalogState::Failed => Self {
                failed: true,
                ..Self::default()
            },
            CatalogState::Ready(_) => Self {
                cards: card_views(catalog, shopper),
                ..Self::default()
            },
        }
    }
}

/// Cards for every catalog product, decorated from the shopper's cart.
///
/// Empty unless the catalog is ready.
#[must_use]
pub fn card_views(catalog: &CatalogState, shopper: &Shopper) -> Vec<ProductCardView> {
    let CatalogState::Ready(catalog) = catalog else {
        return Vec::new();
    };

    catalog
        .iter()
        .map(|product| {
            ProductCardView::new(
                product,
                shopper.cart.card_state(&product.handle),
                shopper.breakpoint,
            )
        })
        .collect()
}

/// Debounce delay for the resize trigger, in milliseconds.
#[must_use]
pub const fn resize_debounce_ms() -> u128 {
    RESIZE_DEBOUNCE.as_millis()
}

/// Image replacement data for templates.
#[derive(Clone)]
pub struct ImageSwapView {
    pub handle: String,
    pub src: String,
    pub alt: String,
}

/// Viewport report query parameters.
#[derive(Debug, Deserialize)]
pub struct ViewportQuery {
    pub width: u32,
}

/// Product grid fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: GridView,
    pub oob: bool,
    pub resize_debounce_ms: u128,
}

/// Out-of-band image swaps fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_images.html")]
pub struct ProductImagesTemplate {
    pub images: Vec<ImageSwapView>,
}

/// Render the product grid (HTMX).
///
/// While the catalog is loading the fragment polls itself.
#[instrument(skip(state))]
pub async fn grid(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog().await;
    let shopper = state.shopper().await;

    ProductGridTemplate {
        grid: GridView::new(&catalog, &shopper),
        oob: false,
        resize_debounce_ms: resize_debounce_ms(),
    }
}

/// Re-select product images for a reported viewport width (HTMX).
///
/// The page reports its width after resizes settle; the chosen breakpoint is
/// remembered so later card renders use the same variant.
#[instrument(skip(state))]
pub async fn images(
    State(state): State<AppState>,
    Query(query): Query<ViewportQuery>,
) -> impl IntoResponse {
    let breakpoint = Breakpoint::for_width(query.width);
    let catalog = state.catalog().await;

    let changed = {
        let mut shopper = state.shopper().await;
        let changed = shopper.breakpoint != breakpoint;
        shopper.breakpoint = breakpoint;
        changed
    };

    if changed {
        tracing::debug!(breakpoint = breakpoint.as_str(), "Viewport breakpoint changed");
    }

    let images = match &catalog {
        CatalogState::Ready(catalog) => catalog
            .iter()
            .map(|product| ImageSwapView {
                handle: product.handle.to_string(),
                src: product.image.for_breakpoint(breakpoint).to_string(),
                alt: product.name.clone(),
            })
            .collect(),
        CatalogState::Loading | CatalogState::Failed => Vec::new(),
    };

    ProductImagesTemplate { images }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use cartwheel_core::{Catalog, Price};

    use super::*;

    fn tiramisu() -> Product {
        Catalog::from_json(
            r#"[{"name": "Classic Tiramisu", "category": "Tiramisu", "price": 5.5,
                 "image": {"thumbnail": "thumb.jpg", "mobile": "mobile.jpg",
                           "tablet": "tablet.jpg", "desktop": "desktop.jpg"}}]"#,
        )
        .unwrap()
        .iter()
        .next()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_card_available() {
        let card = ProductCardView::new(&tiramisu(), CardState::Available, Breakpoint::Desktop);
        assert!(!card.selected);
        assert_eq!(card.cta_label, "Add to Cart");
        assert_eq!(card.image, "desktop.jpg");
        assert_eq!(card.price, Price::from_cents(550).display());
    }

    #[test]
    fn test_card_selected_shows_quantity() {
        let card = ProductCardView::new(
            &tiramisu(),
            CardState::Selected(NonZeroU32::new(3).unwrap()),
            Breakpoint::Mobile,
        );
        assert!(card.selected);
        assert_eq!(card.cta_label, "Added (3)");
        assert_eq!(card.image, "mobile.jpg");
    }

    #[test]
    fn test_resize_debounce_ms() {
        assert_eq!(resize_debounce_ms(), 250);
    }
}
