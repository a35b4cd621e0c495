//! Application state shared across handlers.

use std::sync::Arc;

use cartwheel_core::{Breakpoint, Cart, CartListener, Catalog, KeyValueStore, Modal};
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::catalog::{CatalogLoader, load_catalog_async};
use crate::config::StorefrontConfig;

/// Progress of the one-shot catalog load.
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    /// The load task has not finished yet.
    #[default]
    Loading,
    /// The catalog is available.
    Ready(Arc<Catalog>),
    /// The load failed; no retry is attempted.
    Failed,
}

/// The single shopper's cart, confirmation dialog and last reported viewport.
///
/// All of it lives behind one lock so every request sees and mutates it together.
#[derive(Debug)]
pub struct Shopper {
    pub cart: Cart,
    pub modal: Modal,
    /// Breakpoint of the most recent viewport report; cards render with it.
    pub breakpoint: Breakpoint,
}

/// Logs every cart change.
struct CartLogger;

impl CartListener for CartLogger {
    fn cart_changed(&self, cart: &Cart) {
        tracing::info!(
            lines = cart.len(),
            total_items = cart.total_items(),
            total_price = %cart.total_price(),
            "Cart updated"
        );
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration, the catalog and the shopper.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: RwLock<CatalogState>,
    shopper: Mutex<Shopper>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Restores the cart from `store` and registers the change logger. The
    /// catalog starts out `Loading`; call [`Self::start_catalog_loading`] or
    /// [`Self::set_catalog`] to fill it.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Durable slot for the cart
    pub fn new(config: StorefrontConfig, store: impl KeyValueStore + 'static) -> Self {
        let mut cart = Cart::restore(store);
        cart.subscribe(CartLogger);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: RwLock::new(CatalogState::Loading),
                shopper: Mutex::new(Shopper {
                    cart,
                    modal: Modal::new(),
                    breakpoint: Breakpoint::default(),
                }),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Current catalog state.
    pub async fn catalog(&self) -> CatalogState {
        self.inner.catalog.read().await.clone()
    }

    /// Replace the catalog state.
    pub async fn set_catalog(&self, state: CatalogState) {
        *self.inner.catalog.write().await = state;
    }

    /// Lock the shopper for reading or mutation.
    pub async fn shopper(&self) -> MutexGuard<'_, Shopper> {
        self.inner.shopper.lock().await
    }

    /// Start loading the configured catalog in the background.
    pub fn start_catalog_loading(&self) {
        let loader = CatalogLoader::new(self.config().catalog.clone());
        load_catalog_async(self.clone(), loader);
    }
}
