//! Saved cart commands.
//!
//! # Usage
//!
//! ```bash
//! cartwheel cart show
//! cartwheel cart clear --state-dir .cartwheel
//! ```
//!
//! # Environment Variables
//!
//! - `CARTWHEEL_STATE_DIR` - Directory used when `--state-dir` is not given

use std::path::PathBuf;

use cartwheel_core::{Cart, StoreError};
use cartwheel_storefront::config::{ConfigError, StorefrontConfig};
use cartwheel_storefront::store::FileStore;
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The state directory could not be opened.
    #[error("Failed to open state directory: {0}")]
    Store(#[from] StoreError),
}

/// Open the saved cart in `state_dir`, or the configured state directory.
fn open_cart(state_dir: Option<PathBuf>) -> Result<Cart, CartCommandError> {
    let dir = match state_dir {
        Some(dir) => dir,
        None => StorefrontConfig::from_env()?.state_dir,
    };

    let store = FileStore::open(dir)?;
    tracing::debug!(dir = %store.dir().display(), "Opened cart store");
    Ok(Cart::restore(store))
}

/// Log the saved cart's lines and totals.
///
/// # Errors
///
/// Returns `CartCommandError` if the state directory cannot be opened.
pub fn show(state_dir: Option<PathBuf>) -> Result<(), CartCommandError> {
    let cart = open_cart(state_dir)?;

    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return Ok(());
    }

    for line in cart.lines() {
        tracing::info!(
            handle = %line.product.handle,
            quantity = line.quantity.get(),
            line_total = %line.line_total().display(),
            "{}",
            line.product.name
        );
    }

    tracing::info!(
        total_items = cart.total_items(),
        total_price = %cart.total_price().display(),
        "Order total"
    );
    Ok(())
}

/// Empty the saved cart.
///
/// # Errors
///
/// Returns `CartCommandError` if the state directory cannot be opened.
pub fn clear(state_dir: Option<PathBuf>) -> Result<(), CartCommandError> {
    let mut cart = open_cart(state_dir)?;
    let removed = cart.total_items();
    cart.clear();

    tracing::info!(removed, "Cart cleared");
    Ok(())
}
