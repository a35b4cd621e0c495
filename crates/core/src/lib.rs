//! Cartwheel Core - cart, catalog and dialog models.
//!
//! This crate provides the state-management side of the Cartwheel widget:
//! - `storefront` - Local web page that renders the catalog and the cart
//! - `cli` - Command-line tools for inspecting catalogs and the saved cart
//!
//! # Architecture
//!
//! The core crate contains only types, models and traits - no network, no
//! filesystem, no HTTP. Persistence goes through the [`store::KeyValueStore`]
//! trait so the storefront can plug in a file-backed slot while tests use
//! [`store::MemoryStore`].
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product handles and prices
//! - [`catalog`] - Products, image variants and catalog parsing
//! - [`cart`] - The cart model, its persistence and change notification
//! - [`store`] - Durable key-value slot abstraction
//! - [`modal`] - Order confirmation dialog and the confirm/new-order flow
//! - [`viewport`] - Breakpoint selection for responsive images

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod modal;
pub mod store;
pub mod types;
pub mod viewport;

pub use cart::{CardState, Cart, CartLine, CartListener, PanelMode};
pub use catalog::{Catalog, CatalogError, ImageSet, Product};
pub use modal::{Modal, ModalEvent, confirm_order, start_new_order};
pub use store::{KeyValueStore, MemoryStore, StoreError};
pub use types::*;
pub use viewport::{Breakpoint, RESIZE_DEBOUNCE};
