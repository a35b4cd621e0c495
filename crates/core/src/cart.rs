//! The shopping cart model.
//!
//! A [`Cart`] is an ordered map from [`ProductHandle`] to [`CartLine`]. Every
//! mutation writes the whole map to the backing [`KeyValueStore`] under
//! [`STORAGE_KEY`] and then notifies the registered [`CartListener`]s.
//!
//! # Persisted format
//!
//! An ordered JSON list of `[handle, line]` pairs:
//!
//! ```json
//! [["waffle-with-berries", {"product": {...}, "quantity": 2}]]
//! ```
//!
//! An empty cart is stored as no value at all.
//!
//! Mutations never fail. A store that cannot be written is logged and the
//! in-memory cart stays authoritative.

use std::fmt;
use std::num::NonZeroU32;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::Product;
use crate::store::KeyValueStore;
use crate::types::{Price, ProductHandle};

/// Store key holding the serialized cart.
pub const STORAGE_KEY: &str = "cart";

/// A product plus the quantity selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: NonZeroU32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity.get())
    }
}

/// Which cart panel to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    /// No lines: show the empty-cart placeholder.
    Empty,
    /// At least one line: show the line list and order actions.
    Populated,
}

/// How a product card should be decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// Not in the cart.
    Available,
    /// In the cart with this quantity.
    Selected(NonZeroU32),
}

/// Receives a notification after every cart mutation.
pub trait CartListener: Send + Sync {
    /// Called once the mutation has been applied and persisted.
    fn cart_changed(&self, cart: &Cart);
}

/// Reasons a saved cart is rejected on restore.
#[derive(Debug, Error)]
enum RestoreError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entry {key} holds product {actual}")]
    HandleMismatch {
        key: ProductHandle,
        actual: ProductHandle,
    },
    #[error("duplicate entry {0}")]
    Duplicate(ProductHandle),
}

/// The shopper's cart.
pub struct Cart {
    lines: IndexMap<ProductHandle, CartLine>,
    store: Box<dyn KeyValueStore>,
    listeners: Vec<Box<dyn CartListener>>,
}

impl fmt::Debug for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("lines", &self.lines)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Create a cart backed by `store`, restoring any saved contents.
    ///
    /// A missing value gives an empty cart. An unreadable store or a corrupt
    /// value also gives an empty cart, with a warning.
    pub fn restore(store: impl KeyValueStore + 'static) -> Self {
        let lines = match store.get(STORAGE_KEY) {
            Ok(Some(saved)) => decode(&saved).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable saved cart");
                IndexMap::new()
            }),
            Ok(None) => IndexMap::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read saved cart, starting empty");
                IndexMap::new()
            }
        };

        debug!(lines = lines.len(), "Cart restored");

        Self {
            lines,
            store: Box::new(store),
            listeners: Vec::new(),
        }
    }

    /// Register a listener for cart changes.
    pub fn subscribe(&mut self, listener: impl CartListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Add one unit of `product`, inserting a new line if needed.
    pub fn add_item(&mut self, product: &Product) {
        match self.lines.get_mut(&product.handle) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => {
                self.lines.insert(
                    product.handle.clone(),
                    CartLine {
                        product: product.clone(),
                        quantity: NonZeroU32::MIN,
                    },
                );
            }
        }
        self.commit();
    }

    /// Remove the line for `handle`. Removing a missing line is a no-op.
    pub fn remove_item(&mut self, handle: &ProductHandle) {
        self.lines.shift_remove(handle);
        self.commit();
    }

    /// Set the quantity of an existing line.
    ///
    /// Unknown handles are ignored. A quantity of zero or less removes the
    /// line. Quantities above `u32::MAX` saturate.
    pub fn update_quantity(&mut self, handle: &ProductHandle, quantity: i64) {
        if !self.lines.contains_key(handle) {
            return;
        }

        let Some(quantity) = u32::try_from(quantity.max(0))
            .map_or(Some(NonZeroU32::MAX), NonZeroU32::new)
        else {
            self.remove_item(handle);
            return;
        };

        if let Some(line) = self.lines.get_mut(handle) {
            line.quantity = quantity;
        }
        self.commit();
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.commit();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines
            .values()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Sum of price times quantity across all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.values().map(CartLine::line_total).sum()
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// The line for `handle`, if present.
    #[must_use]
    pub fn line(&self, handle: &ProductHandle) -> Option<&CartLine> {
        self.lines.get(handle)
    }

    /// Quantity selected for `handle`, if present.
    #[must_use]
    pub fn quantity_of(&self, handle: &ProductHandle) -> Option<NonZeroU32> {
        self.lines.get(handle).map(|line| line.quantity)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Which cart panel should be visible.
    #[must_use]
    pub fn panel_mode(&self) -> PanelMode {
        if self.is_empty() {
            PanelMode::Empty
        } else {
            PanelMode::Populated
        }
    }

    /// How the card for `handle` should be decorated.
    #[must_use]
    pub fn card_state(&self, handle: &ProductHandle) -> CardState {
        self.quantity_of(handle)
            .map_or(CardState::Available, CardState::Selected)
    }

    /// Persist, then notify listeners.
    fn commit(&self) {
        self.persist();
        for listener in &self.listeners {
            listener.cart_changed(self);
        }
    }

    /// Write the cart to the store. An empty cart removes the slot.
    fn persist(&self) {
        if self.lines.is_empty() {
            if let Err(e) = self.store.remove(STORAGE_KEY) {
                warn!(error = %e, "Failed to remove saved cart");
            }
            return;
        }

        let entries: Vec<(&ProductHandle, &CartLine)> = self.lines.iter().collect();
        let encoded = match serde_json::to_string(&entries) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart");
                return;
            }
        };

        if let Err(e) = self.store.set(STORAGE_KEY, &encoded) {
            warn!(error = %e, "Failed to save cart");
        }
    }
}

/// Decode a saved cart, rejecting entries whose key and product disagree.
fn decode(saved: &str) -> Result<IndexMap<ProductHandle, CartLine>, RestoreError> {
    let entries: Vec<(ProductHandle, CartLine)> = serde_json::from_str(saved)?;
    let mut lines = IndexMap::with_capacity(entries.len());

    for (key, line) in entries {
        if key != line.product.handle {
            return Err(RestoreError::HandleMismatch {
                key,
                actual: line.product.handle,
            });
        }
        if lines.contains_key(&key) {
            return Err(RestoreError::Duplicate(key));
        }
        lines.insert(key, line);
    }

    Ok(lines)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::ImageSet;
    use crate::store::MemoryStore;

    fn product(name: &str, cents: i64) -> Product {
        let handle = ProductHandle::from_name(name);
        Product {
            name: name.to_string(),
            category: "Dessert".to_string(),
            price: Price::from_cents(cents),
            image: ImageSet {
                thumbnail: format!("./images/{handle}-thumbnail.jpg"),
                mobile: format!("./images/{handle}-mobile.jpg"),
                tablet: format!("./images/{handle}-tablet.jpg"),
                desktop: format!("./images/{handle}-desktop.jpg"),
            },
            handle,
        }
    }

    fn empty_cart() -> (Cart, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Cart::restore(Arc::clone(&store)), store)
    }

    #[derive(Default)]
    struct CountingListener(Arc<AtomicUsize>);

    impl CartListener for CountingListener {
        fn cart_changed(&self, _cart: &Cart) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    #[test]
    fn test_waffle_scenario() {
        let (mut cart, _) = empty_cart();
        let waffle = product("Waffle", 650);

        cart.add_item(&waffle);
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.total_price(), Price::from_cents(650));

        cart.add_item(&waffle);
        assert_eq!(cart.quantity_of(&waffle.handle).unwrap().get(), 2);
        assert_eq!(cart.total_price(), Price::from_cents(1300));

        cart.update_quantity(&waffle.handle, 5);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), Price::from_cents(3250));

        cart.remove_item(&waffle.handle);
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_totals_track_mixed_operations() {
        let (mut cart, _) = empty_cart();
        let waffle = product("Waffle", 650);
        let baklava = product("Pistachio Baklava", 400);
        let pie = product("Lemon Meringue Pie", 500);

        cart.add_item(&waffle);
        cart.add_item(&baklava);
        cart.add_item(&baklava);
        cart.add_item(&pie);
        cart.update_quantity(&pie.handle, 3);
        cart.update_quantity(&waffle.handle, 0);
        cart.add_item(&waffle);

        let expected_items: u64 = cart.lines().map(|l| u64::from(l.quantity.get())).sum();
        let expected_price: Price = cart
            .lines()
            .map(|l| l.product.price.times(l.quantity.get()))
            .sum();

        assert_eq!(cart.total_items(), 6);
        assert_eq!(cart.total_items(), expected_items);
        assert_eq!(cart.total_price(), Price::from_cents(650 + 800 + 1500));
        assert_eq!(cart.total_price(), expected_price);
    }

    #[test]
    fn test_remove_item_twice_is_noop() {
        let (mut cart, _) = empty_cart();
        let waffle = product("Waffle", 650);
        let pie = product("Pie", 500);
        cart.add_item(&waffle);
        cart.add_item(&pie);

        cart.remove_item(&waffle.handle);
        let after_first: Vec<_> = cart.lines().cloned().collect();
        cart.remove_item(&waffle.handle);
        let after_second: Vec<_> = cart.lines().cloned().collect();

        assert_eq!(after_first, after_second);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let (mut cart, _) = empty_cart();
        let waffle = product("Waffle", 650);
        let pie = product("Pie", 500);
        cart.add_item(&waffle);
        cart.add_item(&pie);

        cart.update_quantity(&waffle.handle, 0);
        assert!(cart.line(&waffle.handle).is_none());

        cart.update_quantity(&pie.handle, -5);
        assert!(cart.line(&pie.handle).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_handle_is_noop() {
        let (mut cart, store) = empty_cart();
        let counter = Arc::new(AtomicUsize::new(0));
        cart.subscribe(CountingListener(Arc::clone(&counter)));

        cart.update_quantity(&ProductHandle::new("ghost"), 3);

        assert!(cart.is_empty());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_update_quantity_can_decrease_and_jump() {
        let (mut cart, _) = empty_cart();
        let waffle = product("Waffle", 650);
        cart.add_item(&waffle);

        cart.update_quantity(&waffle.handle, 10);
        assert_eq!(cart.total_items(), 10);
        cart.update_quantity(&waffle.handle, 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_update_quantity_saturates() {
        let (mut cart, _) = empty_cart();
        let waffle = product("Waffle", 650);
        cart.add_item(&waffle);

        cart.update_quantity(&waffle.handle, i64::MAX);
        assert_eq!(cart.quantity_of(&waffle.handle), Some(NonZeroU32::MAX));
    }

    #[test]
    fn test_clear() {
        let (mut cart, _) = empty_cart();
        cart.add_item(&product("Waffle", 650));
        cart.add_item(&product("Pie", 500));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_insertion_order_survives_removal() {
        let (mut cart, _) = empty_cart();
        let a = product("A", 100);
        let b = product("B", 100);
        let c = product("C", 100);
        cart.add_item(&a);
        cart.add_item(&b);
        cart.add_item(&c);
        cart.add_item(&a);

        cart.remove_item(&b.handle);
        let order: Vec<_> = cart.lines().map(|l| l.product.name.as_str()).collect();
        assert_eq!(order, ["A", "C"]);
    }

    #[test]
    fn test_panel_mode_and_card_state() {
        let (mut cart, _) = empty_cart();
        let waffle = product("Waffle", 650);
        assert_eq!(cart.panel_mode(), PanelMode::Empty);
        assert_eq!(cart.card_state(&waffle.handle), CardState::Available);

        cart.add_item(&waffle);
        cart.add_item(&waffle);
        assert_eq!(cart.panel_mode(), PanelMode::Populated);
        assert_eq!(
            cart.card_state(&waffle.handle),
            CardState::Selected(NonZeroU32::new(2).unwrap())
        );
    }

    // =========================================================================
    // Persistence & notification
    // =========================================================================

    #[test]
    fn test_persist_then_restore_reproduces_cart() {
        let (mut cart, store) = empty_cart();
        let waffle = product("Waffle", 650);
        let pie = product("Pie", 500);
        cart.add_item(&pie);
        cart.add_item(&waffle);
        cart.update_quantity(&waffle.handle, 4);

        let restored = Cart::restore(Arc::clone(&store));
        let original: Vec<_> = cart.lines().cloned().collect();
        let reloaded: Vec<_> = restored.lines().cloned().collect();
        assert_eq!(original, reloaded);
        assert_eq!(restored.total_price(), Price::from_cents(500 + 2600));
    }

    #[test]
    fn test_persisted_format_is_ordered_pairs() {
        let (mut cart, store) = empty_cart();
        cart.add_item(&product("Waffle", 650));

        let saved = store.get(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(value[0][0], "waffle");
        assert_eq!(value[0][1]["quantity"], 1);
        assert_eq!(value[0][1]["product"]["name"], "Waffle");
    }

    #[test]
    fn test_emptying_the_cart_removes_saved_value() {
        let (mut cart, store) = empty_cart();
        cart.add_item(&product("Waffle", 650));
        cart.clear();
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);

        let waffle = product("Waffle", 650);
        cart.add_item(&waffle);
        assert!(store.get(STORAGE_KEY).unwrap().is_some());
        cart.remove_item(&waffle.handle);
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
        assert!(Cart::restore(Arc::clone(&store)).is_empty());
    }

    #[test]
    fn test_restore_missing_value_is_empty() {
        let cart = Cart::restore(MemoryStore::new());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_restore_corrupt_value_is_empty() {
        let cart = Cart::restore(MemoryStore::with_value(STORAGE_KEY, "{not json"));
        assert!(cart.is_empty());

        let cart = Cart::restore(MemoryStore::with_value(STORAGE_KEY, "{\"a\": 1}"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_restore_rejects_zero_quantity() {
        let (mut cart, store) = empty_cart();
        cart.add_item(&product("Waffle", 650));
        let saved = store.get(STORAGE_KEY).unwrap().unwrap();
        let tampered = saved.replace("\"quantity\":1", "\"quantity\":0");

        let cart = Cart::restore(MemoryStore::with_value(STORAGE_KEY, &tampered));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_restore_rejects_mismatched_key() {
        let (mut cart, store) = empty_cart();
        cart.add_item(&product("Waffle", 650));
        let saved = store.get(STORAGE_KEY).unwrap().unwrap();
        let tampered = saved.replacen("[[\"waffle\"", "[[\"pie\"", 1);

        let cart = Cart::restore(MemoryStore::with_value(STORAGE_KEY, &tampered));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_restore_rejects_duplicate_key() {
        let (mut cart, store) = empty_cart();
        cart.add_item(&product("Waffle", 650));
        let saved = store.get(STORAGE_KEY).unwrap().unwrap();
        let entry = saved
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap();
        let tampered = format!("[{entry},{entry}]");

        assert!(matches!(decode(&tampered), Err(RestoreError::Duplicate(_))));
        let cart = Cart::restore(MemoryStore::with_value(STORAGE_KEY, &tampered));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_huge_price_and_quantity_do_not_overflow() {
        let (mut cart, store) = empty_cart();
        let mut gold = product("Gold Leaf Sundae", 0);
        gold.price = Price::new(Decimal::from_str_exact("100000000000000000000").unwrap());
        let waffle = product("Waffle", 650);

        cart.add_item(&gold);
        cart.add_item(&waffle);
        cart.update_quantity(&gold.handle, i64::MAX);

        let max = Price::new(Decimal::MAX);
        assert_eq!(cart.line(&gold.handle).unwrap().line_total(), max);
        assert_eq!(cart.total_price(), max);

        let restored = Cart::restore(Arc::clone(&store));
        assert_eq!(restored.total_price(), max);
        assert_eq!(restored.total_items(), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_listeners_run_after_each_mutation() {
        let (mut cart, _) = empty_cart();
        let counter = Arc::new(AtomicUsize::new(0));
        cart.subscribe(CountingListener(Arc::clone(&counter)));
        let waffle = product("Waffle", 650);

        cart.add_item(&waffle);
        cart.update_quantity(&waffle.handle, 3);
        cart.remove_item(&waffle.handle);
        cart.clear();

        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_listener_sees_persisted_state() {
        struct Check(Arc<MemoryStore>);
        impl CartListener for Check {
            fn cart_changed(&self, cart: &Cart) {
                let saved = self.0.get(STORAGE_KEY).unwrap().unwrap();
                let restored = decode(&saved).unwrap();
                assert_eq!(restored.len(), cart.len());
            }
        }

        let (mut cart, store) = empty_cart();
        cart.subscribe(Check(Arc::clone(&store)));
        cart.add_item(&product("Waffle", 650));
        cart.add_item(&product("Pie", 500));
    }
}
