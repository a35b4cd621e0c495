//! Order confirmation dialog.
//!
//! The dialog is plain state: open or closed. While open, page scrolling is
//! suppressed. It is dismissed by a click on the backdrop (not the content) or
//! by Escape.

use crate::cart::Cart;

/// Key name that dismisses the dialog.
pub const ESCAPE_KEY: &str = "Escape";

/// User input the dialog reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    /// Click landed on the overlay itself.
    BackdropClick,
    /// Click landed inside the dialog content.
    ContentClick,
    /// A key was pressed, by DOM key name.
    KeyDown(String),
}

/// The order confirmation dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modal {
    open: bool,
}

impl Modal {
    /// A closed dialog.
    #[must_use]
    pub const fn new() -> Self {
        Self { open: false }
    }

    /// Make the dialog visible.
    pub const fn show(&mut self) {
        self.open = true;
    }

    /// Hide the dialog.
    pub const fn hide(&mut self) {
        self.open = false;
    }

    /// Returns true while the dialog is visible.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Returns true while background scrolling should be suppressed.
    #[must_use]
    pub const fn scroll_locked(&self) -> bool {
        self.open
    }

    /// Apply a dismissal trigger. Returns true if the dialog was closed by it.
    pub fn handle(&mut self, event: &ModalEvent) -> bool {
        let dismiss = match event {
            ModalEvent::BackdropClick => true,
            ModalEvent::ContentClick => false,
            ModalEvent::KeyDown(key) => key == ESCAPE_KEY,
        };

        if dismiss && self.open {
            self.hide();
            return true;
        }
        false
    }
}

/// Open the dialog if the cart has items. Returns whether it opened.
pub fn confirm_order(cart: &Cart, modal: &mut Modal) -> bool {
    if cart.total_items() > 0 {
        modal.show();
        true
    } else {
        false
    }
}

/// Empty the cart and close the dialog.
pub fn start_new_order(cart: &mut Cart, modal: &mut Modal) {
    cart.clear();
    modal.hide();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ImageSet, Product};
    use crate::store::MemoryStore;
    use crate::types::{Price, ProductHandle};

    fn waffle() -> Product {
        Product {
            handle: ProductHandle::new("waffle"),
            name: "Waffle".to_string(),
            category: "Waffle".to_string(),
            price: Price::from_cents(650),
            image: ImageSet {
                thumbnail: "t.jpg".to_string(),
                mobile: "m.jpg".to_string(),
                tablet: "t.jpg".to_string(),
                desktop: "d.jpg".to_string(),
            },
        }
    }

    #[test]
    fn test_show_hide() {
        let mut modal = Modal::new();
        assert!(!modal.is_open());
        modal.show();
        assert!(modal.is_open());
        assert!(modal.scroll_locked());
        modal.hide();
        assert!(!modal.is_open());
        assert!(!modal.scroll_locked());
    }

    #[test]
    fn test_backdrop_click_dismisses() {
        let mut modal = Modal::new();
        modal.show();
        assert!(modal.handle(&ModalEvent::BackdropClick));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_content_click_keeps_open() {
        let mut modal = Modal::new();
        modal.show();
        assert!(!modal.handle(&ModalEvent::ContentClick));
        assert!(modal.is_open());
    }

    #[test]
    fn test_escape_dismisses_only_when_open() {
        let mut modal = Modal::new();
        assert!(!modal.handle(&ModalEvent::KeyDown("Escape".to_string())));

        modal.show();
        assert!(!modal.handle(&ModalEvent::KeyDown("Enter".to_string())));
        assert!(modal.is_open());
        assert!(modal.handle(&ModalEvent::KeyDown("Escape".to_string())));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_confirm_on_empty_cart_stays_closed() {
        let cart = Cart::restore(MemoryStore::new());
        let mut modal = Modal::new();
        assert!(!confirm_order(&cart, &mut modal));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_confirm_then_start_new_order() {
        let mut cart = Cart::restore(MemoryStore::new());
        let mut modal = Modal::new();
        cart.add_item(&waffle());

        assert!(confirm_order(&cart, &mut modal));
        assert!(modal.is_open());

        start_new_order(&mut cart, &mut modal);
        assert!(cart.is_empty());
        assert!(!modal.is_open());
    }
}
