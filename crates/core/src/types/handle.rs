//! Product handles: stable, unique product identifiers.
//!
//! A handle is derived from the product's display name when the catalog is
//! loaded. Two products with the same name get distinct handles (`-2`, `-3`,
//! ...) in catalog order, so the cart never merges distinct products.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback handle for names that contain no letters or digits.
const EMPTY_SLUG: &str = "product";

/// A URL-safe product identifier, unique within a catalog.
///
/// # Example
///
/// ```rust
/// # use cartwheel_core::ProductHandle;
/// let handle = ProductHandle::from_name("Waffle with Berries");
/// assert_eq!(handle.as_str(), "waffle-with-berries");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductHandle(String);

impl ProductHandle {
    /// Wrap an existing handle string (e.g. from a form field).
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Derive a handle from a display name.
    ///
    /// Letters and digits are lowercased; every other run of characters
    /// collapses into a single `-`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;

        for c in name.chars() {
            if c.is_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.extend(c.to_lowercase());
            } else {
                pending_dash = true;
            }
        }

        if slug.is_empty() {
            slug.push_str(EMPTY_SLUG);
        }

        Self(slug)
    }

    /// Get the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductHandle {
    fn from(handle: &str) -> Self {
        Self::new(handle)
    }
}

/// Hands out unique handles in catalog order.
#[derive(Debug, Default)]
pub struct HandleAllocator {
    taken: HashSet<ProductHandle>,
}

impl HandleAllocator {
    /// Create an allocator with no handles taken.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a handle for `name`, suffixing `-2`, `-3`, ... on collision.
    pub fn allocate(&mut self, name: &str) -> ProductHandle {
        let base = ProductHandle::from_name(name);
        if self.taken.insert(base.clone()) {
            return base;
        }

        let mut n: u32 = 2;
        loop {
            let candidate = ProductHandle(format!("{}-{n}", base.0));
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
