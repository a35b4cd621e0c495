//! Product catalog: the static list of purchasable products.
//!
//! The catalog document is an ordered JSON array:
//!
//! ```json
//! [
//!   {
//!     "image": {
//!       "thumbnail": "./assets/images/image-waffle-thumbnail.jpg",
//!       "mobile": "./assets/images/image-waffle-mobile.jpg",
//!       "tablet": "./assets/images/image-waffle-tablet.jpg",
//!       "desktop": "./assets/images/image-waffle-desktop.jpg"
//!     },
//!     "name": "Waffle with Berries",
//!     "category": "Waffle",
//!     "price": 6.50
//!   }
//! ]
//! ```
//!
//! Handles are assigned while parsing, in document order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{HandleAllocator, Price, ProductHandle};
use crate::viewport::Breakpoint;

/// Errors produced while parsing a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not a valid catalog.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A product has a negative price.
    #[error("product {name:?} has a negative price ({price})")]
    NegativePrice { name: String, price: Price },

    /// A product has an empty name.
    #[error("product at position {position} has an empty name")]
    EmptyName { position: usize },
}

/// Image variants for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    pub thumbnail: String,
    pub mobile: String,
    pub tablet: String,
    pub desktop: String,
}

impl ImageSet {
    /// The image variant to show at a breakpoint.
    #[must_use]
    pub fn for_breakpoint(&self, breakpoint: Breakpoint) -> &str {
        match breakpoint {
            Breakpoint::Mobile => &self.mobile,
            Breakpoint::Tablet => &self.tablet,
            Breakpoint::Desktop => &self.desktop,
        }
    }

    /// The image variant to show for a viewport width in CSS pixels.
    #[must_use]
    pub fn for_width(&self, width: u32) -> &str {
        self.for_breakpoint(Breakpoint::for_width(width))
    }
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub handle: ProductHandle,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub image: ImageSet,
}

/// A catalog entry as it appears in the document, before a handle is assigned.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    category: String,
    price: Price,
    image: ImageSet,
}

/// The loaded catalog, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: IndexMap<ProductHandle, Product>,
}

impl Catalog {
    /// Parse a catalog document and assign product handles.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the document is not valid JSON of the expected
    /// shape, or if a product has an empty name or a negative price.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        let mut allocator = HandleAllocator::new();
        let mut products = IndexMap::with_capacity(entries.len());

        for (position, entry) in entries.into_iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(CatalogError::EmptyName { position });
            }
            if entry.price.is_negative() {
                return Err(CatalogError::NegativePrice {
                    name: entry.name,
                    price: entry.price,
                });
            }

            let handle = allocator.allocate(&entry.name);
            products.insert(
                handle.clone(),
                Product {
                    handle,
                    name: entry.name,
                    category: entry.category,
                    price: entry.price,
                    image: entry.image,
                },
            );
        }

        Ok(Self { products })
    }

    /// Build a catalog from already-identified products.
    ///
    /// Later products replace earlier ones with the same handle.
    #[must_use]
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|p| (p.handle.clone(), p))
                .collect(),
        }
    }

    /// Look up a product by handle.
    #[must_use]
    pub fn get(&self, handle: &ProductHandle) -> Option<&Product> {
        self.products.get(handle)
    }

    /// Iterate products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
