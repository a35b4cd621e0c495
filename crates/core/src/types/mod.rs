//! Core types for Cartwheel.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod handle;
pub mod price;

pub use handle::{HandleAllocator, ProductHandle};
pub use price::Price;
