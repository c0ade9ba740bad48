//! Catalog product records.

use serde::{Deserialize, Serialize};

use super::price::Price;

/// A product as published in the catalog.
///
/// Read-only from the cart's point of view: adding a product to the cart
/// copies its fields into a [`super::cart::LineItem`] snapshot rather than
/// holding a reference back into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier. Must be non-empty to be addable.
    pub id: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    /// Price in minor currency units.
    pub price: Price,
    /// Product image URL.
    pub image: String,
}
