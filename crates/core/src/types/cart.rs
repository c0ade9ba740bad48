//! Cart state: ordered line items with pure mutation and derivation.
//!
//! The cart is serialized as a bare JSON array of line items - the exact
//! shape written under the `"cart"` key of the persistent store - so
//! [`Cart`] is `#[serde(transparent)]` over its item vector.

use serde::{Deserialize, Serialize};

use super::price::Price;
use super::product::Product;

/// A product entry in the cart with an associated quantity.
///
/// Snapshot of the product fields at add time plus a mutable quantity.
/// Invariant: `qty >= 1`; a quantity driven to zero or below removes the
/// line item instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: Price,
    pub image: String,
    pub qty: u32,
}

impl LineItem {
    /// Snapshot a product into a fresh line item with quantity 1.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            price: product.price,
            image: product.image.clone(),
            qty: 1,
        }
    }

    /// Price times quantity for this line.
    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.price.times(self.qty)
    }
}

/// Outcome of applying a quantity delta to a line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    /// No line item with the given id.
    NotFound,
    /// Quantity updated; carries the new quantity.
    Updated(u32),
    /// Quantity fell to zero or below; the line item was removed.
    Removed(LineItem),
}

/// Ordered cart contents. Insertion order is the order of first add.
///
/// At most one line item exists per product id. Mutation goes through the
/// methods here; all of them are pure state transitions with no I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct line items (not total quantity).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Look up a line item by product id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Add a product: increment the existing line item's quantity, or append
    /// a quantity-1 snapshot. Returns the post-mutation quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.qty += 1;
            item.qty
        } else {
            self.items.push(LineItem::from_product(product));
            1
        }
    }

    /// Apply a signed quantity delta to a line item.
    ///
    /// A resulting quantity of zero or below removes the item, preserving
    /// the order of the remaining items.
    pub fn adjust(&mut self, id: &str, delta: i64) -> Adjustment {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return Adjustment::NotFound;
        };

        let new_qty = i64::from(self.items[index].qty) + delta;
        if new_qty <= 0 {
            return Adjustment::Removed(self.items.remove(index));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let new_qty = new_qty as u32;
        self.items[index].qty = new_qty;
        Adjustment::Updated(new_qty)
    }

    /// Remove a line item by id, preserving the order of the remaining
    /// items. Returns the removed item, or `None` if the id is absent.
    pub fn remove(&mut self, id: &str) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total cart value: Σ price × qty over all line items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Total quantity across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.qty)).sum()
    }
}
