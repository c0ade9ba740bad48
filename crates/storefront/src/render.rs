//! Cart display projections.
//!
//! Rendering is a pure projection of cart state into view structs plus a
//! [`CartRenderer`] callback the mutator invokes after each change. No
//! mutation happens on this side of the seam.

use aurora_core::{Cart, LineItem, Price};

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    /// Unit price, formatted (e.g. "₹2499").
    pub price: String,
    /// Price × quantity, formatted.
    pub line_total: String,
    pub image: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Formatted cart total.
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Project a cart into display data with the given currency symbol.
    #[must_use]
    pub fn project(cart: &Cart, currency_symbol: &str) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView::project(item, currency_symbol))
                .collect(),
            total: cart.total().display(currency_symbol),
            item_count: cart.item_count(),
        }
    }

    /// An empty cart view.
    #[must_use]
    pub fn empty(currency_symbol: &str) -> Self {
        Self {
            items: Vec::new(),
            total: Price::default().display(currency_symbol),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn project(item: &LineItem, currency_symbol: &str) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.qty,
            price: item.price.display(currency_symbol),
            line_total: item.line_total().display(currency_symbol),
            image: item.image.clone(),
        }
    }
}

/// Render-on-change callback invoked by the mutator after cart-page
/// mutations and explicit cart views.
pub trait CartRenderer: Send + Sync {
    fn render(&self, view: &CartView);
}

/// User-visible notifications (the blocking-alert analog).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use aurora_core::Product;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        let jacket = Product {
            id: "1".to_string(),
            name: "Classic Denim Jacket".to_string(),
            category: "Jackets".to_string(),
            brand: "Aurora".to_string(),
            price: Price::new(2499),
            image: "https://img.example/1.jpg".to_string(),
        };
        cart.add(&jacket);
        cart.add(&jacket);
        cart
    }

    #[test]
    fn test_projection_formats_prices() {
        let view = CartView::project(&cart(), "₹");

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].price, "₹2499");
        assert_eq!(view.items[0].line_total, "₹4998");
        assert_eq!(view.total, "₹4998");
        assert_eq!(view.item_count, 2);
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::empty("₹");
        assert!(view.is_empty());
        assert_eq!(view.total, "₹0");
        assert_eq!(view.item_count, 0);
    }
}
