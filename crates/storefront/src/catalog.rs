//! Static product catalog for the Aurora demo storefront.
//!
//! Fixed, read-only data supplied to the cart engine. A real storefront
//! would fetch this from a product API; the demo ships the list in the
//! binary.

use std::sync::LazyLock;

use aurora_core::{Price, Product};

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    let entries: [(&str, &str, &str, i64, &str); 6] = [
        (
            "1",
            "Classic Denim Jacket",
            "Jackets",
            2499,
            "https://images.unsplash.com/photo-1544022613-e87ca75a784a?w=600&h=800&fit=crop&auto=format",
        ),
        (
            "2",
            "Casual White Shirt",
            "Shirts",
            1299,
            "https://images.unsplash.com/photo-1583743814966-8936f5b7be1a?w=600&h=800&fit=crop&auto=format&q=80",
        ),
        (
            "3",
            "Summer Floral Dress",
            "Dresses",
            1999,
            "https://images.unsplash.com/photo-1515372039744-b8f02a3ae446?w=600&h=800&fit=crop&auto=format",
        ),
        (
            "4",
            "Formal Blazer",
            "Blazers",
            3999,
            "https://images.unsplash.com/photo-1539533018447-63fcce2678e3?w=600&h=800&fit=crop&auto=format",
        ),
        (
            "5",
            "Black Skinny Jeans",
            "Jeans",
            1799,
            "https://images.unsplash.com/photo-1542272604-787c3835535d?w=600&h=800&fit=crop&auto=format",
        ),
        (
            "6",
            "Red Evening Gown",
            "Dresses",
            4999,
            "https://images.unsplash.com/photo-1595777457583-95e059d581b8?w=600&h=800&fit=crop&auto=format&q=80",
        ),
    ];

    entries
        .into_iter()
        .map(|(id, name, category, price, image)| Product {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            brand: "Aurora".to_string(),
            price: Price::new(price),
            image: image.to_string(),
        })
        .collect()
});

/// All catalog products in display order.
#[must_use]
pub fn all() -> &'static [Product] {
    &PRODUCTS
}

/// Look up a product by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|product| product.id == id)
}
