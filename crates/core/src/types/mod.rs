//! Core types for the Aurora demo storefront.
//!
//! This module provides the domain vocabulary shared by the cart engine and
//! the analytics layer.

pub mod cart;
pub mod order;
pub mod page;
pub mod price;
pub mod product;

pub use cart::{Adjustment, Cart, LineItem};
pub use order::OrderId;
pub use page::Page;
pub use price::Price;
pub use product::Product;
