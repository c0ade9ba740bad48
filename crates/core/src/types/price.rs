//! Price representation in minor currency units.

use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A price in minor currency units (e.g., paise, cents).
///
/// Catalog prices and cart totals are whole integers on the wire, so this is
/// a transparent newtype over `i64` rather than a decimal type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a price from an amount in minor units.
    #[must_use]
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn amount(self) -> i64 {
        self.0
    }

    /// The price multiplied by a quantity (a line-item total).
    #[must_use]
    pub const fn times(self, qty: u32) -> Self {
        Self(self.0 * qty as i64)
    }

    /// Format for display with a currency symbol (e.g., "₹2499").
    #[must_use]
    pub fn display(self, symbol: &str) -> String {
        format!("{symbol}{}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl From<i64> for Price {
    fn from(minor_units: i64) -> Self {
        Self(minor_units)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::new(100).times(2), Price::new(500).times(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::new(700));
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_value(Price::new(2499)).expect("serialize");
        assert_eq!(json, serde_json::json!(2499));
    }

    #[test]
    fn test_display_with_symbol() {
        assert_eq!(Price::new(1799).display("₹"), "₹1799");
    }
}
