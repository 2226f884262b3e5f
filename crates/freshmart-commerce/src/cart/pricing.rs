//! Cart aggregates shown by consuming views.

use crate::cart::Cart;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Totals for a cart, e.g. for a header badge or an order summary panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartSummary {
    /// Sum of quantities.
    pub total_items: i64,
    /// Number of distinct products.
    pub unique_items: usize,
    /// Sum of `unit_price × quantity`.
    pub total_price: Money,
}

impl CartSummary {
    /// Compute the summary of `cart`; `currency` is used when it is empty.
    pub fn of(cart: &Cart, currency: Currency) -> Self {
        Self {
            total_items: cart.total_items(),
            unique_items: cart.unique_items(),
            total_price: cart.total_price(currency),
        }
    }

    /// Check if the summary describes an empty cart.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    #[test]
    fn test_summary_of_cart() {
        let mut cart = Cart::new();
        let greens = Product::new("1", "Rau cải", "rau-cai", Money::new(15_000, Currency::VND), 9);
        cart.add(&greens, 3, None);

        let summary = CartSummary::of(&cart, Currency::VND);
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.unique_items, 1);
        assert_eq!(summary.total_price, Money::new(45_000, Currency::VND));
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_summary_of_empty_cart() {
        let summary = CartSummary::of(&Cart::new(), Currency::USD);
        assert!(summary.is_empty());
        assert_eq!(summary.total_price, Money::zero(Currency::USD));
    }
}
