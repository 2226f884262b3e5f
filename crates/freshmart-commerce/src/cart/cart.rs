//! Cart and cart line types.
//!
//! A [`Cart`] upholds two invariants after every operation: at most one line
//! per product id, and every line quantity lies in `[1, max]`, where `max` is
//! the product's stock, optionally capped further by a per-line limit.
//! Out-of-range requests are clamped or ignored instead of rejected.

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// One product-quantity pairing.
///
/// The product is a snapshot taken when the line was created, so the line
/// keeps the price the customer saw even if the catalog changes later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    /// Product snapshot.
    pub product: Product,
    /// Quantity, always at least 1.
    pub quantity: i64,
}

impl CartLine {
    /// Product identifier of this line.
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price captured at add time.
    pub fn unit_price(&self) -> Money {
        self.product.price
    }

    /// `unit_price × quantity`, saturating on overflow.
    pub fn line_total(&self) -> Money {
        Money::saturating_total(
            [(self.product.price, self.quantity)],
            self.product.price.currency,
        )
    }
}

/// A shopping cart: lines in insertion order.
///
/// Serializes as a bare JSON list of `{ "product": .., "quantity": .. }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines, oldest first.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line holding `product_id`, if any.
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product.id == product_id)
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn unique_items(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across all lines, saturating at `i64::MAX`.
    pub fn total_items(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |total, l| total.saturating_add(l.quantity))
    }

    /// Currency of the lines, if the cart has any.
    pub fn currency(&self) -> Option<Currency> {
        self.lines.first().map(|l| l.product.price.currency)
    }

    /// Sum of `unit_price × quantity` over all lines.
    ///
    /// An empty cart totals zero in `fallback`; otherwise the lines' own
    /// currency is used.
    pub fn total_price(&self, fallback: Currency) -> Money {
        let currency = self.currency().unwrap_or(fallback);
        Money::saturating_total(
            self.lines.iter().map(|l| (l.product.price, l.quantity)),
            currency,
        )
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line grows by `quantity`; otherwise a new line is
    /// appended. The resulting quantity is clamped to the product's maximum.
    /// Requests for a non-positive quantity, an out-of-stock product or a
    /// product priced in another currency than the cart are ignored.
    ///
    /// Returns the line's quantity when the cart changed, `Some(0)` when an
    /// existing line was dropped because its product ran out of stock. A
    /// refreshed stock bound counts as a change even if the quantity holds.
    pub fn add(&mut self, product: &Product, quantity: i64, cap: Option<i64>) -> Option<i64> {
        if quantity <= 0 {
            return None;
        }
        if self
            .currency()
            .is_some_and(|currency| currency != product.price.currency)
        {
            return None;
        }

        let max = product.max_line_quantity(cap);

        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            // The price snapshot stays; only the stock bound follows the
            // newest product data.
            let restocked = line.product.stock != product.stock;
            line.product.stock = product.stock;
            let target = line.quantity.saturating_add(quantity).min(max);
            if target < 1 {
                self.lines.retain(|l| l.product.id != product.id);
                return Some(0);
            }
            if target == line.quantity {
                return restocked.then_some(target);
            }
            line.quantity = target;
            return Some(target);
        }

        let target = quantity.min(max);
        if target < 1 {
            return None;
        }
        self.lines.push(CartLine {
            product: product.clone(),
            quantity: target,
        });
        Some(target)
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.product.id != product_id);
        self.lines.len() < len_before
    }

    /// Set the quantity of an existing line.
    ///
    /// `quantity <= 0` removes the line and values above the maximum are
    /// clamped. Unknown ids are ignored.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        cap: Option<i64>,
    ) -> LineChange {
        if quantity <= 0 {
            return if self.remove(product_id) {
                LineChange::Removed
            } else {
                LineChange::Unchanged
            };
        }

        let Some(line) = self.lines.iter_mut().find(|l| &l.product.id == product_id) else {
            return LineChange::Unchanged;
        };

        let target = quantity.min(line.product.max_line_quantity(cap));
        if target < 1 {
            self.remove(product_id);
            return LineChange::Removed;
        }
        if target == line.quantity {
            return LineChange::Unchanged;
        }
        line.quantity = target;
        LineChange::Quantity(target)
    }

    /// Remove every line. Returns whether the cart had any.
    pub fn clear(&mut self) -> bool {
        let had_lines = !self.lines.is_empty();
        self.lines.clear();
        had_lines
    }

    /// Re-establish the invariants on a cart read from storage.
    ///
    /// Duplicate product ids are merged into the first line, quantities are
    /// clamped to each snapshot's maximum, empty lines and lines in a
    /// currency other than the first line's are dropped. Returns how many
    /// stored lines were altered or discarded.
    pub fn normalize(&mut self, cap: Option<i64>) -> usize {
        let stored = std::mem::take(&mut self.lines);
        let mut adjusted = 0;

        for line in stored {
            let duplicate = self.line(&line.product.id).is_some();
            let kept = self.add(&line.product, line.quantity, cap);
            if duplicate || kept != Some(line.quantity) {
                adjusted += 1;
            }
        }
        adjusted
    }
}

/// Outcome of [`Cart::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// Nothing changed.
    Unchanged,
    /// The line now holds this quantity.
    Quantity(i64),
    /// The line was removed.
    Removed,
}
