//! Cart and cart line types.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// A session-scoped shopping cart.
///
/// Holds at most one line per product id, and every line has a quantity of at
/// least 1. Lines keep insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity 1. Returns the line's quantity after the change.
    pub fn add_item(&mut self, product: &Product) -> Result<u32, CommerceError> {
        if self.lines.is_empty() {
            self.currency = product.price.currency;
        } else if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            existing.quantity = existing
                .quantity
                .saturating_add(1)
                .min(MAX_QUANTITY_PER_ITEM);
            debug!(product_id = %product.id, quantity = existing.quantity, "cart line incremented");
            return Ok(existing.quantity);
        }

        self.lines.push(CartLine {
            product: product.clone(),
            quantity: 1,
        });
        debug!(product_id = %product.id, "cart line added");
        Ok(1)
    }

    /// Adjust a line's quantity by `delta`, clamped to `1..=MAX_QUANTITY_PER_ITEM`.
    ///
    /// Decrementing never removes a line. Unknown ids are ignored; the return
    /// value reports whether a line was found.
    pub fn update_quantity(&mut self, id: &ProductId, delta: i64) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| &l.product.id == id) else {
            return false;
        };
        let next = i64::from(line.quantity)
            .saturating_add(delta)
            .clamp(1, i64::from(MAX_QUANTITY_PER_ITEM));
        line.quantity = u32::try_from(next).unwrap_or(1);
        debug!(product_id = %id, quantity = line.quantity, "cart line quantity updated");
        true
    }

    /// Remove the line for a product. Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.product.id != id);
        self.lines.len() < len_before
    }

    /// Clear all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `unit price * quantity` over all lines.
    ///
    /// Computed on every call, so it always reflects the current lines.
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(self.currency), |acc, line| {
                acc.plus_cents(line.total_price().amount_cents)
            })
    }

    /// Exact subtotal, or None if it does not fit in the amount range.
    pub fn checked_subtotal(&self) -> Option<Money> {
        self.lines.iter().try_fold(Money::zero(self.currency), |acc, line| {
            acc.try_add(&line.unit_price().checked_times(line.quantity)?)
        })
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Get the line for a product.
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product.id == id)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency of the cart's prices.
    pub fn currency(&self) -> Currency {
        self.currency
    }
}

/// One product and its quantity within a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Snapshot of the product at the time it was added.
    pub product: Product,
    /// Quantity, always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Unit price of the line's product.
    pub fn unit_price(&self) -> Money {
        self.product.price
    }

    /// Unit price times quantity.
    pub fn total_price(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use proptest::prelude::*;

    fn product(id: &str, cents: i64) -> Product {
        Product::new(id, format!("Product {id}"), Money::new(cents, Currency::EUR), Category::Art)
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        let a = product("a", 1000);
        assert_eq!(cart.add_item(&a).unwrap(), 1);
        assert_eq!(cart.add_item(&a).unwrap(), 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&a.id).unwrap().quantity, 2);
    }

    #[test]
    fn test_update_quantity_clamps_at_one() {
        let mut cart = Cart::new();
        let a = product("a", 1000);
        cart.add_item(&a).unwrap();

        assert!(cart.update_quantity(&a.id, 4));
        assert_eq!(cart.line(&a.id).unwrap().quantity, 5);

        assert!(cart.update_quantity(&a.id, -10));
        assert_eq!(cart.line(&a.id).unwrap().quantity, 1);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_update_missing_line_is_silent() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 1000)).unwrap();
        let before = cart.clone();

        assert!(!cart.update_quantity(&ProductId::new("missing"), 1));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        let a = product("a", 1000);
        cart.add_item(&a).unwrap();

        assert!(cart.remove_item(&a.id));
        assert!(!cart.remove_item(&a.id));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::new();
        let a = product("a", 1000);
        let b = product("b", 2000);
        cart.add_item(&a).unwrap();
        cart.add_item(&a).unwrap();
        cart.add_item(&b).unwrap();

        assert_eq!(cart.subtotal().amount_cents, 4000);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_checked_subtotal_reports_overflow() {
        let mut cart = Cart::new();
        let a = product("a", 1000);
        cart.add_item(&a).unwrap();
        cart.add_item(&a).unwrap();
        assert_eq!(cart.checked_subtotal(), Some(cart.subtotal()));

        let pricey = product("pricey", i64::MAX / 2);
        cart.add_item(&pricey).unwrap();
        cart.add_item(&pricey).unwrap();
        assert_eq!(cart.checked_subtotal(), None);
    }

    #[test]
    fn test_quantity_saturates_at_limit() {
        let mut cart = Cart::new();
        let a = product("a", 100);
        cart.add_item(&a).unwrap();
        cart.update_quantity(&a.id, i64::MAX);
        assert_eq!(cart.line(&a.id).unwrap().quantity, MAX_QUANTITY_PER_ITEM);

        assert_eq!(cart.add_item(&a).unwrap(), MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 100)).unwrap();
        let usd = Product::new("u", "Imported", Money::new(100, Currency::USD), Category::Art);

        let err = cart.add_item(&usd).unwrap_err();
        assert!(matches!(err, CommerceError::CurrencyMismatch { .. }));
        assert_eq!(cart.lines().len(), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8),
        Update(u8, i64),
        Remove(u8),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..5).prop_map(Op::Add),
            (0u8..6, -20i64..20).prop_map(|(i, d)| Op::Update(i, d)),
            (0u8..6).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn cart_lines_stay_unique_and_positive(ops in prop::collection::vec(arb_op(), 0..60)) {
            let products: Vec<Product> = (0..5)
                .map(|i| product(&format!("p{i}"), 100 * (i64::from(i) + 1)))
                .collect();
            let mut cart = Cart::new();

            for op in ops {
                match op {
                    Op::Add(i) => {
                        cart.add_item(&products[usize::from(i)]).unwrap();
                    }
                    Op::Update(i, d) => {
                        cart.update_quantity(&ProductId::new(format!("p{i}")), d);
                    }
                    Op::Remove(i) => {
                        cart.remove_item(&ProductId::new(format!("p{i}")));
                    }
                }

                let mut ids: Vec<_> = cart.lines().iter().map(|l| l.product.id.clone()).collect();
                let len = ids.len();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), len);
                prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));

                let expected: i64 = cart
                    .lines()
                    .iter()
                    .map(|l| l.product.price.amount_cents * i64::from(l.quantity))
                    .sum();
                prop_assert_eq!(cart.subtotal().amount_cents, expected);
            }
        }
    }
}
