//! Order types.

use crate::cart::{Cart, CartLine};
use crate::checkout::{PaymentMethod, ShippingDetails};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use crate::pricing::{PriceQuote, PricingPolicy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
        }
    }
}

/// A line item captured into an order.
///
/// Holds copies of the product fields, so later catalog changes never alter a
/// placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl OrderItem {
    /// Unit price times quantity.
    pub fn total_price(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            unit_price: line.product.price,
            quantity: line.quantity,
        }
    }
}

/// A placed order.
///
/// Orders are immutable once built. Totals are frozen at creation and always
/// satisfy `total == subtotal + shipping_cost + duties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "super::record::OrderRecord", try_from = "super::record::OrderRecord")]
pub struct Order {
    pub(super) id: OrderId,
    pub(super) created_at: DateTime<Utc>,
    pub(super) items: Vec<OrderItem>,
    pub(super) pricing: PriceQuote,
    pub(super) shipping_details: ShippingDetails,
    pub(super) payment_method: PaymentMethod,
    pub(super) status: OrderStatus,
}

impl Order {
    /// Build a pending order from a snapshot of the cart.
    pub fn place(
        id: OrderId,
        created_at: DateTime<Utc>,
        cart: &Cart,
        shipping_details: ShippingDetails,
        payment_method: PaymentMethod,
        policy: &PricingPolicy,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        let pricing = cart
            .checked_subtotal()
            .and_then(|subtotal| policy.checked_quote(subtotal))
            .ok_or(CommerceError::AmountOverflow)?;
        Ok(Self {
            id,
            created_at,
            items: cart.lines().iter().map(OrderItem::from).collect(),
            pricing,
            shipping_details,
            payment_method,
            status: OrderStatus::Pending,
        })
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Money {
        self.pricing.subtotal
    }

    pub fn shipping_cost(&self) -> Money {
        self.pricing.shipping_cost
    }

    pub fn duties(&self) -> Money {
        self.pricing.duties
    }

    pub fn total(&self) -> Money {
        self.pricing.total
    }

    /// The full pricing breakdown.
    pub fn pricing(&self) -> &PriceQuote {
        &self.pricing
    }

    pub fn shipping_details(&self) -> &ShippingDetails {
        &self.shipping_details
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Total number of units ordered.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Product};
    use crate::checkout::fixtures::shipping_details;
    use crate::money::Currency;

    #[test]
    fn test_place_freezes_totals() {
        let mut cart = Cart::new();
        let scarf = Product::new("s", "Scarf", Money::new(4000, Currency::EUR), Category::Accessories);
        cart.add_item(&scarf).unwrap();
        cart.update_quantity(&scarf.id, 1);

        let order = Order::place(
            OrderId::new("ETH-42"),
            Utc::now(),
            &cart,
            shipping_details(),
            PaymentMethod::Card,
            &PricingPolicy::STANDARD,
        )
        .unwrap();

        assert_eq!(order.subtotal().amount_cents, 8000);
        assert_eq!(order.total().amount_cents, 11750);
        assert_eq!(order.items()[0].quantity, 2);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.pricing().is_consistent());

        cart.update_quantity(&scarf.id, 5);
        assert_eq!(order.items()[0].quantity, 2);
    }

    #[test]
    fn test_place_rejects_empty_cart() {
        let err = Order::place(
            OrderId::generate(),
            Utc::now(),
            &Cart::new(),
            shipping_details(),
            PaymentMethod::Card,
            &PricingPolicy::STANDARD,
        )
        .unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));
    }

    #[test]
    fn test_place_rejects_overflowing_total() {
        let mut cart = Cart::new();
        let vault = Product::new(
            "v",
            "Vault",
            Money::new(i64::MAX - 1000, Currency::EUR),
            Category::Miscellaneous,
        );
        cart.add_item(&vault).unwrap();

        let err = Order::place(
            OrderId::generate(),
            Utc::now(),
            &cart,
            shipping_details(),
            PaymentMethod::Card,
            &PricingPolicy::STANDARD,
        )
        .unwrap_err();
        assert!(matches!(err, CommerceError::AmountOverflow));
    }
}
