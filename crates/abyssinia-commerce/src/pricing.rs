//! Checkout pricing.
//!
//! Shipping and import duties are flat amounts, independent of cart size,
//! weight or destination.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Flat shipping cost in cents (Ethiopian Airlines Cargo).
pub const SHIPPING_COST_CENTS: i64 = 2500;

/// Flat import duties in cents.
pub const IMPORT_DUTIES_CENTS: i64 = 1250;

/// Fixed pricing policy applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Shipping cost in cents of the cart currency.
    pub shipping_cents: i64,
    /// Import duties in cents of the cart currency.
    pub duties_cents: i64,
}

impl PricingPolicy {
    /// The storefront's policy: 25.00 shipping and 12.50 duties.
    pub const STANDARD: PricingPolicy = PricingPolicy {
        shipping_cents: SHIPPING_COST_CENTS,
        duties_cents: IMPORT_DUTIES_CENTS,
    };

    /// Shipping cost in the subtotal's currency.
    pub fn shipping_cost(&self, subtotal: &Money) -> Money {
        Money::new(self.shipping_cents, subtotal.currency)
    }

    /// Import duties in the subtotal's currency.
    pub fn import_duties(&self, subtotal: &Money) -> Money {
        Money::new(self.duties_cents, subtotal.currency)
    }

    /// `subtotal + shipping + duties`.
    pub fn total(&self, subtotal: &Money) -> Money {
        subtotal
            .plus_cents(self.shipping_cents)
            .plus_cents(self.duties_cents)
    }

    /// Full breakdown for a subtotal, or None if the total would overflow.
    pub fn checked_quote(&self, subtotal: Money) -> Option<PriceQuote> {
        let shipping_cost = self.shipping_cost(&subtotal);
        let duties = self.import_duties(&subtotal);
        let total = subtotal.try_add(&shipping_cost)?.try_add(&duties)?;
        Some(PriceQuote {
            subtotal,
            shipping_cost,
            duties,
            total,
        })
    }

    /// Full breakdown for a subtotal, saturating for display.
    pub fn quote(&self, subtotal: Money) -> PriceQuote {
        PriceQuote {
            subtotal,
            shipping_cost: self.shipping_cost(&subtotal),
            duties: self.import_duties(&subtotal),
            total: self.total(&subtotal),
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Pricing breakdown shown in the order summary and frozen into orders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceQuote {
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub duties: Money,
    pub total: Money,
}

impl PriceQuote {
    /// Check `total == subtotal + shipping_cost + duties`.
    pub fn is_consistent(&self) -> bool {
        self.subtotal
            .try_add(&self.shipping_cost)
            .and_then(|m| m.try_add(&self.duties))
            .is_some_and(|sum| sum == self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_standard_quote() {
        let quote = PricingPolicy::STANDARD.quote(Money::new(8000, Currency::EUR));
        assert_eq!(quote.shipping_cost.amount_cents, 2500);
        assert_eq!(quote.duties.amount_cents, 1250);
        assert_eq!(quote.total.amount_cents, 11750);
        assert!(quote.is_consistent());
    }

    #[test]
    fn test_quote_for_zero_subtotal() {
        let quote = PricingPolicy::STANDARD.quote(Money::zero(Currency::EUR));
        assert_eq!(quote.total.amount_cents, 3750);
    }

    #[test]
    fn test_quote_keeps_subtotal_currency() {
        let quote = PricingPolicy::STANDARD.quote(Money::new(100, Currency::GBP));
        assert_eq!(quote.total.currency, Currency::GBP);
        assert_eq!(quote.shipping_cost.currency, Currency::GBP);
    }

    #[test]
    fn test_checked_quote_refuses_overflow() {
        let policy = PricingPolicy::STANDARD;
        let quote = policy.checked_quote(Money::new(8000, Currency::EUR)).unwrap();
        assert_eq!(quote, policy.quote(Money::new(8000, Currency::EUR)));

        let near_max = Money::new(i64::MAX - 100, Currency::EUR);
        assert!(policy.checked_quote(near_max).is_none());
        assert!(!policy.quote(near_max).is_consistent());
    }

    #[test]
    fn test_inconsistent_quote_detected() {
        let mut quote = PricingPolicy::STANDARD.quote(Money::new(100, Currency::EUR));
        quote.total = quote.total.plus_cents(1);
        assert!(!quote.is_consistent());
    }
}
