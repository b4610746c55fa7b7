//! Checkout flow state machine.

use crate::cart::Cart;
use crate::checkout::{Order, OrderStore, PaymentMethod, ShippingDetails};
use crate::error::{CommerceError, PersistenceError};
use crate::ids::OrderId;
use crate::pricing::{PriceQuote, PricingPolicy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Contact and delivery details.
    Shipping,
    /// Payment method selection and order summary.
    Payment,
    /// Order placed.
    Confirmation,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Confirmation => "confirmation",
        }
    }

    /// Label for the step indicator.
    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Confirmation => "Done",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Shipping => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Confirmation => 3,
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open checkout.
///
/// Created from a non-empty cart and discarded when the checkout closes, so
/// dropping a flow before confirmation drops all draft state with it.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutFlow {
    reference: OrderId,
    step: CheckoutStep,
    shipping: Option<ShippingDetails>,
    payment_method: PaymentMethod,
    placed: Option<Order>,
    policy: PricingPolicy,
}

impl CheckoutFlow {
    /// Start a checkout for the given cart with a fresh order reference.
    pub fn start(cart: &Cart) -> Result<Self, CommerceError> {
        Self::with_policy(cart, PricingPolicy::STANDARD)
    }

    /// Start a checkout with a specific pricing policy.
    pub fn with_policy(cart: &Cart, policy: PricingPolicy) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        Ok(Self {
            reference: OrderId::generate(),
            step: CheckoutStep::Shipping,
            shipping: None,
            payment_method: PaymentMethod::default(),
            placed: None,
            policy,
        })
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The order reference the next submission will use.
    pub fn reference(&self) -> &OrderId {
        &self.reference
    }

    /// Details entered so far, for pre-filling the shipping form.
    pub fn shipping_details(&self) -> Option<&ShippingDetails> {
        self.shipping.as_ref()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// The order placed by this checkout, once confirmed.
    pub fn placed_order(&self) -> Option<&Order> {
        self.placed.as_ref()
    }

    /// Check if the order has been placed.
    pub fn is_complete(&self) -> bool {
        self.step == CheckoutStep::Confirmation
    }

    /// Pricing summary for the cart as it is now.
    pub fn summary(&self, cart: &Cart) -> PriceQuote {
        self.policy.quote(cart.subtotal())
    }

    /// Submit the shipping form and move to the payment step.
    ///
    /// Blank fields are reported and the flow stays on the shipping step.
    /// The payment method is reset to card on every entry into payment.
    pub fn submit_shipping(&mut self, details: ShippingDetails) -> Result<(), CommerceError> {
        self.expect_step(CheckoutStep::Shipping, "submit shipping details")?;
        details.validate()?;

        self.shipping = Some(details);
        self.payment_method = PaymentMethod::default();
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Return from payment to shipping, keeping the entered details.
    pub fn back(&mut self) -> Result<CheckoutStep, CommerceError> {
        self.expect_step(CheckoutStep::Payment, "go back")?;
        self.step = CheckoutStep::Shipping;
        Ok(self.step)
    }

    /// Choose how to pay.
    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), CommerceError> {
        self.expect_step(CheckoutStep::Payment, "select a payment method")?;
        self.payment_method = method;
        Ok(())
    }

    /// Place the order.
    ///
    /// Builds the order from a snapshot of the cart and waits for the store to
    /// commit it. On failure the flow stays on the payment step and the cart
    /// is left untouched, so the customer can retry. On success the cart is
    /// cleared and the flow moves to confirmation.
    ///
    /// A reference collision with a different stored order picks a new
    /// reference before returning the error.
    pub async fn submit_payment<S>(
        &mut self,
        cart: &mut Cart,
        store: &S,
        now: DateTime<Utc>,
    ) -> Result<Order, CommerceError>
    where
        S: OrderStore + ?Sized,
    {
        self.expect_step(CheckoutStep::Payment, "submit payment")?;
        let shipping = self
            .shipping
            .clone()
            .ok_or_else(|| CommerceError::Validation(ShippingDetails::FIELD_NAMES.to_vec()))?;

        let order = Order::place(
            self.reference.clone(),
            now,
            cart,
            shipping,
            self.payment_method,
            &self.policy,
        )?;

        match store.save(&order).await {
            Ok(()) => {
                info!(
                    order_id = %order.id(),
                    total = %order.total(),
                    items = order.item_count(),
                    "order placed"
                );
                cart.clear();
                self.step = CheckoutStep::Confirmation;
                self.placed = Some(order.clone());
                Ok(order)
            }
            Err(e) => {
                warn!(order_id = %order.id(), error = %e, "order save failed");
                if matches!(e, PersistenceError::DuplicateOrder(_)) {
                    self.reference = OrderId::generate();
                }
                Err(e.into())
            }
        }
    }

    fn expect_step(&self, step: CheckoutStep, action: &'static str) -> Result<(), CommerceError> {
        if self.step == step {
            Ok(())
        } else {
            Err(CommerceError::InvalidCheckoutTransition {
                from: self.step,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::fixtures::{cart_with, shipping_details, MemoryStore};

    #[test]
    fn test_start_requires_items() {
        let err = CheckoutFlow::start(&Cart::new()).unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));

        let flow = CheckoutFlow::start(&cart_with(4000, 1)).unwrap();
        assert_eq!(flow.step(), CheckoutStep::Shipping);
        assert!(flow.reference().number().is_some());
    }

    #[test]
    fn test_blank_shipping_stays_on_shipping() {
        let mut flow = CheckoutFlow::start(&cart_with(4000, 1)).unwrap();
        let mut details = shipping_details();
        details.city.clear();

        let err = flow.submit_shipping(details).unwrap_err();
        assert!(matches!(err, CommerceError::Validation(ref f) if f == &vec!["city"]));
        assert_eq!(flow.step(), CheckoutStep::Shipping);
    }

    #[test]
    fn test_back_keeps_details_and_resets_payment_method() {
        let mut flow = CheckoutFlow::start(&cart_with(4000, 1)).unwrap();
        flow.submit_shipping(shipping_details()).unwrap();
        flow.select_payment_method(PaymentMethod::BankTransfer).unwrap();

        assert_eq!(flow.back().unwrap(), CheckoutStep::Shipping);
        assert_eq!(flow.shipping_details(), Some(&shipping_details()));

        flow.submit_shipping(shipping_details()).unwrap();
        assert_eq!(flow.payment_method(), PaymentMethod::Card);
    }

    #[test]
    fn test_back_from_shipping_is_invalid() {
        let mut flow = CheckoutFlow::start(&cart_with(4000, 1)).unwrap();
        let err = flow.back().unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InvalidCheckoutTransition {
                from: CheckoutStep::Shipping,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_payment_without_shipping_is_rejected() {
        let mut cart = cart_with(4000, 1);
        let store = MemoryStore::default();
        let mut flow = CheckoutFlow::start(&cart).unwrap();

        let result = flow.submit_payment(&mut cart, &store, Utc::now()).await;
        assert!(result.is_err());
        assert!(store.orders().is_empty());
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_successful_payment() {
        let mut cart = cart_with(4000, 2);
        let store = MemoryStore::default();
        let mut flow = CheckoutFlow::start(&cart).unwrap();
        let reference = flow.reference().clone();
        flow.submit_shipping(shipping_details()).unwrap();

        let order = flow.submit_payment(&mut cart, &store, Utc::now()).await.unwrap();

        assert_eq!(order.id(), &reference);
        assert_eq!(order.subtotal().amount_cents, 8000);
        assert_eq!(order.total().amount_cents, 11750);
        assert_eq!(order.items()[0].quantity, 2);
        assert!(cart.is_empty());
        assert!(flow.is_complete());
        assert_eq!(flow.placed_order(), Some(&order));
        assert_eq!(store.orders(), vec![order]);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_cart_and_step() {
        let mut cart = cart_with(4000, 2);
        let store = MemoryStore::failing(PersistenceError::Unavailable("disk full".into()));
        let mut flow = CheckoutFlow::start(&cart).unwrap();
        let reference = flow.reference().clone();
        flow.submit_shipping(shipping_details()).unwrap();
        let before = cart.clone();

        let err = flow.submit_payment(&mut cart, &store, Utc::now()).await.unwrap_err();

        assert!(matches!(err, CommerceError::Persistence(PersistenceError::Unavailable(_))));
        assert_eq!(cart, before);
        assert_eq!(flow.step(), CheckoutStep::Payment);
        assert_eq!(flow.reference(), &reference);
    }

    #[tokio::test]
    async fn test_duplicate_reference_rotates() {
        let mut cart = cart_with(4000, 1);
        let store = MemoryStore::failing(PersistenceError::DuplicateOrder(OrderId::new("ETH-1")));
        let mut flow = CheckoutFlow::start(&cart).unwrap();
        flow.submit_shipping(shipping_details()).unwrap();

        // Rotation picks a random reference; retry until it differs.
        let mut rotated = false;
        for _ in 0..8 {
            let before = flow.reference().clone();
            let _ = flow.submit_payment(&mut cart, &store, Utc::now()).await;
            if flow.reference() != &before {
                rotated = true;
                break;
            }
        }
        assert!(rotated);
        assert_eq!(flow.step(), CheckoutStep::Payment);
    }

    #[tokio::test]
    async fn test_overflowing_total_is_not_saved() {
        let mut cart = cart_with(i64::MAX - 1000, 1);
        let store = MemoryStore::default();
        let mut flow = CheckoutFlow::start(&cart).unwrap();
        flow.submit_shipping(shipping_details()).unwrap();
        let before = cart.clone();

        let err = flow.submit_payment(&mut cart, &store, Utc::now()).await.unwrap_err();

        assert!(matches!(err, CommerceError::AmountOverflow));
        assert!(store.orders().is_empty());
        assert_eq!(cart, before);
        assert_eq!(flow.step(), CheckoutStep::Payment);
    }

    #[tokio::test]
    async fn test_emptied_cart_is_rejected_at_payment() {
        let mut cart = cart_with(4000, 1);
        let store = MemoryStore::default();
        let mut flow = CheckoutFlow::start(&cart).unwrap();
        flow.submit_shipping(shipping_details()).unwrap();
        cart.clear();

        let err = flow.submit_payment(&mut cart, &store, Utc::now()).await.unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));
        assert_eq!(flow.step(), CheckoutStep::Payment);
    }

    #[tokio::test]
    async fn test_confirmation_is_terminal() {
        let mut cart = cart_with(4000, 1);
        let store = MemoryStore::default();
        let mut flow = CheckoutFlow::start(&cart).unwrap();
        flow.submit_shipping(shipping_details()).unwrap();
        flow.submit_payment(&mut cart, &store, Utc::now()).await.unwrap();

        assert!(flow.back().is_err());
        assert!(flow.submit_shipping(shipping_details()).is_err());
        assert!(flow.submit_payment(&mut cart, &store, Utc::now()).await.is_err());
        assert_eq!(store.orders().len(), 1);
    }

    #[test]
    fn test_step_indicator() {
        assert_eq!(CheckoutStep::Shipping.number(), 1);
        assert_eq!(CheckoutStep::Confirmation.number(), 3);
        assert_eq!(CheckoutStep::Confirmation.display_name(), "Done");
    }
}
