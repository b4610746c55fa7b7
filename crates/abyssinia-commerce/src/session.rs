//! Storefront session.
//!
//! A [`Storefront`] owns one customer's cart and the open checkout, and talks
//! to the order store. UI side effects (opening the cart panel, showing an
//! error, moving to the next screen) are queued as [`StorefrontEvent`]s for
//! the presentation layer to drain; the session never performs them itself.

use crate::cart::Cart;
use crate::catalog::Product;
use crate::checkout::{CheckoutFlow, CheckoutStep, Order, OrderStore, PaymentMethod, ShippingDetails};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use crate::pricing::{PriceQuote, PricingPolicy};
use chrono::Utc;
use std::sync::Arc;

/// Side effects requested by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum StorefrontEvent {
    /// A product was added; show the cart panel.
    CartOpened,
    /// Cart contents changed.
    CartUpdated { item_count: u64 },
    /// The checkout moved to a new step.
    CheckoutStepChanged(CheckoutStep),
    /// An order was stored.
    OrderPlaced { order_id: OrderId, total: Money },
    /// Placing the order failed; the message is meant for the customer.
    CheckoutFailed { message: String },
    /// The checkout was closed.
    CheckoutClosed,
}

/// One customer session: a cart, an optional open checkout and the store.
pub struct Storefront<S: OrderStore> {
    cart: Cart,
    checkout: Option<CheckoutFlow>,
    store: Arc<S>,
    events: Vec<StorefrontEvent>,
}

impl<S: OrderStore> Storefront<S> {
    /// Start a session with an empty cart.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            cart: Cart::new(),
            checkout: None,
            store,
            events: Vec::new(),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn checkout(&self) -> Option<&CheckoutFlow> {
        self.checkout.as_ref()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Pricing summary for the current cart.
    pub fn quote(&self) -> PriceQuote {
        PricingPolicy::STANDARD.quote(self.cart.subtotal())
    }

    /// Add one unit of a product to the cart.
    pub fn add_to_cart(&mut self, product: &Product) -> Result<u32, CommerceError> {
        if !product.in_stock {
            return Err(CommerceError::OutOfStock(product.id.to_string()));
        }
        let quantity = self.cart.add_item(product)?;
        self.emit(StorefrontEvent::CartOpened);
        self.emit_cart_updated();
        Ok(quantity)
    }

    /// Change a line's quantity by `delta`. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &ProductId, delta: i64) -> bool {
        let found = self.cart.update_quantity(id, delta);
        if found {
            self.emit_cart_updated();
        }
        found
    }

    /// Remove a line. Unknown ids are ignored.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> bool {
        let removed = self.cart.remove_item(id);
        if removed {
            self.emit_cart_updated();
        }
        removed
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.emit_cart_updated();
    }

    /// Open the checkout.
    ///
    /// An unfinished checkout that is already open is kept as is. A confirmed
    /// one is replaced by a fresh checkout with a new reference.
    pub fn open_checkout(&mut self) -> Result<&CheckoutFlow, CommerceError> {
        let reuse = self.checkout.as_ref().is_some_and(|f| !f.is_complete());
        if !reuse {
            let flow = CheckoutFlow::start(&self.cart)?;
            self.emit(StorefrontEvent::CheckoutStepChanged(flow.step()));
            self.checkout = Some(flow);
        }
        self.checkout.as_ref().ok_or(CommerceError::NoCheckout)
    }

    /// Close the checkout, discarding any draft. Returns whether one was open.
    pub fn close_checkout(&mut self) -> bool {
        let closed = self.checkout.take().is_some();
        if closed {
            self.emit(StorefrontEvent::CheckoutClosed);
        }
        closed
    }

    pub fn submit_shipping(&mut self, details: ShippingDetails) -> Result<(), CommerceError> {
        let flow = self.checkout.as_mut().ok_or(CommerceError::NoCheckout)?;
        flow.submit_shipping(details)?;
        let step = flow.step();
        self.emit(StorefrontEvent::CheckoutStepChanged(step));
        Ok(())
    }

    pub fn back(&mut self) -> Result<CheckoutStep, CommerceError> {
        let flow = self.checkout.as_mut().ok_or(CommerceError::NoCheckout)?;
        let step = flow.back()?;
        self.emit(StorefrontEvent::CheckoutStepChanged(step));
        Ok(step)
    }

    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), CommerceError> {
        self.checkout
            .as_mut()
            .ok_or(CommerceError::NoCheckout)?
            .select_payment_method(method)
    }

    /// Place the order for the current cart.
    ///
    /// Holds the session for the whole save, so a second submission cannot
    /// start until this one finishes.
    pub async fn submit_payment(&mut self) -> Result<Order, CommerceError> {
        let flow = self.checkout.as_mut().ok_or(CommerceError::NoCheckout)?;
        let result = flow
            .submit_payment(&mut self.cart, self.store.as_ref(), Utc::now())
            .await;

        match &result {
            Ok(order) => {
                self.emit(StorefrontEvent::OrderPlaced {
                    order_id: order.id().clone(),
                    total: order.total(),
                });
                self.emit(StorefrontEvent::CheckoutStepChanged(CheckoutStep::Confirmation));
                self.emit_cart_updated();
            }
            Err(e) => self.emit(StorefrontEvent::CheckoutFailed {
                message: e.to_string(),
            }),
        }
        result
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<StorefrontEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: StorefrontEvent) {
        self.events.push(event);
    }

    fn emit_cart_updated(&mut self) {
        let item_count = self.cart.item_count();
        self.emit(StorefrontEvent::CartUpdated { item_count });
    }
}
