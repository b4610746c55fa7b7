//! Checkout module.
//!
//! Contains the checkout flow, shipping details, payment methods, orders and
//! the order persistence boundary.

mod details;
mod flow;
mod order;
mod payment;
mod record;
mod store;

pub use details::ShippingDetails;
pub use flow::{CheckoutFlow, CheckoutStep};
pub use order::{Order, OrderItem, OrderStatus};
pub use payment::{PaymentMethod, BANK_TRANSFER_INSTRUCTIONS};
pub use store::OrderStore;
