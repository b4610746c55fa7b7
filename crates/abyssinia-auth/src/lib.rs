//! Merchant access for the Abyssinia storefront.
//!
//! A single shared PIN opens the merchant area for the rest of the session.
//! The area lists and clears the stored order history.

mod dashboard;
mod error;
mod gate;

pub use dashboard::MerchantDashboard;
pub use error::AuthError;
pub use gate::{AccessGate, GateState, DEFAULT_MERCHANT_PIN};
