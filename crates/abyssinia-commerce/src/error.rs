//! Commerce error types.

use thiserror::Error;

use crate::checkout::CheckoutStep;
use crate::ids::OrderId;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product is flagged as sold out.
    #[error("Product is sold out: {0}")]
    OutOfStock(String),

    /// Checkout was started or submitted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A checkout action was requested while no checkout is open.
    #[error("No checkout in progress")]
    NoCheckout,

    /// The requested action is not allowed at the current checkout step.
    #[error("Cannot {action} from the {from} step")]
    InvalidCheckoutTransition {
        from: CheckoutStep,
        action: &'static str,
    },

    /// Required form fields were left blank.
    #[error("Validation error: missing {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    /// The order total does not fit in the supported amount range.
    #[error("Order total is too large to process")]
    AmountOverflow,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// The order could not be persisted.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Catalog or record serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// Check if the user can fix this by correcting input or retrying.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            CommerceError::Serialization(_)
                | CommerceError::Persistence(PersistenceError::Serialization(_))
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}

/// Errors raised at the order persistence boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The backing storage could not be reached or written.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The write would exceed the storage quota.
    #[error("Storage quota exceeded: {used} of {limit} bytes")]
    QuotaExceeded { used: usize, limit: usize },

    /// A different order is already stored under this reference.
    #[error("Order reference already in use: {0}")]
    DuplicateOrder(OrderId),

    /// Stored data could not be decoded.
    #[error("Corrupt order data: {0}")]
    CorruptData(String),

    /// An order could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
