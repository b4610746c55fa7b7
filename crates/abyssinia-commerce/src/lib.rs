//! Storefront domain types and logic for Abyssinia Direct.
//!
//! This crate holds the cart-to-order pipeline of the storefront:
//!
//! - **Catalog**: Read-only products and categories
//! - **Cart**: Session cart with line items and on-demand subtotal
//! - **Pricing**: Flat shipping and import duty policy
//! - **Checkout**: Shipping → Payment → Confirmation state machine, orders,
//!   and the `OrderStore` persistence boundary
//! - **Session**: The `Storefront` facade that ties a cart and a checkout
//!   together and emits UI events
//!
//! # Example
//!
//! ```rust,ignore
//! use abyssinia_commerce::prelude::*;
//!
//! let catalog = Catalog::standard();
//! let mut shop = Storefront::new(store);
//!
//! shop.add_to_cart(catalog.find(&ProductId::new("kemis-01")).unwrap())?;
//! shop.open_checkout()?;
//! shop.submit_shipping(details)?;
//! let order = shop.submit_payment().await?;
//! println!("Total: {}", order.total());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod pricing;
pub mod session;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, PersistenceError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, Category, Product};

    // Cart
    pub use crate::cart::{Cart, CartLine, MAX_QUANTITY_PER_ITEM};

    // Pricing
    pub use crate::pricing::{PriceQuote, PricingPolicy};

    // Checkout
    pub use crate::checkout::{
        CheckoutFlow, CheckoutStep, Order, OrderItem, OrderStatus, OrderStore, PaymentMethod,
        ShippingDetails, BANK_TRANSFER_INSTRUCTIONS,
    };

    // Session
    pub use crate::session::{Storefront, StorefrontEvent};
}
