//! Merchant dashboard: order history behind the access gate.

use crate::{AccessGate, AuthError};
use abyssinia_commerce::checkout::{Order, OrderStore};
use abyssinia_commerce::ids::OrderId;
use std::sync::Arc;
use tracing::info;

/// Read and clear access to the order history, once the gate is open.
///
/// The gate only guards these merchant operations. Checkout writes go to the
/// store directly and are never affected by it.
pub struct MerchantDashboard<S: OrderStore> {
    gate: AccessGate,
    store: Arc<S>,
}

impl<S: OrderStore> MerchantDashboard<S> {
    pub fn new(gate: AccessGate, store: Arc<S>) -> Self {
        Self { gate, store }
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Unlock with the merchant PIN.
    pub fn unlock(&mut self, pin: &str) -> Result<(), AuthError> {
        self.gate.unlock(pin)
    }

    /// Stored orders, newest first.
    pub async fn orders(&self) -> Result<Vec<Order>, AuthError> {
        self.gate.require_unlocked()?;
        Ok(self.store.list().await?)
    }

    /// A single stored order.
    pub async fn order(&self, id: &OrderId) -> Result<Option<Order>, AuthError> {
        self.gate.require_unlocked()?;
        Ok(self.store.get(id).await?)
    }

    /// Erase the whole order history.
    ///
    /// Asking the merchant to confirm is the caller's job.
    pub async fn clear_history(&self) -> Result<(), AuthError> {
        self.gate.require_unlocked()?;
        self.store.clear().await?;
        info!("merchant cleared order history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abyssinia_commerce::prelude::*;
    use abyssinia_store::{KvOrderStore, MemoryBackend, StoreOptions};
    use chrono::Utc;

    fn sample_order() -> Order {
        let product = Catalog::standard()
            .get(&ProductId::new("cross-07"))
            .unwrap()
            .clone();
        let mut cart = Cart::new();
        cart.add_item(&product).unwrap();
        let details = ShippingDetails {
            first_name: "Derartu".into(),
            last_name: "Tulu".into(),
            email: "d@example.com".into(),
            phone: "0912".into(),
            address: "Arat Kilo".into(),
            city: "Addis Ababa".into(),
            postal_code: "1000".into(),
            country: "Ethiopia".into(),
        };
        Order::place(
            OrderId::generate(),
            Utc::now(),
            &cart,
            details,
            PaymentMethod::BankTransfer,
            &PricingPolicy::STANDARD,
        )
        .unwrap()
    }

    fn dashboard() -> MerchantDashboard<KvOrderStore<MemoryBackend>> {
        let store = KvOrderStore::with_options(MemoryBackend::new(), StoreOptions::instant());
        MerchantDashboard::new(AccessGate::default(), Arc::new(store))
    }

    #[tokio::test]
    async fn test_locked_dashboard_refuses_access() {
        let dashboard = dashboard();
        assert!(matches!(dashboard.orders().await, Err(AuthError::Locked)));
        assert!(matches!(dashboard.clear_history().await, Err(AuthError::Locked)));
    }

    #[tokio::test]
    async fn test_unlocked_dashboard_lists_and_clears() {
        let mut dashboard = dashboard();
        let order = sample_order();
        dashboard.store.save(&order).await.unwrap();

        assert!(matches!(dashboard.unlock("4321"), Err(AuthError::IncorrectSecret)));
        dashboard.unlock("1234").unwrap();

        assert_eq!(dashboard.orders().await.unwrap(), vec![order.clone()]);
        assert_eq!(dashboard.order(order.id()).await.unwrap(), Some(order));

        dashboard.clear_history().await.unwrap();
        assert!(dashboard.orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_writes_ignore_gate() {
        let dashboard = dashboard();
        dashboard.store.save(&sample_order()).await.unwrap();
        assert!(!dashboard.gate().is_unlocked());
    }
}
