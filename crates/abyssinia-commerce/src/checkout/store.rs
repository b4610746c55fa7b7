//! Order persistence boundary.

use crate::error::PersistenceError;
use crate::ids::OrderId;
use crate::checkout::Order;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable storage for placed orders.
///
/// Implementations keep orders newest first and survive across sessions.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Durably store an order at the front of the history.
    ///
    /// Saving the same order twice is a no-op. Saving a different order under
    /// an id that is already taken fails with
    /// [`PersistenceError::DuplicateOrder`].
    async fn save(&self, order: &Order) -> Result<(), PersistenceError>;

    /// All stored orders, newest first.
    async fn list(&self) -> Result<Vec<Order>, PersistenceError>;

    /// Fetch a single order.
    async fn get(&self, id: &OrderId) -> Result<Option<Order>, PersistenceError>;

    /// Erase every stored order.
    async fn clear(&self) -> Result<(), PersistenceError>;
}

#[async_trait]
impl<S: OrderStore + ?Sized> OrderStore for Arc<S> {
    async fn save(&self, order: &Order) -> Result<(), PersistenceError> {
        (**self).save(order).await
    }

    async fn list(&self) -> Result<Vec<Order>, PersistenceError> {
        (**self).list().await
    }

    async fn get(&self, id: &OrderId) -> Result<Option<Order>, PersistenceError> {
        (**self).get(id).await
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        (**self).clear().await
    }
}
