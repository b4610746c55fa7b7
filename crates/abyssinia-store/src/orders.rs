//! Order history on top of the Key-Value store.
//!
//! Layout:
//!
//! - `order:<id>` holds one order record.
//! - `orders:index` holds the order ids, newest first.

use crate::backend::KvBackend;
use crate::kv::Kv;
use crate::{store_key, StoreError};
use abyssinia_commerce::checkout::{Order, OrderStore};
use abyssinia_commerce::error::PersistenceError;
use abyssinia_commerce::ids::OrderId;
use async_trait::async_trait;
use std::cmp::Reverse;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Key prefix of order records.
pub const ORDER_KEY_PREFIX: &str = "order";

/// Key of the newest-first id index.
pub const ORDER_INDEX_KEY: &str = "orders:index";

/// Default simulated latency for `save`.
pub const DEFAULT_SAVE_LATENCY: Duration = Duration::from_millis(1500);

/// Default simulated latency for `list`.
pub const DEFAULT_LIST_LATENCY: Duration = Duration::from_millis(500);

/// Tuning for [`KvOrderStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Delay before each save commits.
    pub save_latency: Duration,
    /// Delay before each listing returns.
    pub list_latency: Duration,
    /// Report undecodable records as errors instead of skipping them.
    pub strict_reads: bool,
}

impl StoreOptions {
    /// No simulated latency, lenient reads.
    pub fn instant() -> Self {
        Self {
            save_latency: Duration::ZERO,
            list_latency: Duration::ZERO,
            strict_reads: false,
        }
    }

    pub fn with_strict_reads(mut self, strict: bool) -> Self {
        self.strict_reads = strict;
        self
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            save_latency: DEFAULT_SAVE_LATENCY,
            list_latency: DEFAULT_LIST_LATENCY,
            strict_reads: false,
        }
    }
}

/// [`OrderStore`] keeping one record per order plus an id index.
pub struct KvOrderStore<B: KvBackend> {
    kv: Kv<B>,
    options: StoreOptions,
    /// Serializes read-modify-write cycles on the index.
    index_lock: Mutex<()>,
}

impl<B: KvBackend> KvOrderStore<B> {
    /// Create a store with default options.
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, StoreOptions::default())
    }

    pub fn with_options(backend: B, options: StoreOptions) -> Self {
        Self {
            kv: Kv::new(backend),
            options,
            index_lock: Mutex::new(()),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        self.kv.backend()
    }

    fn order_key(id: &OrderId) -> String {
        store_key!(ORDER_KEY_PREFIX, id)
    }

    /// Read one record, applying the configured corrupt-data policy.
    async fn read_order(&self, id: &OrderId) -> Result<Option<Order>, PersistenceError> {
        match self.kv.get::<Order>(&Self::order_key(id)).await {
            Ok(order) => Ok(order),
            Err(e) if e.is_corrupt_data() => {
                if self.options.strict_reads {
                    return Err(PersistenceError::CorruptData(format!("order {id}: {e}")));
                }
                warn!(order_id = %id, error = %e, "skipping corrupt order record");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read the index, rebuilding it from the records if it can't be decoded.
    async fn read_index(&self) -> Result<Vec<OrderId>, PersistenceError> {
        match self.kv.get::<Vec<OrderId>>(ORDER_INDEX_KEY).await {
            Ok(ids) => Ok(ids.unwrap_or_default()),
            Err(e) if e.is_corrupt_data() => {
                if self.options.strict_reads {
                    return Err(PersistenceError::CorruptData(format!("order index: {e}")));
                }
                warn!(error = %e, "order index is corrupt, rebuilding from records");
                self.rebuild_index().await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn rebuild_index(&self) -> Result<Vec<OrderId>, PersistenceError> {
        let prefix = format!("{ORDER_KEY_PREFIX}:");
        let mut orders = Vec::new();
        for key in self.kv.keys_with_prefix(&prefix).await? {
            match self.kv.get::<Order>(&key).await {
                Ok(Some(order)) => orders.push(order),
                Ok(None) => {}
                Err(e) if e.is_corrupt_data() => {
                    warn!(key = %key, error = %e, "skipping corrupt order record");
                }
                Err(e) => return Err(e.into()),
            }
        }
        orders.sort_by_key(|o| Reverse(o.created_at()));
        Ok(orders.into_iter().map(|o| o.id().clone()).collect())
    }

    async fn write_index(&self, ids: &[OrderId]) -> Result<(), StoreError> {
        self.kv.set(ORDER_INDEX_KEY, ids).await
    }
}

#[async_trait]
impl<B: KvBackend> OrderStore for KvOrderStore<B> {
    async fn save(&self, order: &Order) -> Result<(), PersistenceError> {
        if !self.options.save_latency.is_zero() {
            tokio::time::sleep(self.options.save_latency).await;
        }

        let _guard = self.index_lock.lock().await;
        let key = Self::order_key(order.id());
        let mut ids = self.read_index().await?;

        match self.kv.get::<Order>(&key).await {
            Ok(Some(existing)) if existing == *order => {
                if !ids.contains(order.id()) {
                    ids.insert(0, order.id().clone());
                    self.write_index(&ids).await?;
                }
                debug!(order_id = %order.id(), "order already stored");
                return Ok(());
            }
            Ok(Some(_)) => return Err(PersistenceError::DuplicateOrder(order.id().clone())),
            Ok(None) => {}
            Err(e) if e.is_corrupt_data() => {
                warn!(order_id = %order.id(), error = %e, "overwriting corrupt order record");
            }
            Err(e) => return Err(e.into()),
        }

        self.kv.set(&key, order).await?;

        ids.retain(|id| id != order.id());
        ids.insert(0, order.id().clone());
        if let Err(e) = self.write_index(&ids).await {
            if let Err(cleanup) = self.kv.delete(&key).await {
                warn!(order_id = %order.id(), error = %cleanup, "failed to roll back order record");
            }
            return Err(e.into());
        }

        info!(order_id = %order.id(), orders = ids.len(), "order saved");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Order>, PersistenceError> {
        if !self.options.list_latency.is_zero() {
            tokio::time::sleep(self.options.list_latency).await;
        }

        let ids = self.read_index().await?;
        let mut orders = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.read_order(id).await? {
                Some(order) => orders.push(order),
                None => debug!(order_id = %id, "indexed order has no record"),
            }
        }
        Ok(orders)
    }

    async fn get(&self, id: &OrderId) -> Result<Option<Order>, PersistenceError> {
        self.read_order(id).await
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        let _guard = self.index_lock.lock().await;
        let prefix = format!("{ORDER_KEY_PREFIX}:");
        let keys = self.kv.keys_with_prefix(&prefix).await?;
        for key in &keys {
            self.kv.delete(key).await?;
        }
        self.kv.delete(ORDER_INDEX_KEY).await?;
        info!(removed = keys.len(), "order history cleared");
        Ok(())
    }
}
