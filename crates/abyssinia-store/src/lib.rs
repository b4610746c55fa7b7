//! Key-Value order storage for the Abyssinia storefront.
//!
//! Orders are kept one record per key with a separate newest-first index,
//! on either an in-memory backend or a directory of JSON files.
//!
//! # Example
//!
//! ```rust,ignore
//! use abyssinia_store::prelude::*;
//!
//! let backend = FileBackend::open(".abyssinia/orders").await?;
//! let store = KvOrderStore::new(backend);
//!
//! store.save(&order).await?;
//! let history = store.list().await?;
//! ```

pub mod backend;
mod error;
mod kv;
mod orders;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use error::{StoreError, StoreResult};
pub use kv::Kv;
pub use orders::{
    KvOrderStore, StoreOptions, DEFAULT_LIST_LATENCY, DEFAULT_SAVE_LATENCY, ORDER_INDEX_KEY,
    ORDER_KEY_PREFIX,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileBackend, KvBackend, KvOrderStore, MemoryBackend, StoreError, StoreOptions};
    pub use abyssinia_commerce::checkout::OrderStore;
}
