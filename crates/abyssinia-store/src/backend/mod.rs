//! Byte-level Key-Value backends.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::StoreResult;
use async_trait::async_trait;

/// Raw Key-Value storage.
///
/// Keys are namespaced strings such as `order:ETH-1042`; values are opaque
/// bytes. A single `set` either fully replaces the value or leaves the old
/// one in place.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Get a value. Returns `None` if the key doesn't exist.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store a value, replacing any previous one.
    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Delete a value. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// All keys currently stored, in no particular order.
    async fn keys(&self) -> StoreResult<Vec<String>>;

    /// Check if a key exists.
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

#[async_trait]
impl<B: KvBackend + ?Sized> KvBackend for Box<B> {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key).await
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys().await
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        (**self).exists(key).await
    }
}
