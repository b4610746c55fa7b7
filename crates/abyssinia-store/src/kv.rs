//! Key-Value store wrapper with automatic serialization.

use crate::backend::KvBackend;
use crate::{StoreError, StoreResult};
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe store over a [`KvBackend`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
pub struct Kv<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> Kv<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get a value.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let order: Option<Order> = kv.get("order:ETH-1042").await?;
    /// ```
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.backend.get(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(StoreError::Decode),
            None => Ok(None),
        }
    }

    /// Set a value.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec(value).map_err(StoreError::Encode)?;
        self.backend.set(key, &bytes).await
    }

    /// Delete a value.
    pub async fn delete(&self, key: &str) -> StoreResult<()> {
        self.backend.delete(key).await
    }

    /// Check if a key exists.
    pub async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.backend.exists(key).await
    }

    /// Keys starting with `prefix`.
    pub async fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys = self.backend.keys().await?;
        keys.retain(|k| k.starts_with(prefix));
        Ok(keys)
    }
}

/// Helper to build store keys with namespacing.
///
/// # Example
///
/// ```rust
/// use abyssinia_store::store_key;
///
/// let key = store_key!("order", "ETH-1042");
/// assert_eq!(key, "order:ETH-1042");
/// ```
#[macro_export]
macro_rules! store_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_typed_round_trip() {
        let kv = Kv::new(MemoryBackend::new());
        kv.set("numbers", &vec![3, 1, 2]).await.unwrap();

        let numbers: Option<Vec<u32>> = kv.get("numbers").await.unwrap();
        assert_eq!(numbers, Some(vec![3, 1, 2]));
        assert!(kv.get::<Vec<u32>>("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_undecodable_value_is_decode_error() {
        let kv = Kv::new(MemoryBackend::new());
        kv.backend().set("numbers", b"not json").await.unwrap();

        let err = kv.get::<Vec<u32>>("numbers").await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
        assert!(err.is_corrupt_data());
    }

    #[tokio::test]
    async fn test_unencodable_value_is_encode_error() {
        let kv = Kv::new(MemoryBackend::new());
        let value = BTreeMap::from([(vec![1u8], 1u8)]);

        let err = kv.set("bad", &value).await.unwrap_err();
        assert!(matches!(err, StoreError::Encode(_)));
        assert!(!err.is_corrupt_data());
        assert!(!kv.exists("bad").await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_with_prefix() {
        let kv = Kv::new(MemoryBackend::new());
        kv.set("order:1", &1).await.unwrap();
        kv.set("order:2", &2).await.unwrap();
        kv.set("orders:index", &[1, 2]).await.unwrap();

        let mut keys = kv.keys_with_prefix("order:").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["order:1", "order:2"]);
    }

    #[test]
    fn test_store_key_macro() {
        assert_eq!(store_key!("order", "ETH-7"), "order:ETH-7");
        assert_eq!(store_key!("a", 1, "b"), "a:1:b");
    }
}
