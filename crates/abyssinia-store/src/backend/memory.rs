//! In-memory backend.

use super::KvBackend;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Vec<u8>>,
    quota: Option<usize>,
}

impl State {
    fn used(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

/// Volatile backend holding everything in a map.
///
/// An optional byte quota (keys plus values) models the storage limit of a
/// browser origin: writes that would go over it fail and leave the old value
/// in place.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<State>,
}

impl MemoryBackend {
    /// Create an unbounded backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend limited to `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            state: RwLock::new(State {
                entries: HashMap::new(),
                quota: Some(limit),
            }),
        }
    }

    /// Change the quota. `None` removes the limit.
    pub async fn set_quota(&self, limit: Option<usize>) {
        self.state.write().await.quota = limit;
    }

    /// Bytes currently in use.
    pub async fn used_bytes(&self) -> usize {
        self.state.read().await.used()
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.state.read().await.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if let Some(limit) = state.quota {
            let replaced = state.entries.get(key).map_or(0, |v| key.len() + v.len());
            let used = state.used() - replaced + key.len() + value.len();
            if used > limit {
                return Err(StoreError::QuotaExceeded { used, limit });
            }
        }
        state.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.state.write().await.entries.remove(key);
        Ok(())
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.state.read().await.entries.keys().cloned().collect())
    }
}
