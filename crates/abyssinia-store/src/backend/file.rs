//! Directory backend: one JSON file per key.

use super::KvBackend;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const EXTENSION: &str = ".json";
const TEMP_EXTENSION: &str = ".json.tmp";

/// Durable backend storing each key as a file in a directory.
///
/// Writes go to a temporary file that is renamed over the target, so a crash
/// mid-write never leaves a half-written record behind.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open a store directory, creating it if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::Open(format!("{}: {e}", dir.display())))?;
        debug!(dir = %dir.display(), "opened file store");
        Ok(Self { dir })
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{EXTENSION}", encode_key(key)))
    }
}

#[async_trait]
impl KvBackend for FileBackend {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let target = self.path_for(key);
        let temp = self.dir.join(format!("{}{TEMP_EXTENSION}", encode_key(key)));
        fs::write(&temp, value).await?;
        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.ends_with(TEMP_EXTENSION) {
                continue;
            }
            if let Some(stem) = name.strip_suffix(EXTENSION) {
                if let Some(key) = decode_key(stem) {
                    keys.push(key);
                }
            }
        }
        Ok(keys)
    }
}

/// Percent-encode everything outside `[A-Za-z0-9._-]` so any key is a safe
/// file name.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_encoding() {
        assert_eq!(encode_key("order:ETH-42"), "order%3AETH-42");
        assert_eq!(decode_key("order%3AETH-42").as_deref(), Some("order:ETH-42"));
        assert_eq!(decode_key("bad%4"), None);
        assert_eq!(encode_key("../x"), "..%2Fx");
    }

    #[tokio::test]
    async fn test_round_trip_and_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("orders")).await.unwrap();

        backend.set("order:ETH-1", b"one").await.unwrap();
        backend.set("orders:index", b"[]").await.unwrap();
        backend.set("order:ETH-1", b"uno").await.unwrap();

        assert_eq!(backend.get("order:ETH-1").await.unwrap(), Some(b"uno".to_vec()));
        let mut keys = backend.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["order:ETH-1", "orders:index"]);
    }

    #[tokio::test]
    async fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).await.unwrap();

        assert_eq!(backend.get("order:nope").await.unwrap(), None);
        backend.delete("order:nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileBackend::open(dir.path())
            .await
            .unwrap()
            .set("k", b"v")
            .await
            .unwrap();

        let reopened = FileBackend::open(dir.path()).await.unwrap();
        assert_eq!(reopened.get("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
