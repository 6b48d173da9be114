//! Durable key-value blob persistence for run state.
//!
//! Two pieces of state must survive between runs: the timeline cursor (the
//! last-seen post id) and the cached OAuth access token. Both sit behind the
//! [`BlobStore`] trait so tests can swap the filesystem for memory.
//!
//! Absence is a normal state everywhere in this crate: a missing key reads
//! as `None`, never as an error.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

pub mod cursor;

pub use cursor::{Cursor, CursorStore};

/// Opaque blob persistence keyed by short names (`cursor.json`, `token.json`).
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Read a blob; `Ok(None)` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// Durably replace the blob for `key`.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;
}

/// One file per key under a fixed directory.
///
/// Writes land in a temp file in the same directory and are renamed over the
/// target, so a crash mid-write leaves the previous value intact rather than
/// a torn blob.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait::async_trait]
impl BlobStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create state directory {}", self.dir.display()))?;
        let path = self.path_for(key);
        let tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("failed to stage write for {}", path.display()))?;
        std::fs::write(tmp.path(), &bytes)
            .with_context(|| format!("failed to stage write for {}", path.display()))?;
        tmp.persist(&path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        tracing::debug!(key, bytes = bytes.len(), "store.put");
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.lock().expect("store mutex poisoned").get(key).cloned())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.inner
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), bytes);
        Ok(())
    }
}

/// Read and deserialize a JSON blob, if present.
pub async fn get_json<T: DeserializeOwned>(store: &dyn BlobStore, key: &str) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(bytes) => {
            let value = serde_json::from_slice(&bytes)
                .with_context(|| format!("corrupt state blob under key {key}"))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Serialize and durably write a JSON blob.
pub async fn put_json<T: Serialize>(store: &dyn BlobStore, key: &str, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("failed to encode state blob")?;
    store.put(key, bytes).await
}

/// Cached OAuth access token, written once after the interactive flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredToken {
    pub token: String,
    pub secret: String,
    #[serde(default)]
    pub screen_name: Option<String>,
}

pub const TOKEN_KEY: &str = "token.json";

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());

        store.put("k", b"v1".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().unwrap(), b"v1");

        store.put("k", b"v2".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().unwrap(), b"v2");
    }

    #[tokio::test]
    async fn json_helpers_round_trip_tokens() {
        let store = MemoryStore::new();
        assert!(get_json::<StoredToken>(&store, TOKEN_KEY)
            .await
            .unwrap()
            .is_none());

        let token = StoredToken {
            token: "tk".into(),
            secret: "ts".into(),
            screen_name: Some("alice".into()),
        };
        put_json(&store, TOKEN_KEY, &token).await.unwrap();
        let back = get_json::<StoredToken>(&store, TOKEN_KEY)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(back, token);
    }
}
