//! In-memory ordered key-value store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KvPair, KvStore, StoreError};

/// [`KvStore`] backed by a `BTreeMap`, giving byte-ordered scans.
///
/// Readers share the lock; writers are serialized.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_vec(), value);
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn scan(
        &self,
        prefix: &[u8],
        start: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<KvPair>, StoreError> {
        let lower = match start {
            Some(start) if start > prefix => start.to_vec(),
            _ => prefix.to_vec(),
        };
        let map = self.entries.read().await;
        Ok(map
            .range(lower..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .take(limit.unwrap_or(usize::MAX))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    async fn count(&self, prefix: &[u8]) -> Result<u64, StoreError> {
        let map = self.entries.read().await;
        let count = map
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for key in ["a/1", "a/2", "a/3", "b/1"] {
            let _ = store.set(key.as_bytes(), key.as_bytes().to_vec()).await;
        }
        store
    }

    #[tokio::test]
    async fn get_set_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get(b"k").await.ok(), Some(None));

        let _ = store.set(b"k", b"v".to_vec()).await;
        assert_eq!(store.get(b"k").await.ok(), Some(Some(b"v".to_vec())));

        let _ = store.delete(b"k").await;
        assert_eq!(store.get(b"k").await.ok(), Some(None));
    }

    #[tokio::test]
    async fn scan_respects_prefix_start_and_limit() {
        let store = seeded().await;

        let Ok(all) = store.scan(b"a/", None, None).await else {
            panic!("scan failed");
        };
        assert_eq!(all.len(), 3);

        let Ok(resumed) = store.scan(b"a/", Some(b"a/2".as_slice()), Some(5)).await else {
            panic!("scan failed");
        };
        let keys: Vec<Vec<u8>> = resumed.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"a/2".to_vec(), b"a/3".to_vec()]);

        let Ok(limited) = store.scan(b"a/", None, Some(1)).await else {
            panic!("scan failed");
        };
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn start_before_prefix_is_clamped() {
        let store = seeded().await;
        let Ok(rows) = store.scan(b"b/", Some(b"a/".as_slice()), None).await else {
            panic!("scan failed");
        };
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn count_by_prefix() {
        let store = seeded().await;
        assert_eq!(store.count(b"a/").await.ok(), Some(3));
        assert_eq!(store.count(b"c/").await.ok(), Some(0));
    }
}
