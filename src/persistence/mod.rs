//! Persistence layer: byte-keyed key-value storage and the event log.
//!
//! [`KvStore`] is the storage substrate the registry is written against:
//! point get/set/delete plus ordered prefix scans that can resume from a
//! key. [`ModuleStore`] scopes a store to one module's namespace and adds
//! JSON record helpers. Two backends exist: [`memory::MemoryStore`] for
//! tests and single-process runs, and [`postgres::PostgresStore`].

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A key and its value, as returned by scans.
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Storage-layer failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(String),

    /// A stored value could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Byte-keyed ordered key-value store.
///
/// Keys compare lexicographically as bytes. Scans return entries in key
/// order, which makes a key a stable resume point for pagination.
#[async_trait]
pub trait KvStore: fmt::Debug + Send + Sync {
    /// Reads the value stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Writes `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    async fn set(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    async fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Returns entries whose key starts with `prefix`, in key order,
    /// beginning at `start` (inclusive) when given, at most `limit` entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    async fn scan(
        &self,
        prefix: &[u8],
        start: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<KvPair>, StoreError>;

    /// Counts entries whose key starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    async fn count(&self, prefix: &[u8]) -> Result<u64, StoreError>;
}

/// A [`KvStore`] view scoped to one module's namespace.
///
/// Every key is transparently prefixed with `<namespace>/`; keys returned
/// from scans have the namespace stripped again.
#[derive(Debug, Clone)]
pub struct ModuleStore {
    inner: Arc<dyn KvStore>,
    namespace: Vec<u8>,
}

impl ModuleStore {
    /// Scopes `inner` to `namespace`.
    #[must_use]
    pub fn new(inner: Arc<dyn KvStore>, namespace: &str) -> Self {
        Self {
            inner,
            namespace: format!("{namespace}/").into_bytes(),
        }
    }

    fn full_key(&self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.namespace.len() + key.len());
        full.extend_from_slice(&self.namespace);
        full.extend_from_slice(key);
        full
    }

    /// Reads and decodes the JSON record at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend or decoding failure.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, StoreError> {
        match self.inner.get(&self.full_key(key)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and writes it at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend or encoding failure.
    pub async fn set_json<T: Serialize + Sync>(&self, key: &[u8], value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.inner.set(&self.full_key(key), bytes).await
    }

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    pub async fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.inner.delete(&self.full_key(key)).await
    }

    /// Scans `prefix` within the namespace. Returned keys are relative to
    /// the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    pub async fn scan(
        &self,
        prefix: &[u8],
        start: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<KvPair>, StoreError> {
        let full_prefix = self.full_key(prefix);
        let full_start = start.map(|s| self.full_key(s));
        let rows = self
            .inner
            .scan(&full_prefix, full_start.as_deref(), limit)
            .await?;
        let ns_len = self.namespace.len();
        Ok(rows
            .into_iter()
            .map(|(key, value)| (key.get(ns_len..).unwrap_or_default().to_vec(), value))
            .collect())
    }

    /// Counts entries under `prefix` within the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    pub async fn count(&self, prefix: &[u8]) -> Result<u64, StoreError> {
        self.inner.count(&self.full_key(prefix)).await
    }
}
