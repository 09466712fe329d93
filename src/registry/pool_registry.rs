//! Keyed storage of pool records with cursor pagination.

use crate::domain::{Pool, PoolId};
use crate::error::LiquidityError;
use crate::persistence::{ModuleStore, StoreError};

use super::PoolIdAllocator;

/// Page size used when a request leaves `limit` at zero.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

const POOL_PREFIX: &[u8] = b"pool/";

/// Pagination parameters for [`PoolRegistry::list_page`].
///
/// At most one of `key` and `offset` may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Opaque cursor returned as `next_key` by a previous page.
    pub key: Option<Vec<u8>>,
    /// Number of records to skip.
    pub offset: u64,
    /// Maximum records to return; zero means [`DEFAULT_PAGE_LIMIT`].
    pub limit: u64,
    /// Whether to report the total number of records.
    pub count_total: bool,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse<T> {
    /// Records in key order.
    pub items: Vec<T>,
    /// Cursor of the following page, absent on the last page.
    pub next_key: Option<Vec<u8>>,
    /// Total record count, when requested.
    pub total: Option<u64>,
}

/// Persistent store of [`Pool`] records keyed by pool id.
///
/// Owns the [`PoolIdAllocator`] sharing its storage handle. No record is
/// cached; every read goes to the store.
#[derive(Debug, Clone)]
pub struct PoolRegistry {
    store: ModuleStore,
    allocator: PoolIdAllocator,
}

fn pool_key(pool_id: &PoolId) -> Vec<u8> {
    let mut key = POOL_PREFIX.to_vec();
    key.extend_from_slice(pool_id.as_str().as_bytes());
    key
}

fn decode(bytes: &[u8]) -> Result<Pool, LiquidityError> {
    serde_json::from_slice(bytes)
        .map_err(StoreError::from)
        .map_err(LiquidityError::from)
}

impl PoolRegistry {
    /// Creates a registry over `store`, allocating ids with `prefix`.
    #[must_use]
    pub fn new(store: ModuleStore, prefix: impl Into<String>) -> Self {
        let allocator = PoolIdAllocator::new(store.clone(), prefix);
        Self { store, allocator }
    }

    /// Returns the identifier allocator.
    #[must_use]
    pub const fn allocator(&self) -> &PoolIdAllocator {
        &self.allocator
    }

    /// Writes `pool`, replacing any record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::Store`] on write failure.
    pub async fn set(&self, pool: &Pool) -> Result<(), LiquidityError> {
        self.store.set_json(&pool_key(&pool.pool_id), pool).await?;
        Ok(())
    }

    /// Looks up a pool. `Ok(None)` means the pool does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::Store`] on read or decode failure.
    pub async fn get(&self, pool_id: &PoolId) -> Result<Option<Pool>, LiquidityError> {
        Ok(self.store.get_json(&pool_key(pool_id)).await?)
    }

    /// Returns `true` if at least one pool is stored.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::Store`] on read failure.
    pub async fn has_pools(&self) -> Result<bool, LiquidityError> {
        Ok(self.store.count(POOL_PREFIX).await? > 0)
    }

    /// Returns every pool. Callers must not rely on the order.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::Store`] on read or decode failure.
    pub async fn list_all(&self) -> Result<Vec<Pool>, LiquidityError> {
        self.store
            .scan(POOL_PREFIX, None, None)
            .await?
            .iter()
            .map(|(_, value)| decode(value))
            .collect()
    }

    /// Returns one page of pools in key order.
    ///
    /// Resumes after `key` when given, otherwise skips `offset` records.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::InvalidPagination`] if both `key` and
    /// `offset` are set, or [`LiquidityError::Store`] on read failure.
    pub async fn list_page(&self, request: &PageRequest) -> Result<PageResponse<Pool>, LiquidityError> {
        let key = request.key.as_deref().filter(|k| !k.is_empty());
        if key.is_some() && request.offset > 0 {
            return Err(LiquidityError::InvalidPagination(
                "either offset or key is expected, got both".to_string(),
            ));
        }

        let limit = if request.limit == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            request.limit
        };
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        let (rows, skip) = match key {
            Some(key) => {
                let mut start = POOL_PREFIX.to_vec();
                start.extend_from_slice(key);
                let rows = self
                    .store
                    .scan(POOL_PREFIX, Some(&start), Some(limit.saturating_add(1)))
                    .await?;
                (rows, 0)
            }
            None => {
                let skip = usize::try_from(request.offset).unwrap_or(usize::MAX);
                let fetch = skip.saturating_add(limit).saturating_add(1);
                let rows = self.store.scan(POOL_PREFIX, None, Some(fetch)).await?;
                (rows, skip)
            }
        };

        let mut rows = rows.into_iter().skip(skip);
        let items = rows
            .by_ref()
            .take(limit)
            .map(|(_, value)| decode(&value))
            .collect::<Result<Vec<_>, _>>()?;
        let next_key = rows
            .next()
            .map(|(key, _)| key.get(POOL_PREFIX.len()..).unwrap_or_default().to_vec());

        let total = if request.count_total {
            Some(self.store.count(POOL_PREFIX).await?)
        } else {
            None
        };

        Ok(PageResponse {
            items,
            next_key,
            total,
        })
    }
}
