//! Pool identifier allocation.

use crate::domain::{PoolId, PoolIdNumeric, PoolsMeta};
use crate::error::LiquidityError;
use crate::persistence::ModuleStore;

const POOLS_META_KEY: &[u8] = b"pools_meta";

/// Issues unique, strictly increasing pool identifiers from the persisted
/// [`PoolsMeta`] counter.
///
/// The counter is re-read from storage on every call and is written only
/// by this type.
#[derive(Debug, Clone)]
pub struct PoolIdAllocator {
    store: ModuleStore,
    prefix: String,
}

impl PoolIdAllocator {
    /// Creates an allocator over `store` rendering ids with `prefix`.
    #[must_use]
    pub fn new(store: ModuleStore, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Returns the configured id prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn load(&self) -> Result<PoolsMeta, LiquidityError> {
        Ok(self
            .store
            .get_json::<PoolsMeta>(POOLS_META_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Returns `true` once a counter has been persisted, by allocation or
    /// by [`Self::restore`].
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::Store`] if the counter cannot be read.
    pub async fn is_initialized(&self) -> Result<bool, LiquidityError> {
        Ok(self
            .store
            .get_json::<PoolsMeta>(POOLS_META_KEY)
            .await?
            .is_some())
    }

    /// Returns the value the next allocation would return. Does not write.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::Store`] if the counter cannot be read.
    pub async fn peek_next(&self) -> Result<PoolIdNumeric, LiquidityError> {
        Ok(self.load().await?.next_pool_id)
    }

    /// Returns the current counter value and persists its successor.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::Store`] if the counter cannot be read or
    /// written.
    ///
    /// # Panics
    ///
    /// Panics if the counter equals [`PoolIdNumeric::MAX`]; advancing it
    /// would wrap and reissue an existing identifier.
    pub async fn allocate_and_advance(&self) -> Result<PoolIdNumeric, LiquidityError> {
        let current = self.load().await?.next_pool_id;
        assert!(
            current != PoolIdNumeric::MAX,
            "pool id counter overflow: next_pool_id is {current}"
        );
        let meta = PoolsMeta {
            next_pool_id: current + 1,
        };
        self.store.set_json(POOLS_META_KEY, &meta).await?;
        tracing::debug!(allocated = current, "advanced pool id counter");
        Ok(current)
    }

    /// Renders `n` as `<prefix><n>`.
    #[must_use]
    pub fn format(&self, n: PoolIdNumeric) -> PoolId {
        PoolId::format(&self.prefix, n)
    }

    /// Allocates one identifier and renders it.
    ///
    /// # Errors
    ///
    /// See [`Self::allocate_and_advance`].
    ///
    /// # Panics
    ///
    /// See [`Self::allocate_and_advance`].
    pub async fn allocate_and_advance_string(&self) -> Result<PoolId, LiquidityError> {
        let n = self.allocate_and_advance().await?;
        Ok(self.format(n))
    }

    /// Sets the counter to `next`. Used when importing state.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::InvalidRequest`] if `next` is zero, or
    /// [`LiquidityError::Store`] on write failure.
    pub async fn restore(&self, next: PoolIdNumeric) -> Result<(), LiquidityError> {
        if next == 0 {
            return Err(LiquidityError::InvalidRequest(
                "next_pool_id must be at least 1".to_string(),
            ));
        }
        self.store
            .set_json(POOLS_META_KEY, &PoolsMeta { next_pool_id: next })
            .await?;
        Ok(())
    }

    /// Deletes the counter so the next allocation starts again at 1.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::Store`] on write failure.
    pub async fn reset(&self) -> Result<(), LiquidityError> {
        self.store.delete(POOLS_META_KEY).await?;
        Ok(())
    }
}
