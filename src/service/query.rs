//! Read-only projections of registry state.

use std::sync::Arc;

use crate::domain::{Coins, Pool, PoolId};
use crate::error::LiquidityError;
use crate::ledger::Ledger;
use crate::registry::{PageRequest, PageResponse, PoolRegistry};

/// Request for a single pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPoolRequest {
    /// Pool to look up.
    pub pool_id: PoolId,
}

/// Request for a page of pools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPoolsRequest {
    /// Pagination; absent means the first default-sized page.
    pub pagination: Option<PageRequest>,
}

/// Request for a pool and its live balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPoolBalancesRequest {
    /// Pool to look up.
    pub pool_id: PoolId,
}

/// A pool together with the balances of its account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolBalances {
    /// Stored pool record.
    pub pool: Pool,
    /// Live balances of the pool account.
    pub balances: Coins,
}

/// Read path over the registry and the ledger. Takes no service lock.
#[derive(Debug, Clone)]
pub struct QueryService {
    registry: PoolRegistry,
    ledger: Arc<dyn Ledger>,
}

impl QueryService {
    /// Creates a query service.
    #[must_use]
    pub fn new(registry: PoolRegistry, ledger: Arc<dyn Ledger>) -> Self {
        Self { registry, ledger }
    }

    async fn find(&self, pool_id: &PoolId) -> Result<Pool, LiquidityError> {
        if pool_id.is_empty() {
            return Err(LiquidityError::InvalidRequest("pool id must not be empty".to_string()));
        }
        self.registry
            .get(pool_id)
            .await?
            .ok_or_else(|| LiquidityError::PoolNotFound(pool_id.clone()))
    }

    /// Returns one pool.
    ///
    /// # Errors
    ///
    /// - [`LiquidityError::InvalidRequest`] if the request or id is empty.
    /// - [`LiquidityError::PoolNotFound`] if no such pool exists.
    pub async fn pool(&self, request: Option<QueryPoolRequest>) -> Result<Pool, LiquidityError> {
        let request =
            request.ok_or_else(|| LiquidityError::InvalidRequest("empty request".to_string()))?;
        self.find(&request.pool_id).await
    }

    /// Returns one page of pools.
    ///
    /// # Errors
    ///
    /// - [`LiquidityError::InvalidRequest`] if the request is absent.
    /// - [`LiquidityError::InvalidPagination`] if both a key and an offset
    ///   are given.
    pub async fn pools(
        &self,
        request: Option<QueryPoolsRequest>,
    ) -> Result<PageResponse<Pool>, LiquidityError> {
        let request =
            request.ok_or_else(|| LiquidityError::InvalidRequest("empty request".to_string()))?;
        let pagination = request.pagination.unwrap_or_default();
        self.registry.list_page(&pagination).await
    }

    /// Returns a pool and the live balances of its account.
    ///
    /// # Errors
    ///
    /// - [`LiquidityError::InvalidRequest`] if the request or id is empty.
    /// - [`LiquidityError::PoolNotFound`] if no such pool exists; the
    ///   ledger is not queried in that case.
    pub async fn pool_balances(
        &self,
        request: Option<QueryPoolBalancesRequest>,
    ) -> Result<PoolBalances, LiquidityError> {
        let request =
            request.ok_or_else(|| LiquidityError::InvalidRequest("empty request".to_string()))?;
        let pool = self.find(&request.pool_id).await?;
        let balances = self.ledger.get_all_balances(&pool.address).await;
        Ok(PoolBalances { pool, balances })
    }
}
