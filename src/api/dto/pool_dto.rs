//! Pool-related DTOs for create, get, list and balance operations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PageMeta;
use crate::domain::{Coin, Coins, Pool, PoolId};

/// Request body for `POST /pools`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePoolRequest {
    /// Account funding the pool.
    pub creator: String,
    /// Base reserve.
    pub base: Coin,
    /// Quote reserve.
    pub quote: Coin,
}

/// Response body for `POST /pools` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePoolResponse {
    /// Identifier of the new pool.
    pub pool_id: PoolId,
    /// Stored pool record.
    pub pool: Pool,
}

/// Response body for `GET /pools/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolResponse {
    /// Stored pool record.
    pub pool: Pool,
}

/// Paginated list response for `GET /pools`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolListResponse {
    /// Pools in key order.
    pub pools: Vec<Pool>,
    /// Pagination metadata.
    pub pagination: PageMeta,
}

/// Response body for `GET /pools/{id}/balances`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolBalancesResponse {
    /// Stored pool record.
    pub pool: Pool,
    /// Live balances of the pool account.
    pub balances: Coins,
}
