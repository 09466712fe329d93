//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    CreatePoolRequest, CreatePoolResponse, PageMeta, PoolBalancesResponse, PoolListResponse,
    PoolResponse,
};
use crate::api::handlers::system::HealthResponse;
use crate::domain::{Coin, Coins, Pool};
use crate::error::{ErrorBody, ErrorCode, ErrorResponse};
use crate::genesis::GenesisState;

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "hydra-liquidity",
        description = "Liquidity-pool registry and pool admission API"
    ),
    paths(
        crate::api::handlers::system::health_handler,
        crate::api::handlers::system::export_genesis,
        crate::api::handlers::pool::create_pool,
        crate::api::handlers::pool::list_pools,
        crate::api::handlers::pool::get_pool,
        crate::api::handlers::pool::get_pool_balances,
    ),
    components(schemas(
        Coin,
        Coins,
        Pool,
        GenesisState,
        CreatePoolRequest,
        CreatePoolResponse,
        PoolResponse,
        PoolListResponse,
        PoolBalancesResponse,
        PageMeta,
        HealthResponse,
        ErrorResponse,
        ErrorBody,
        ErrorCode,
    )),
    tags(
        (name = "Pools", description = "Pool admission and queries"),
        (name = "System", description = "Health and state export"),
    )
)]
pub struct ApiDoc;
