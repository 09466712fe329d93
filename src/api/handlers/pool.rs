//! Pool handlers: create, list, get, balances.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CreatePoolRequest, CreatePoolResponse, PageMeta, PageParams, PoolBalancesResponse,
    PoolListResponse, PoolResponse,
};
use crate::app_state::AppState;
use crate::domain::{Address, PoolId};
use crate::error::{ErrorResponse, LiquidityError};
use crate::service::{QueryPoolBalancesRequest, QueryPoolRequest, QueryPoolsRequest};

/// `POST /pools` — Create a new constant-product pool.
///
/// # Errors
///
/// Returns [`LiquidityError`] on invalid reserves, insufficient funds or
/// ledger failure.
#[utoipa::path(
    post,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "Create a pool",
    description = "Collects the creation fee from the creator, moves both reserves into a new pool account and mints the initial LP tokens to the creator.",
    request_body = CreatePoolRequest,
    responses(
        (status = 201, description = "Pool created", body = CreatePoolResponse),
        (status = 400, description = "Invalid reserves", body = ErrorResponse),
        (status = 422, description = "Insufficient funds", body = ErrorResponse),
    )
)]
pub async fn create_pool(
    State(state): State<AppState>,
    Json(req): Json<CreatePoolRequest>,
) -> Result<impl IntoResponse, LiquidityError> {
    let creator = Address::new(req.creator);
    let pool = state
        .pool_service
        .create_pool(&creator, req.base, req.quote)
        .await?;

    let response = CreatePoolResponse {
        pool_id: pool.pool_id.clone(),
        pool,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /pools` — List pools one page at a time.
///
/// # Errors
///
/// Returns [`LiquidityError`] on a malformed cursor or when both `key` and
/// `offset` are given.
#[utoipa::path(
    get,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "List pools",
    description = "Returns pools in key order. Pass `next_key` back as `key` to fetch the following page.",
    params(PageParams),
    responses(
        (status = 200, description = "One page of pools", body = PoolListResponse),
        (status = 400, description = "Malformed cursor", body = ErrorResponse),
        (status = 500, description = "Conflicting pagination", body = ErrorResponse),
    )
)]
pub async fn list_pools(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, LiquidityError> {
    let request = QueryPoolsRequest {
        pagination: Some(params.to_page_request()?),
    };
    let page = state.query_service.pools(Some(request)).await?;

    Ok(Json(PoolListResponse {
        pagination: PageMeta::new(page.next_key.as_deref(), page.total),
        pools: page.items,
    }))
}

/// `GET /pools/{id}` — Get one pool.
///
/// # Errors
///
/// Returns [`LiquidityError::PoolNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{id}",
    tag = "Pools",
    summary = "Get a pool",
    params(
        ("id" = String, Path, description = "Pool identifier, e.g. pool1"),
    ),
    responses(
        (status = 200, description = "Pool record", body = PoolResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, LiquidityError> {
    let pool = state
        .query_service
        .pool(Some(QueryPoolRequest {
            pool_id: PoolId::new(id),
        }))
        .await?;
    Ok(Json(PoolResponse { pool }))
}

/// `GET /pools/{id}/balances` — Get a pool with its live account balances.
///
/// # Errors
///
/// Returns [`LiquidityError::PoolNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{id}/balances",
    tag = "Pools",
    summary = "Get pool balances",
    description = "Returns the stored pool record together with the balances currently held by its account.",
    params(
        ("id" = String, Path, description = "Pool identifier, e.g. pool1"),
    ),
    responses(
        (status = 200, description = "Pool and balances", body = PoolBalancesResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_pool_balances(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, LiquidityError> {
    let result = state
        .query_service
        .pool_balances(Some(QueryPoolBalancesRequest {
            pool_id: PoolId::new(id),
        }))
        .await?;
    Ok(Json(PoolBalancesResponse {
        pool: result.pool,
        balances: result.balances,
    }))
}

/// Pool routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", post(create_pool).get(list_pools))
        .route("/pools/{id}", get(get_pool))
        .route("/pools/{id}/balances", get(get_pool_balances))
}
