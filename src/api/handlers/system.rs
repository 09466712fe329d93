//! System endpoints: health check and genesis export.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::{ErrorResponse, LiquidityError};
use crate::genesis::GenesisState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /genesis` — Export the liquidity state.
///
/// # Errors
///
/// Returns [`LiquidityError::Store`] if the registry cannot be read.
#[utoipa::path(
    get,
    path = "/api/v1/genesis",
    tag = "System",
    summary = "Export genesis",
    description = "Returns the pool id counter and every stored pool in the genesis format accepted at startup.",
    responses(
        (status = 200, description = "Exported state", body = GenesisState),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn export_genesis(State(state): State<AppState>) -> Result<impl IntoResponse, LiquidityError> {
    let genesis = state.pool_service.export_genesis().await?;
    Ok(Json(genesis))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

/// System routes mounted under /api/v1.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/genesis", get(export_genesis))
}
