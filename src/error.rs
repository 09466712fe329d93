//! Liquidity error types with HTTP status code mapping.
//!
//! [`LiquidityError`] is the central error type of the crate. Each variant
//! carries an [`ErrorCode`] kind, a numeric code and an HTTP status, and
//! renders as a structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::PoolId;
use crate::ledger::LedgerError;
use crate::persistence::StoreError;

/// Coarse error classification shared by every exposed surface.
///
/// Callers use the kind to tell a bad request from an absent resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request was malformed or cannot be satisfied as given.
    InvalidArgument,
    /// The requested resource does not exist.
    NotFound,
    /// The request could not be processed.
    Internal,
}

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "kind": "not_found",
///     "message": "pool not found: pool7"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code, kind and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Error kind.
    pub kind: ErrorCode,
    /// Human-readable error message.
    pub message: String,
}

/// Crate-wide error enum with kind and HTTP status mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status                         |
/// |-----------|------------|-------------------------------------|
/// | 1000–1999 | Validation | 400 Bad Request / 422 Unprocessable |
/// | 2000–2999 | Not Found  | 404 Not Found                       |
/// | 3000–3999 | Internal   | 500 Internal Server Error           |
/// | 4000–4999 | Ledger     | 500 / 422 for insufficient funds    |
#[derive(Debug, thiserror::Error)]
pub enum LiquidityError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A transfer was requested with no coins.
    #[error("{0}")]
    EmptyCoins(&'static str),

    /// A transfer contained a zero-amount coin.
    #[error("coin {0} amount is zero")]
    ZeroAmount(String),

    /// Initial issuance computation rejected the reserves.
    #[error("amm error: {0}")]
    Amm(#[from] hydra_amm::error::AmmError),

    /// A pre-flight balance check failed.
    #[error("insufficient funds: {address} does not hold {required}")]
    InsufficientFunds {
        /// Account that was checked.
        address: String,
        /// Coin that was required, e.g. `100stake`.
        required: String,
    },

    /// Pool with the given ID was not found.
    #[error("pool not found: {0}")]
    PoolNotFound(PoolId),

    /// The ledger account of a pool is missing.
    #[error("pool account {pool_id} {reason}")]
    PoolAccountNotFound {
        /// Pool whose account was looked up.
        pool_id: PoolId,
        /// Why the account was expected.
        reason: &'static str,
    },

    /// Error propagated unchanged from the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Pagination parameters conflict.
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    /// Persistence layer failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl LiquidityError {
    /// Returns the error kind for this variant.
    #[must_use]
    pub const fn kind(&self) -> ErrorCode {
        match self {
            Self::InvalidRequest(_)
            | Self::EmptyCoins(_)
            | Self::ZeroAmount(_)
            | Self::Amm(_)
            | Self::InsufficientFunds { .. } => ErrorCode::InvalidArgument,
            Self::PoolNotFound(_) | Self::PoolAccountNotFound { .. } => ErrorCode::NotFound,
            Self::Ledger(_) | Self::InvalidPagination(_) | Self::Store(_) => ErrorCode::Internal,
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::EmptyCoins(_) => 1002,
            Self::ZeroAmount(_) => 1003,
            Self::Amm(_) => 1004,
            Self::InsufficientFunds { .. } => 1005,
            Self::PoolNotFound(_) => 2001,
            Self::PoolAccountNotFound { .. } => 2002,
            Self::InvalidPagination(_) => 3001,
            Self::Store(_) => 3002,
            Self::Ledger(LedgerError::InsufficientFunds { .. }) => 4001,
            Self::Ledger(LedgerError::UnknownModule(_)) => 4002,
            Self::Ledger(LedgerError::Overflow(_)) => 4003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InsufficientFunds { .. } | Self::Ledger(LedgerError::InsufficientFunds { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::InvalidRequest(_) | Self::EmptyCoins(_) | Self::ZeroAmount(_) | Self::Amm(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PoolNotFound(_) | Self::PoolAccountNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Ledger(_) | Self::InvalidPagination(_) | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for LiquidityError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                kind: self.kind(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
