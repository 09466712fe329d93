//! Shared DTO types used across multiple endpoints.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as CURSOR_ENGINE;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::LiquidityError;
use crate::registry::PageRequest;

/// Cursor pagination query parameters for list endpoints.
///
/// Set either `key` (from a previous `next_key`) or `offset`, not both.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Opaque cursor returned as `next_key` by the previous page.
    #[serde(default)]
    pub key: Option<String>,
    /// Records to skip.
    #[serde(default)]
    pub offset: u64,
    /// Page size; 0 or absent selects the default of 100.
    #[serde(default)]
    pub limit: u64,
    /// Include the total record count.
    #[serde(default)]
    pub count_total: bool,
}

impl PageParams {
    /// Converts query parameters into a registry page request.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::InvalidRequest`] if `key` is not a valid
    /// cursor.
    pub fn to_page_request(&self) -> Result<PageRequest, LiquidityError> {
        let key = match self.key.as_deref().filter(|k| !k.is_empty()) {
            Some(encoded) => Some(CURSOR_ENGINE.decode(encoded).map_err(|e| {
                LiquidityError::InvalidRequest(format!("malformed pagination key: {e}"))
            })?),
            None => None,
        };
        Ok(PageRequest {
            key,
            offset: self.offset,
            limit: self.limit,
            count_total: self.count_total,
        })
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    /// Cursor of the next page; absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_key: Option<String>,
    /// Total record count, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl PageMeta {
    /// Builds metadata from a raw cursor and total.
    #[must_use]
    pub fn new(next_key: Option<&[u8]>, total: Option<u64>) -> Self {
        Self {
            next_key: next_key.map(|k| CURSOR_ENGINE.encode(k)),
            total,
        }
    }
}
