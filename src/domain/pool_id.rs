//! Human-readable pool identifier.
//!
//! [`PoolId`] is a newtype wrapper around the rendered `<prefix><decimal>`
//! string (e.g. `pool1`), so pool identifiers cannot be confused with
//! account addresses or denominations.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Numeric counter value a [`PoolId`] is rendered from.
pub type PoolIdNumeric = u64;

/// Unique identifier for a liquidity pool.
///
/// Allocated once at pool creation time by
/// [`crate::registry::PoolIdAllocator`] and immutable thereafter. Used as the
/// storage key in [`crate::registry::PoolRegistry`] and as the seed of the
/// pool's deterministic account address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PoolId(String);

impl PoolId {
    /// Wraps an already-rendered identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Renders `n` as `<prefix><decimal>`.
    #[must_use]
    pub fn format(prefix: &str, n: PoolIdNumeric) -> Self {
        Self(format!("{prefix}{n}"))
    }

    /// Returns the numeric part if this identifier carries `prefix`.
    #[must_use]
    pub fn numeric_with_prefix(&self, prefix: &str) -> Option<PoolIdNumeric> {
        self.0.strip_prefix(prefix)?.parse().ok()
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PoolId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PoolId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for PoolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
