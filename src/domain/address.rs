//! Ledger account addresses.
//!
//! User addresses are opaque strings supplied by callers. Module and pool
//! addresses are derived: a SHA-256 digest rendered as lowercase hex, so
//! any component can recompute them without a storage lookup.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use super::PoolId;
use super::MODULE_NAME;

/// Account address on the external ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wraps a caller-supplied address string.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Address of the custody account owned by module `name`.
    #[must_use]
    pub fn for_module(name: &str) -> Self {
        Self(hex::encode(Sha256::digest(name.as_bytes())))
    }

    /// Address derived for `key` under module `name`:
    /// `hex(sha256(name ‖ 0x00 ‖ key))`.
    #[must_use]
    pub fn derive(name: &str, key: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(key);
        Self(hex::encode(hasher.finalize()))
    }

    /// Deterministic account address of a pool. A pure function of the
    /// pool identifier.
    #[must_use]
    pub fn for_pool(pool_id: &PoolId) -> Self {
        Self::derive(MODULE_NAME, pool_id.as_str().as_bytes())
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the address is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_address_is_deterministic() {
        let id = PoolId::new("pool1");
        assert_eq!(Address::for_pool(&id), Address::for_pool(&PoolId::new("pool1")));
        assert_eq!(Address::for_pool(&id).as_str().len(), 64);
    }

    #[test]
    fn distinct_pools_get_distinct_addresses() {
        let a = Address::for_pool(&PoolId::new("pool1"));
        let b = Address::for_pool(&PoolId::new("pool2"));
        assert_ne!(a, b);
    }

    #[test]
    fn pool_address_differs_from_module_address() {
        let module = Address::for_module(MODULE_NAME);
        let pool = Address::for_pool(&PoolId::new(""));
        assert_ne!(module, pool);
    }

    #[test]
    fn empty_detection_ignores_whitespace() {
        assert!(Address::new("  ").is_empty());
        assert!(!Address::new("cosmos1xyz").is_empty());
    }
}
