//! Persisted pool records.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Address, Coin, PoolId, PoolIdNumeric};

/// Pricing-curve identifier of constant-product (`x · y = k`) pools, the
/// only formula admitted by this service.
pub const CONSTANT_PRODUCT: &str = "constant_product";

/// Prefix of every pool's LP token denomination.
pub const LP_DENOM_PREFIX: &str = "lp/";

/// Returns the LP token denomination of `pool_id` (e.g. `lp/pool1`).
#[must_use]
pub fn lp_denom(pool_id: &PoolId) -> String {
    format!("{LP_DENOM_PREFIX}{pool_id}")
}

/// Singleton counter state for pool identifier allocation.
///
/// Absent from storage until the first allocation; absence reads as
/// [`PoolsMeta::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolsMeta {
    /// Counter value the next allocation will return.
    pub next_pool_id: PoolIdNumeric,
}

impl Default for PoolsMeta {
    fn default() -> Self {
        Self { next_pool_id: 1 }
    }
}

/// One admitted market: two reserves, an LP token, and the pool's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pool {
    /// Unique pool identifier.
    pub pool_id: PoolId,
    /// Account that created and initially funded the pool.
    pub creator: Address,
    /// Reserves, base first then quote.
    #[schema(value_type = Vec<Coin>)]
    pub coins: [Coin; 2],
    /// LP token denomination and minted supply.
    pub lp_token: Coin,
    /// Swap fee in basis points, fixed at creation.
    pub fee: u32,
    /// Pricing curve identifier, fixed at creation.
    pub formula: String,
    /// Pool account address, derived from `pool_id`.
    pub address: Address,
}

impl Pool {
    /// Returns the base reserve.
    #[must_use]
    pub fn base(&self) -> &Coin {
        let [base, _] = &self.coins;
        base
    }

    /// Returns the quote reserve.
    #[must_use]
    pub fn quote(&self) -> &Coin {
        let [_, quote] = &self.coins;
        quote
    }

    /// Checks the record's structural invariants: both reserves strictly
    /// positive and the address matching the identifier.
    ///
    /// Returns a description of the first violated invariant.
    #[must_use]
    pub fn invariant_violation(&self) -> Option<String> {
        if self.pool_id.is_empty() {
            return Some("pool id is empty".to_string());
        }
        if let Some(zero) = self.coins.iter().find(|c| c.is_zero()) {
            return Some(format!("pool {} has empty reserve {}", self.pool_id, zero.denom));
        }
        if self.address != Address::for_pool(&self.pool_id) {
            return Some(format!(
                "pool {} address {} does not match its identifier",
                self.pool_id, self.address
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pool() -> Pool {
        let pool_id = PoolId::new("pool1");
        Pool {
            address: Address::for_pool(&pool_id),
            lp_token: Coin::new(lp_denom(&pool_id), 70),
            pool_id,
            creator: Address::new("creator"),
            coins: [Coin::new("base", 100), Coin::new("quote", 50)],
            fee: 500,
            formula: CONSTANT_PRODUCT.to_string(),
        }
    }

    #[test]
    fn default_meta_starts_at_one() {
        assert_eq!(PoolsMeta::default().next_pool_id, 1);
    }

    #[test]
    fn base_and_quote_accessors() {
        let pool = sample_pool();
        assert_eq!(pool.base(), &Coin::new("base", 100));
        assert_eq!(pool.quote(), &Coin::new("quote", 50));
        assert_eq!(pool.lp_token.denom, "lp/pool1");
    }

    #[test]
    fn well_formed_pool_has_no_violation() {
        assert_eq!(sample_pool().invariant_violation(), None);
    }

    #[test]
    fn mismatched_address_is_reported() {
        let mut pool = sample_pool();
        pool.address = Address::new("elsewhere");
        assert!(pool.invariant_violation().is_some());
    }

    #[test]
    fn zero_reserve_is_reported() {
        let mut pool = sample_pool();
        pool.coins = [Coin::new("base", 0), Coin::new("quote", 50)];
        assert!(pool.invariant_violation().is_some());
    }
}
