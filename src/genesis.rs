//! Genesis import and export of liquidity state.
//!
//! [`GenesisState`] is the liquidity module's slice: the id counter and
//! every pool. [`GenesisFile`] wraps it together with initial account
//! balances for seeding the in-memory ledger at startup.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Address, Coins, Pool, PoolIdNumeric};
use crate::error::LiquidityError;
use crate::ledger::LedgerError;
use crate::ledger::memory::MemoryBank;

/// Exported liquidity state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GenesisState {
    /// Counter value the next allocation will return.
    pub next_pool_id: PoolIdNumeric,
    /// Every stored pool.
    pub pools: Vec<Pool>,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            next_pool_id: 1,
            pools: Vec::new(),
        }
    }
}

impl GenesisState {
    /// Checks that the state can be imported under id prefix `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::InvalidRequest`] if the counter is zero, a
    /// pool id repeats, a pool breaks its record invariants, or the counter
    /// does not lie beyond every allocated id.
    pub fn validate(&self, prefix: &str) -> Result<(), LiquidityError> {
        if self.next_pool_id == 0 {
            return Err(LiquidityError::InvalidRequest(
                "genesis next_pool_id must be at least 1".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for pool in &self.pools {
            if !seen.insert(&pool.pool_id) {
                return Err(LiquidityError::InvalidRequest(format!(
                    "duplicate pool {} in genesis",
                    pool.pool_id
                )));
            }
            if let Some(violation) = pool.invariant_violation() {
                return Err(LiquidityError::InvalidRequest(violation));
            }
            if pool
                .pool_id
                .numeric_with_prefix(prefix)
                .is_some_and(|n| n >= self.next_pool_id)
            {
                return Err(LiquidityError::InvalidRequest(format!(
                    "pool {} is not below next_pool_id {}",
                    pool.pool_id, self.next_pool_id
                )));
            }
        }
        Ok(())
    }
}

/// Initial balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisBalance {
    /// Funded account.
    pub address: Address,
    /// Coins credited to it.
    pub coins: Coins,
}

/// Contents of the startup genesis file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisFile {
    /// Account balances to seed.
    #[serde(default)]
    pub balances: Vec<GenesisBalance>,
    /// Liquidity state to import.
    #[serde(default)]
    pub liquidity: GenesisState,
}

impl GenesisFile {
    /// Reads and parses a JSON genesis file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid genesis JSON.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading genesis file {}", path.display()))?;
        serde_json::from_slice(&raw).with_context(|| format!("parsing genesis file {}", path.display()))
    }

    /// Credits every listed balance to `bank`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if a balance would overflow.
    pub async fn seed_bank(&self, bank: &MemoryBank) -> Result<(), LedgerError> {
        for entry in &self.balances {
            bank.seed(&entry.address, &entry.coins).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{CONSTANT_PRODUCT, Coin, PoolId, lp_denom};

    fn pool(id: &str) -> Pool {
        let pool_id = PoolId::new(id);
        Pool {
            lp_token: Coin::new(lp_denom(&pool_id), 10),
            address: Address::for_pool(&pool_id),
            pool_id,
            creator: Address::new("alice"),
            coins: [Coin::new("atom", 10), Coin::new("osmo", 10)],
            fee: 500,
            formula: CONSTANT_PRODUCT.to_string(),
        }
    }

    #[test]
    fn valid_state_passes() {
        let state = GenesisState {
            next_pool_id: 3,
            pools: vec![pool("pool1"), pool("pool2")],
        };
        assert!(state.validate("pool").is_ok());
        assert!(GenesisState::default().validate("pool").is_ok());
    }

    #[test]
    fn duplicate_ids_fail() {
        let state = GenesisState {
            next_pool_id: 3,
            pools: vec![pool("pool1"), pool("pool1")],
        };
        assert!(state.validate("pool").is_err());
    }

    #[test]
    fn counter_must_exceed_ids() {
        let state = GenesisState {
            next_pool_id: 2,
            pools: vec![pool("pool1"), pool("pool2")],
        };
        assert!(state.validate("pool").is_err());
    }

    #[test]
    fn foreign_prefix_does_not_constrain_counter() {
        let state = GenesisState {
            next_pool_id: 1,
            pools: vec![pool("legacy7")],
        };
        assert!(state.validate("pool").is_ok());
    }

    #[test]
    fn mismatched_address_fails() {
        let mut bad = pool("pool1");
        bad.address = Address::new("somewhere");
        let state = GenesisState {
            next_pool_id: 2,
            pools: vec![bad],
        };
        assert!(matches!(
            state.validate("pool"),
            Err(LiquidityError::InvalidRequest(_))
        ));
    }

    #[test]
    fn genesis_file_defaults_missing_sections() {
        let Ok(file) = serde_json::from_str::<GenesisFile>(
            r#"{"balances":[{"address":"alice","coins":[{"denom":"stake","amount":"5"}]}]}"#,
        ) else {
            panic!("genesis file should parse");
        };
        assert_eq!(file.balances.len(), 1);
        assert_eq!(file.liquidity, GenesisState::default());
    }

    #[tokio::test]
    async fn seed_bank_credits_balances() {
        let bank = MemoryBank::new(&["liquidity"]);
        let file = GenesisFile {
            balances: vec![GenesisBalance {
                address: Address::new("alice"),
                coins: Coins::single(Coin::new("stake", 5)),
            }],
            liquidity: GenesisState::default(),
        };
        let Ok(()) = file.seed_bank(&bank).await else {
            panic!("seeding failed");
        };
        assert_eq!(bank.balance(&Address::new("alice"), "stake").await, 5);
    }
}
