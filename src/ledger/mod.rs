//! Ledger and account collaborators.
//!
//! The liquidity core never holds balances itself. It moves coins through
//! a [`Ledger`] and opens pool accounts through an [`AccountRegistry`].
//! [`memory::MemoryBank`] implements both for tests and single-process
//! deployments.

pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Address, Coin, Coins};

/// Failure reported by a [`Ledger`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The debited account holds less than required.
    #[error("insufficient funds: {address} has {available}{denom}, needs {required}{denom}")]
    InsufficientFunds {
        /// Debited account.
        address: Address,
        /// Denomination that fell short.
        denom: String,
        /// Balance held.
        available: u128,
        /// Amount requested.
        required: u128,
    },

    /// The named module has no ledger account.
    #[error("unknown module account: {0}")]
    UnknownModule(String),

    /// Crediting the account would overflow its balance.
    #[error("balance overflow in {0}")]
    Overflow(String),
}

/// A ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    /// Account address.
    pub address: Address,
    /// Sequential account number assigned by the registry.
    pub account_number: u64,
    /// Owning module, for module accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
}

impl Account {
    /// Marks this account as owned by module `name`.
    #[must_use]
    pub fn into_module(self, name: impl Into<String>) -> Self {
        Self {
            module_name: Some(name.into()),
            ..self
        }
    }

    /// Returns `true` if the account is owned by a module.
    #[must_use]
    pub const fn is_module(&self) -> bool {
        self.module_name.is_some()
    }
}

/// Balance-holding collaborator.
///
/// Every mutating call is atomic: either all coins move or none do.
#[async_trait]
pub trait Ledger: fmt::Debug + Send + Sync {
    /// Returns `true` if `address` holds at least `coin`.
    async fn has_balance(&self, address: &Address, coin: &Coin) -> bool;

    /// Moves `coins` between two accounts.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if `from` cannot cover
    /// every coin.
    async fn send_coins(&self, from: &Address, to: &Address, coins: &Coins) -> Result<(), LedgerError>;

    /// Moves `coins` from an account into a module's custody.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the module is unknown or funds fall short.
    async fn send_coins_from_account_to_module(
        &self,
        from: &Address,
        module: &str,
        coins: &Coins,
    ) -> Result<(), LedgerError>;

    /// Creates `coins` in a module's custody.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the module is unknown or a balance would
    /// overflow.
    async fn mint_coins(&self, module: &str, coins: &Coins) -> Result<(), LedgerError>;

    /// Destroys `coins` held by a module.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the module is unknown or funds fall short.
    async fn burn_coins(&self, module: &str, coins: &Coins) -> Result<(), LedgerError>;

    /// Moves `coins` from a module's custody to an account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the module is unknown or funds fall short.
    async fn send_coins_from_module_to_account(
        &self,
        module: &str,
        to: &Address,
        coins: &Coins,
    ) -> Result<(), LedgerError>;

    /// Returns every non-zero balance held by `address`.
    async fn get_all_balances(&self, address: &Address) -> Coins;
}

/// Account-keeping collaborator.
#[async_trait]
pub trait AccountRegistry: fmt::Debug + Send + Sync {
    /// Looks up the account at `address`.
    async fn get_account(&self, address: &Address) -> Option<Account>;

    /// Builds a fresh account for `address` with the next account number.
    /// The account is not stored until passed to [`Self::set_account`].
    async fn new_account(&self, address: &Address) -> Account;

    /// Stores `account`, replacing any account at the same address.
    async fn set_account(&self, account: Account);
}
