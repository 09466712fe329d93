//! In-memory bank implementing [`Ledger`] and [`AccountRegistry`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Account, AccountRegistry, Ledger, LedgerError};
use crate::domain::{Address, Coin, Coins};

/// A recorded ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Movement {
    /// Coins moved between two addresses.
    Transfer {
        /// Debited address.
        from: Address,
        /// Credited address.
        to: Address,
        /// Coins moved.
        coins: Coins,
    },
    /// Coins created in a module account.
    Mint {
        /// Minting module.
        module: String,
        /// Coins created.
        coins: Coins,
    },
    /// Coins destroyed from a module account.
    Burn {
        /// Burning module.
        module: String,
        /// Coins destroyed.
        coins: Coins,
    },
}

#[derive(Debug, Default)]
struct BankState {
    balances: HashMap<Address, BTreeMap<String, u128>>,
    accounts: HashMap<Address, Account>,
    next_account_number: u64,
    movements: Option<Vec<Movement>>,
}

/// Sums `coins` per denomination so repeated denoms are checked together.
fn totals(coins: &Coins) -> Result<BTreeMap<&str, u128>, LedgerError> {
    let mut totals: BTreeMap<&str, u128> = BTreeMap::new();
    for coin in coins {
        let entry = totals.entry(coin.denom.as_str()).or_default();
        *entry = entry
            .checked_add(coin.amount)
            .ok_or_else(|| LedgerError::Overflow(coin.denom.clone()))?;
    }
    Ok(totals)
}

impl BankState {
    fn balance(&self, address: &Address, denom: &str) -> u128 {
        self.balances
            .get(address)
            .and_then(|b| b.get(denom))
            .copied()
            .unwrap_or_default()
    }

    fn record(&mut self, movement: Movement) {
        if let Some(log) = self.movements.as_mut() {
            log.push(movement);
        }
    }

    fn ensure_account(&mut self, address: &Address) {
        if !self.accounts.contains_key(address) {
            let account = Account {
                address: address.clone(),
                account_number: self.next_account_number,
                module_name: None,
            };
            self.next_account_number += 1;
            self.accounts.insert(address.clone(), account);
        }
    }

    fn check_debit(&self, address: &Address, totals: &BTreeMap<&str, u128>) -> Result<(), LedgerError> {
        for (denom, required) in totals {
            let available = self.balance(address, denom);
            if available < *required {
                return Err(LedgerError::InsufficientFunds {
                    address: address.clone(),
                    denom: (*denom).to_string(),
                    available,
                    required: *required,
                });
            }
        }
        Ok(())
    }

    fn check_credit(&self, address: &Address, totals: &BTreeMap<&str, u128>) -> Result<(), LedgerError> {
        for (denom, amount) in totals {
            if self.balance(address, denom).checked_add(*amount).is_none() {
                return Err(LedgerError::Overflow(address.to_string()));
            }
        }
        Ok(())
    }

    fn apply_debit(&mut self, address: &Address, totals: &BTreeMap<&str, u128>) {
        if let Some(held) = self.balances.get_mut(address) {
            for (denom, amount) in totals {
                if let Some(balance) = held.get_mut(*denom) {
                    *balance = balance.saturating_sub(*amount);
                    if *balance == 0 {
                        held.remove(*denom);
                    }
                }
            }
        }
    }

    fn apply_credit(&mut self, address: &Address, totals: &BTreeMap<&str, u128>) {
        let held = self.balances.entry(address.clone()).or_default();
        for (denom, amount) in totals {
            if *amount > 0 {
                let balance = held.entry((*denom).to_string()).or_default();
                *balance = balance.saturating_add(*amount);
            }
        }
    }

    fn transfer(&mut self, from: &Address, to: &Address, coins: &Coins) -> Result<(), LedgerError> {
        let totals = totals(coins)?;
        self.check_debit(from, &totals)?;
        if from != to {
            self.check_credit(to, &totals)?;
            self.apply_debit(from, &totals);
            self.apply_credit(to, &totals);
            self.ensure_account(to);
        }
        self.record(Movement::Transfer {
            from: from.clone(),
            to: to.clone(),
            coins: coins.clone(),
        });
        Ok(())
    }
}

/// In-memory bank with module accounts and an optional movement log.
///
/// Module accounts are registered at construction; minting and burning
/// are restricted to them. Balances live only as long as the process.
#[derive(Debug)]
pub struct MemoryBank {
    modules: BTreeSet<String>,
    state: RwLock<BankState>,
}

impl MemoryBank {
    /// Creates a bank with a module account for each of `modules`.
    #[must_use]
    pub fn new(modules: &[&str]) -> Self {
        Self::build(modules, None)
    }

    /// Creates a bank that keeps every movement, see [`Self::movements`].
    ///
    /// The log is never trimmed.
    #[must_use]
    pub fn with_movement_log(modules: &[&str]) -> Self {
        Self::build(modules, Some(Vec::new()))
    }

    fn build(modules: &[&str], movements: Option<Vec<Movement>>) -> Self {
        let mut state = BankState {
            movements,
            ..BankState::default()
        };
        for name in modules {
            let address = Address::for_module(name);
            state.ensure_account(&address);
            if let Some(account) = state.accounts.get_mut(&address) {
                account.module_name = Some((*name).to_string());
            }
        }
        Self {
            modules: modules.iter().map(|m| (*m).to_string()).collect(),
            state: RwLock::new(state),
        }
    }

    fn module_address(&self, module: &str) -> Result<Address, LedgerError> {
        if self.modules.contains(module) {
            Ok(Address::for_module(module))
        } else {
            Err(LedgerError::UnknownModule(module.to_string()))
        }
    }

    /// Credits `coins` to `address` without recording a movement. Used to
    /// fund accounts from genesis.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if a balance would overflow.
    pub async fn seed(&self, address: &Address, coins: &Coins) -> Result<(), LedgerError> {
        let totals = totals(coins)?;
        let mut state = self.state.write().await;
        state.check_credit(address, &totals)?;
        state.apply_credit(address, &totals);
        state.ensure_account(address);
        Ok(())
    }

    /// Returns the balance of `denom` held by `address`.
    pub async fn balance(&self, address: &Address, denom: &str) -> u128 {
        self.state.read().await.balance(address, denom)
    }

    /// Returns every recorded movement in order. Empty unless the bank
    /// was built with [`Self::with_movement_log`].
    pub async fn movements(&self) -> Vec<Movement> {
        self.state.read().await.movements.clone().unwrap_or_default()
    }
}

#[async_trait]
impl Ledger for MemoryBank {
    async fn has_balance(&self, address: &Address, coin: &Coin) -> bool {
        self.state.read().await.balance(address, &coin.denom) >= coin.amount
    }

    async fn send_coins(&self, from: &Address, to: &Address, coins: &Coins) -> Result<(), LedgerError> {
        self.state.write().await.transfer(from, to, coins)
    }

    async fn send_coins_from_account_to_module(
        &self,
        from: &Address,
        module: &str,
        coins: &Coins,
    ) -> Result<(), LedgerError> {
        let to = self.module_address(module)?;
        self.state.write().await.transfer(from, &to, coins)
    }

    async fn mint_coins(&self, module: &str, coins: &Coins) -> Result<(), LedgerError> {
        let address = self.module_address(module)?;
        let totals = totals(coins)?;
        let mut state = self.state.write().await;
        state.check_credit(&address, &totals)?;
        state.apply_credit(&address, &totals);
        state.record(Movement::Mint {
            module: module.to_string(),
            coins: coins.clone(),
        });
        Ok(())
    }

    async fn burn_coins(&self, module: &str, coins: &Coins) -> Result<(), LedgerError> {
        let address = self.module_address(module)?;
        let totals = totals(coins)?;
        let mut state = self.state.write().await;
        state.check_debit(&address, &totals)?;
        state.apply_debit(&address, &totals);
        state.record(Movement::Burn {
            module: module.to_string(),
            coins: coins.clone(),
        });
        Ok(())
    }

    async fn send_coins_from_module_to_account(
        &self,
        module: &str,
        to: &Address,
        coins: &Coins,
    ) -> Result<(), LedgerError> {
        let from = self.module_address(module)?;
        self.state.write().await.transfer(&from, to, coins)
    }

    async fn get_all_balances(&self, address: &Address) -> Coins {
        let state = self.state.read().await;
        state
            .balances
            .get(address)
            .map(|held| {
                held.iter()
                    .filter(|(_, amount)| **amount > 0)
                    .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl AccountRegistry for MemoryBank {
    async fn get_account(&self, address: &Address) -> Option<Account> {
        self.state.read().await.accounts.get(address).cloned()
    }

    async fn new_account(&self, address: &Address) -> Account {
        let mut state = self.state.write().await;
        let account = Account {
            address: address.clone(),
            account_number: state.next_account_number,
            module_name: None,
        };
        state.next_account_number += 1;
        account
    }

    async fn set_account(&self, account: Account) {
        self.state
            .write()
            .await
            .accounts
            .insert(account.address.clone(), account);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn coins(list: &[(&str, u128)]) -> Coins {
        list.iter().map(|(d, a)| Coin::new(*d, *a)).collect()
    }

    async fn funded() -> (MemoryBank, Address) {
        let bank = MemoryBank::with_movement_log(&["liquidity"]);
        let alice = Address::new("alice");
        let Ok(()) = bank.seed(&alice, &coins(&[("atom", 100), ("stake", 10)])).await else {
            panic!("seed failed");
        };
        (bank, alice)
    }

    #[tokio::test]
    async fn send_moves_all_coins() {
        let (bank, alice) = funded().await;
        let bob = Address::new("bob");

        let Ok(()) = bank
            .send_coins(&alice, &bob, &coins(&[("atom", 40), ("stake", 10)]))
            .await
        else {
            panic!("send failed");
        };

        assert_eq!(bank.balance(&alice, "atom").await, 60);
        assert_eq!(bank.balance(&bob, "stake").await, 10);
        assert_eq!(bank.get_all_balances(&alice).await, coins(&[("atom", 60)]));
        assert!(bank.get_account(&bob).await.is_some());
        assert_eq!(bank.movements().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_send_moves_nothing() {
        let (bank, alice) = funded().await;
        let bob = Address::new("bob");

        let result = bank
            .send_coins(&alice, &bob, &coins(&[("atom", 40), ("stake", 11)]))
            .await;

        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds { ref denom, available: 10, required: 11, .. })
                if denom == "stake"
        ));
        assert_eq!(bank.balance(&alice, "atom").await, 100);
        assert!(bank.movements().await.is_empty());
    }

    #[tokio::test]
    async fn repeated_denoms_are_summed() {
        let (bank, alice) = funded().await;
        let result = bank
            .send_coins(&alice, &Address::new("bob"), &coins(&[("stake", 6), ("stake", 6)]))
            .await;
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
    }

    #[tokio::test]
    async fn mint_and_burn_need_a_module_account() {
        let bank = MemoryBank::new(&["liquidity"]);
        let lp = coins(&[("lp/pool1", 70)]);

        assert!(matches!(
            bank.mint_coins("other", &lp).await,
            Err(LedgerError::UnknownModule(_))
        ));

        let Ok(()) = bank.mint_coins("liquidity", &lp).await else {
            panic!("mint failed");
        };
        let module = Address::for_module("liquidity");
        assert_eq!(bank.balance(&module, "lp/pool1").await, 70);

        let Ok(()) = bank.burn_coins("liquidity", &lp).await else {
            panic!("burn failed");
        };
        assert_eq!(bank.balance(&module, "lp/pool1").await, 0);
        assert!(bank.burn_coins("liquidity", &lp).await.is_err());
    }

    #[tokio::test]
    async fn module_round_trip() {
        let (bank, alice) = funded().await;
        let fee = coins(&[("stake", 4)]);

        let Ok(()) = bank.send_coins_from_account_to_module(&alice, "liquidity", &fee).await else {
            panic!("send to module failed");
        };
        let Ok(()) = bank.send_coins_from_module_to_account("liquidity", &alice, &fee).await else {
            panic!("send from module failed");
        };
        assert_eq!(bank.balance(&alice, "stake").await, 10);
    }

    #[tokio::test]
    async fn new_account_is_stored_only_on_set() {
        let bank = MemoryBank::new(&["liquidity"]);
        let addr = Address::new("pool-account");

        let account = bank.new_account(&addr).await;
        assert!(bank.get_account(&addr).await.is_none());

        bank.set_account(account.into_module("pool1")).await;
        let Some(stored) = bank.get_account(&addr).await else {
            panic!("account missing");
        };
        assert!(stored.is_module());
        assert_eq!(stored.module_name.as_deref(), Some("pool1"));
    }

    #[tokio::test]
    async fn movements_are_not_kept_by_default() {
        let bank = MemoryBank::new(&["liquidity"]);
        let alice = Address::new("alice");
        let Ok(()) = bank.seed(&alice, &coins(&[("atom", 100)])).await else {
            panic!("seed failed");
        };

        let Ok(()) = bank.send_coins(&alice, &Address::new("bob"), &coins(&[("atom", 1)])).await else {
            panic!("send failed");
        };
        let Ok(()) = bank.mint_coins("liquidity", &coins(&[("lp/pool1", 5)])).await else {
            panic!("mint failed");
        };

        assert_eq!(bank.balance(&alice, "atom").await, 99);
        assert!(bank.movements().await.is_empty());
    }

    #[tokio::test]
    async fn module_accounts_exist_at_construction() {
        let bank = MemoryBank::new(&["liquidity"]);
        let Some(account) = bank.get_account(&Address::for_module("liquidity")).await else {
            panic!("module account missing");
        };
        assert_eq!(account.module_name.as_deref(), Some("liquidity"));
    }
}
