//! Guarded coin movement between accounts and pool accounts.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Address, Coins, EventBus, PoolEvent, PoolId};
use crate::error::LiquidityError;
use crate::ledger::{AccountRegistry, Ledger};

/// Validates and executes transfers into and out of pool accounts.
///
/// Shape checks run before the pool account lookup, so a malformed
/// request never touches the account registry.
#[derive(Debug, Clone)]
pub struct TransferGuard {
    ledger: Arc<dyn Ledger>,
    accounts: Arc<dyn AccountRegistry>,
    event_bus: EventBus,
}

impl TransferGuard {
    /// Creates a guard over the given collaborators.
    #[must_use]
    pub fn new(ledger: Arc<dyn Ledger>, accounts: Arc<dyn AccountRegistry>, event_bus: EventBus) -> Self {
        Self {
            ledger,
            accounts,
            event_bus,
        }
    }

    /// Moves `coins` from `sender` into the account of `pool_id`.
    ///
    /// # Errors
    ///
    /// - [`LiquidityError::EmptyCoins`] if `coins` is empty.
    /// - [`LiquidityError::ZeroAmount`] if any coin has a zero amount.
    /// - [`LiquidityError::PoolAccountNotFound`] if the pool account does
    ///   not exist.
    /// - [`LiquidityError::Ledger`] if the ledger rejects the transfer.
    pub async fn send_from_address_to_pool(
        &self,
        sender: &Address,
        pool_id: &PoolId,
        coins: &Coins,
    ) -> Result<(), LiquidityError> {
        if coins.is_empty() {
            return Err(LiquidityError::EmptyCoins("no coins to deposit"));
        }
        if let Some(zero) = coins.find_zero() {
            return Err(LiquidityError::ZeroAmount(zero.denom.clone()));
        }

        let pool_address = Address::for_pool(pool_id);
        if self.accounts.get_account(&pool_address).await.is_none() {
            return Err(LiquidityError::PoolAccountNotFound {
                pool_id: pool_id.clone(),
                reason: "does not exist",
            });
        }

        self.ledger.send_coins(sender, &pool_address, coins).await?;
        tracing::debug!(%pool_id, %sender, %coins, "coins deposited into pool");

        let _ = self.event_bus.publish(PoolEvent::CoinsDeposited {
            pool_id: pool_id.clone(),
            sender: sender.clone(),
            coins: coins.clone(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Moves `coins` from the account of `pool_id` to `receiver`.
    ///
    /// # Errors
    ///
    /// - [`LiquidityError::EmptyCoins`] if `coins` is empty.
    /// - [`LiquidityError::PoolAccountNotFound`] if the pool account does
    ///   not exist.
    /// - [`LiquidityError::Ledger`] if the ledger rejects the transfer.
    pub async fn send_from_pool_to_address(
        &self,
        pool_id: &PoolId,
        receiver: &Address,
        coins: &Coins,
    ) -> Result<(), LiquidityError> {
        if coins.is_empty() {
            return Err(LiquidityError::EmptyCoins("no coins to send"));
        }

        let pool_address = Address::for_pool(pool_id);
        if self.accounts.get_account(&pool_address).await.is_none() {
            return Err(LiquidityError::PoolAccountNotFound {
                pool_id: pool_id.clone(),
                reason: "already does not exist",
            });
        }

        self.ledger.send_coins(&pool_address, receiver, coins).await?;
        tracing::debug!(%pool_id, %receiver, %coins, "coins withdrawn from pool");

        let _ = self.event_bus.publish(PoolEvent::CoinsWithdrawn {
            pool_id: pool_id.clone(),
            receiver: receiver.clone(),
            coins: coins.clone(),
            timestamp: Utc::now(),
        });
        Ok(())
    }
}
