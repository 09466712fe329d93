//! Pool service: admits new pools and imports or exports registry state.

use std::sync::Arc;

use chrono::Utc;
use hydra_amm::config::{AmmConfig, ConstantProductConfig};
use hydra_amm::domain::{Amount, BasisPoints, Decimals, FeeTier, Token, TokenAddress, TokenPair};
use hydra_amm::factory::DefaultPoolFactory;
use hydra_amm::traits::LiquidityPool;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::config::PoolParams;
use crate::domain::{
    Address, CONSTANT_PRODUCT, Coin, Coins, EventBus, MODULE_NAME, Pool, PoolEvent, PoolId, lp_denom,
};
use crate::error::LiquidityError;
use crate::genesis::GenesisState;
use crate::ledger::{AccountRegistry, Ledger};
use crate::registry::PoolRegistry;

use super::TransferGuard;

/// Computes the initial LP issuance `floor(sqrt(base * quote))` through a
/// constant-product pool seeded with the two reserves.
///
/// # Errors
///
/// Returns [`LiquidityError::Amm`] if the denominations are identical, a
/// reserve is zero, or the product overflows.
pub fn initial_lp_amount(base: &Coin, quote: &Coin, fee_bps: u32) -> Result<u128, LiquidityError> {
    let pair = TokenPair::new(token_for(&base.denom)?, token_for(&quote.denom)?)?;
    let config = ConstantProductConfig::new(
        pair,
        FeeTier::new(BasisPoints::new(fee_bps)),
        Amount::new(base.amount),
        Amount::new(quote.amount),
    )?;
    let pool = DefaultPoolFactory::create(&AmmConfig::ConstantProduct(config))?;
    Ok(pool.total_liquidity().get())
}

/// Maps a denomination to an AMM token keyed by the SHA-256 of its name.
fn token_for(denom: &str) -> Result<Token, LiquidityError> {
    let address: [u8; 32] = Sha256::digest(denom.as_bytes()).into();
    Ok(Token::new(TokenAddress::from_bytes(address), Decimals::new(0)?))
}

/// Returns `coin` plus `fee` when both share a denomination.
fn with_fee(coin: &Coin, fee: &Coin) -> Option<Coin> {
    (coin.denom == fee.denom && !fee.is_zero())
        .then(|| Coin::new(coin.denom.clone(), coin.amount.saturating_add(fee.amount)))
}

/// Orchestration layer for pool admission.
///
/// State-modifying calls are serialized behind an internal lock, so each
/// creation runs to completion before the next one reads the counter.
#[derive(Debug)]
pub struct PoolService {
    registry: PoolRegistry,
    ledger: Arc<dyn Ledger>,
    accounts: Arc<dyn AccountRegistry>,
    transfers: TransferGuard,
    event_bus: EventBus,
    params: PoolParams,
    state_lock: Mutex<()>,
}

impl PoolService {
    /// Creates a new `PoolService`.
    #[must_use]
    pub fn new(
        registry: PoolRegistry,
        ledger: Arc<dyn Ledger>,
        accounts: Arc<dyn AccountRegistry>,
        event_bus: EventBus,
        params: PoolParams,
    ) -> Self {
        let transfers = TransferGuard::new(
            Arc::clone(&ledger),
            Arc::clone(&accounts),
            event_bus.clone(),
        );
        Self {
            registry,
            ledger,
            accounts,
            transfers,
            event_bus,
            params,
            state_lock: Mutex::new(()),
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub const fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`PoolRegistry`].
    #[must_use]
    pub const fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    /// Returns the transfer guard used for pool deposits and withdrawals.
    #[must_use]
    pub const fn transfers(&self) -> &TransferGuard {
        &self.transfers
    }

    /// Returns the pool admission parameters.
    #[must_use]
    pub const fn params(&self) -> &PoolParams {
        &self.params
    }

    async fn require_balance(&self, address: &Address, coin: &Coin) -> Result<(), LiquidityError> {
        if self.ledger.has_balance(address, coin).await {
            Ok(())
        } else {
            Err(LiquidityError::InsufficientFunds {
                address: address.to_string(),
                required: coin.to_string(),
            })
        }
    }

    /// Creates the pool's module account unless one already exists.
    async fn open_pool_account(&self, pool_id: &PoolId, address: &Address) {
        if self.accounts.get_account(address).await.is_some() {
            return;
        }
        let account = self
            .accounts
            .new_account(address)
            .await
            .into_module(pool_id.as_str());
        tracing::debug!(%pool_id, %address, number = account.account_number, "opened pool account");
        self.accounts.set_account(account).await;
    }

    /// Admits a new constant-product pool funded by `creator`.
    ///
    /// Collects and burns the creation fee, moves both reserves into the
    /// pool account, mints `floor(sqrt(base * quote))` LP tokens to the
    /// creator and stores the pool record last.
    ///
    /// Checks that can fail run before the fee is collected. A collaborator
    /// failing after that point leaves the fee burned and the allocated id
    /// consumed; the id is never reissued. Rolling back the whole call is
    /// the job of the surrounding commit boundary.
    ///
    /// # Errors
    ///
    /// - [`LiquidityError::InvalidRequest`] if the creator is empty or both
    ///   coins share a denomination.
    /// - [`LiquidityError::ZeroAmount`] if a reserve is zero.
    /// - [`LiquidityError::InsufficientFunds`] if the creator cannot cover
    ///   a reserve or the fee.
    /// - [`LiquidityError::Ledger`] or [`LiquidityError::Store`] if a
    ///   collaborator fails.
    ///
    /// # Panics
    ///
    /// Panics if the pool id counter is exhausted. See
    /// [`crate::registry::PoolIdAllocator::allocate_and_advance`].
    pub async fn create_pool(
        &self,
        creator: &Address,
        base: Coin,
        quote: Coin,
    ) -> Result<Pool, LiquidityError> {
        let _guard = self.state_lock.lock().await;

        if creator.is_empty() {
            return Err(LiquidityError::InvalidRequest(
                "creator address must not be empty".to_string(),
            ));
        }
        if let Some(zero) = [&base, &quote].into_iter().find(|c| c.is_zero()) {
            return Err(LiquidityError::ZeroAmount(zero.denom.clone()));
        }
        if base.denom == quote.denom {
            return Err(LiquidityError::InvalidRequest(format!(
                "base and quote must differ, both are {}",
                base.denom
            )));
        }

        let fee = self.params.creation_fee.clone();
        self.require_balance(creator, &base).await?;
        self.require_balance(creator, &quote).await?;
        if !fee.is_zero() {
            self.require_balance(creator, &fee).await?;
        }
        for combined in [with_fee(&base, &fee), with_fee(&quote, &fee)].into_iter().flatten() {
            self.require_balance(creator, &combined).await?;
        }
        let lp_amount = initial_lp_amount(&base, &quote, self.params.swap_fee_bps)?;

        if !fee.is_zero() {
            let fee_coins = Coins::single(fee);
            self.ledger
                .send_coins_from_account_to_module(creator, MODULE_NAME, &fee_coins)
                .await?;
            self.ledger.burn_coins(MODULE_NAME, &fee_coins).await?;
            tracing::debug!(%creator, fee = %fee_coins, "creation fee burned");
        }

        let pool_id = self.registry.allocator().allocate_and_advance_string().await?;
        let address = Address::for_pool(&pool_id);
        self.open_pool_account(&pool_id, &address).await;

        self.require_balance(creator, &base).await?;
        self.require_balance(creator, &quote).await?;
        let deposit = Coins::new(vec![base.clone(), quote.clone()]);
        self.transfers
            .send_from_address_to_pool(creator, &pool_id, &deposit)
            .await?;

        let lp_token = Coin::new(lp_denom(&pool_id), lp_amount);
        let minted = Coins::single(lp_token.clone());
        self.ledger.mint_coins(MODULE_NAME, &minted).await?;
        self.ledger
            .send_coins_from_module_to_account(MODULE_NAME, creator, &minted)
            .await?;

        let pool = Pool {
            pool_id: pool_id.clone(),
            creator: creator.clone(),
            coins: [base.clone(), quote.clone()],
            lp_token: lp_token.clone(),
            fee: self.params.swap_fee_bps,
            formula: CONSTANT_PRODUCT.to_string(),
            address: address.clone(),
        };
        self.registry.set(&pool).await?;

        let _ = self.event_bus.publish(PoolEvent::PoolCreated {
            pool_id: pool_id.clone(),
            creator: creator.clone(),
            address,
            base,
            quote,
            lp_token,
            fee_bps: pool.fee,
            timestamp: Utc::now(),
        });

        tracing::info!(%pool_id, %creator, lp = lp_amount, "pool created");
        Ok(pool)
    }

    /// Imports pools and the id counter, re-opening every pool account.
    ///
    /// The import only applies to an empty store. If a counter or any pool
    /// is already persisted the state is left untouched and `false` is
    /// returned, so restarting with the same genesis never rewinds the
    /// counter below issued ids.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::InvalidRequest`] if the state fails
    /// validation, or [`LiquidityError::Store`] on read or write failure.
    pub async fn init_genesis(&self, state: &GenesisState) -> Result<bool, LiquidityError> {
        let _guard = self.state_lock.lock().await;

        state.validate(self.registry.allocator().prefix())?;
        if self.registry.allocator().is_initialized().await? || self.registry.has_pools().await? {
            tracing::warn!("liquidity state already persisted, genesis import skipped");
            return Ok(false);
        }
        self.registry.allocator().restore(state.next_pool_id).await?;
        for pool in &state.pools {
            self.registry.set(pool).await?;
            self.open_pool_account(&pool.pool_id, &pool.address).await;
        }

        tracing::info!(
            pools = state.pools.len(),
            next_pool_id = state.next_pool_id,
            "genesis imported"
        );
        Ok(true)
    }

    /// Opens the account of every stored pool that lacks one.
    ///
    /// Run at startup when pool records outlive the account registry,
    /// such as a persistent store paired with an in-memory ledger.
    /// Returns the number of pools visited.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::Store`] on read failure.
    pub async fn restore_pool_accounts(&self) -> Result<usize, LiquidityError> {
        let _guard = self.state_lock.lock().await;

        let pools = self.registry.list_all().await?;
        for pool in &pools {
            self.open_pool_account(&pool.pool_id, &pool.address).await;
        }
        tracing::info!(pools = pools.len(), "pool accounts restored");
        Ok(pools.len())
    }

    /// Exports every pool and the id counter.
    ///
    /// # Errors
    ///
    /// Returns [`LiquidityError::Store`] on read failure.
    pub async fn export_genesis(&self) -> Result<GenesisState, LiquidityError> {
        let _guard = self.state_lock.lock().await;

        Ok(GenesisState {
            next_pool_id: self.registry.allocator().peek_next().await?,
            pools: self.registry.list_all().await?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::ledger::memory::{MemoryBank, Movement};
    use crate::persistence::memory::MemoryStore;
    use crate::persistence::{KvStore, ModuleStore};

    struct Fixture {
        service: PoolService,
        bank: Arc<MemoryBank>,
        alice: Address,
    }

    async fn fixture(params: PoolParams) -> Fixture {
        fixture_on(Arc::new(MemoryStore::new()), params).await
    }

    async fn fixture_on(inner: Arc<dyn KvStore>, params: PoolParams) -> Fixture {
        let registry = PoolRegistry::new(
            ModuleStore::new(inner, MODULE_NAME),
            params.pool_id_prefix.clone(),
        );
        let bank = Arc::new(MemoryBank::with_movement_log(&[MODULE_NAME]));
        let alice = Address::new("alice");
        let funds: Coins = [
            Coin::new("atom", 1_000),
            Coin::new("osmo", 1_000),
            Coin::new("stake", 2_000_000),
        ]
        .into_iter()
        .collect();
        let Ok(()) = bank.seed(&alice, &funds).await else {
            panic!("seed failed");
        };

        let ledger: Arc<dyn Ledger> = Arc::<MemoryBank>::clone(&bank);
        let accounts: Arc<dyn AccountRegistry> = Arc::<MemoryBank>::clone(&bank);
        let service = PoolService::new(registry, ledger, accounts, EventBus::new(64), params);
        Fixture {
            service,
            bank,
            alice,
        }
    }

    #[test]
    fn initial_lp_is_floor_sqrt() {
        let Ok(lp) = initial_lp_amount(&Coin::new("atom", 100), &Coin::new("osmo", 50), 500) else {
            panic!("issuance failed");
        };
        assert_eq!(lp, 70);

        let Ok(lp) = initial_lp_amount(&Coin::new("a", 1_000_000), &Coin::new("b", 1_000_000), 30)
        else {
            panic!("issuance failed");
        };
        assert_eq!(lp, 1_000_000);
    }

    #[test]
    fn initial_lp_rejects_same_denom() {
        let result = initial_lp_amount(&Coin::new("atom", 1), &Coin::new("atom", 1), 500);
        assert!(matches!(result, Err(LiquidityError::Amm(_))));
    }

    #[tokio::test]
    async fn create_pool_records_reserves_and_mints_lp() {
        let fx = fixture(PoolParams::default()).await;
        let Ok(pool) = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 100), Coin::new("osmo", 50))
            .await
        else {
            panic!("creation failed");
        };

        assert_eq!(pool.pool_id.as_str(), "pool1");
        assert_eq!(pool.lp_token, Coin::new("lp/pool1", 70));
        assert_eq!(pool.fee, 500);
        assert_eq!(pool.formula, "constant_product");
        assert_eq!(pool.base(), &Coin::new("atom", 100));
        assert_eq!(pool.quote(), &Coin::new("osmo", 50));
        assert_eq!(pool.address, Address::for_pool(&pool.pool_id));
        assert_eq!(pool.invariant_violation(), None);

        let Ok(Some(stored)) = fx.service.registry().get(&pool.pool_id).await else {
            panic!("pool not stored");
        };
        assert_eq!(stored, pool);

        assert_eq!(fx.bank.balance(&fx.alice, "lp/pool1").await, 70);
        assert_eq!(fx.bank.balance(&fx.alice, "stake").await, 1_000_000);
        assert_eq!(fx.bank.balance(&pool.address, "atom").await, 100);
        assert_eq!(fx.bank.balance(&pool.address, "osmo").await, 50);
        let module = Address::for_module(MODULE_NAME);
        assert!(fx.bank.get_all_balances(&module).await.is_empty());
    }

    #[tokio::test]
    async fn creation_movements_in_order() {
        let fx = fixture(PoolParams::default()).await;
        let Ok(pool) = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 100), Coin::new("osmo", 50))
            .await
        else {
            panic!("creation failed");
        };

        let module = Address::for_module(MODULE_NAME);
        let fee = Coins::single(Coin::new("stake", 1_000_000));
        let lp = Coins::single(pool.lp_token.clone());
        assert_eq!(
            fx.bank.movements().await,
            vec![
                Movement::Transfer {
                    from: fx.alice.clone(),
                    to: module.clone(),
                    coins: fee.clone(),
                },
                Movement::Burn {
                    module: MODULE_NAME.to_string(),
                    coins: fee,
                },
                Movement::Transfer {
                    from: fx.alice.clone(),
                    to: pool.address.clone(),
                    coins: Coins::new(vec![Coin::new("atom", 100), Coin::new("osmo", 50)]),
                },
                Movement::Mint {
                    module: MODULE_NAME.to_string(),
                    coins: lp.clone(),
                },
                Movement::Transfer {
                    from: module,
                    to: fx.alice.clone(),
                    coins: lp,
                },
            ]
        );
    }

    #[tokio::test]
    async fn zero_fee_skips_collection() {
        let params = PoolParams {
            creation_fee: Coin::new("stake", 0),
            ..PoolParams::default()
        };
        let fx = fixture(params).await;
        let Ok(_) = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 100), Coin::new("osmo", 50))
            .await
        else {
            panic!("creation failed");
        };
        assert_eq!(fx.bank.movements().await.len(), 3);
        assert_eq!(fx.bank.balance(&fx.alice, "stake").await, 2_000_000);
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let fx = fixture(PoolParams::default()).await;
        let mut ids = Vec::new();
        for _ in 0..2 {
            let Ok(pool) = fx
                .service
                .create_pool(&fx.alice, Coin::new("atom", 10), Coin::new("osmo", 10))
                .await
            else {
                panic!("creation failed");
            };
            ids.push(pool.pool_id.to_string());
        }
        assert_eq!(ids, vec!["pool1", "pool2"]);
    }

    #[tokio::test]
    async fn shortfall_aborts_before_any_movement() {
        let fx = fixture(PoolParams::default()).await;
        let result = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 5_000), Coin::new("osmo", 50))
            .await;

        assert!(matches!(result, Err(LiquidityError::InsufficientFunds { .. })));
        assert!(fx.bank.movements().await.is_empty());
        assert_eq!(fx.service.registry().allocator().peek_next().await.ok(), Some(1));
        assert_eq!(fx.service.registry().list_all().await.map(|p| p.len()).ok(), Some(0));
    }

    #[tokio::test]
    async fn reserve_sharing_fee_denom_must_cover_both() {
        let fx = fixture(PoolParams::default()).await;
        let result = fx
            .service
            .create_pool(&fx.alice, Coin::new("stake", 1_500_000), Coin::new("osmo", 50))
            .await;
        assert!(matches!(result, Err(LiquidityError::InsufficientFunds { .. })));
        assert!(fx.bank.movements().await.is_empty());
    }

    #[tokio::test]
    async fn rejects_malformed_requests() {
        let fx = fixture(PoolParams::default()).await;

        let same = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 1), Coin::new("atom", 1))
            .await;
        assert!(matches!(same, Err(LiquidityError::InvalidRequest(_))));

        let zero = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 0), Coin::new("osmo", 1))
            .await;
        assert!(matches!(zero, Err(LiquidityError::ZeroAmount(ref d)) if d == "atom"));

        let nobody = fx
            .service
            .create_pool(&Address::new(" "), Coin::new("atom", 1), Coin::new("osmo", 1))
            .await;
        assert!(matches!(nobody, Err(LiquidityError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn existing_pool_account_is_reused() {
        let fx = fixture(PoolParams::default()).await;
        let address = Address::for_pool(&PoolId::new("pool1"));
        let _ = fx.bank.seed(&address, &Coins::single(Coin::new("dust", 1))).await;
        let Some(before) = fx.bank.get_account(&address).await else {
            panic!("account missing");
        };

        let Ok(_) = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 100), Coin::new("osmo", 50))
            .await
        else {
            panic!("creation failed");
        };

        assert_eq!(fx.bank.get_account(&address).await, Some(before));
        assert_eq!(fx.bank.balance(&address, "dust").await, 1);
    }

    #[tokio::test]
    async fn creation_emits_events() {
        let fx = fixture(PoolParams::default()).await;
        let mut rx = fx.service.event_bus().subscribe();
        let _ = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 100), Coin::new("osmo", 50))
            .await;

        let Ok(first) = rx.recv().await else {
            panic!("missing event");
        };
        let Ok(second) = rx.recv().await else {
            panic!("missing event");
        };
        assert_eq!(first.event_type_str(), "coins_deposited");
        assert_eq!(second.event_type_str(), "pool_created");
        assert_eq!(second.pool_id().as_str(), "pool1");
    }

    #[tokio::test]
    async fn genesis_round_trip() {
        let source = fixture(PoolParams::default()).await;
        for _ in 0..3 {
            let _ = source
                .service
                .create_pool(&source.alice, Coin::new("atom", 10), Coin::new("osmo", 20))
                .await;
        }
        let Ok(exported) = source.service.export_genesis().await else {
            panic!("export failed");
        };
        assert_eq!(exported.next_pool_id, 4);
        assert_eq!(exported.pools.len(), 3);

        let target = fixture(PoolParams::default()).await;
        let Ok(true) = target.service.init_genesis(&exported).await else {
            panic!("import failed");
        };
        let Ok(reexported) = target.service.export_genesis().await else {
            panic!("export failed");
        };
        assert_eq!(reexported, exported);

        for pool in &exported.pools {
            assert!(target.bank.get_account(&pool.address).await.is_some());
        }
        let Ok(next) = target
            .service
            .create_pool(&target.alice, Coin::new("atom", 1), Coin::new("osmo", 1))
            .await
        else {
            panic!("creation after import failed");
        };
        assert_eq!(next.pool_id.as_str(), "pool4");
    }

    #[tokio::test]
    async fn invalid_genesis_writes_nothing() {
        let fx = fixture(PoolParams::default()).await;
        let state = GenesisState {
            next_pool_id: 1,
            pools: vec![],
        };
        let Ok(true) = fx.service.init_genesis(&state).await else {
            panic!("empty genesis rejected");
        };

        let bad = GenesisState {
            next_pool_id: 0,
            pools: vec![],
        };
        assert!(fx.service.init_genesis(&bad).await.is_err());
        assert_eq!(fx.service.registry().allocator().peek_next().await.ok(), Some(1));
    }

    #[tokio::test]
    async fn genesis_does_not_rewind_issued_ids() {
        let fx = fixture(PoolParams::default()).await;
        let Ok(first) = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 100), Coin::new("osmo", 50))
            .await
        else {
            panic!("creation failed");
        };

        let Ok(imported) = fx.service.init_genesis(&GenesisState::default()).await else {
            panic!("genesis failed");
        };
        assert!(!imported);
        assert_eq!(fx.service.registry().allocator().peek_next().await.ok(), Some(2));

        let Ok(second) = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 7), Coin::new("osmo", 7))
            .await
        else {
            panic!("creation failed");
        };
        assert_ne!(second.pool_id, first.pool_id);

        let Ok(Some(stored)) = fx.service.registry().get(&first.pool_id).await else {
            panic!("first pool missing");
        };
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn genesis_skipped_when_only_pools_are_stored() {
        let fx = fixture(PoolParams::default()).await;
        let Ok(pool) = fx
            .service
            .create_pool(&fx.alice, Coin::new("atom", 100), Coin::new("osmo", 50))
            .await
        else {
            panic!("creation failed");
        };
        let Ok(()) = fx.service.registry().allocator().reset().await else {
            panic!("reset failed");
        };

        let state = GenesisState {
            next_pool_id: 9,
            pools: vec![],
        };
        let Ok(false) = fx.service.init_genesis(&state).await else {
            panic!("genesis should be skipped");
        };
        assert_eq!(fx.service.registry().list_all().await.ok(), Some(vec![pool]));
        assert_eq!(fx.service.registry().allocator().is_initialized().await.ok(), Some(false));
    }

    #[tokio::test]
    async fn restart_reopens_pool_accounts() {
        let inner: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let before = fixture_on(Arc::clone(&inner), PoolParams::default()).await;
        let Ok(pool) = before
            .service
            .create_pool(&before.alice, Coin::new("atom", 100), Coin::new("osmo", 50))
            .await
        else {
            panic!("creation failed");
        };

        let after = fixture_on(inner, PoolParams::default()).await;
        let deposit = Coins::single(Coin::new("atom", 5));
        let result = after
            .service
            .transfers()
            .send_from_address_to_pool(&after.alice, &pool.pool_id, &deposit)
            .await;
        assert!(matches!(result, Err(LiquidityError::PoolAccountNotFound { .. })));

        assert_eq!(after.service.restore_pool_accounts().await.ok(), Some(1));
        let Some(account) = after.bank.get_account(&pool.address).await else {
            panic!("pool account not reopened");
        };
        assert!(account.is_module());

        let Ok(()) = after
            .service
            .transfers()
            .send_from_address_to_pool(&after.alice, &pool.pool_id, &deposit)
            .await
        else {
            panic!("deposit after restart failed");
        };
        assert_eq!(after.bank.balance(&pool.address, "atom").await, 5);
        assert_eq!(after.service.restore_pool_accounts().await.ok(), Some(1));
    }
}
