//! Domain layer: coins, addresses, pool identity, pool records and events.

pub mod address;
pub mod coin;
pub mod event_bus;
pub mod pool;
pub mod pool_event;
pub mod pool_id;

pub use address::Address;
pub use coin::{Coin, CoinParseError, Coins};
pub use event_bus::EventBus;
pub use pool::{CONSTANT_PRODUCT, Pool, PoolsMeta, lp_denom};
pub use pool_event::PoolEvent;
pub use pool_id::{PoolId, PoolIdNumeric};

/// Name of this module on the ledger. Owns the custody account that
/// collects fees and mints LP tokens, seeds pool addresses, and namespaces
/// the key-value store.
pub const MODULE_NAME: &str = "liquidity";
