//! Domain events reflecting pool state changes.
//!
//! Every successful creation or pool transfer emits a [`PoolEvent`] through
//! the [`super::EventBus`]. Events are optionally appended to the
//! PostgreSQL event log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Address, Coin, Coins, PoolId};

/// Domain event emitted after a state change commits.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PoolEvent {
    /// Emitted when a new pool is admitted.
    PoolCreated {
        /// Pool identifier.
        pool_id: PoolId,
        /// Creator account.
        creator: Address,
        /// Pool account address.
        address: Address,
        /// Initial base reserve.
        base: Coin,
        /// Initial quote reserve.
        quote: Coin,
        /// LP tokens minted to the creator.
        lp_token: Coin,
        /// Swap fee in basis points.
        fee_bps: u32,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after coins move from an account into a pool account.
    CoinsDeposited {
        /// Pool identifier.
        pool_id: PoolId,
        /// Sending account.
        sender: Address,
        /// Coins moved.
        coins: Coins,
        /// Transfer timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after coins move from a pool account to an account.
    CoinsWithdrawn {
        /// Pool identifier.
        pool_id: PoolId,
        /// Receiving account.
        receiver: Address,
        /// Coins moved.
        coins: Coins,
        /// Transfer timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl PoolEvent {
    /// Returns the pool ID associated with this event.
    #[must_use]
    pub fn pool_id(&self) -> &PoolId {
        match self {
            Self::PoolCreated { pool_id, .. }
            | Self::CoinsDeposited { pool_id, .. }
            | Self::CoinsWithdrawn { pool_id, .. } => pool_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "pool_created",
            Self::CoinsDeposited { .. } => "coins_deposited",
            Self::CoinsWithdrawn { .. } => "coins_withdrawn",
        }
    }
}
