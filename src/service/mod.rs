//! Service layer: business logic orchestration.
//!
//! [`PoolService`] admits pools and delegates issuance math to hydra-amm,
//! [`TransferGuard`] mediates every movement into or out of a pool account,
//! and [`QueryService`] serves the read path. Events go out through the
//! [`super::domain::EventBus`].

pub mod pool_service;
pub mod query;
pub mod transfer;

pub use pool_service::{PoolService, initial_lp_amount};
pub use query::{
    PoolBalances, QueryPoolBalancesRequest, QueryPoolRequest, QueryPoolsRequest, QueryService,
};
pub use transfer::TransferGuard;
