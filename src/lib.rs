//! # hydra-liquidity
//!
//! Liquidity-pool registry and pool admission service for a ledger
//! module, using the `hydra-amm` engine for initial LP issuance.
//!
//! The crate allocates collision-free pool identifiers, admits new
//! constant-product pools (fee collection, reserve custody, LP minting),
//! guards every coin movement into or out of a pool account, and serves
//! the registry's read path with cursor pagination.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── PoolService / QueryService (service/)
//!     ├── TransferGuard (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── PoolRegistry + PoolIdAllocator (registry/)
//!     ├── Ledger + AccountRegistry (ledger/)
//!     ├── hydra-amm (initial issuance)
//!     │
//!     └── KvStore: memory or PostgreSQL (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod genesis;
pub mod ledger;
pub mod persistence;
pub mod registry;
pub mod service;
