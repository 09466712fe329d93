//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::PoolParams;
use crate::domain::{EventBus, MODULE_NAME};
use crate::ledger::{AccountRegistry, Ledger};
use crate::persistence::{KvStore, ModuleStore};
use crate::registry::PoolRegistry;
use crate::service::{PoolService, QueryService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pool admission and genesis.
    pub pool_service: Arc<PoolService>,
    /// Read path.
    pub query_service: QueryService,
    /// Event bus for observers such as the event log.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires the services over `store` and the ledger collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn KvStore>,
        ledger: Arc<dyn Ledger>,
        accounts: Arc<dyn AccountRegistry>,
        params: PoolParams,
        event_bus: EventBus,
    ) -> Self {
        let registry = PoolRegistry::new(
            ModuleStore::new(store, MODULE_NAME),
            params.pool_id_prefix.clone(),
        );
        let query_service = QueryService::new(registry.clone(), Arc::clone(&ledger));
        let pool_service = Arc::new(PoolService::new(
            registry,
            ledger,
            accounts,
            event_bus.clone(),
            params,
        ));
        Self {
            pool_service,
            query_service,
            event_bus,
        }
    }
}
