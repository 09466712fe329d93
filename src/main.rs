//! hydra-liquidity server entry point.
//!
//! Loads configuration, wires storage and the ledger, imports genesis and
//! starts the Axum HTTP server.

use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use hydra_liquidity::api;
use hydra_liquidity::app_state::AppState;
use hydra_liquidity::config::LiquidityConfig;
use hydra_liquidity::domain::{EventBus, MODULE_NAME};
use hydra_liquidity::genesis::GenesisFile;
use hydra_liquidity::ledger::memory::MemoryBank;
use hydra_liquidity::ledger::{AccountRegistry, Ledger};
use hydra_liquidity::persistence::KvStore;
use hydra_liquidity::persistence::memory::MemoryStore;
use hydra_liquidity::persistence::postgres::PostgresStore;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = LiquidityConfig::from_env()?;
    init_tracing(config.log_json);
    tracing::info!(addr = %config.listen_addr, "starting hydra-liquidity");

    let event_bus = EventBus::new(config.event_bus_capacity);

    // Storage backend
    let store: Arc<dyn KvStore> = if config.persistence_enabled {
        let postgres = PostgresStore::connect(&config)
            .await
            .context("connecting to postgres")?;
        if config.event_log_enabled {
            tokio::spawn(postgres.clone().run_event_log(event_bus.clone()));
        }
        Arc::new(postgres)
    } else {
        tracing::info!("persistence disabled, using in-memory store");
        Arc::new(MemoryStore::new())
    };

    // Ledger
    if config.persistence_enabled {
        tracing::warn!("ledger balances are in memory and do not survive a restart");
    }
    let bank = Arc::new(MemoryBank::new(&[MODULE_NAME]));
    let genesis = match &config.genesis_file {
        Some(path) => Some(GenesisFile::load(path).await?),
        None => None,
    };
    if let Some(genesis) = &genesis {
        genesis.seed_bank(&bank).await.context("seeding genesis balances")?;
    }

    let ledger: Arc<dyn Ledger> = Arc::<MemoryBank>::clone(&bank);
    let accounts: Arc<dyn AccountRegistry> = bank;
    let app_state = AppState::new(store, ledger, accounts, config.pool.clone(), event_bus);

    if let Some(genesis) = &genesis {
        app_state
            .pool_service
            .init_genesis(&genesis.liquidity)
            .await
            .context("importing liquidity genesis")?;
    }
    app_state
        .pool_service
        .restore_pool_accounts()
        .await
        .context("restoring pool accounts")?;

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
