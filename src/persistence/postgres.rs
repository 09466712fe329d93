//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::NewEvent;
use super::{KvPair, KvStore, StoreError};
use crate::config::LiquidityConfig;
use crate::domain::EventBus;

/// PostgreSQL-backed key-value store and event log using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the database settings in `config` and applies the
    /// embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Database`] if the connection or a migration
    /// fails.
    pub async fn connect(config: &LiquidityConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!("postgres store connected and migrated");
        Ok(Self::new(pool))
    }

    /// Appends an event to the event log.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Database`] on database failure.
    pub async fn save_event(&self, event: &NewEvent) -> Result<i64, StoreError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO events (pool_id, event_type, payload) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&event.pool_id)
        .bind(event.event_type)
        .bind(&event.payload)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Appends every event published on `event_bus` to the event log until
    /// the bus closes.
    pub async fn run_event_log(self, event_bus: EventBus) {
        let mut rx = event_bus.subscribe();
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let saved = match NewEvent::try_from(&event) {
                        Ok(row) => self.save_event(&row).await,
                        Err(e) => Err(StoreError::Codec(e)),
                    };
                    if let Err(e) = saved {
                        tracing::warn!(error = %e, event_type = event.event_type_str(), "failed to log event");
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "event log lagged behind event bus");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

fn prefix_len(prefix: &[u8]) -> Result<i32, StoreError> {
    i32::try_from(prefix.len()).map_err(|_| StoreError::Database("key prefix too long".to_string()))
}

#[async_trait]
impl KvStore for PostgresStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let value = sqlx::query_scalar::<_, Vec<u8>>("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_store WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn scan(
        &self,
        prefix: &[u8],
        start: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<KvPair>, StoreError> {
        let start = match start {
            Some(start) if start > prefix => start,
            _ => prefix,
        };
        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));
        let rows = sqlx::query_as::<_, (Vec<u8>, Vec<u8>)>(
            "SELECT key, value FROM kv_store \
             WHERE substr(key, 1, $1) = $2 AND key >= $3 \
             ORDER BY key ASC LIMIT $4",
        )
        .bind(prefix_len(prefix)?)
        .bind(prefix)
        .bind(start)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count(&self, prefix: &[u8]) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM kv_store WHERE substr(key, 1, $1) = $2",
        )
        .bind(prefix_len(prefix)?)
        .bind(prefix)
        .fetch_one(&self.pool)
        .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
