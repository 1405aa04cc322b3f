//! PostgreSQL connection handle.
//!
//! # Responsibilities
//! - Hold the connection pool once opened
//! - Answer liveness probes
//! - Release the pool on shutdown
//!
//! # Design Decisions
//! - The handle exists before it is opened, so a failed open still leaves a
//!   well-defined "not open" handle for accessors
//! - Pool slot is an `ArcSwapOption`, readable from handlers without locking

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::lifecycle::capabilities::{Closable, Database};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("could not connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("database is not open")]
    NotOpen,
}

/// Database handle backed by a `sqlx` Postgres pool.
#[derive(Default)]
pub struct SqlDatabase {
    pool: ArcSwapOption<PgPool>,
}

impl SqlDatabase {
    /// Create an unopened handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect the pool described by `config`.
    ///
    /// Replaces any pool held from an earlier open.
    pub async fn open_with_config(&self, config: &DatabaseConfig) -> Result<(), DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(DatabaseError::Connect)?;

        if let Some(previous) = self.pool.swap(Some(Arc::new(pool))) {
            previous.close().await;
        }

        tracing::info!(max_connections = config.max_connections, "Connected to database");
        Ok(())
    }

    /// The current pool, if open.
    pub fn pool(&self) -> Option<Arc<PgPool>> {
        self.pool.load_full()
    }
}

#[async_trait]
impl Closable for SqlDatabase {
    type Error = DatabaseError;

    fn name(&self) -> &str {
        "database"
    }

    /// Close the pool. Closing an unopened handle is a no-op.
    async fn close(&self) -> Result<(), DatabaseError> {
        if let Some(pool) = self.pool.swap(None) {
            pool.close().await;
            tracing::debug!("Database pool closed");
        }
        Ok(())
    }
}

#[async_trait]
impl Database for SqlDatabase {
    fn is_open(&self) -> bool {
        self.pool
            .load()
            .as_ref()
            .is_some_and(|pool| !pool.is_closed())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        let pool = self.pool().ok_or(DatabaseError::NotOpen)?;
        sqlx::query("SELECT 1")
            .execute(pool.as_ref())
            .await
            .map_err(DatabaseError::Query)?;
        Ok(())
    }
}
