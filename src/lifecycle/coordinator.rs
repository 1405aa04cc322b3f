//! Process lifecycle coordinator.
//!
//! Owns the HTTP server, database handle and cache handle for the lifetime of
//! the process and tears them down in a fixed order on interrupt.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::{AppConfig, ShutdownOrder};
use crate::http::{HttpError, HttpServer};
use crate::lifecycle::capabilities::{Cache, Database, HttpListener};
use crate::lifecycle::{AppContext, Deadline};
use crate::observability::metrics;
use crate::storage::{CacheError, DatabaseError, RedisCache, SqlDatabase};

/// One step of the shutdown sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStep {
    Cache,
    Database,
    Http,
}

impl ShutdownStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownStep::Cache => "cache",
            ShutdownStep::Database => "database",
            ShutdownStep::Http => "http",
        }
    }
}

/// First failure of the shutdown sequence. Later steps did not run.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("closing cache failed: {0}")]
    Cache(#[source] CacheError),

    #[error("closing database failed: {0}")]
    Database(#[source] DatabaseError),

    #[error("HTTP shutdown failed: {0}")]
    Http(#[source] HttpError),
}

impl ShutdownError {
    pub fn step(&self) -> ShutdownStep {
        match self {
            ShutdownError::Cache(_) => ShutdownStep::Cache,
            ShutdownError::Database(_) => ShutdownStep::Database,
            ShutdownError::Http(_) => ShutdownStep::Http,
        }
    }
}

/// The application server: HTTP listener plus the resources its handlers use.
pub struct Server {
    context: Arc<AppContext>,
    http: Arc<dyn HttpListener>,
}

impl Server {
    /// Build the full stack from configuration.
    ///
    /// A database that cannot be opened is logged and returned alongside the
    /// server; the server itself is always usable for static serving and the
    /// caller decides whether to abort.
    pub async fn new(config: AppConfig) -> (Self, Option<DatabaseError>) {
        let config = Arc::new(config);

        let database = Arc::new(SqlDatabase::new());
        let cache: Option<Arc<dyn Cache>> = match RedisCache::from_config(&config.cache) {
            Ok(cache) => Some(Arc::new(cache)),
            Err(e) => {
                tracing::error!(error = %e, "Could not build cache client");
                None
            }
        };

        let context = Arc::new(AppContext::new(config.clone(), database.clone(), cache));
        let http = Arc::new(HttpServer::new(&config, context.clone()));

        let database_error = match database.open_with_config(&config.database).await {
            Ok(()) => {
                metrics::record_database_open(true);
                None
            }
            Err(e) => {
                metrics::record_database_open(false);
                tracing::error!(error = %e, "Could not connect to database");
                Some(e)
            }
        };

        (Self { context, http }, database_error)
    }

    /// Assemble a server from already-built collaborators.
    pub fn from_parts(context: Arc<AppContext>, http: Arc<dyn HttpListener>) -> Self {
        Self { context, http }
    }

    pub fn config(&self) -> &Arc<AppConfig> {
        self.context.config()
    }

    pub fn database(&self) -> &Arc<dyn Database> {
        self.context.database()
    }

    pub fn cache(&self) -> Option<&Arc<dyn Cache>> {
        self.context.cache()
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    /// Serve on `address` until the listener stops.
    pub async fn start(&self, address: &str) -> Result<(), HttpError> {
        self.http.start(address).await
    }

    /// Serve `assets_build_dir` at `/` (development only).
    pub fn serve_static_files(&self) {
        let dir = &self.config().assets_build_dir;
        tracing::info!(dir = %dir, "Serving static files");
        self.http.serve_static("/", Path::new(dir));
    }

    /// Wait for `interrupt`, then release everything in order.
    ///
    /// Each step must succeed before the next runs. The HTTP drain is bounded
    /// by `shutdown.timeout_secs` measured from the moment `interrupt`
    /// resolves; the cache and database closes are not.
    pub async fn graceful_shutdown<F>(&self, interrupt: F) -> Result<(), ShutdownError>
    where
        F: Future<Output = ()>,
    {
        interrupt.await;

        let settings = &self.config().shutdown;
        let deadline = Deadline::starting_now(Duration::from_secs(settings.timeout_secs));
        tracing::info!(
            timeout_secs = settings.timeout_secs,
            order = ?settings.order,
            "Starting graceful shutdown"
        );

        match settings.order {
            ShutdownOrder::ResourcesFirst => {
                self.close_cache().await?;
                self.close_database().await?;
                self.drain_http(deadline).await?;
            }
            ShutdownOrder::HttpFirst => {
                self.drain_http(deadline).await?;
                self.close_cache().await?;
                self.close_database().await?;
            }
        }

        tracing::info!("Graceful shutdown complete");
        Ok(())
    }

    async fn close_cache(&self) -> Result<(), ShutdownError> {
        let Some(cache) = self.cache() else {
            tracing::debug!("No cache client to close");
            return Ok(());
        };
        let start = Instant::now();
        let result = cache.close().await;
        finish_step(ShutdownStep::Cache, start, result.map_err(ShutdownError::Cache))
    }

    async fn close_database(&self) -> Result<(), ShutdownError> {
        let start = Instant::now();
        let result = self.database().close().await;
        finish_step(ShutdownStep::Database, start, result.map_err(ShutdownError::Database))
    }

    async fn drain_http(&self, deadline: Deadline) -> Result<(), ShutdownError> {
        let start = Instant::now();
        let result = self.http.shutdown(deadline).await;
        finish_step(ShutdownStep::Http, start, result.map_err(ShutdownError::Http))
    }
}

fn finish_step(
    step: ShutdownStep,
    start: Instant,
    result: Result<(), ShutdownError>,
) -> Result<(), ShutdownError> {
    let elapsed = start.elapsed();
    metrics::record_shutdown_step(step.as_str(), elapsed, result.is_ok());
    match &result {
        Ok(()) => tracing::info!(step = step.as_str(), elapsed_ms = elapsed.as_millis() as u64, "Shutdown step complete"),
        Err(e) => tracing::error!(step = step.as_str(), error = %e, "Shutdown step failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_failed_step() {
        let err = ShutdownError::Database(DatabaseError::NotOpen);
        assert_eq!(err.step(), ShutdownStep::Database);
        assert_eq!(err.to_string(), "closing database failed: database is not open");

        let err = ShutdownError::Http(HttpError::ShutdownTimeout(Duration::from_secs(5)));
        assert_eq!(err.step().as_str(), "http");
    }

    #[tokio::test]
    async fn test_new_survives_unreachable_resources() {
        let mut config = AppConfig::default();
        config.database.url = "not-a-database-url".into();
        config.cache.url = "not-a-cache-url".into();

        let (server, database_error) = Server::new(config).await;

        assert!(matches!(database_error, Some(DatabaseError::Connect(_))));
        assert!(!server.database().is_open());
        assert!(server.cache().is_none());
        assert_eq!(server.config().database.url, "not-a-database-url");
    }
}
