//! Shared resources handed to request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::lifecycle::capabilities::{Cache, Database};

/// The coordinator's resources, built before the router so handlers can
/// reach them.
pub struct AppContext {
    config: Arc<AppConfig>,
    database: Arc<dyn Database>,
    cache: Option<Arc<dyn Cache>>,
}

impl AppContext {
    pub fn new(
        config: Arc<AppConfig>,
        database: Arc<dyn Database>,
        cache: Option<Arc<dyn Cache>>,
    ) -> Self {
        Self {
            config,
            database,
            cache,
        }
    }

    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    pub fn database(&self) -> &Arc<dyn Database> {
        &self.database
    }

    /// The cache client, absent when it could not be constructed.
    pub fn cache(&self) -> Option<&Arc<dyn Cache>> {
        self.cache.as_ref()
    }
}
