//! Redis cache client handle.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::IntoConnectionInfo;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::CacheConfig;
use crate::lifecycle::capabilities::{Cache, Closable};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid cache address: {0}")]
    InvalidAddress(#[source] redis::RedisError),

    #[error("cache command failed: {0}")]
    Command(#[from] redis::RedisError),

    #[error("cache client is closed")]
    Closed,
}

/// Redis client that connects on first use.
pub struct RedisCache {
    client: redis::Client,
    connection: Mutex<Option<MultiplexedConnection>>,
    closed: AtomicBool,
}

impl RedisCache {
    /// Build a client from configuration.
    ///
    /// Only the address is checked here; no connection is made.
    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        let mut info = config
            .url
            .as_str()
            .into_connection_info()
            .map_err(CacheError::InvalidAddress)?;
        info.redis.db = config.db;
        if let Some(password) = &config.password {
            info.redis.password = Some(password.clone());
        }

        let client = redis::Client::open(info).map_err(CacheError::InvalidAddress)?;
        Ok(Self {
            client,
            connection: Mutex::new(None),
            closed: AtomicBool::new(false),
        })
    }

    /// Shared multiplexed connection, established on the first call.
    pub async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Closed);
        }

        let mut slot = self.connection.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.client.get_multiplexed_async_connection().await?;
        tracing::debug!("Cache connection established");
        *slot = Some(conn.clone());
        Ok(conn)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[async_trait]
impl Closable for RedisCache {
    type Error = CacheError;

    fn name(&self) -> &str {
        "cache"
    }

    /// Drop the connection. A second close reports `CacheError::Closed`.
    async fn close(&self) -> Result<(), CacheError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(CacheError::Closed);
        }
        self.connection.lock().await.take();
        tracing::debug!("Cache client closed");
        Ok(())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_does_not_connect() {
        let config = CacheConfig {
            url: "redis://127.0.0.1:1".into(),
            password: Some("secret".into()),
            db: 3,
        };
        let cache = RedisCache::from_config(&config).unwrap();
        assert!(!cache.is_closed());
        assert_eq!(cache.client.get_connection_info().redis.db, 3);
        assert_eq!(
            cache.client.get_connection_info().redis.password.as_deref(),
            Some("secret")
        );
    }

    #[test]
    fn test_invalid_address() {
        let config = CacheConfig {
            url: "ftp://cache".into(),
            ..CacheConfig::default()
        };
        assert!(matches!(
            RedisCache::from_config(&config),
            Err(CacheError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_double_close_reports_closed() {
        let cache = RedisCache::from_config(&CacheConfig::default()).unwrap();
        cache.close().await.unwrap();
        assert!(matches!(cache.close().await, Err(CacheError::Closed)));
        assert!(matches!(cache.ping().await, Err(CacheError::Closed)));
    }
}
