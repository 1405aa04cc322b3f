//! Capability traits the coordinator depends on.
//!
//! The coordinator never names a concrete library type. Real implementations
//! live in `http` and `storage`; tests substitute instrumented fakes.

use async_trait::async_trait;
use std::path::Path;

use crate::http::HttpError;
use crate::lifecycle::Deadline;
use crate::storage::{CacheError, DatabaseError};

/// A handle that must be explicitly released.
#[async_trait]
pub trait Closable: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Component name for logging purposes.
    fn name(&self) -> &str;

    async fn close(&self) -> Result<(), Self::Error>;
}

/// Something that serves on a socket address until told to stop.
#[async_trait]
pub trait Startable: Send + Sync {
    /// Bind `address` and serve. Resolves only when the listener stops.
    async fn start(&self, address: &str) -> Result<(), HttpError>;
}

/// Registers a static file tree under a URL path.
pub trait StaticRegistrar: Send + Sync {
    fn serve_static(&self, path: &str, dir: &Path);
}

/// Stops accepting work and waits for in-flight work within a deadline.
#[async_trait]
pub trait Drainable: Send + Sync {
    async fn shutdown(&self, deadline: Deadline) -> Result<(), HttpError>;
}

/// Everything the coordinator needs from the HTTP server.
pub trait HttpListener: Startable + StaticRegistrar + Drainable {}

impl<T> HttpListener for T where T: Startable + StaticRegistrar + Drainable {}

/// Relational database handle.
#[async_trait]
pub trait Database: Closable<Error = DatabaseError> {
    /// Whether a connection pool is currently held.
    fn is_open(&self) -> bool;

    /// Round-trip a trivial query.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Key/value cache handle.
#[async_trait]
pub trait Cache: Closable<Error = CacheError> {
    /// Round-trip a PING; connects lazily on first use.
    async fn ping(&self) -> Result<(), CacheError>;
}
