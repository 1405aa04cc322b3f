//! Web service bootstrap library.
//!
//! Builds the HTTP server, database handle and cache client from one
//! configuration and coordinates their ordered shutdown.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod storage;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::{Server, Shutdown, ShutdownError};
