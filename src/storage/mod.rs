//! Storage handles owned by the lifecycle coordinator.
//!
//! # Data Flow
//! ```text
//! AppConfig.database → database.rs (open pool) → Arc<dyn Database>
//! AppConfig.cache    → cache.rs (client, lazy connect) → Arc<dyn Cache>
//!     → AppContext → request handlers
//!     → graceful shutdown (close)
//! ```
//!
//! # Design Decisions
//! - Schema and cache key design belong to the application, not these handles
//! - Handles report closed/unopened state instead of panicking

pub mod cache;
pub mod database;

pub use cache::{CacheError, RedisCache};
pub use database::{DatabaseError, SqlDatabase};
