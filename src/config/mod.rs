//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or defaults
//!     → loader.rs (parse, deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc through the lifecycle coordinator
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the coordinator only reads it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::AppConfig;
pub use schema::{CacheConfig, DatabaseConfig, ObservabilityConfig, ServerConfig, ShutdownConfig, ShutdownOrder};
pub use validation::ValidationError;
