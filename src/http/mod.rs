//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum serve, middleware, graceful drain)
//!     → router.rs (built-in routes, handlers reading AppContext)
//!     → static fallback (ServeDir, development only)
//!     → Send to client
//! ```

pub mod error;
pub mod router;
pub mod server;

pub use error::HttpError;
pub use router::{ComponentHealth, HealthReport};
pub use server::HttpServer;
