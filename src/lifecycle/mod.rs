//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Construction (coordinator.rs):
//!     AppConfig → AppContext (config, database, cache) → HttpServer → open database
//!
//! Shutdown (coordinator.rs):
//!     Interrupt received → Deadline starts → close cache → close database
//!         → drain HTTP within deadline
//!
//! Signals (signals.rs, shutdown.rs):
//!     SIGINT → interrupt() resolves
//!     Shutdown::trigger() → in-process equivalent
//! ```
//!
//! # Design Decisions
//! - Coordinator depends only on capability traits (capabilities.rs)
//! - Ordered shutdown, no overlap between steps
//! - Fail fast: the first failed step ends the sequence and is returned
//! - Only the HTTP drain has a deadline

pub mod capabilities;
pub mod context;
pub mod coordinator;
pub mod deadline;
pub mod shutdown;
pub mod signals;

pub use context::AppContext;
pub use coordinator::{Server, ShutdownError, ShutdownStep};
pub use deadline::Deadline;
pub use shutdown::Shutdown;
