//! HTTP listener errors.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    /// The listener stopped with an I/O error.
    #[error("Listener failed: {0}")]
    Serve(#[from] std::io::Error),

    /// `start` was called on a listener that already ran.
    #[error("HTTP server already started")]
    AlreadyStarted,

    /// In-flight requests did not finish before the drain deadline.
    #[error("HTTP shutdown timed out after {0:?}")]
    ShutdownTimeout(Duration),
}
