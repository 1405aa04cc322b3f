//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for the process interrupt signal (SIGINT / Ctrl+C)
//! - Hand it to the coordinator as a plain future
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Only the interrupt signal is handled; SIGTERM keeps its default action

/// Resolve when the process receives an interrupt.
///
/// If the handler cannot be installed the future never resolves, leaving the
/// process to the default signal disposition instead of shutting down early.
pub async fn interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Interrupt signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install interrupt handler");
            std::future::pending::<()>().await;
        }
    }
}
