//! Metrics collection and exposition.
//!
//! # Metrics
//! - `app_shutdown_steps_total` (counter): shutdown steps by step, outcome
//! - `app_shutdown_step_seconds` (histogram): time spent per shutdown step
//! - `app_database_open_total` (counter): database open attempts by outcome
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus exporter with an HTTP scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

pub fn record_shutdown_step(step: &'static str, elapsed: Duration, ok: bool) {
    metrics::counter!("app_shutdown_steps_total", "step" => step, "outcome" => outcome(ok)).increment(1);
    metrics::histogram!("app_shutdown_step_seconds", "step" => step).record(elapsed.as_secs_f64());
}

pub fn record_database_open(ok: bool) {
    metrics::counter!("app_database_open_total", "outcome" => outcome(ok)).increment(1);
}
