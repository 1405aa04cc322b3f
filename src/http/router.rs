//! Route table and built-in handlers.
//!
//! Application routes are mounted by the embedding service; this module only
//! carries the handlers the server needs for itself.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::lifecycle::AppContext;

/// Upper bound for a single dependency probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Build the route table. Handlers reach shared resources through `context`.
pub fn build_router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(context)
}

/// Health of one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ComponentHealth {
    Up,
    Down { error: String },
    Absent,
}

impl ComponentHealth {
    fn is_up(&self) -> bool {
        matches!(self, ComponentHealth::Up)
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub database: ComponentHealth,
    pub cache: ComponentHealth,
}

impl HealthReport {
    fn new(database: ComponentHealth, cache: ComponentHealth) -> Self {
        // The cache is optional; losing it degrades but does not fail.
        let status = if !database.is_up() {
            "unavailable"
        } else if cache.is_up() {
            "ok"
        } else {
            "degraded"
        };
        Self {
            status,
            database,
            cache,
        }
    }
}

impl IntoResponse for HealthReport {
    fn into_response(self) -> Response {
        let code = if self.database.is_up() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (code, Json(self)).into_response()
    }
}

async fn health(State(context): State<Arc<AppContext>>) -> HealthReport {
    let database = probe(context.database().ping()).await;
    let cache = match context.cache() {
        Some(cache) => probe(cache.ping()).await,
        None => ComponentHealth::Absent,
    };

    if !database.is_up() {
        tracing::warn!(database = ?database, "Health check failing");
    }
    HealthReport::new(database, cache)
}

async fn probe<F, E>(check: F) -> ComponentHealth
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(PROBE_TIMEOUT, check).await {
        Ok(Ok(())) => ComponentHealth::Up,
        Ok(Err(e)) => ComponentHealth::Down { error: e.to_string() },
        Err(_) => ComponentHealth::Down {
            error: format!("no answer within {:?}", PROBE_TIMEOUT),
        },
    }
}
