//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Hold the Axum route table, including late static-file registration
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind and serve on request
//! - Stop accepting and drain in-flight requests within a deadline

use async_trait::async_trait;
use axum::Router;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::router::build_router;
use crate::http::HttpError;
use crate::lifecycle::capabilities::{Drainable, Startable, StaticRegistrar};
use crate::lifecycle::{AppContext, Deadline, Shutdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServeState {
    Idle,
    Running,
    Stopped,
}

/// HTTP server for the application.
pub struct HttpServer {
    /// Route table without middleware; layers are applied per snapshot so
    /// late registrations are covered too.
    routes: Mutex<Router>,
    request_timeout: Duration,
    shutdown: Shutdown,
    state: watch::Sender<ServeState>,
}

impl HttpServer {
    /// Create a new HTTP server whose handlers share `context`.
    pub fn new(config: &AppConfig, context: Arc<AppContext>) -> Self {
        let (state, _) = watch::channel(ServeState::Idle);
        Self {
            routes: Mutex::new(build_router(context)),
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
            shutdown: Shutdown::new(),
            state,
        }
    }

    /// Current route table with all middleware layers applied.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let routes = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        routes
            .layer(TimeoutLayer::new(self.request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    async fn serve(&self, address: &str) -> Result<(), HttpError> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| HttpError::Bind {
                address: address.to_string(),
                source,
            })?;

        tracing::info!(address = %listener.local_addr()?, "HTTP server starting");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(self.shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[async_trait]
impl Startable for HttpServer {
    async fn start(&self, address: &str) -> Result<(), HttpError> {
        let claimed = self.state.send_if_modified(|state| {
            if *state == ServeState::Idle {
                *state = ServeState::Running;
                true
            } else {
                false
            }
        });
        if !claimed {
            return Err(HttpError::AlreadyStarted);
        }

        let result = self.serve(address).await;
        self.state.send_replace(ServeState::Stopped);
        result
    }
}

impl StaticRegistrar for HttpServer {
    fn serve_static(&self, path: &str, dir: &Path) {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let current = std::mem::take(&mut *routes);
        let service = ServeDir::new(dir);

        *routes = match path.trim_end_matches('/') {
            "" => current.fallback_service(service),
            prefix if prefix.starts_with('/') => current.nest_service(prefix, service),
            prefix => current.nest_service(&format!("/{}", prefix), service),
        };
        tracing::debug!(path, dir = %dir.display(), "Static handler registered");
    }
}

#[async_trait]
impl Drainable for HttpServer {
    async fn shutdown(&self, deadline: Deadline) -> Result<(), HttpError> {
        self.shutdown.trigger();

        let mut state = self.state.subscribe();
        if *state.borrow() == ServeState::Idle {
            return Ok(());
        }

        let drained = tokio::time::timeout_at(
            deadline.expires_at(),
            state.wait_for(|s| *s == ServeState::Stopped),
        )
        .await
        .is_ok();

        if drained {
            Ok(())
        } else {
            tracing::warn!(timeout = ?deadline.timeout(), "In-flight requests did not drain in time");
            Err(HttpError::ShutdownTimeout(deadline.timeout()))
        }
    }
}
