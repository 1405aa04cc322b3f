//! Shared fakes for lifecycle integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use web_core::config::AppConfig;
use web_core::http::HttpError;
use web_core::lifecycle::capabilities::{Cache, Closable, Database, Drainable, Startable, StaticRegistrar};
use web_core::lifecycle::{AppContext, Deadline, Server};
use web_core::storage::{CacheError, DatabaseError};

/// Ordered record of every call the fakes receive.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub struct FakeCache {
    log: EventLog,
    fail_close: bool,
}

#[async_trait]
impl Closable for FakeCache {
    type Error = CacheError;

    fn name(&self) -> &str {
        "cache"
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.log.push("cache.close");
        if self.fail_close {
            Err(CacheError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Cache for FakeCache {
    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

pub struct FakeDatabase {
    log: EventLog,
    fail_close: bool,
    ping_delay: Duration,
}

impl FakeDatabase {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            fail_close: false,
            ping_delay: Duration::ZERO,
        }
    }

    /// A database whose ping takes `delay`, to keep requests in flight.
    pub fn slow(log: EventLog, delay: Duration) -> Self {
        Self {
            ping_delay: delay,
            ..Self::new(log)
        }
    }
}

#[async_trait]
impl Closable for FakeDatabase {
    type Error = DatabaseError;

    fn name(&self) -> &str {
        "database"
    }

    async fn close(&self) -> Result<(), DatabaseError> {
        self.log.push("database.close");
        if self.fail_close {
            Err(DatabaseError::NotOpen)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Database for FakeDatabase {
    fn is_open(&self) -> bool {
        true
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        tokio::time::sleep(self.ping_delay).await;
        self.log.push("database.ping");
        Ok(())
    }
}

pub struct FakeHttp {
    log: EventLog,
    fail_shutdown: bool,
    deadlines: Mutex<Vec<Deadline>>,
    static_dirs: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeHttp {
    pub fn deadlines(&self) -> Vec<Deadline> {
        self.deadlines.lock().unwrap().clone()
    }

    pub fn static_dirs(&self) -> Vec<(String, PathBuf)> {
        self.static_dirs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Startable for FakeHttp {
    async fn start(&self, address: &str) -> Result<(), HttpError> {
        self.log.push(format!("http.start {}", address));
        Ok(())
    }
}

impl StaticRegistrar for FakeHttp {
    fn serve_static(&self, path: &str, dir: &Path) {
        self.static_dirs
            .lock()
            .unwrap()
            .push((path.to_string(), dir.to_path_buf()));
    }
}

#[async_trait]
impl Drainable for FakeHttp {
    async fn shutdown(&self, deadline: Deadline) -> Result<(), HttpError> {
        self.log.push("http.shutdown");
        self.deadlines.lock().unwrap().push(deadline);
        if self.fail_shutdown {
            Err(HttpError::ShutdownTimeout(deadline.timeout()))
        } else {
            Ok(())
        }
    }
}

/// Which fake should fail its close/shutdown call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    None,
    Cache,
    Database,
    Http,
}

/// A coordinator wired to fakes, with handles to inspect them.
pub struct Harness {
    pub server: Server,
    pub log: EventLog,
    pub config: Arc<AppConfig>,
    pub cache: Option<Arc<FakeCache>>,
    pub database: Arc<FakeDatabase>,
    pub http: Arc<FakeHttp>,
}

pub fn harness(config: AppConfig, with_cache: bool, failure: Failure) -> Harness {
    let log = EventLog::default();
    let config = Arc::new(config);

    let cache = with_cache.then(|| {
        Arc::new(FakeCache {
            log: log.clone(),
            fail_close: failure == Failure::Cache,
        })
    });
    let database = Arc::new(FakeDatabase {
        fail_close: failure == Failure::Database,
        ..FakeDatabase::new(log.clone())
    });
    let http = Arc::new(FakeHttp {
        log: log.clone(),
        fail_shutdown: failure == Failure::Http,
        deadlines: Mutex::new(Vec::new()),
        static_dirs: Mutex::new(Vec::new()),
    });

    let context = Arc::new(AppContext::new(
        config.clone(),
        database.clone(),
        cache.clone().map(|c| c as Arc<dyn Cache>),
    ));
    let server = Server::from_parts(context, http.clone());

    Harness {
        server,
        log,
        config,
        cache,
        database,
        http,
    }
}

/// Whether two `Arc`s point at the same allocation, ignoring vtables.
pub fn same_allocation<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}
