//! Deadline handed to the HTTP drain.

use std::time::Duration;
use tokio::time::Instant;

/// A fixed time budget measured from a starting instant.
///
/// Uses Tokio's clock so paused-time tests observe exact values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    started_at: Instant,
    timeout: Duration,
}

impl Deadline {
    /// Start a deadline now.
    pub fn starting_now(timeout: Duration) -> Self {
        Self::starting_at(Instant::now(), timeout)
    }

    pub fn starting_at(started_at: Instant, timeout: Duration) -> Self {
        Self { started_at, timeout }
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn expires_at(&self) -> Instant {
        self.started_at + self.timeout
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.expires_at().saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at()
    }
}
