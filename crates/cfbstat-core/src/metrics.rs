use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::retry::Outcome;

/// Cumulative counters for one client instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Physical attempts, retries included.
    pub total_requests: u64,
    pub successful_requests: u64,
    pub server_errors: u64,
    pub rate_limited_requests: u64,
    pub client_errors: u64,
    pub network_errors: u64,
    /// Attempts beyond the first of each logical call.
    pub retries: u64,
}

/// Mutex-guarded counters owned by a client.
#[derive(Debug, Default)]
pub struct Metrics {
    inner: Mutex<MetricsSnapshot>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one physical attempt. `attempt` is 1-based within its logical call.
    pub fn record_attempt(&self, attempt: u32, outcome: Outcome) {
        let mut inner = self.inner.lock().expect("metrics lock is not poisoned");
        inner.total_requests += 1;
        if attempt > 1 {
            inner.retries += 1;
        }
        match outcome {
            Outcome::Success => inner.successful_requests += 1,
            Outcome::ServerError => inner.server_errors += 1,
            Outcome::RateLimited => inner.rate_limited_requests += 1,
            Outcome::ClientError => inner.client_errors += 1,
            Outcome::NetworkError => inner.network_errors += 1,
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        *self.inner.lock().expect("metrics lock is not poisoned")
    }
}
