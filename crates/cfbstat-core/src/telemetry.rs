//! Per-attempt telemetry.
//!
//! The client reports every physical HTTP attempt to an optional
//! [`TelemetryHook`]. Closures taking `&RequestAttempt` implement the trait, and
//! [`TracingTelemetry`] forwards events to `tracing`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http_client::HttpErrorKind;
use crate::retry::Outcome;
use crate::UtcDateTime;

/// One physical HTTP call, reported after its outcome is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestAttempt {
    /// Shared by every attempt of the same logical `request` call.
    pub call_id: Uuid,
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    /// 1-based.
    pub attempt: u32,
    pub outcome: Outcome,
    /// `None` when the transport failed before a status arrived.
    pub status: Option<u16>,
    pub error: Option<String>,
    /// Transport failure class; `None` whenever a status arrived.
    pub error_kind: Option<HttpErrorKind>,
    pub elapsed: Duration,
    /// Planned wait before the next attempt; `None` when none follows.
    pub retry_in: Option<Duration>,
    pub timestamp: UtcDateTime,
}

/// Receives one event per attempt. Must not block for long: it runs inline on
/// the calling thread between attempts.
pub trait TelemetryHook: Send + Sync {
    fn on_attempt(&self, event: &RequestAttempt);
}

impl<F> TelemetryHook for F
where
    F: Fn(&RequestAttempt) + Send + Sync,
{
    fn on_attempt(&self, event: &RequestAttempt) {
        self(event)
    }
}

/// Logs attempts through `tracing`: successes at debug, failures at warn.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TelemetryHook for TracingTelemetry {
    fn on_attempt(&self, event: &RequestAttempt) {
        let retry_in_ms = event.retry_in.map(|wait| wait.as_millis() as u64);
        match event.outcome {
            Outcome::Success => tracing::debug!(
                call_id = %event.call_id,
                endpoint = %event.endpoint,
                attempt = event.attempt,
                status = event.status,
                elapsed_ms = event.elapsed.as_millis() as u64,
                "request succeeded"
            ),
            outcome => tracing::warn!(
                call_id = %event.call_id,
                endpoint = %event.endpoint,
                attempt = event.attempt,
                outcome = %outcome,
                status = event.status,
                error = event.error.as_deref(),
                error_kind = event.error_kind.map(|kind| kind.as_str()),
                retry_in_ms,
                "request attempt failed"
            ),
        }
    }
}
