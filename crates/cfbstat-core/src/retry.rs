//! Outcome classification and retry decisions.
//!
//! The client loop never inspects status codes itself: it classifies each
//! attempt into an [`Outcome`] and asks [`RetryPolicy::decide`] what to do
//! next.

use std::fmt::{Display, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Classification of a single physical HTTP attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    ServerError,
    RateLimited,
    ClientError,
    NetworkError,
}

impl Outcome {
    /// Maps an HTTP status onto an outcome. Statuses outside 2xx, 4xx and 5xx
    /// are treated as client errors and never retried.
    pub const fn from_status(status: u16) -> Self {
        match status {
            200..=299 => Self::Success,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::ClientError,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ServerError => "server_error",
            Self::RateLimited => "rate_limited",
            Self::ClientError => "client_error",
            Self::NetworkError => "network_error",
        }
    }

    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::ServerError | Self::RateLimited | Self::NetworkError
        )
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backoff strategy for retrying failed requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed {
        /// Delay between retries.
        delay: Duration,
    },
    /// Uses an exponential delay between retries.
    ///
    /// The delay is calculated as `base * (factor ^ retry)`.
    Exponential {
        /// Delay before the first retry.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// Upper bound for a single wait.
        max: Duration,
        /// Whether to apply random jitter (+/- 50%) to the delay.
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_secs(1),
            factor: 2.0,
            max: Duration::from_secs(60),
            jitter: false,
        }
    }
}

impl Backoff {
    /// Delay before retry number `retry` (0-based).
    pub fn delay(self, retry: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(retry.min(i32::MAX as u32) as i32);
                let seconds = base.as_secs_f64() * scale;
                let capped_seconds = seconds.min(max.as_secs_f64());

                let mut delay = Duration::from_secs_f64(capped_seconds);

                if jitter {
                    let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
                    let random_offset = fastrand::u64(0..=(jitter_ms * 2));
                    let total_ms =
                        delay.as_millis() as i64 + (random_offset as i64 - jitter_ms as i64);
                    delay = Duration::from_millis(total_ms.max(0) as u64);
                }

                delay
            }
        }
    }
}

/// What the client should do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The attempt succeeded; hand the body back.
    Return,
    /// Wait for the given duration, then try again.
    RetryAfter(Duration),
    /// Surface the outcome as an error.
    GiveUp,
}

/// Retry budget and wait schedule shared by every logical call of a client.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per logical call, the first one included.
    pub max_attempts: u32,
    /// Schedule for server and network failures.
    pub backoff: Backoff,
    /// Fixed wait after a 429.
    pub rate_limit_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::default(),
            rate_limit_wait: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// A policy that gives up after the first failed attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: "max_attempts must be at least 1",
            });
        }
        if let Backoff::Exponential { factor, .. } = self.backoff {
            if !factor.is_finite() || factor < 1.0 {
                return Err(ConfigError::InvalidRetryPolicy {
                    reason: "backoff factor must be finite and >= 1.0",
                });
            }
        }
        Ok(())
    }

    /// Decides the next step after `attempt` (1-based) ended with `outcome`.
    pub fn decide(&self, outcome: Outcome, attempt: u32) -> RetryDecision {
        match outcome {
            Outcome::Success => RetryDecision::Return,
            Outcome::ClientError => RetryDecision::GiveUp,
            _ if attempt >= self.max_attempts => RetryDecision::GiveUp,
            Outcome::RateLimited => RetryDecision::RetryAfter(self.rate_limit_wait),
            Outcome::ServerError | Outcome::NetworkError => {
                RetryDecision::RetryAfter(self.backoff.delay(attempt.saturating_sub(1)))
            }
        }
    }
}
