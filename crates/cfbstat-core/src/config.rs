use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::retry::RetryPolicy;
use crate::telemetry::TelemetryHook;
use crate::throttling::DEFAULT_MIN_INTERVAL;

/// Environment variable consulted when no API key is passed explicitly.
pub const API_KEY_ENV: &str = "CFBD_API_KEY";

/// Named API host. Exactly two exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Host {
    #[default]
    Production,
    Next,
}

impl Host {
    pub const ALL: [Self; 2] = [Self::Production, Self::Next];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Next => "next",
        }
    }

    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => "https://api.collegefootballdata.com",
            Self::Next => "https://apinext.collegefootballdata.com",
        }
    }
}

impl Display for Host {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Host {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "next" => Ok(Self::Next),
            other => Err(ConfigError::InvalidHost {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validated, immutable client settings.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    host: Host,
    timeout: Duration,
    min_interval: Duration,
    retry: RetryPolicy,
    telemetry: Option<Arc<dyn TelemetryHook>>,
}

impl ClientConfig {
    /// Validates the pieces of a configuration. The API key falls back to
    /// [`API_KEY_ENV`] when `api_key` is `None`.
    pub fn new(
        api_key: Option<String>,
        host: Host,
        timeout: Duration,
        min_interval: Duration,
        retry: RetryPolicy,
        telemetry: Option<Arc<dyn TelemetryHook>>,
    ) -> Result<Self, ConfigError> {
        retry.validate()?;
        Ok(Self {
            api_key: resolve_api_key(api_key)?,
            host,
            timeout,
            min_interval,
            retry,
            telemetry,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub const fn host(&self) -> Host {
        self.host
    }

    pub fn base_url(&self) -> &'static str {
        self.host.base_url()
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn telemetry(&self) -> Option<&Arc<dyn TelemetryHook>> {
        self.telemetry.as_ref()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .field("timeout", &self.timeout)
            .field("min_interval", &self.min_interval)
            .field("retry", &self.retry)
            .field("telemetry", &self.telemetry.is_some())
            .finish()
    }
}

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const DEFAULT_INTERVAL: Duration = DEFAULT_MIN_INTERVAL;

fn resolve_api_key(explicit: Option<String>) -> Result<String, ConfigError> {
    explicit
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .map(|key| key.trim().to_owned())
        .filter(|key| !key.is_empty())
        .ok_or(ConfigError::MissingApiKey {
            env_var: API_KEY_ENV,
        })
}
