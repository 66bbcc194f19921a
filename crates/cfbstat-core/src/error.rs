use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Construction-time errors. Raised before any network I/O happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api key is missing; pass one explicitly or set {env_var}")]
    MissingApiKey { env_var: &'static str },
    #[error("invalid host '{value}', expected one of production, next")]
    InvalidHost { value: String },
    #[error("invalid retry policy: {reason}")]
    InvalidRetryPolicy { reason: &'static str },
    #[error("http transport could not be initialised: {message}")]
    Transport { message: String },
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Client,
    RateLimited,
    TransientServer,
    Network,
    Decode,
    Schema,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Client => "client",
            Self::RateLimited => "rate_limited",
            Self::TransientServer => "transient_server",
            Self::Network => "network",
            Self::Decode => "decode",
            Self::Schema => "schema",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by [`crate::Client::request`] and the dataset fetchers.
///
/// Retryable kinds only reach the caller once the retry budget is spent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("{endpoint} rejected the request with status {status}")]
    Client { endpoint: String, status: u16 },

    #[error("{endpoint} kept rate limiting after {attempts} attempts")]
    RateLimited { endpoint: String, attempts: u32 },

    #[error("{endpoint} returned server error {status} after {attempts} attempts")]
    TransientServer {
        endpoint: String,
        status: u16,
        attempts: u32,
    },

    #[error("network failure calling {endpoint} after {attempts} attempts: {message}")]
    Network {
        endpoint: String,
        message: String,
        attempts: u32,
    },

    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("unexpected payload shape from {endpoint}: {message}")]
    Schema { endpoint: String, message: String },
}

impl ApiError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Client { .. } => ErrorKind::Client,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::TransientServer { .. } => ErrorKind::TransientServer,
            Self::Network { .. } => ErrorKind::Network,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Schema { .. } => ErrorKind::Schema,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Configuration => "api.configuration",
            ErrorKind::Client => "api.client_error",
            ErrorKind::RateLimited => "api.rate_limited",
            ErrorKind::TransientServer => "api.server_error",
            ErrorKind::Network => "api.network_error",
            ErrorKind::Decode => "api.decode",
            ErrorKind::Schema => "api.schema",
        }
    }

    /// Whether the core would have retried this failure had budget remained.
    pub const fn retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimited | ErrorKind::TransientServer | ErrorKind::Network
        )
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::TransientServer { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}
