//! HTTP client core: throttle, attempt, classify, record, retry.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use uuid::Uuid;

use crate::clock::{Clock, SleepReason, SystemClock};
use crate::config::{ClientConfig, Host, DEFAULT_INTERVAL, DEFAULT_TIMEOUT};
use crate::error::{ApiError, ConfigError};
use crate::http_client::{
    HttpAuth, HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::retry::{Outcome, RetryDecision, RetryPolicy};
use crate::telemetry::{RequestAttempt, TelemetryHook};
use crate::throttling::Throttle;

/// Builder for [`Client`].
///
/// Validation happens in [`ClientBuilder::build`] and never touches the
/// network, so a missing API key fails before any request could be sent.
///
/// # Example
///
/// ```rust,ignore
/// use cfbstat_core::{Client, Host, TracingTelemetry};
///
/// let client = Client::builder()
///     .host(Host::Next)
///     .telemetry(TracingTelemetry)
///     .build()?; // reads CFBD_API_KEY
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    host: Host,
    timeout: Option<Duration>,
    min_interval: Option<Duration>,
    retry: Option<RetryPolicy>,
    telemetry: Option<Arc<dyn TelemetryHook>>,
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit API key. Takes precedence over `CFBD_API_KEY`.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    /// Per-attempt transport timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = Some(min_interval);
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn telemetry(mut self, hook: impl TelemetryHook + 'static) -> Self {
        self.telemetry = Some(Arc::new(hook));
        self
    }

    pub fn http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<Client, ConfigError> {
        let config = ClientConfig::new(
            self.api_key,
            self.host,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            self.min_interval.unwrap_or(DEFAULT_INTERVAL),
            self.retry.unwrap_or_default(),
            self.telemetry,
        )?;

        let http_client: Arc<dyn HttpClient> = match self.http_client {
            Some(http_client) => http_client,
            None => {
                let user_agent = self
                    .user_agent
                    .as_deref()
                    .unwrap_or(ReqwestHttpClient::DEFAULT_USER_AGENT);
                let transport = ReqwestHttpClient::with_user_agent(user_agent).map_err(|e| {
                    ConfigError::Transport {
                        message: e.message().to_owned(),
                    }
                })?;
                Arc::new(transport)
            }
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock::new()),
        };

        Ok(Client::from_parts(config, http_client, clock))
    }
}

/// Rate-limited, retrying client for the CollegeFootballData API.
///
/// Clones share the throttle and metrics of the original, so one budget can be
/// spread across threads by cloning a single client.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    auth: HttpAuth,
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    throttle: Throttle,
    metrics: Arc<Metrics>,
}

struct AttemptResult {
    outcome: Outcome,
    status: Option<u16>,
    body: Option<String>,
    error: Option<String>,
    error_kind: Option<HttpErrorKind>,
}

impl AttemptResult {
    fn from_transport(result: Result<HttpResponse, HttpError>) -> Self {
        match result {
            Ok(response) => Self {
                outcome: Outcome::from_status(response.status),
                status: Some(response.status),
                body: Some(response.body),
                error: None,
                error_kind: None,
            },
            Err(error) => Self {
                outcome: Outcome::NetworkError,
                status: None,
                body: None,
                error: Some(error.message().to_owned()),
                error_kind: Some(error.kind()),
            },
        }
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Production client with an explicit key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::builder().api_key(api_key).build()
    }

    /// Production client keyed from `CFBD_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    pub fn from_parts(
        config: ClientConfig,
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let throttle = Throttle::new(clock.clone(), config.min_interval());
        Self {
            auth: HttpAuth::BearerToken(config.api_key().to_owned()),
            config: Arc::new(config),
            http_client,
            clock,
            throttle,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Full URL for `endpoint` on the configured host, query values encoded.
    pub fn url_for(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}/{}",
            self.config.base_url(),
            endpoint.trim_start_matches('/')
        );
        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Performs one logical GET and returns the parsed JSON body.
    ///
    /// Every attempt passes through the throttle, is counted in the metrics and
    /// reported to the telemetry hook. Server, network and rate-limit failures
    /// are retried per the configured [`RetryPolicy`]; client errors are not.
    /// Blocks for the whole retry sequence, waits included.
    pub fn request(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        let call_id = Uuid::new_v4();
        let url = self.url_for(endpoint, params);
        let mut attempt = 0_u32;

        loop {
            attempt += 1;
            self.throttle.acquire();

            let started = self.clock.now();
            let request = HttpRequest::get(url.as_str())
                .with_auth(&self.auth)
                .with_header("accept", "application/json")
                .with_timeout_ms(self.config.timeout().as_millis() as u64);
            let result = AttemptResult::from_transport(self.http_client.execute(request));
            let elapsed = self.clock.now().saturating_sub(started);

            self.metrics.record_attempt(attempt, result.outcome);
            let decision = self.config.retry().decide(result.outcome, attempt);

            self.emit(RequestAttempt {
                call_id,
                endpoint: endpoint.to_owned(),
                params: params
                    .iter()
                    .map(|(name, value)| ((*name).to_owned(), value.clone()))
                    .collect(),
                attempt,
                outcome: result.outcome,
                status: result.status,
                error: result.error.clone(),
                error_kind: result.error_kind,
                elapsed,
                retry_in: match decision {
                    RetryDecision::RetryAfter(wait) => Some(wait),
                    RetryDecision::Return | RetryDecision::GiveUp => None,
                },
                timestamp: self.clock.wall_time(),
            });

            match decision {
                RetryDecision::Return => {
                    return decode_body(endpoint, result.body.as_deref().unwrap_or_default());
                }
                RetryDecision::RetryAfter(wait) => {
                    self.clock.sleep_for(SleepReason::Backoff, wait);
                }
                RetryDecision::GiveUp => return Err(failure(endpoint, result, attempt)),
            }
        }
    }

    fn emit(&self, event: RequestAttempt) {
        if let Some(hook) = self.config.telemetry() {
            hook.on_attempt(&event);
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("throttle", &self.throttle)
            .field("metrics", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}

fn decode_body(endpoint: &str, body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_owned(),
        message: e.to_string(),
    })
}

fn failure(endpoint: &str, result: AttemptResult, attempts: u32) -> ApiError {
    let endpoint = endpoint.to_owned();
    match result.outcome {
        Outcome::RateLimited => ApiError::RateLimited { endpoint, attempts },
        Outcome::ServerError => ApiError::TransientServer {
            endpoint,
            status: result.status.unwrap_or(500),
            attempts,
        },
        Outcome::NetworkError => ApiError::Network {
            endpoint,
            message: result.error.unwrap_or_default(),
            attempts,
        },
        // Success never yields GiveUp.
        Outcome::ClientError | Outcome::Success => ApiError::Client {
            endpoint,
            status: result.status.unwrap_or_default(),
        },
    }
}
