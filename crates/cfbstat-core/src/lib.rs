//! # cfbstat Core
//!
//! Resilient client and dataset normalizers for the CollegeFootballData API.
//!
//! ## Overview
//!
//! - **Client core** with bearer auth, host selection and a blocking `request`
//! - **Throttle** keeping request starts at least ~170 ms apart
//! - **Retry policy**: exponential backoff for 5xx and network failures, a fixed
//!   60 s wait for 429, no retry for other 4xx
//! - **Metrics and telemetry**: cumulative counters plus a per-attempt hook
//! - **Dataset normalizers** mapping each endpoint onto a fixed-column record
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client core and builder |
//! | [`clock`] | Injectable time source |
//! | [`config`] | Host map and validated configuration |
//! | [`datasets`] | `fetch_*` / `normalize_*` per endpoint |
//! | [`domain`] | Canonical records, team slugs, timestamps |
//! | [`error`] | Error taxonomy |
//! | [`http_client`] | Blocking transport abstraction |
//! | [`metrics`] | Request counters |
//! | [`retry`] | Outcome classification and backoff |
//! | [`telemetry`] | Per-attempt events and hooks |
//! | [`throttling`] | Minimum-interval throttle |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cfbstat_core::{fetch_games, Client};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::from_env()?; // CFBD_API_KEY
//!     let games = fetch_games(&client, 2024, Some(1))?;
//!
//!     for game in &games {
//!         println!("{:?} vs {:?}", game.home_team, game.away_team);
//!     }
//!     println!("{:?}", client.get_metrics());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ fetch_* / User  │
//! └────────┬────────┘
//!          │ endpoint + params
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Client Core    │────▶│ Throttle (Clock) │
//! │                 │────▶│ Retry Policy     │
//! │                 │────▶│ Metrics/Telemetry│
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ HTTP Client     │
//! │ (reqwest)       │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use cfbstat_core::{ApiError, ErrorKind};
//!
//! fn handle_error(error: ApiError) {
//!     match error.kind() {
//!         ErrorKind::RateLimited => {
//!             // Budget exhausted even after the built-in waits
//!         }
//!         ErrorKind::Client => {
//!             // Bad parameters or credentials; retrying will not help
//!         }
//!         _ => {}
//!     }
//! }
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod datasets;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod metrics;
pub mod retry;
pub mod telemetry;
pub mod throttling;

pub use client::{Client, ClientBuilder};
pub use clock::{Clock, ManualClock, SleepReason, SystemClock};
pub use config::{ClientConfig, Host, API_KEY_ENV};
pub use datasets::{
    fetch_games, fetch_lines, fetch_media, fetch_predicted_points, fetch_ratings,
    fetch_recruiting, fetch_weather, normalize_games, normalize_lines, normalize_media,
    normalize_predicted_points, normalize_ratings, normalize_recruiting, normalize_weather,
    Dataset,
};
pub use domain::{
    team_slug, GameRecord, LineRecord, MediaRecord, PredictedPointsRecord, RatingRecord, Record,
    RecruitingRecord, UtcDateTime, WeatherRecord,
};
pub use error::{ApiError, ConfigError, ErrorKind};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use metrics::{Metrics, MetricsSnapshot};
pub use retry::{Backoff, Outcome, RetryDecision, RetryPolicy};
pub use telemetry::{RequestAttempt, TelemetryHook, TracingTelemetry};
pub use throttling::{Throttle, DEFAULT_MIN_INTERVAL};
