//! Behaviour tests for the client core: host selection, configuration,
//! throttling, retries, metrics and telemetry.

mod support;

use std::time::Duration;

use cfbstat_core::{
    ApiError, Client, ConfigError, ErrorKind, Host, HttpError, HttpErrorKind, HttpResponse,
    MetricsSnapshot, Outcome, RetryPolicy, SleepReason, API_KEY_ENV,
};
use serde_json::json;
use support::{builder, client, manual_clock, EventLog, ScriptedHttpClient};

// =============================================================================
// Configuration and host selection
// =============================================================================

#[test]
fn when_host_is_selected_requests_go_to_its_base_url_only() {
    for host in Host::ALL {
        let http = ScriptedHttpClient::new();
        let clock = manual_clock();
        let client = builder(&http, &clock).host(host).build().expect("valid");

        client.request("/games", &[("year", String::from("2024"))]).expect("success");
        client.request("/ratings", &[]).expect("success");

        let urls = http.urls();
        assert_eq!(urls.len(), 2);
        for url in urls {
            assert!(url.starts_with(host.base_url()), "{url} not on {host}");
            for other in Host::ALL.into_iter().filter(|other| *other != host) {
                assert!(!url.starts_with(&format!("{}/", other.base_url())));
            }
        }
    }
}

#[test]
fn when_api_key_is_blank_construction_fails_without_network_calls() {
    let http = ScriptedHttpClient::new();
    let clock = manual_clock();

    let result = Client::builder()
        .api_key("")
        .http_client(http.clone())
        .clock(clock.clone())
        .build();

    assert!(matches!(result, Err(ConfigError::MissingApiKey { .. })));
    assert!(http.requests().is_empty());
}

#[test]
fn when_api_key_is_not_passed_it_is_read_from_the_environment() {
    // Only this test touches CFBD_API_KEY in this binary.
    let http = ScriptedHttpClient::new();
    let clock = manual_clock();
    let unkeyed = || {
        Client::builder()
            .http_client(http.clone())
            .clock(clock.clone())
            .build()
    };

    std::env::set_var(API_KEY_ENV, " env-key ");
    let client = unkeyed().expect("key comes from the environment");
    client.request("/games", &[]).expect("success");
    assert_eq!(
        http.requests()[0].headers.get("authorization").map(String::as_str),
        Some("Bearer env-key")
    );

    std::env::set_var(API_KEY_ENV, "   ");
    assert!(matches!(unkeyed(), Err(ConfigError::MissingApiKey { .. })));

    std::env::remove_var(API_KEY_ENV);
    assert!(matches!(unkeyed(), Err(ConfigError::MissingApiKey { .. })));
    assert_eq!(http.requests().len(), 1);
}

#[test]
fn when_retry_policy_has_no_attempts_construction_fails() {
    let http = ScriptedHttpClient::new();
    let clock = manual_clock();

    let result = builder(&http, &clock)
        .retry_policy(RetryPolicy::default().with_max_attempts(0))
        .build();

    assert!(matches!(result, Err(ConfigError::InvalidRetryPolicy { .. })));
}

#[test]
fn when_request_is_sent_it_carries_the_bearer_token() {
    let http = ScriptedHttpClient::new();
    let clock = manual_clock();
    let client = client(&http, &clock);

    client.request("/games", &[]).expect("success");

    let request = &http.requests()[0];
    assert_eq!(
        request.headers.get("authorization").map(String::as_str),
        Some("Bearer test-key")
    );
}

// =============================================================================
// Retry and backoff
// =============================================================================

#[test]
fn when_server_errors_precede_success_client_backs_off_exponentially() {
    let http = ScriptedHttpClient::with_statuses(&[500, 500, 200]);
    let clock = manual_clock();
    let client = client(&http, &clock);

    let body = client.request("/games", &[]).expect("third attempt succeeds");

    assert_eq!(body, json!([]));
    assert_eq!(http.requests().len(), 3);
    assert_eq!(
        client.get_metrics(),
        MetricsSnapshot {
            total_requests: 3,
            successful_requests: 1,
            server_errors: 2,
            rate_limited_requests: 0,
            client_errors: 0,
            network_errors: 0,
            retries: 2,
        }
    );
    assert_eq!(
        clock.sleeps_for(SleepReason::Backoff),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[test]
fn when_interval_exceeds_backoff_waits_are_still_told_apart() {
    let http = ScriptedHttpClient::with_statuses(&[500, 200]);
    let clock = manual_clock();
    let client = builder(&http, &clock)
        .min_interval(Duration::from_secs(5))
        .build()
        .expect("valid");

    client.request("/games", &[]).expect("second attempt succeeds");

    assert_eq!(
        clock.sleeps_for(SleepReason::Backoff),
        vec![Duration::from_secs(1)]
    );
    assert_eq!(
        clock.sleeps_for(SleepReason::Throttle),
        vec![Duration::from_secs(4)]
    );
}

#[test]
fn when_rate_limited_client_waits_one_minute_then_retries() {
    let http = ScriptedHttpClient::with_statuses(&[429, 200]);
    let clock = manual_clock();
    let client = client(&http, &clock);

    client.request("/lines", &[]).expect("second attempt succeeds");

    assert_eq!(http.requests().len(), 2);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(60)]);
    assert_eq!(client.get_metrics().rate_limited_requests, 1);
    assert_eq!(client.get_metrics().retries, 1);
}

#[test]
fn when_rate_limit_persists_caller_receives_rate_limit_error() {
    let http = ScriptedHttpClient::with_statuses(&[429, 429, 429]);
    let clock = manual_clock();
    let client = client(&http, &clock);

    let error = client.request("/lines", &[]).expect_err("budget exhausted");

    assert_eq!(
        error,
        ApiError::RateLimited {
            endpoint: String::from("/lines"),
            attempts: 3,
        }
    );
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(60), Duration::from_secs(60)]
    );
}

#[test]
fn when_client_error_occurs_it_is_not_retried() {
    let http = ScriptedHttpClient::with_statuses(&[404, 200]);
    let clock = manual_clock();
    let client = client(&http, &clock);

    let error = client.request("/game/media", &[]).expect_err("404 surfaces");

    assert_eq!(error.kind(), ErrorKind::Client);
    assert_eq!(error.status(), Some(404));
    assert!(!error.retryable());
    assert_eq!(http.requests().len(), 1);
    assert_eq!(client.get_metrics().retries, 0);
}

#[test]
fn when_network_fails_then_recovers_client_treats_it_like_server_error() {
    let http = ScriptedHttpClient::new();
    http.push(Err(HttpError::timeout("request timeout")));
    http.push_json(json!([{ "id": 1 }]));
    let clock = manual_clock();
    let client = client(&http, &clock);

    let body = client.request("/games", &[]).expect("recovers");

    assert_eq!(body, json!([{ "id": 1 }]));
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(1)]);
    assert_eq!(client.get_metrics().network_errors, 1);
}

// =============================================================================
// Throttling
// =============================================================================

#[test]
fn when_calls_arrive_too_quickly_throttle_sleeps_for_the_remainder() {
    let http = ScriptedHttpClient::new();
    let clock = manual_clock();
    let client = client(&http, &clock);

    client.request("/games", &[]).expect("first call");
    clock.advance(Duration::from_millis(50));
    client.request("/games", &[]).expect("second call");

    let sleeps = clock.sleeps();
    assert_eq!(sleeps.len(), 1);
    let slept = sleeps[0].as_secs_f64();
    assert!((slept - 0.12).abs() < 1e-9, "slept {slept}s");
}

#[test]
fn when_calls_are_spaced_out_throttle_does_not_sleep() {
    let http = ScriptedHttpClient::new();
    let clock = manual_clock();
    let client = client(&http, &clock);

    client.request("/games", &[]).expect("first call");
    clock.advance(Duration::from_millis(500));
    client.request("/games", &[]).expect("second call");

    assert!(clock.sleeps().is_empty());
}

#[test]
fn when_client_is_shared_across_threads_cadence_stays_serialized() {
    let http = ScriptedHttpClient::new();
    let clock = manual_clock();
    let client = client(&http, &clock);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let client = client.clone();
            scope.spawn(move || client.request("/games", &[]).expect("success"));
        }
    });

    assert_eq!(client.get_metrics().total_requests, 4);
    assert_eq!(clock.sleeps().len(), 3);
    assert!(clock
        .sleeps()
        .iter()
        .all(|sleep| *sleep == client.config().min_interval()));
}

// =============================================================================
// Telemetry
// =============================================================================

#[test]
fn when_single_call_succeeds_exactly_one_event_is_emitted() {
    let http = ScriptedHttpClient::new();
    let clock = manual_clock();
    let log = EventLog::default();
    let client = builder(&http, &clock).telemetry(log.hook()).build().expect("valid");

    client.request("/ratings", &[("year", String::from("2024"))]).expect("success");

    let events = log.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].endpoint, "/ratings");
    assert_eq!(events[0].outcome, Outcome::Success);
    assert_eq!(events[0].status, Some(200));
    assert_eq!(events[0].attempt, 1);
    assert_eq!(events[0].retry_in, None);
    assert_eq!(events[0].params, vec![(String::from("year"), String::from("2024"))]);
}

#[test]
fn when_attempts_are_retried_every_attempt_is_reported() {
    let http = ScriptedHttpClient::new();
    http.push(Err(HttpError::connect("connection reset")));
    http.push(Ok(HttpResponse::new(503, "")));
    http.push_json(json!([]));
    let clock = manual_clock();
    let log = EventLog::default();
    let client = builder(&http, &clock).telemetry(log.hook()).build().expect("valid");

    client.request("/games", &[]).expect("third attempt succeeds");

    let events = log.events();
    let outcomes = events.iter().map(|event| event.outcome).collect::<Vec<_>>();
    assert_eq!(
        outcomes,
        vec![Outcome::NetworkError, Outcome::ServerError, Outcome::Success]
    );
    assert_eq!(events[0].status, None);
    assert!(events[0].error.is_some());
    assert_eq!(events[0].error_kind, Some(HttpErrorKind::Connect));
    assert_eq!(events[1].status, Some(503));
    assert_eq!(events[1].error_kind, None);
    assert_eq!(events[0].retry_in, Some(Duration::from_secs(1)));
    assert_eq!(events[1].retry_in, Some(Duration::from_secs(2)));
    assert!(events.iter().all(|event| event.call_id == events[0].call_id));
    assert_eq!(
        events.iter().map(|event| event.attempt).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn when_client_error_occurs_telemetry_still_sees_the_attempt() {
    let http = ScriptedHttpClient::with_statuses(&[400]);
    let clock = manual_clock();
    let log = EventLog::default();
    let client = builder(&http, &clock).telemetry(log.hook()).build().expect("valid");

    let _ = client.request("/games", &[]);

    let events = log.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, Outcome::ClientError);
    assert_eq!(events[0].status, Some(400));
}
