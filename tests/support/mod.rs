//! Deterministic fakes shared by the behaviour tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cfbstat_core::{
    Client, ClientBuilder, HttpClient, HttpError, HttpRequest, HttpResponse, ManualClock,
    RequestAttempt, UtcDateTime,
};

/// Transport that replays queued responses and records every request.
#[derive(Default)]
pub struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_statuses(statuses: &[u16]) -> Arc<Self> {
        let client = Self::new();
        for status in statuses {
            let body = if (200..300).contains(status) { "[]" } else { "{\"message\":\"error\"}" };
            client.push(Ok(HttpResponse::new(*status, body)));
        }
        client
    }

    pub fn push(&self, response: Result<HttpResponse, HttpError>) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(response);
    }

    pub fn push_json(&self, body: serde_json::Value) {
        self.push(Ok(HttpResponse::ok_json(body.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.url).collect()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().expect("requests lock").push(request);
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::ok_json("[]")))
    }
}

/// Telemetry sink collecting events for later assertions.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<RequestAttempt>>>,
}

impl EventLog {
    pub fn hook(&self) -> impl Fn(&RequestAttempt) + Send + Sync + 'static {
        let events = self.events.clone();
        move |event: &RequestAttempt| events.lock().expect("events lock").push(event.clone())
    }

    pub fn events(&self) -> Vec<RequestAttempt> {
        self.events.lock().expect("events lock").clone()
    }
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        UtcDateTime::parse("2024-09-01T00:00:00Z").expect("valid epoch"),
    ))
}

pub fn builder(http: &Arc<ScriptedHttpClient>, clock: &Arc<ManualClock>) -> ClientBuilder {
    Client::builder()
        .api_key("test-key")
        .http_client(http.clone())
        .clock(clock.clone())
}

pub fn client(http: &Arc<ScriptedHttpClient>, clock: &Arc<ManualClock>) -> Client {
    builder(http, clock).build().expect("valid config")
}
