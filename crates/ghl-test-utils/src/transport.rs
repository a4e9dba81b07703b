//! [`MockTransport`] for dispatcher and server tests.
//!
//! Responses are scripted up front and handed out in order; every request
//! is recorded so tests can assert on paths, query pairs and bodies.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ghl_core::{ApiRequest, ApiResponse, Error, Result, Transport};
use serde_json::Value;

enum Scripted {
    Response(ApiResponse),
    Failure(String),
}

/// A transport that replays scripted responses.
///
/// # Example
///
/// ```rust,no_run
/// use ghl_test_utils::MockTransport;
/// use serde_json::json;
///
/// let mock = MockTransport::new()
///     .respond_json(200, json!({"contacts": []}))
///     .respond(404, "Not found");
/// assert!(mock.requests().is_empty());
/// ```
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a raw body.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Scripted::Response(ApiResponse::new(status, body)));
        self
    }

    /// Queue a response with a JSON body.
    pub fn respond_json(self, status: u16, body: Value) -> Self {
        self.respond(status, body.to_string())
    }

    /// Queue a transport failure (no response received).
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Scripted::Failure(message.into()));
        self
    }

    /// Wrap in an `Arc`, ready for `Dispatcher::new`.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .expect("MockTransport: request log poisoned")
            .clone()
    }

    /// The only request sent. Panics unless exactly one was sent.
    pub fn single_request(&self) -> ApiRequest {
        let requests = self.requests();
        assert_eq!(
            requests.len(),
            1,
            "expected exactly one request, got {:?}",
            requests
        );
        requests.into_iter().next().expect("length checked above")
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script
            .lock()
            .expect("MockTransport: script poisoned")
            .len()
    }

    fn push(&self, entry: Scripted) {
        self.script
            .lock()
            .expect("MockTransport: script poisoned")
            .push_back(entry);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests
            .lock()
            .expect("MockTransport: request log poisoned")
            .push(request.clone());

        let next = self
            .script
            .lock()
            .expect("MockTransport: script poisoned")
            .pop_front();

        match next {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Failure(message)) => Err(Error::Transport(message)),
            None => Err(Error::Transport(format!(
                "no scripted response for {} {}",
                request.method, request.path
            ))),
        }
    }
}
