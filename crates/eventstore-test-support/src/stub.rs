//! Scripted transports — canned `HttpTransport` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use eventstore_core::error::EventStoreError;
use eventstore_core::transport::{HttpRequest, HttpResponse, HttpTransport};

/// A transport that records every request and answers with scripted
/// responses. Queued responses are used first, in order; once the queue is
/// empty every request gets the fallback response.
#[derive(Debug)]
pub struct StubTransport {
    queued: Mutex<VecDeque<HttpResponse>>,
    fallback: HttpResponse,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    /// Create a stub that answers every request with `response`.
    #[must_use]
    pub fn new(response: HttpResponse) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback: response,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a stub answering with `status` and `reason` and an empty body.
    #[must_use]
    pub fn with_status(status: u16, reason: &str) -> Self {
        Self::new(HttpResponse::new(status, reason))
    }

    /// Create a stub answering `200 OK` with `feed` as the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if `feed` cannot be serialized.
    #[must_use]
    pub fn with_feed(feed: &serde_json::Value) -> Self {
        let body = serde_json::to_vec(feed).expect("feed must serialize");
        Self::new(HttpResponse::new(200, "OK").with_body(body))
    }

    /// Queue a response ahead of the fallback.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn then(self, response: HttpResponse) -> Self {
        self.queued.lock().unwrap().push_back(response);
        self
    }

    /// Returns a snapshot of all requests sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the most recent request.
    ///
    /// # Panics
    ///
    /// Panics if no request was sent or the internal mutex is poisoned.
    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, EventStoreError> {
        self.requests.lock().unwrap().push(request);
        let queued = self.queued.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| self.fallback.clone()))
    }
}

/// A transport whose requests never reach the store. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingTransport;

#[async_trait]
impl HttpTransport for FailingTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, EventStoreError> {
        Err(EventStoreError::transport("connection refused"))
    }
}
