//! Mock implementations for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::observability::HttpLogger;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        Self::raw(200, body).with_header("content-type", "application/json")
    }

    /// Creates a response with an arbitrary status and body.
    pub fn raw(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

/// Mock HTTP transport replaying queued outcomes and recording requests.
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Result<MockResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Makes every call take at least `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.outcomes).push_back(Ok(response));
    }

    /// Queues a transport failure.
    pub fn queue_failure(&self, error: TransportError) {
        lock(&self.outcomes).push_back(Err(error));
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = lock(&self.outcomes).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection {
                message: "No mock response configured".to_string(),
            })
        });

        outcome.map(|response| HttpResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }
}

/// An event captured by [`RecordingLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggedEvent {
    /// A request line.
    Request {
        /// HTTP method.
        method: String,
        /// Request URL.
        url: String,
    },
    /// A successful round trip.
    Response {
        /// HTTP method.
        method: String,
        /// Status code.
        status: u16,
        /// Whole milliseconds spent in the wrapped call.
        duration_ms: u128,
        /// Request URL.
        url: String,
        /// Referer header, empty when absent.
        referer: String,
    },
    /// A failed round trip.
    Failure {
        /// Error text.
        error: String,
    },
}

/// Logger keeping every event in memory.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<LoggedEvent>>,
}

impl RecordingLogger {
    /// Creates an empty recording logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    pub fn events(&self) -> Vec<LoggedEvent> {
        lock(&self.events).clone()
    }
}

impl HttpLogger for RecordingLogger {
    fn log_request(&self, request: &HttpRequest) {
        lock(&self.events).push(LoggedEvent::Request {
            method: request.method.to_string(),
            url: request.url.clone(),
        });
    }

    fn log_response(
        &self,
        request: &HttpRequest,
        outcome: Result<&HttpResponse, &TransportError>,
        duration: Duration,
    ) {
        let event = match outcome {
            Ok(response) => LoggedEvent::Response {
                method: request.method.to_string(),
                status: response.status,
                duration_ms: duration.as_millis(),
                url: request.url.clone(),
                referer: request.referer().to_string(),
            },
            Err(err) => LoggedEvent::Failure {
                error: err.to_string(),
            },
        };
        lock(&self.events).push(event);
    }
}

/// Cloneable in-memory writer for capturing dumps.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.inner)).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        lock(&self.inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
