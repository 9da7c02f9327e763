//! Logging decorator for HTTP transports.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::observability::HttpLogger;

/// Transport that logs every request/response pair of the transport it wraps.
///
/// The wrapped transport's result is returned untouched: errors stay
/// errors, responses are not modified, nothing is retried.
pub struct LoggedTransport {
    inner: Arc<dyn HttpTransport>,
    logger: Arc<dyn HttpLogger>,
}

impl LoggedTransport {
    /// Wraps `inner`, reporting each round trip to `logger`.
    pub fn new(inner: Arc<dyn HttpTransport>, logger: Arc<dyn HttpLogger>) -> Self {
        Self { inner, logger }
    }
}

#[async_trait]
impl HttpTransport for LoggedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.logger.log_request(request);

        let start = Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        self.logger.log_response(request, result.as_ref(), duration);

        result
    }
}

impl std::fmt::Debug for LoggedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggedTransport").finish_non_exhaustive()
    }
}
