//! HTTP request/response logging.

use std::time::Duration;

use crate::transport::{HttpRequest, HttpResponse, TransportError};

/// Prefix of every console log line.
const CONSOLE_PREFIX: &str = "✪";

/// Logging capability used by [`LoggedTransport`](crate::transport::LoggedTransport).
///
/// Implementations decide where the lines go; the decorator only reports
/// what happened.
pub trait HttpLogger: Send + Sync {
    /// Called before the request is handed to the wrapped transport.
    fn log_request(&self, request: &HttpRequest);

    /// Called after the wrapped transport returned.
    ///
    /// `duration` covers only the wrapped call.
    fn log_response(
        &self,
        request: &HttpRequest,
        outcome: Result<&HttpResponse, &TransportError>,
        duration: Duration,
    );
}

/// Formats the line emitted before a request.
pub fn request_line(request: &HttpRequest) -> String {
    format!("▶ {} {}", request.method, request.url)
}

/// Formats the line emitted after a round trip.
///
/// A failed round trip is reported by its error alone. Durations are
/// truncated to whole milliseconds.
pub fn response_line(
    request: &HttpRequest,
    outcome: Result<&HttpResponse, &TransportError>,
    duration: Duration,
) -> String {
    match outcome {
        Ok(response) => format!(
            "◀ method={} status={} durationMs={} {}, {}",
            request.method,
            response.status,
            duration.as_millis(),
            request.url,
            request.referer()
        ),
        Err(err) => err.to_string(),
    }
}

/// Logger writing timestamped lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleHttpLogger;

impl ConsoleHttpLogger {
    /// Creates a new console logger.
    pub fn new() -> Self {
        Self
    }

    fn emit(line: &str) {
        eprintln!(
            "{}{} {}",
            CONSOLE_PREFIX,
            chrono::Local::now().format("%Y/%m/%d %H:%M:%S"),
            line
        );
    }
}

impl HttpLogger for ConsoleHttpLogger {
    fn log_request(&self, request: &HttpRequest) {
        Self::emit(&request_line(request));
    }

    fn log_response(
        &self,
        request: &HttpRequest,
        outcome: Result<&HttpResponse, &TransportError>,
        duration: Duration,
    ) {
        Self::emit(&response_line(request, outcome, duration));
    }
}

/// Logger emitting structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHttpLogger;

impl TracingHttpLogger {
    /// Creates a new tracing logger.
    pub fn new() -> Self {
        Self
    }
}

impl HttpLogger for TracingHttpLogger {
    fn log_request(&self, request: &HttpRequest) {
        tracing::info!(
            method = %request.method,
            url = %request.url,
            "sending request"
        );
    }

    fn log_response(
        &self,
        request: &HttpRequest,
        outcome: Result<&HttpResponse, &TransportError>,
        duration: Duration,
    ) {
        match outcome {
            Ok(response) => tracing::info!(
                method = %request.method,
                status = response.status,
                duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                url = %request.url,
                referer = %request.referer(),
                "received response"
            ),
            Err(err) => tracing::warn!(error = %err, "request failed"),
        }
    }
}
