//! HTTP transport implementation using reqwest.

use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::collections::HashMap;
use std::time::Duration;
use tracing::instrument;

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::errors::{MailgunError, MailgunResult};

/// Reqwest-based HTTP transport.
///
/// The underlying client never follows redirects: a 3xx answer is handed
/// back to the caller as an ordinary response.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a new transport with the given round-trip timeout.
    pub fn new(timeout: Duration) -> MailgunResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| {
                MailgunError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout })
    }

    /// Returns the configured round-trip timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_error(&self, err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout: self.timeout,
            }
        } else if err.is_builder() {
            TransportError::Request {
                message: err.to_string(),
            }
        } else {
            TransportError::Connection {
                message: err.to_string(),
            }
        }
    }

    fn extract_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|val| (k.as_str().to_string(), val.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method.into(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let built = builder.build().map_err(|e| TransportError::Request {
            message: e.to_string(),
        })?;

        let response = self
            .client
            .execute(built)
            .await
            .map_err(|e| self.map_error(&e))?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());

        // The response is consumed here; its connection is released whether
        // or not the read succeeds.
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    timeout: self.timeout,
                }
            } else {
                TransportError::Body {
                    message: e.to_string(),
                }
            }
        })?;

        tracing::debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
