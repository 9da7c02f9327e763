//! Error types for the Mailgun client.
//!
//! Every failure of a send is reported with the stage it happened in:
//! building the request, performing the network call, reading the body,
//! or decoding the acknowledgment.

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for Mailgun operations.
pub type MailgunResult<T> = Result<T, MailgunError>;

/// Error type for Mailgun client operations.
#[derive(Debug, Error)]
pub enum MailgunError {
    /// Configuration error (missing domain, empty API key, bad base URL).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// The outgoing request could not be constructed.
    #[error("Error occurred while creating the mail request: {message}")]
    RequestBuild {
        /// Error message.
        message: String,
    },

    /// The network call failed (timeout, connection refused, DNS failure).
    #[error("Error occurred while performing the mail send: {source}")]
    Network {
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// The response body could not be fully read.
    #[error("Error occurred while reading mail body: {message}")]
    BodyRead {
        /// Error message.
        message: String,
    },

    /// The response body is not a valid acknowledgment.
    #[error("Error occurred while parsing response: {message}")]
    Parse {
        /// Error message.
        message: String,
    },

    /// The provider answered with a non-2xx status.
    #[error("Mailgun API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider message, or the canonical status reason.
        message: String,
    },
}

impl MailgunError {
    /// Returns true if the network call timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            MailgunError::Network {
                source: TransportError::Timeout { .. }
            }
        )
    }

    /// Returns the HTTP status code for API errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MailgunError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        MailgunError::Configuration {
            message: message.into(),
        }
    }
}

impl From<TransportError> for MailgunError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Request { message } => MailgunError::RequestBuild { message },
            TransportError::Body { message } => MailgunError::BodyRead { message },
            source => MailgunError::Network { source },
        }
    }
}

impl From<serde_json::Error> for MailgunError {
    fn from(err: serde_json::Error) -> Self {
        MailgunError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for MailgunError {
    fn from(err: url::ParseError) -> Self {
        MailgunError::RequestBuild {
            message: format!("Invalid URL: {}", err),
        }
    }
}

/// Error body returned by Mailgun on rejected requests.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// The error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_transport_errors_map_to_stages() {
        let err: MailgunError = TransportError::Request {
            message: "bad header".to_string(),
        }
        .into();
        assert!(matches!(err, MailgunError::RequestBuild { .. }));

        let err: MailgunError = TransportError::Body {
            message: "eof".to_string(),
        }
        .into();
        assert!(matches!(err, MailgunError::BodyRead { .. }));

        let err: MailgunError = TransportError::Connection {
            message: "refused".to_string(),
        }
        .into();
        assert!(matches!(err, MailgunError::Network { .. }));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_is_network_failure() {
        let err: MailgunError = TransportError::Timeout {
            timeout: Duration::from_secs(5),
        }
        .into();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("performing the mail send"));
    }

    #[test]
    fn test_status_code() {
        let err = MailgunError::Api {
            status: 401,
            message: "Forbidden".to_string(),
        };
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(MailgunError::configuration("x").status_code(), None);
    }

    #[test]
    fn test_json_error_is_parse_failure() {
        let err: MailgunError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, MailgunError::Parse { .. }));
    }
}
