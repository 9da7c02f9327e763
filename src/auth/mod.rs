//! Authentication module for the Mailgun client.
//!
//! Mailgun authenticates with HTTP Basic auth: a fixed username and the
//! API key as password.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::config::API_USER;
use crate::errors::MailgunError;

/// Authentication provider trait.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Validate the credentials.
    fn validate(&self) -> Result<(), MailgunError>;
}

/// HTTP Basic authentication with the Mailgun API user.
pub struct BasicAuth {
    username: String,
    api_key: SecretString,
}

impl BasicAuth {
    /// Creates a provider for the fixed `api` user.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            username: API_USER.to_string(),
            api_key,
        }
    }

    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self::new(SecretString::new(api_key.into()))
    }

    fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.api_key.expose_secret());
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

impl AuthProvider for BasicAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert("Authorization".to_string(), self.header_value());
    }

    fn validate(&self) -> Result<(), MailgunError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(MailgunError::configuration("API key cannot be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
