//! Configuration module for the Mailgun client.
//!
//! Holds the sending domain, the API key, the endpoint and the
//! per-client debug switch.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{MailgunError, MailgunResult};

/// Default base URL for the Mailgun API.
pub const DEFAULT_BASE_URL: &str = "https://api.mailgun.net";

/// Default round-trip timeout (5 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Username used for HTTP Basic authentication.
pub const API_USER: &str = "api";

/// Configuration for the Mailgun client.
#[derive(Clone)]
pub struct MailgunConfig {
    /// Sending domain.
    pub domain: String,
    /// API key (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests, without a trailing slash.
    pub base_url: String,
    /// Round-trip timeout.
    pub timeout: Duration,
    /// Enables request logging and raw dumps for this client.
    pub debug: bool,
    /// Masks the `Authorization` header in raw dumps.
    pub redact_dumps: bool,
}

impl MailgunConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> MailgunConfigBuilder {
        MailgunConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MAILGUN_DOMAIN` (required): sending domain
    /// - `MAILGUN_API_KEY` (required): API key
    /// - `MAILGUN_BASE_URL` (optional): custom base URL
    /// - `MAILGUN_TIMEOUT` (optional): timeout in seconds
    /// - `MAILGUN_DEBUG` (optional): `1` or `true` enables debug mode
    pub fn from_env() -> MailgunResult<Self> {
        let domain = std::env::var("MAILGUN_DOMAIN").map_err(|_| {
            MailgunError::configuration("MAILGUN_DOMAIN environment variable not set")
        })?;
        let api_key = std::env::var("MAILGUN_API_KEY").map_err(|_| {
            MailgunError::configuration("MAILGUN_API_KEY environment variable not set")
        })?;

        let mut builder = MailgunConfigBuilder::new().domain(domain).api_key(api_key);

        if let Ok(base_url) = std::env::var("MAILGUN_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(timeout_str) = std::env::var("MAILGUN_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        if let Ok(debug) = std::env::var("MAILGUN_DEBUG") {
            builder = builder.debug(matches!(debug.as_str(), "1" | "true" | "TRUE"));
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        let key = self.api_key.expose_secret();
        if key.len() > 4 && key.is_char_boundary(key.len() - 4) {
            format!("...{}", &key[key.len() - 4..])
        } else {
            "****".to_string()
        }
    }

    /// Returns the messages endpoint for the configured domain.
    pub fn messages_url(&self) -> String {
        format!("{}/v3/{}/messages", self.base_url, self.domain)
    }
}

impl std::fmt::Debug for MailgunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunConfig")
            .field("domain", &self.domain)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Builder for `MailgunConfig`.
#[derive(Default)]
pub struct MailgunConfigBuilder {
    domain: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    debug: bool,
    redact_dumps: Option<bool>,
}

impl MailgunConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sending domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the round-trip timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables debug mode.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Controls masking of credentials in raw dumps.
    pub fn redact_dumps(mut self, redact: bool) -> Self {
        self.redact_dumps = Some(redact);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> MailgunResult<MailgunConfig> {
        let domain = self
            .domain
            .ok_or_else(|| MailgunError::configuration("Domain is required"))?;
        if domain.is_empty() {
            return Err(MailgunError::configuration("Domain cannot be empty"));
        }

        let api_key = self
            .api_key
            .ok_or_else(|| MailgunError::configuration("API key is required"))?;
        if api_key.is_empty() {
            return Err(MailgunError::configuration("API key cannot be empty"));
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = url::Url::parse(&base_url)
            .map_err(|e| MailgunError::configuration(format!("Invalid base URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MailgunError::configuration(
                "Base URL must use HTTP or HTTPS",
            ));
        }
        if parsed.scheme() == "http" {
            tracing::warn!(base_url = %base_url, "Base URL does not use HTTPS");
        }

        Ok(MailgunConfig {
            domain,
            api_key: SecretString::new(api_key),
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            debug: self.debug,
            redact_dumps: self.redact_dumps.unwrap_or(true),
        })
    }
}
