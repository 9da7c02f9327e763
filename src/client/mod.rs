//! Mailgun API client.
//!
//! Stages a message and sends it to the messages endpoint of the
//! configured domain in a single request/response round trip.

use bytes::Bytes;
use std::sync::Arc;

use crate::auth::{AuthProvider, BasicAuth};
use crate::config::{MailgunConfig, MailgunConfigBuilder};
use crate::errors::{ApiErrorResponse, MailgunError, MailgunResult};
use crate::observability::{ConsoleHttpLogger, HttpLogger, RequestDumper};
use crate::transport::{
    HttpRequest, HttpResponse, HttpTransport, LoggedTransport, ReqwestTransport,
};
use crate::types::{Acknowledgment, Message};

/// Content type of the messages endpoint body.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The Mailgun client.
///
/// # Example
///
/// ```rust,no_run
/// use mailgun_client::MailgunClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut client = MailgunClient::new("mg.example.com", "key-xxxxxxxx")?;
///     client.create("jane@example.com", "john@mg.example.com", "Hey", "Body");
///
///     let ack = client.send().await?;
///     println!("{} {}", ack.id, ack.message);
///     Ok(())
/// }
/// ```
pub struct MailgunClient {
    config: MailgunConfig,
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    dumper: Option<RequestDumper>,
    message: Message,
}

impl MailgunClient {
    /// Creates a new client builder.
    pub fn builder() -> MailgunClientBuilder {
        MailgunClientBuilder::new()
    }

    /// Creates a production client for `domain`.
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> MailgunResult<Self> {
        Self::builder().domain(domain).api_key(api_key).build()
    }

    /// Creates a debug client for `domain`.
    ///
    /// Every round trip is logged to stderr and dumped to stdout.
    pub fn debug(domain: impl Into<String>, api_key: impl Into<String>) -> MailgunResult<Self> {
        Self::builder()
            .domain(domain)
            .api_key(api_key)
            .debug(true)
            .build()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`MailgunConfig::from_env`].
    pub fn from_env() -> MailgunResult<Self> {
        let config = MailgunConfig::from_env()?;
        MailgunClientBuilder::from_config(config).build()
    }

    /// Stages the next message, replacing any previously staged one.
    pub fn create(
        &mut self,
        to: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.message = Message::new(to, from, subject, text);
    }

    /// Returns the staged message.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Sends the staged message.
    ///
    /// A client with nothing staged sends empty fields.
    pub async fn send(&self) -> MailgunResult<Acknowledgment> {
        self.send_message(&self.message).await
    }

    /// Sends `message` without touching the staged one.
    pub async fn send_message(&self, message: &Message) -> MailgunResult<Acknowledgment> {
        let request = self.build_request(message)?;

        if let Some(dumper) = &self.dumper {
            dumper.dump_request(&request);
        }

        let response = self.transport.send(&request).await?;

        if let Some(dumper) = &self.dumper {
            dumper.dump_response(&response);
        }

        Self::parse_response(&response)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MailgunConfig {
        &self.config
    }

    /// Returns true if this client logs and dumps its traffic.
    pub fn is_debug(&self) -> bool {
        self.config.debug
    }

    fn build_request(&self, message: &Message) -> MailgunResult<HttpRequest> {
        let domain = &self.config.domain;
        if domain.contains(['/', '?', '#']) || domain == "." || domain == ".." {
            return Err(MailgunError::RequestBuild {
                message: format!("Domain '{}' is not a valid path segment", domain),
            });
        }
        let url = url::Url::parse(&self.config.messages_url())?;

        let mut request = HttpRequest::post(url.as_str())
            .with_header("Content-Type", FORM_CONTENT_TYPE)
            .with_body(Bytes::from(message.to_form()));
        self.auth.apply_auth(&mut request.headers);

        Ok(request)
    }

    fn parse_response(response: &HttpResponse) -> MailgunResult<Acknowledgment> {
        if response.is_redirect() {
            let location = response.header("Location").unwrap_or("<none>");
            let message = format!("Redirect to {} not followed", location);
            tracing::debug!(status = response.status, %location, "Mailgun redirected message");
            return Err(MailgunError::Api {
                status: response.status,
                message,
            });
        }

        if !response.is_success() {
            let message = serde_json::from_slice::<ApiErrorResponse>(&response.body)
                .map(|e| e.message)
                .unwrap_or_else(|_| {
                    http::StatusCode::from_u16(response.status)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .unwrap_or("Unexpected status")
                        .to_string()
                });
            tracing::debug!(status = response.status, %message, "Mailgun rejected message");
            return Err(MailgunError::Api {
                status: response.status,
                message,
            });
        }

        let ack: Acknowledgment = serde_json::from_slice(&response.body)?;
        tracing::debug!(id = %ack.id, "message accepted");
        Ok(ack)
    }
}

impl std::fmt::Debug for MailgunClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunClient")
            .field("config", &self.config)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Builder for the Mailgun client.
pub struct MailgunClientBuilder {
    config_builder: MailgunConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    logger: Option<Arc<dyn HttpLogger>>,
    dump_sink: Option<Box<dyn std::io::Write + Send>>,
}

impl MailgunClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: MailgunConfigBuilder::new(),
            transport: None,
            logger: None,
            dump_sink: None,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: MailgunConfig) -> Self {
        let mut builder = Self::new();
        builder.config_builder = MailgunConfigBuilder::new()
            .domain(&config.domain)
            .api_key(config.api_key())
            .base_url(&config.base_url)
            .timeout(config.timeout)
            .debug(config.debug)
            .redact_dumps(config.redact_dumps);
        builder
    }

    /// Sets the sending domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.domain(domain);
        self
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the round-trip timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Enables or disables debug mode.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config_builder = self.config_builder.debug(debug);
        self
    }

    /// Controls masking of credentials in raw dumps.
    pub fn redact_dumps(mut self, redact: bool) -> Self {
        self.config_builder = self.config_builder.redact_dumps(redact);
        self
    }

    /// Sets a custom transport in place of the reqwest one.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the logger used in debug mode.
    pub fn logger(mut self, logger: Arc<dyn HttpLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Sets where debug dumps are written (stdout by default).
    pub fn dump_sink(mut self, sink: Box<dyn std::io::Write + Send>) -> Self {
        self.dump_sink = Some(sink);
        self
    }

    /// Builds the client.
    pub fn build(self) -> MailgunResult<MailgunClient> {
        let config = self.config_builder.build()?;

        let auth = BasicAuth::from_string(config.api_key());
        auth.validate()?;

        let mut transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.timeout)?),
        };

        let dumper = if config.debug {
            let logger: Arc<dyn HttpLogger> = match self.logger {
                Some(logger) => logger,
                None => Arc::new(ConsoleHttpLogger::new()),
            };
            transport = Arc::new(LoggedTransport::new(transport, logger));

            Some(match self.dump_sink {
                Some(sink) => RequestDumper::with_sink(sink, config.redact_dumps),
                None => RequestDumper::stdout(config.redact_dumps),
            })
        } else {
            None
        };

        tracing::debug!(
            domain = %config.domain,
            key_hint = %config.api_key_hint(),
            debug = config.debug,
            "created Mailgun client"
        );

        Ok(MailgunClient {
            config,
            transport,
            auth: Arc::new(auth),
            dumper,
            message: Message::default(),
        })
    }
}

impl Default for MailgunClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
