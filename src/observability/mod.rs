//! Observability module for the Mailgun client.
//!
//! Provides the HTTP logging capability used by the transport decorator,
//! raw request/response dumps for debug clients, and a helper to install
//! a `tracing` subscriber.

mod dump;
mod logging;

pub use dump::{format_request, format_response, RequestDumper};
pub use logging::{
    request_line, response_line, ConsoleHttpLogger, HttpLogger, TracingHttpLogger,
};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::{MailgunError, MailgunResult};

/// Output format for [`init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Installs a global `tracing` subscriber writing to stderr.
///
/// The filter is read from `RUST_LOG` and defaults to `info`.
pub fn init_tracing(format: LogFormat) -> MailgunResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| {
        MailgunError::configuration(format!("Failed to install tracing subscriber: {}", e))
    })
}
