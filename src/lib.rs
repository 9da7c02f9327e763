//! Mailgun Client Library
//!
//! A minimal Rust client for sending transactional email through the
//! Mailgun HTTP API. A message is staged on the client and sent as a
//! form-encoded POST to `/v3/<domain>/messages`, authenticated with HTTP
//! Basic auth; the provider's JSON acknowledgment is returned.
//!
//! # Features
//!
//! - **Two modes**: a production client and a debug client that logs
//!   every round trip and dumps raw requests and responses
//! - **Pluggable transport**: any [`transport::HttpTransport`] can be
//!   wrapped by the logging decorator [`transport::LoggedTransport`]
//! - **Injectable logging**: [`observability::HttpLogger`] sinks for the
//!   console or `tracing`
//! - **No redirects**: 3xx answers are surfaced, never followed
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mailgun_client::MailgunClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = MailgunClient::debug("mg.example.com", "key-xxxxxxxx")?;
//!     client.create(
//!         "jane@example.com",
//!         "John <john@mg.example.com>",
//!         "Hello",
//!         "Testing some Mailgun awesomeness!",
//!     );
//!
//!     let ack = client.send().await?;
//!     println!("{}: {}", ack.id, ack.message);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{MailgunClient, MailgunClientBuilder};
pub use config::MailgunConfig;
pub use errors::{MailgunError, MailgunResult};
pub use types::{Acknowledgment, Message};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
