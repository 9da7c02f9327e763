//! Sends one message through Mailgun.
//!
//! # Usage
//!
//! ```bash
//! export MAILGUN_DOMAIN="mg.example.com"
//! export MAILGUN_API_KEY="key-..."
//! export MAILGUN_DEBUG=1   # optional: log and dump the round trip
//! cargo run --example send -- jane@example.com "Hello" "Body text"
//! ```

use mailgun_client::observability::{init_tracing, LogFormat};
use mailgun_client::MailgunClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(LogFormat::Pretty)?;

    let mut args = std::env::args().skip(1);
    let to = args.next().ok_or("missing recipient")?;
    let subject = args.next().unwrap_or_else(|| "Hey".to_string());
    let text = args.next().unwrap_or_else(|| "Body".to_string());

    let mut client = MailgunClient::from_env()?;
    let from = format!("Mailgun Sandbox <postmaster@{}>", client.config().domain);
    client.create(to, from, subject, text);

    match client.send().await {
        Ok(ack) => println!("{} ({})", ack.message, ack.id),
        Err(e) => {
            eprintln!("send failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
