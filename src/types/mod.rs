//! Message and acknowledgment types.

use serde::{Deserialize, Serialize};

/// Form field names of the messages endpoint.
pub mod fields {
    /// Recipient field.
    pub const TO: &str = "to";
    /// Sender field.
    pub const FROM: &str = "from";
    /// Subject field.
    pub const SUBJECT: &str = "subject";
    /// Plain-text body field.
    pub const TEXT: &str = "text";
}

/// An email message staged for sending.
///
/// Fields are forwarded as-is; no address validation is performed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Recipient address.
    pub to: String,
    /// Sender address.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
}

impl Message {
    /// Creates a message from its four fields.
    pub fn new(
        to: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            subject: subject.into(),
            text: text.into(),
        }
    }

    /// Encodes the message as an `application/x-www-form-urlencoded` body.
    pub fn to_form(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair(fields::TO, &self.to)
            .append_pair(fields::FROM, &self.from)
            .append_pair(fields::SUBJECT, &self.subject)
            .append_pair(fields::TEXT, &self.text)
            .finish()
    }
}

/// Acknowledgment returned by Mailgun for an accepted message.
///
/// Missing fields decode as empty strings; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgment {
    /// Provider message identifier.
    #[serde(default)]
    pub id: String,
    /// Human-readable status, e.g. `Queued. Thank you.`.
    #[serde(default)]
    pub message: String,
}
