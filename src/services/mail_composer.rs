//! Mail composition - capability layer
//!
//! Builds the RFC-5322 message for one report and encodes it the way the
//! mail API expects it.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;

use crate::error::MailError;

/// Placeholder substituted in the body template
pub const BRANCH_KEY_PLACEHOLDER: &str = "{filial_key}";

/// Everything that goes into one report email
#[derive(Debug, Clone)]
pub struct ReportEmail<'a> {
    pub sender: &'a str,
    pub recipient: &'a str,
    pub subject: &'a str,
    pub body: String,
    pub attachment_name: &'a str,
    pub attachment: Vec<u8>,
}

/// Fill the body template for a branch key. `{{` and `}}` are literal braces.
pub fn render_body(template: &str, branch_key: &str) -> String {
    let mut body = String::with_capacity(template.len() + branch_key.len());
    let mut rest = template;
    while let Some(pos) = rest.find(|c| c == '{' || c == '}') {
        body.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let consumed = if tail.starts_with("{{") {
            body.push('{');
            2
        } else if tail.starts_with("}}") {
            body.push('}');
            2
        } else if tail.starts_with(BRANCH_KEY_PLACEHOLDER) {
            body.push_str(branch_key);
            BRANCH_KEY_PLACEHOLDER.len()
        } else {
            body.push_str(&tail[..1]);
            1
        };
        rest = &tail[consumed..];
    }
    body.push_str(rest);
    body
}

impl ReportEmail<'_> {
    /// Serialize to RFC-5322 bytes
    pub fn to_rfc5322(&self) -> Result<Vec<u8>, MailError> {
        let from: Mailbox = parse_mailbox(self.sender)?;
        let to: Mailbox = parse_mailbox(self.recipient)?;
        let pdf = ContentType::parse("application/pdf").map_err(compose_error)?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(self.body.clone()))
                    .singlepart(
                        Attachment::new(self.attachment_name.to_string())
                            .body(self.attachment.clone(), pdf),
                    ),
            )
            .map_err(compose_error)?;

        Ok(message.formatted())
    }
}

/// base64url transport encoding of a raw message
pub fn encode_raw(message: &[u8]) -> String {
    URL_SAFE.encode(message)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e| MailError::ComposeFailed {
        reason: format!("invalid address '{}': {}", address, e),
    })
}

fn compose_error(e: impl std::fmt::Display) -> MailError {
    MailError::ComposeFailed {
        reason: e.to_string(),
    }
}
