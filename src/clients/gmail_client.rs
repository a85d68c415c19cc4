//! Gmail API client
//!
//! Authorizes a service account with domain-wide delegation and sends raw
//! messages on behalf of the delegated sender.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::clients::service_account::ServiceAccountKey;
use crate::error::MailError;
use crate::services::encode_raw;

pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";
pub const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

/// Anything able to deliver a finished RFC-5322 message
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send the message and return the provider's message id
    async fn send(&self, raw_message: &[u8]) -> Result<String, MailError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Authorized Gmail client
pub struct GmailClient {
    http: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl GmailClient {
    /// Exchange a signed assertion for an access token acting as `sender`
    pub async fn authorize(key: &ServiceAccountKey, sender: &str) -> Result<Self, MailError> {
        Self::authorize_with_base(key, sender, GMAIL_API_BASE).await
    }

    /// Same as [`GmailClient::authorize`] against another API host
    pub async fn authorize_with_base(
        key: &ServiceAccountKey,
        sender: &str,
        api_base: &str,
    ) -> Result<Self, MailError> {
        let http = reqwest::Client::new();
        let assertion = key.signed_assertion(sender, GMAIL_SEND_SCOPE)?;

        debug!("requesting access token from {}", key.token_uri);
        let response = http
            .post(&key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MailError::request_failed(&key.token_uri, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::TokenExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| MailError::request_failed(&key.token_uri, e))?;
        info!(
            "✓ Mail API authorized as {} (token valid {:?}s)",
            sender, token.expires_in
        );

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: token.access_token,
        })
    }

    fn send_endpoint(&self) -> String {
        format!("{}/gmail/v1/users/me/messages/send", self.api_base)
    }
}

#[async_trait]
impl MailSender for GmailClient {
    async fn send(&self, raw_message: &[u8]) -> Result<String, MailError> {
        let endpoint = self.send_endpoint();
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.access_token)
            .json(&json!({ "raw": encode_raw(raw_message) }))
            .send()
            .await
            .map_err(|e| MailError::request_failed(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::BadResponse {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| MailError::request_failed(&endpoint, e))?;
        Ok(sent.id)
    }
}
