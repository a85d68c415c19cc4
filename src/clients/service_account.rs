//! Google service account key and the signed JWT assertion built from it.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::MailError;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime requested for the assertion; Google caps it at one hour
const ASSERTION_TTL_SECS: i64 = 3600;

/// The fields of a service account key file this crate needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    /// Impersonated user (domain-wide delegation)
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl ServiceAccountKey {
    /// Parse the key JSON as handed over in the environment
    pub fn from_json(json: &str) -> Result<Self, MailError> {
        serde_json::from_str(json).map_err(|e| MailError::InvalidKey {
            reason: e.to_string(),
        })
    }

    /// RS256-signed assertion for `scope`, acting as `subject`
    pub fn signed_assertion(&self, subject: &str, scope: &str) -> Result<String, MailError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            sub: subject.to_string(),
            scope: scope.to_string(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            MailError::InvalidKey {
                reason: e.to_string(),
            }
        })?;

        encode(&header, &claims, &key).map_err(|e| MailError::InvalidKey {
            reason: e.to_string(),
        })
    }
}
