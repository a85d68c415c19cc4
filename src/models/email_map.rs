//! Branch key → recipient mapping, shipped as base64-encoded JSON.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;

use crate::error::ConfigError;

/// Static recipient lookup, read-only for the run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailMapping {
    recipients: HashMap<String, String>,
}

impl EmailMapping {
    pub fn new(recipients: HashMap<String, String>) -> Self {
        Self { recipients }
    }

    /// Decode `base64(json object)`; `var_name` is only used in errors
    pub fn from_base64_json(encoded: &str, var_name: &str) -> Result<Self, ConfigError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ConfigError::decode(var_name, e))?;
        let json = String::from_utf8(bytes).map_err(|e| ConfigError::decode(var_name, e))?;
        let recipients: HashMap<String, String> =
            serde_json::from_str(&json).map_err(|e| ConfigError::decode(var_name, e))?;
        Ok(Self { recipients })
    }

    pub fn recipient(&self, branch_key: &str) -> Option<&str> {
        self.recipients.get(branch_key).map(String::as_str)
    }
}
