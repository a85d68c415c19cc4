use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Browser session errors
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),
    /// Environment / payload configuration errors
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Filesystem errors
    #[error("file error: {0}")]
    File(#[from] FileError),
    /// PDF text extraction errors
    #[error("pdf error: {0}")]
    Pdf(#[from] PdfError),
    /// Mail API errors
    #[error("mail error: {0}")]
    Mail(#[from] MailError),
}

/// Browser related errors
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Launching Chromium failed
    #[error("failed to launch browser: {source}")]
    LaunchFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Browser configuration was rejected
    #[error("invalid browser configuration: {message}")]
    ConfigurationFailed { message: String },
    /// Navigation failed
    #[error("navigation to {url} failed: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Element did not show up before the ceiling
    #[error("element {selector} not present after {waited_ms} ms")]
    ElementTimeout { selector: String, waited_ms: u128 },
    /// Page never reached the ready state
    #[error("page not ready after {waited_ms} ms")]
    PageNotReady { waited_ms: u128 },
    /// Any CDP command failure
    #[error("cdp command failed: {source}")]
    Cdp {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Configuration errors, always fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty
    #[error("environment variable {var_name} not set")]
    EnvVarNotFound { var_name: String },
    /// Environment variable could not be parsed
    #[error("environment variable {var_name}: value '{value}' is not a valid {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// Encoded payload (base64 / JSON) could not be decoded
    #[error("failed to decode {var_name}: {reason}")]
    PayloadDecodeFailed { var_name: String, reason: String },
}

/// Filesystem errors
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to delete {path}: {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: String },
}

/// PDF text extraction errors
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to open {path}: {reason}")]
    OpenFailed { path: String, reason: String },
    #[error("failed to extract text from {path} page {page}: {reason}")]
    ExtractFailed {
        path: String,
        page: usize,
        reason: String,
    },
}

/// Mail API errors
#[derive(Debug, Error)]
pub enum MailError {
    /// Service account key is unusable
    #[error("invalid service account key: {reason}")]
    InvalidKey { reason: String },
    /// Token endpoint rejected the assertion
    #[error("token exchange failed ({status}): {body}")]
    TokenExchangeFailed { status: u16, body: String },
    /// Network level failure
    #[error("request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API returned a non-success status
    #[error("{endpoint} returned {status}: {body}")]
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Message could not be composed
    #[error("failed to compose message: {reason}")]
    ComposeFailed { reason: String },
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::Cdp {
            source: Box::new(err),
        }
    }
}

// ========== Convenience constructors ==========

impl ConfigError {
    pub fn missing(var_name: impl Into<String>) -> Self {
        ConfigError::EnvVarNotFound {
            var_name: var_name.into(),
        }
    }

    pub fn decode(var_name: impl Into<String>, reason: impl ToString) -> Self {
        ConfigError::PayloadDecodeFailed {
            var_name: var_name.into(),
            reason: reason.to_string(),
        }
    }
}

impl MailError {
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        MailError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
