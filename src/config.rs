//! Run configuration for both stages, built once at startup from the
//! environment and passed down explicitly.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::{BranchId, CardTypeCode, EmailMapping, BRANCH_IDS, CARD_TYPE_CODES};

/// Login page of the sales portal
pub const DEFAULT_PORTAL_URL: &str = "http://drogcidade.ddns.net:4647/sgfpod1/Login.pod";

/// Text the portal renders into the PDF when the filters match nothing
pub const DEFAULT_EMPTY_REPORT_SENTINEL: &str =
    "Nenhum relatório encontrado para os filtros selecionados";

pub const DEFAULT_EMAIL_SUBJECT: &str = "Relatório POS";

/// Report Fetcher configuration
#[derive(Clone, Debug)]
pub struct FetcherConfig {
    /// Portal credentials
    pub username: String,
    pub password: String,
    /// Login page URL
    pub portal_url: String,
    /// Where Chromium saves downloads and where artifacts are finalized
    pub download_dir: PathBuf,
    /// Where failure screenshots go
    pub screenshot_dir: PathBuf,
    /// Optional Chromium executable, auto-detected when absent
    pub chrome_executable: Option<PathBuf>,
    pub branch_ids: Vec<BranchId>,
    pub card_types: Vec<CardTypeCode>,
    /// Ceiling for an element to appear
    pub element_timeout: Duration,
    /// Ceiling for a report download to land
    pub download_timeout: Duration,
    /// Interval between ready-state checks
    pub poll_interval: Duration,
    /// Pause after UI actions that expose no observable ready state
    pub settle_delay: Duration,
}

/// Report Distributor configuration
#[derive(Clone, Debug)]
pub struct DistributorConfig {
    /// Sender address, also the delegated subject of the service account
    pub sender: String,
    /// Service account key JSON, as provided
    pub service_account_json: String,
    pub email_map: EmailMapping,
    /// Body template with a `{filial_key}` placeholder
    pub email_body: String,
    pub email_subject: String,
    pub report_dir: PathBuf,
    pub sentinel: String,
}

impl FetcherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes `std::env::var`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let download_dir = env
            .optional("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(current_dir);
        let screenshot_dir = env
            .optional("SCREENSHOT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| parent_or_self(&download_dir));

        Ok(Self {
            username: env.required("username")?,
            password: env.required("password")?,
            portal_url: env
                .optional("PORTAL_URL")
                .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string()),
            download_dir,
            screenshot_dir,
            chrome_executable: env.optional("CHROME_PATH").map(PathBuf::from),
            branch_ids: BRANCH_IDS.to_vec(),
            card_types: CARD_TYPE_CODES.to_vec(),
            element_timeout: Duration::from_secs(env.parsed("ELEMENT_TIMEOUT_SECS", 20)?),
            download_timeout: Duration::from_secs(env.parsed("DOWNLOAD_TIMEOUT_SECS", 30)?),
            poll_interval: Duration::from_millis(250),
            settle_delay: Duration::from_millis(500),
        })
    }
}

impl DistributorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let sender = env.required("GMAIL_SENDER")?;
        let service_account_json = env.required("GSA_CREDENTIALS")?;
        let email_map =
            EmailMapping::from_base64_json(&env.required("EMAIL_MAP_BASE64")?, "EMAIL_MAP_BASE64")?;
        let email_body = env.required("EMAIL_BODY")?;

        Ok(Self {
            sender,
            service_account_json,
            email_map,
            email_body,
            email_subject: env
                .optional("EMAIL_SUBJECT")
                .unwrap_or_else(|| DEFAULT_EMAIL_SUBJECT.to_string()),
            report_dir: env
                .optional("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(current_dir),
            sentinel: env
                .optional("EMPTY_REPORT_SENTINEL")
                .unwrap_or_else(|| DEFAULT_EMPTY_REPORT_SENTINEL.to_string()),
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Unset and empty are treated alike
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.optional(name).ok_or_else(|| ConfigError::missing(name))
    }

    fn parsed(&self, name: &str, default: u64) -> Result<u64, ConfigError> {
        match self.optional(name) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvVarParseFailed {
                    var_name: name.to_string(),
                    value,
                    expected_type: "u64".to_string(),
                }),
        }
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn parent_or_self(dir: &Path) -> PathBuf {
    dir.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.to_path_buf())
}
