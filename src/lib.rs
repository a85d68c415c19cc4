//! # POS report relay
//!
//! Two batch stages sharing one directory of PDF reports:
//!
//! - **fetch** (`fetch_reports`): signs into the sales portal with a headless
//!   browser, runs the "Relação de Vendas" report once per branch and saves
//!   each download as `filial<ID>.pdf`.
//! - **send** (`send_reports`): deletes the reports the portal rendered
//!   empty and mails the rest to the branch recipients.
//!
//! ## Layers
//!
//! ```text
//! workflow      ReportFetcher / ReportDistributor
//!     ↓
//! portal        ReportPortal (ChromePortal)      clients   MailSender (GmailClient)
//!     ↓                                          services  download watcher / pdf / mail
//! infrastructure  PageDriver
//!     ↓
//! browser       headless Chromium session
//! ```

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod portal;
pub mod services;
pub mod utils;
pub mod workflow;

pub use config::{DistributorConfig, FetcherConfig};
pub use error::{AppError, AppResult};
pub use models::{BranchId, DateRange, EmailMapping};
pub use portal::{ChromePortal, ReportPortal};
pub use workflow::{DistributionSummary, FetchOutcome, FetchSummary, ReportDistributor, ReportFetcher};
