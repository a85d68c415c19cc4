//! Report Distributor flow
//!
//! Two passes over the artifact directory:
//! 1. classify every `filial*.pdf`: empty ones are deleted
//! 2. mail every remaining one to its branch recipient

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::clients::MailSender;
use crate::config::DistributorConfig;
use crate::error::{AppResult, FileError};
use crate::models::{branch_key, is_distributable_file_name};
use crate::services::{classify, render_body, ReportEmail, ReportStatus, TextExtractor};
use crate::utils::logging::truncate_text;

/// Per-run tally, used for the closing log lines and by tests
#[derive(Debug, Default)]
pub struct DistributionSummary {
    /// Empty reports removed from disk
    pub deleted: Vec<String>,
    /// `(file name, message id)` of delivered reports
    pub sent: Vec<(String, String)>,
    /// Reports whose text could not be extracted; left on disk
    pub unreadable: Vec<String>,
    /// Reports without a recipient; left on disk
    pub unmapped: Vec<String>,
    /// Reports whose delivery failed; left on disk
    pub failed: Vec<String>,
}

/// Report Distributor
pub struct ReportDistributor<M, X> {
    config: DistributorConfig,
    mailer: M,
    extractor: X,
}

impl<M, X> ReportDistributor<M, X>
where
    M: MailSender,
    X: TextExtractor,
{
    pub fn new(config: DistributorConfig, mailer: M, extractor: X) -> Self {
        Self {
            config,
            mailer,
            extractor,
        }
    }

    pub async fn run(&self) -> Result<DistributionSummary> {
        let mut summary = DistributionSummary::default();

        let reports = self.list_reports().await?;
        info!(
            "📁 {} report file(s) in {}",
            reports.len(),
            self.config.report_dir.display()
        );

        let mut deliverable = Vec::new();
        for path in reports {
            let name = file_name(&path);
            match self.inspect(&path) {
                Ok(ReportStatus::Empty) => match fs::remove_file(&path).await {
                    Ok(()) => {
                        info!("🗑️ Deleted '{}': matched the empty report text", name);
                        summary.deleted.push(name);
                    }
                    Err(source) => {
                        let e = FileError::DeleteFailed {
                            path: path.display().to_string(),
                            source,
                        };
                        error!("❌ {}", e);
                        summary.failed.push(name);
                    }
                },
                Ok(ReportStatus::HasData) => {
                    info!("✓ Kept '{}': report content found", name);
                    deliverable.push(path);
                }
                Err(e) => {
                    error!("❌ Failed to read '{}': {}", name, e);
                    summary.unreadable.push(name);
                }
            }
        }

        for path in deliverable {
            let name = file_name(&path);
            let Some(key) = branch_key(&path) else {
                warn!("⚠️ No branch key in '{}'. Skipping.", name);
                summary.unmapped.push(name);
                continue;
            };
            let Some(recipient) = self.config.email_map.recipient(&key) else {
                warn!("⚠️ No email mapping found for {}. Skipping.", key);
                summary.unmapped.push(name);
                continue;
            };

            match self.deliver(&path, &name, &key, recipient).await {
                Ok(message_id) => {
                    info!(
                        "📧 Sent '{}' to {} (message ID: {})",
                        name, recipient, message_id
                    );
                    summary.sent.push((name, message_id));
                }
                Err(e) => {
                    error!("❌ Failed to send '{}' to {}: {}", name, recipient, e);
                    summary.failed.push(name);
                }
            }
        }

        Ok(summary)
    }

    /// Candidate reports in name order
    async fn list_reports(&self) -> AppResult<Vec<PathBuf>> {
        let dir = &self.config.report_dir;
        let read_failed = |source| FileError::ReadFailed {
            path: dir.display().to_string(),
            source,
        };
        let mut entries = fs::read_dir(dir).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FileError::DirectoryNotFound {
                    path: dir.display().to_string(),
                }
            } else {
                read_failed(e)
            }
        })?;

        let mut reports = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_failed)? {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_distributable_file_name(&name) {
                reports.push(entry.path());
            }
        }
        reports.sort();
        Ok(reports)
    }

    fn inspect(&self, path: &Path) -> AppResult<ReportStatus> {
        let text = self.extractor.extract_text(path)?;
        debug!("{}: {}", path.display(), truncate_text(text.trim(), 80));
        Ok(classify(&text, &self.config.sentinel))
    }

    async fn deliver(
        &self,
        path: &Path,
        name: &str,
        key: &str,
        recipient: &str,
    ) -> AppResult<String> {
        let attachment = fs::read(path).await.map_err(|source| FileError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let email = ReportEmail {
            sender: &self.config.sender,
            recipient,
            subject: &self.config.email_subject,
            body: render_body(&self.config.email_body, key),
            attachment_name: name,
            attachment,
        };
        let raw = email.to_rfc5322()?;
        let message_id = self.mailer.send(&raw).await?;
        Ok(message_id)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
