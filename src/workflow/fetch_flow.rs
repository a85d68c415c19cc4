//! Report Fetcher flow
//!
//! One run:
//! 1. login → open the sales report form
//! 2. per branch: card-type filters → report options → run → wait for the
//!    download → rename (or screenshot) → clear
//! 3. release the browser, whatever happened

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{error, info, warn};

use crate::config::FetcherConfig;
use crate::models::{screenshot_file_name, BranchId, DateRange};
use crate::portal::ReportPortal;
use crate::services::DownloadWatcher;
use crate::utils::logging::log_item_start;

/// Result for a single branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Report saved as `filial<ID>.pdf`
    Saved { path: PathBuf, size: u64 },
    /// Nothing downloaded; screenshot path when one could be taken
    Missing { screenshot: Option<PathBuf> },
}

/// Per-run tally, used for the closing log lines
#[derive(Debug, Default)]
pub struct FetchSummary {
    pub outcomes: Vec<(BranchId, FetchOutcome)>,
}

impl FetchSummary {
    pub fn saved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FetchOutcome::Saved { .. }))
            .count()
    }

    pub fn missing(&self) -> usize {
        self.outcomes.len() - self.saved()
    }
}

/// Report Fetcher
///
/// Owns the portal session for the duration of the run.
pub struct ReportFetcher<P: ReportPortal> {
    portal: P,
    config: FetcherConfig,
    watcher: DownloadWatcher,
}

impl<P: ReportPortal> ReportFetcher<P> {
    pub fn new(portal: P, config: FetcherConfig) -> Self {
        let watcher = DownloadWatcher::new(config.download_dir.clone(), config.poll_interval);
        Self {
            portal,
            config,
            watcher,
        }
    }

    /// Fetch every configured branch for `range`. The portal session is shut
    /// down before returning, on success and on failure.
    pub async fn run(mut self, range: DateRange) -> Result<FetchSummary> {
        let result = self.fetch_all(range).await;
        self.portal.shutdown().await;
        result
    }

    async fn fetch_all(&mut self, range: DateRange) -> Result<FetchSummary> {
        fs::create_dir_all(&self.config.download_dir)
            .await
            .with_context(|| {
                format!(
                    "failed to create download dir {}",
                    self.config.download_dir.display()
                )
            })?;
        info!("📁 Download directory: {}", self.config.download_dir.display());
        info!("📅 Report period: {}", range);

        self.portal
            .login(&self.config.username, &self.config.password)
            .await
            .context("portal login failed")?;
        self.portal
            .open_report_form()
            .await
            .context("failed to open the sales report form")?;

        let mut summary = FetchSummary::default();
        let branches = self.config.branch_ids.clone();
        let total = branches.len();

        for (index, branch) in branches.into_iter().enumerate() {
            log_item_start(&format!("Branch {}", branch), index + 1, total);
            let outcome = self
                .fetch_branch(branch, &range)
                .await
                .with_context(|| format!("report run for branch {} failed", branch))?;
            summary.outcomes.push((branch, outcome));
        }

        Ok(summary)
    }

    async fn fetch_branch(&mut self, branch: BranchId, range: &DateRange) -> Result<FetchOutcome> {
        // Filters are rebuilt for every branch; the previous clear wiped them
        for code in &self.config.card_types {
            self.portal.add_card_type(code).await?;
        }
        self.portal.configure_report(range, branch).await?;

        // Anything already in the download dir belongs to an earlier run
        let baseline = self.watcher.baseline().await?;

        info!("Triggering report download...");
        self.portal.run_report().await?;
        info!("Download has started.");

        let outcome = match self
            .watcher
            .wait_for_download(&baseline, self.config.download_timeout)
            .await?
        {
            Some(downloaded) => {
                let (path, size) = self.watcher.finalize(&downloaded, branch).await?;
                info!(
                    "✓ File renamed to {}. Size: {} bytes",
                    path.file_name().unwrap_or_default().to_string_lossy(),
                    size
                );
                FetchOutcome::Saved { path, size }
            }
            None => {
                error!(
                    "❌ Download failed for branch {}: no PDF after {:?}",
                    branch, self.config.download_timeout
                );
                let screenshot = self.save_screenshot(branch).await;
                FetchOutcome::Missing { screenshot }
            }
        };

        info!("Clearing selection...");
        self.portal.clear_filters().await?;

        Ok(outcome)
    }

    async fn save_screenshot(&mut self, branch: BranchId) -> Option<PathBuf> {
        let path = self
            .config
            .screenshot_dir
            .join(screenshot_file_name(branch));

        if let Err(e) = fs::create_dir_all(&self.config.screenshot_dir).await {
            warn!(
                "⚠️ cannot create screenshot dir {}: {}",
                self.config.screenshot_dir.display(),
                e
            );
            return None;
        }

        match self.portal.capture_screenshot(&path).await {
            Ok(()) => {
                info!("📸 Screenshot saved to {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("⚠️ Screenshot failed for branch {}: {}", branch, e);
                None
            }
        }
    }
}
