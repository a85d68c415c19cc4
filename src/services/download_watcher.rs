//! Download watcher - capability layer
//!
//! Finds the file a report run just downloaded and moves it to its
//! artifact name. A [`DownloadBaseline`] is taken right before the run is
//! triggered; only PDFs that are new or modified since then count, and
//! finalized `filial<ID>.pdf` artifacts are never candidates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tokio::fs;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::models::{artifact_file_name, is_artifact_file_name, BranchId};

/// Extension Chromium uses while a download is still being written
const PARTIAL_EXTENSION: &str = "crdownload";

/// Download-dir entries seen before a report run was triggered
#[derive(Debug, Default, Clone)]
pub struct DownloadBaseline {
    seen: HashMap<PathBuf, SystemTime>,
}

impl DownloadBaseline {
    /// True when `path` was absent from the baseline or has been touched since
    fn is_new(&self, path: &Path, mtime: SystemTime) -> bool {
        match self.seen.get(path) {
            Some(before) => mtime > *before,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Pdf,
    Partial,
}

pub struct DownloadWatcher {
    dir: PathBuf,
    poll_interval: Duration,
}

impl DownloadWatcher {
    pub fn new(dir: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            poll_interval,
        }
    }

    /// Record the current candidates; call right before triggering a run
    pub async fn baseline(&self) -> Result<DownloadBaseline> {
        let seen = self
            .entries()
            .await?
            .into_iter()
            .map(|(path, _, mtime)| (path, mtime))
            .collect();
        Ok(DownloadBaseline { seen })
    }

    /// Poll until a PDF that is not part of `baseline` has finished
    /// downloading, or give up after `timeout` and return `None`.
    pub async fn wait_for_download(
        &self,
        baseline: &DownloadBaseline,
        timeout: Duration,
    ) -> Result<Option<PathBuf>> {
        let started = Instant::now();
        loop {
            let scan = self.scan(baseline).await?;
            if let Some(latest) = scan.latest_pdf {
                if scan.partials == 0 {
                    debug!("download landed after {:?}: {}", started.elapsed(), latest.display());
                    return Ok(Some(latest));
                }
                debug!("{} download(s) still in progress", scan.partials);
            }
            if started.elapsed() >= timeout {
                return Ok(None);
            }
            sleep(self.poll_interval).await;
        }
    }

    /// Move `downloaded` to `filial<branch>.pdf`, replacing a stale one.
    /// Returns the artifact path and its size in bytes.
    pub async fn finalize(&self, downloaded: &Path, branch: BranchId) -> Result<(PathBuf, u64)> {
        let target = self.dir.join(artifact_file_name(branch));

        if fs::try_exists(&target).await.unwrap_or(false) {
            fs::remove_file(&target)
                .await
                .with_context(|| format!("failed to remove stale {}", target.display()))?;
        }

        if fs::rename(downloaded, &target).await.is_err() {
            // Cross-device moves cannot be renamed
            fs::copy(downloaded, &target).await.with_context(|| {
                format!("failed to move {} to {}", downloaded.display(), target.display())
            })?;
            if let Err(e) = fs::remove_file(downloaded).await {
                warn!(
                    "⚠️ Copied to {} but could not remove {}: {}",
                    target.display(),
                    downloaded.display(),
                    e
                );
            }
        }

        let size = fs::metadata(&target)
            .await
            .with_context(|| format!("failed to stat {}", target.display()))?
            .len();
        Ok((target, size))
    }

    async fn scan(&self, baseline: &DownloadBaseline) -> Result<DirScan> {
        let mut scan = DirScan::default();
        let mut latest_mtime = SystemTime::UNIX_EPOCH;

        for (path, kind, mtime) in self.entries().await? {
            if !baseline.is_new(&path, mtime) {
                continue;
            }
            match kind {
                EntryKind::Partial => scan.partials += 1,
                EntryKind::Pdf => {
                    if scan.latest_pdf.is_none() || mtime >= latest_mtime {
                        latest_mtime = mtime;
                        scan.latest_pdf = Some(path);
                    }
                }
            }
        }

        Ok(scan)
    }

    /// Candidate PDFs and in-progress downloads with their mtimes
    async fn entries(&self) -> Result<Vec<(PathBuf, EntryKind, SystemTime)>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("failed to read download dir {}", self.dir.display()))?;

        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .unwrap_or_default();

            let kind = if extension == PARTIAL_EXTENSION {
                EntryKind::Partial
            } else if extension == "pdf" && !is_artifact_file_name(&name) {
                EntryKind::Pdf
            } else {
                continue;
            };

            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let mtime = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            found.push((path, kind, mtime));
        }

        Ok(found)
    }
}

#[derive(Default)]
struct DirScan {
    latest_pdf: Option<PathBuf>,
    partials: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn touch(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(age_secs);
        file.set_modified(mtime).unwrap();
        path
    }

    fn watcher(dir: &Path) -> DownloadWatcher {
        DownloadWatcher::new(dir, Duration::from_millis(10))
    }

    async fn wait(dir: &Path, baseline: &DownloadBaseline, millis: u64) -> Option<PathBuf> {
        watcher(dir)
            .wait_for_download(baseline, Duration::from_millis(millis))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn picks_most_recently_modified_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let baseline = watcher(dir.path()).baseline().await.unwrap();
        touch(dir.path(), "RelacaoVendas(1).pdf", 60);
        let newest = touch(dir.path(), "RelacaoVendas(2).pdf", 1);
        touch(dir.path(), "notes.txt", 0);

        assert_eq!(wait(dir.path(), &baseline, 50).await, Some(newest));
    }

    #[tokio::test]
    async fn ignores_finalized_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let baseline = DownloadBaseline::default();
        touch(dir.path(), "filial1.pdf", 0);

        assert_eq!(wait(dir.path(), &baseline, 50).await, None);
    }

    #[tokio::test]
    async fn pdf_present_before_trigger_is_not_a_download() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "RelacaoVendas (old).pdf", 30);
        let baseline = watcher(dir.path()).baseline().await.unwrap();

        let late = dir.path().join("RelacaoVendas.pdf");
        let writer = {
            let late = late.clone();
            tokio::spawn(async move {
                sleep(Duration::from_millis(150)).await;
                std::fs::write(&late, b"%PDF-1.4").unwrap();
            })
        };

        let found = wait(dir.path(), &baseline, 2_000).await;
        writer.await.unwrap();
        assert_eq!(found, Some(late));
    }

    #[tokio::test]
    async fn only_stale_pdfs_means_no_download() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "RelacaoVendas.pdf", 30);
        let baseline = watcher(dir.path()).baseline().await.unwrap();

        assert_eq!(wait(dir.path(), &baseline, 50).await, None);
    }

    #[tokio::test]
    async fn overwritten_pdf_counts_as_new() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "RelacaoVendas.pdf", 30);
        let baseline = watcher(dir.path()).baseline().await.unwrap();
        let rewritten = touch(dir.path(), "RelacaoVendas.pdf", 0);

        assert_eq!(wait(dir.path(), &baseline, 50).await, Some(rewritten));
    }

    #[tokio::test]
    async fn waits_while_download_in_progress() {
        let dir = tempfile::tempdir().unwrap();
        let baseline = DownloadBaseline::default();
        touch(dir.path(), "RelacaoVendas.pdf", 0);
        touch(dir.path(), "Unconfirmed 1234.crdownload", 0);

        assert_eq!(wait(dir.path(), &baseline, 50).await, None);
    }

    #[tokio::test]
    async fn unrelated_tmp_and_old_partials_do_not_block() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Unconfirmed 99.crdownload", 30);
        let baseline = watcher(dir.path()).baseline().await.unwrap();
        touch(dir.path(), "session.tmp", 0);
        let report = touch(dir.path(), "RelacaoVendas.pdf", 0);

        assert_eq!(wait(dir.path(), &baseline, 50).await, Some(report));
    }

    #[tokio::test]
    async fn finalize_replaces_stale_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("filial4.pdf"), b"old").unwrap();
        let downloaded = dir.path().join("RelacaoVendas.pdf");
        std::fs::write(&downloaded, b"new report").unwrap();

        let (target, size) = watcher(dir.path()).finalize(&downloaded, 4).await.unwrap();

        assert_eq!(target, dir.path().join("filial4.pdf"));
        assert_eq!(size, 10);
        assert_eq!(std::fs::read(&target).unwrap(), b"new report");
        assert!(!downloaded.exists());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = tokio_test::block_on(
            watcher(Path::new("/nonexistent/rel_pos/downloads")).baseline(),
        );
        assert!(result.is_err());
    }
}
