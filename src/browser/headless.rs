use std::path::{Path, PathBuf};

use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::BrowserError;

/// A launched browser together with its event loop task
pub struct BrowserSession {
    pub browser: Browser,
    pub page: Page,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Close Chromium and stop the event loop. Errors are logged only; this
    /// runs on the way out of every run.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("closing browser failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("waiting for browser exit failed: {}", e);
        }
        self.handler_task.abort();
        info!("🧹 Browser session released");
    }
}

/// Launch headless Chromium with downloads routed to `download_dir`, and
/// open a blank page.
pub async fn launch_headless_browser(
    chrome_executable: Option<&Path>,
    download_dir: &Path,
    portal_url: &str,
) -> Result<BrowserSession, BrowserError> {
    info!("🚀 Launching headless browser...");
    debug!("download dir: {}", download_dir.display());

    let insecure_origin = format!("--unsafely-treat-insecure-origin-as-secure={}", portal_url);
    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .window_size(1920, 1080)
        .args(vec![
            "--no-sandbox",
            "--disable-gpu",
            "--disable-dev-shm-usage",
            "--disable-popup-blocking",
            "--force-device-scale-factor=1",
            insecure_origin.as_str(),
        ]);
    if let Some(path) = chrome_executable {
        builder = builder.chrome_executable(path);
    }

    let config = builder.build().map_err(|message| {
        error!("browser configuration rejected: {}", message);
        BrowserError::ConfigurationFailed { message }
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("failed to launch headless browser: {}", e);
        BrowserError::LaunchFailed {
            source: Box::new(e),
        }
    })?;
    debug!("headless browser launched");

    // Drive CDP events in the background
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    let download_path = absolute(download_dir);
    let params = SetDownloadBehaviorParams::builder()
        .behavior(SetDownloadBehaviorBehavior::Allow)
        .download_path(download_path.to_string_lossy().to_string())
        .build()
        .map_err(|message| BrowserError::ConfigurationFailed { message })?;
    browser.execute(params).await?;
    info!("📥 Downloads go to {}", download_path.display());

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("failed to create page: {}", e);
        BrowserError::from(e)
    })?;

    Ok(BrowserSession {
        browser,
        page,
        handler_task,
    })
}

fn absolute(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(dir))
            .unwrap_or_else(|_| dir.to_path_buf())
    }
}
