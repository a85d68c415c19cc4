//! Page driver - infrastructure layer
//!
//! Holds the only Page handle and exposes presence-based waits and simple
//! element actions. Knows nothing about the report form.

use std::path::Path;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::BrowserError;

/// Page driver
///
/// - owns the Page
/// - every lookup is a poll with a ceiling, never a blind sleep
pub struct PageDriver {
    page: Page,
    poll_interval: Duration,
}

impl PageDriver {
    pub fn new(page: Page, poll_interval: Duration) -> Self {
        Self {
            page,
            poll_interval,
        }
    }

    pub async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;
        Ok(())
    }

    /// Run JavaScript and deserialize the result
    pub async fn eval_as<T: DeserializeOwned>(
        &self,
        js_code: impl Into<String>,
    ) -> Result<T, BrowserError> {
        let result = self.page.evaluate(js_code.into()).await?;
        result.into_value().map_err(|e| BrowserError::Cdp {
            source: Box::new(e),
        })
    }

    /// Poll until `selector` matches or `timeout` elapses
    pub async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<Element, BrowserError> {
        let started = Instant::now();
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                debug!("found {} after {:?}", selector, started.elapsed());
                return Ok(element);
            }
            if started.elapsed() >= timeout {
                return Err(BrowserError::ElementTimeout {
                    selector: selector.to_string(),
                    waited_ms: started.elapsed().as_millis(),
                });
            }
            sleep(self.poll_interval).await;
        }
    }

    /// Poll until `document.readyState` is `complete`
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<(), BrowserError> {
        let started = Instant::now();
        loop {
            let ready: bool = self
                .eval_as("document.readyState === 'complete'")
                .await
                .unwrap_or(false);
            if ready {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(BrowserError::PageNotReady {
                    waited_ms: started.elapsed().as_millis(),
                });
            }
            sleep(self.poll_interval).await;
        }
    }

    pub async fn click(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        self.wait_for(selector, timeout).await?.click().await?;
        Ok(())
    }

    pub async fn type_into(
        &self,
        selector: &str,
        text: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.wait_for(selector, timeout).await?.type_str(text).await?;
        Ok(())
    }

    /// Type `text` and press Enter, which is how the portal accepts a filter
    pub async fn type_and_submit(
        &self,
        selector: &str,
        text: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let element = self.wait_for(selector, timeout).await?;
        element.type_str(text).await?;
        element.press_key("Enter").await?;
        Ok(())
    }

    /// Empty an input's value before typing into it
    pub async fn clear(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        self.wait_for(selector, timeout)
            .await?
            .call_js_fn("function() { this.value = ''; }", false)
            .await?;
        Ok(())
    }

    /// Save a PNG of the visible viewport
    pub async fn screenshot(&self, path: &Path) -> Result<(), BrowserError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        self.page.save_screenshot(params, path).await?;
        Ok(())
    }
}
