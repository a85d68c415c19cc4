use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::browser::{launch_headless_browser, BrowserSession};
use crate::config::FetcherConfig;
use crate::error::BrowserError;
use crate::infrastructure::PageDriver;
use crate::models::{BranchId, DateRange};
use crate::portal::selectors as sel;
use crate::portal::ReportPortal;

/// [`ReportPortal`] backed by a headless Chromium session
pub struct ChromePortal {
    session: Option<BrowserSession>,
    driver: PageDriver,
    portal_url: String,
    element_timeout: Duration,
    settle_delay: Duration,
}

impl ChromePortal {
    /// Launch the browser; the portal is not contacted until `login`
    pub async fn launch(config: &FetcherConfig) -> Result<Self, BrowserError> {
        let session = launch_headless_browser(
            config.chrome_executable.as_deref(),
            &config.download_dir,
            &config.portal_url,
        )
        .await?;
        let driver = PageDriver::new(session.page.clone(), config.poll_interval);

        Ok(Self {
            session: Some(session),
            driver,
            portal_url: config.portal_url.clone(),
            element_timeout: config.element_timeout,
            settle_delay: config.settle_delay,
        })
    }

    /// Pause for UI changes the portal gives no signal for
    async fn settle(&self) {
        sleep(self.settle_delay).await;
    }
}

#[async_trait]
impl ReportPortal for ChromePortal {
    async fn login(&mut self, username: &str, password: &str) -> Result<(), BrowserError> {
        let timeout = self.element_timeout;
        info!("🔐 Logging in at {}", self.portal_url);
        self.driver.goto(&self.portal_url).await?;

        self.driver.type_into(sel::LOGIN_USER, username, timeout).await?;
        self.driver.type_into(sel::LOGIN_PASSWORD, password, timeout).await?;
        self.driver.click(sel::LOGIN_SUBMIT, timeout).await?;

        self.driver.wait_until_ready(timeout).await?;
        // The side menu only renders once the session is accepted
        self.driver.wait_for(sel::MENU_SEARCH, timeout).await?;
        info!("✓ Logged in");
        Ok(())
    }

    async fn open_report_form(&mut self) -> Result<(), BrowserError> {
        let timeout = self.element_timeout;
        self.driver
            .type_into(sel::MENU_SEARCH, sel::MENU_SEARCH_TEXT, timeout)
            .await?;
        self.driver.click(sel::MENU_SEARCH, timeout).await?;
        self.driver.click(sel::MENU_SALES_REPORT, timeout).await?;

        self.driver.wait_until_ready(timeout).await?;
        self.driver.wait_for(sel::CARD_TYPE_INPUT, timeout).await?;
        info!("✓ Report form open");
        Ok(())
    }

    async fn add_card_type(&mut self, code: &str) -> Result<(), BrowserError> {
        debug!("card type filter: {}", code);
        self.driver
            .type_and_submit(sel::CARD_TYPE_INPUT, code, self.element_timeout)
            .await?;
        self.settle().await;
        Ok(())
    }

    async fn configure_report(
        &mut self,
        range: &DateRange,
        branch: BranchId,
    ) -> Result<(), BrowserError> {
        let timeout = self.element_timeout;

        self.driver.click(sel::TAB_OPTIONS, timeout).await?;
        self.settle().await;
        self.driver.click(sel::PAYMENT_METHOD_TOGGLE, timeout).await?;

        self.driver
            .type_into(sel::DATE_START, &range.start_text(), timeout)
            .await?;
        self.driver
            .type_into(sel::DATE_END, &range.end_text(), timeout)
            .await?;
        self.driver.click(sel::OUTPUT_PDF, timeout).await?;

        self.driver.click(sel::TAB_FILTERS, timeout).await?;
        self.settle().await;
        self.driver.clear(sel::BRANCH_INPUT, timeout).await?;
        self.driver
            .type_and_submit(sel::BRANCH_INPUT, &branch.to_string(), timeout)
            .await?;
        self.settle().await;
        Ok(())
    }

    async fn run_report(&mut self) -> Result<(), BrowserError> {
        self.driver.click(sel::RUN_REPORT, self.element_timeout).await
    }

    async fn clear_filters(&mut self) -> Result<(), BrowserError> {
        self.driver.click(sel::CLEAR_FORM, self.element_timeout).await?;
        // The form is usable again once the card filter input is back
        self.driver
            .wait_for(sel::CARD_TYPE_INPUT, self.element_timeout)
            .await?;
        self.settle().await;
        Ok(())
    }

    async fn capture_screenshot(&mut self, path: &Path) -> Result<(), BrowserError> {
        self.driver.screenshot(path).await
    }

    async fn shutdown(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
    }
}
