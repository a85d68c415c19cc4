//! The remote report form, seen as a sequence of scripted transitions.

pub mod chrome_portal;
pub mod selectors;

use std::path::Path;

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::models::{BranchId, DateRange};

pub use chrome_portal::ChromePortal;

/// Scripted operations on the sales portal.
///
/// Each call waits for the elements it needs to be present and fails with
/// [`BrowserError`] when they do not show up in time. No call verifies the
/// resulting UI state beyond that.
#[async_trait]
pub trait ReportPortal: Send {
    /// Sign in and wait for the landing page to finish loading
    async fn login(&mut self, username: &str, password: &str) -> Result<(), BrowserError>;

    /// Navigate from the landing page to the sales report form
    async fn open_report_form(&mut self) -> Result<(), BrowserError>;

    /// Add one card-type chip to the filter
    async fn add_card_type(&mut self, code: &str) -> Result<(), BrowserError>;

    /// Payment-method detail, date range, PDF output and branch filter
    async fn configure_report(
        &mut self,
        range: &DateRange,
        branch: BranchId,
    ) -> Result<(), BrowserError>;

    /// Trigger server-side generation; the PDF arrives as a download
    async fn run_report(&mut self) -> Result<(), BrowserError>;

    /// Reset every filter via the form's clear control
    async fn clear_filters(&mut self) -> Result<(), BrowserError>;

    /// Save the current viewport for diagnosis
    async fn capture_screenshot(&mut self, path: &Path) -> Result<(), BrowserError>;

    /// Release the automation session. Must be safe to call after failures.
    async fn shutdown(&mut self);
}
