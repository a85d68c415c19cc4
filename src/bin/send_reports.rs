use anyhow::{Context, Result};
use pos_report_relay::clients::{GmailClient, ServiceAccountKey};
use pos_report_relay::services::PdfOxideExtractor;
use pos_report_relay::utils::logging;
use pos_report_relay::{DistributorConfig, ReportDistributor};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    logging::log_startup("Report delivery");

    let config = DistributorConfig::from_env()?;
    let key = ServiceAccountKey::from_json(&config.service_account_json)?;
    let mailer = GmailClient::authorize(&key, &config.sender)
        .await
        .context("mail API authorization failed")?;

    let summary = ReportDistributor::new(config, mailer, PdfOxideExtractor)
        .run()
        .await?;

    logging::print_final_stats(
        "Report delivery",
        &[
            ("🗑️ Deleted (empty)", summary.deleted.len()),
            ("📧 Sent", summary.sent.len()),
            ("⚠️ Unmapped", summary.unmapped.len()),
            ("⚠️ Unreadable", summary.unreadable.len()),
            ("❌ Failed", summary.failed.len()),
        ],
    );
    Ok(())
}
