use anyhow::Result;
use pos_report_relay::utils::logging;
use pos_report_relay::{ChromePortal, DateRange, FetcherConfig, ReportFetcher};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    logging::log_startup("Report fetch");

    // Setup errors are fatal before the browser starts
    let config = FetcherConfig::from_env()?;
    let range = DateRange::yesterday();

    let portal = ChromePortal::launch(&config).await?;
    let summary = ReportFetcher::new(portal, config).run(range).await?;

    logging::print_final_stats(
        "Report fetch",
        &[
            ("✅ Saved", summary.saved()),
            ("❌ Missing", summary.missing()),
        ],
    );
    Ok(())
}
