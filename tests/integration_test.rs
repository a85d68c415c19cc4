use pos_report_relay::clients::{GmailClient, ServiceAccountKey};
use pos_report_relay::utils::logging;
use pos_report_relay::{ChromePortal, DateRange, FetcherConfig, ReportFetcher, ReportPortal};
use pos_report_relay::DistributorConfig;

#[tokio::test]
#[ignore] // needs Chromium and portal credentials: cargo test -- --ignored
async fn test_portal_login_and_form() {
    logging::init();

    let config = FetcherConfig::from_env().expect("username/password not set");

    let mut portal = ChromePortal::launch(&config)
        .await
        .expect("failed to launch browser");

    let result = async {
        portal.login(&config.username, &config.password).await?;
        portal.open_report_form().await
    }
    .await;
    portal.shutdown().await;

    assert!(result.is_ok(), "should reach the report form: {:?}", result.err());
}

#[tokio::test]
#[ignore]
async fn test_fetch_single_branch() {
    logging::init();

    let mut config = FetcherConfig::from_env().expect("username/password not set");
    config.branch_ids = vec![1];

    let portal = ChromePortal::launch(&config)
        .await
        .expect("failed to launch browser");
    let summary = ReportFetcher::new(portal, config.clone())
        .run(DateRange::yesterday())
        .await
        .expect("fetch run failed");

    println!("saved {} / missing {}", summary.saved(), summary.missing());
    assert_eq!(summary.outcomes.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_mail_api_authorization() {
    logging::init();

    let config = DistributorConfig::from_env().expect("mail environment not set");
    let key = ServiceAccountKey::from_json(&config.service_account_json)
        .expect("GSA_CREDENTIALS is not a service account key");

    let result = GmailClient::authorize(&key, &config.sender).await;

    assert!(result.is_ok(), "should obtain an access token");
}
