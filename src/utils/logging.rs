//! Logging helpers
//!
//! Subscriber setup plus the banner and summary lines both stages print.
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` level. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Log the stage start banner
///
/// # Arguments
/// - `stage`: stage name shown in the banner
pub fn log_startup(stage: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 {} started - {}", stage, chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(60));
}

/// Log the section header for a single branch / file
pub fn log_item_start(label: &str, index: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📦 {} ({}/{})", label, index, total);
}

/// Print the closing statistics block
///
/// # Arguments
/// - `stage`: stage name
/// - `lines`: `(label, count)` pairs printed in order
pub fn print_final_stats(stage: &str, lines: &[(&str, usize)]) {
    info!("\n{}", "=".repeat(60));
    info!("📊 {} finished", stage);
    info!(
        "Finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    for (label, count) in lines {
        info!("{}: {}", label, count);
    }
    info!("{}", "=".repeat(60));
}

/// Truncate long text for log output
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
