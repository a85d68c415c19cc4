pub mod distribute_flow;
pub mod fetch_flow;

pub use distribute_flow::{DistributionSummary, ReportDistributor};
pub use fetch_flow::{FetchOutcome, FetchSummary, ReportFetcher};
