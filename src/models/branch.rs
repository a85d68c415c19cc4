//! Branch and card-type identifiers, plus the artifact naming rules shared by
//! both stages.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Store branch identifier
pub type BranchId = u32;

/// Payment card category code, entered as typed into the portal filter
pub type CardTypeCode = &'static str;

/// Branches reported on every run, in processing order. 11 does not exist.
pub const BRANCH_IDS: &[BranchId] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 13, 14, 15, 16, 17, 18];

/// Card types applied before each branch report, in entry order
pub const CARD_TYPE_CODES: &[CardTypeCode] = &[
    "1", "4", "5", "6", "9", "10", "11", "16", "17", "18", "19", "20",
];

const ARTIFACT_PREFIX: &str = "filial";

fn artifact_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^filial\d+\.pdf$").ok())
        .as_ref()
}

/// `filial<ID>.pdf`
pub fn artifact_file_name(branch: BranchId) -> String {
    format!("{ARTIFACT_PREFIX}{branch}.pdf")
}

/// `screenshot_filial<ID>.png`
pub fn screenshot_file_name(branch: BranchId) -> String {
    format!("screenshot_{ARTIFACT_PREFIX}{branch}.png")
}

/// True for names the Fetcher already finalized (`filial<digits>.pdf`)
pub fn is_artifact_file_name(name: &str) -> bool {
    artifact_pattern().is_some_and(|re| re.is_match(name))
}

/// True for every name the Distributor picks up: `filial*.pdf`
pub fn is_distributable_file_name(name: &str) -> bool {
    name.starts_with(ARTIFACT_PREFIX) && name.ends_with(".pdf")
}

/// Mapping key of an artifact: its file name without the extension
pub fn branch_key(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
