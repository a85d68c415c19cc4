pub mod branch;
pub mod date_range;
pub mod email_map;

pub use branch::{
    artifact_file_name, branch_key, is_artifact_file_name, is_distributable_file_name,
    screenshot_file_name, BranchId, CardTypeCode, BRANCH_IDS, CARD_TYPE_CODES,
};
pub use date_range::DateRange;
pub use email_map::EmailMapping;
