pub mod download_watcher;
pub mod mail_composer;
pub mod pdf_inspector;

pub use download_watcher::{DownloadBaseline, DownloadWatcher};
pub use mail_composer::{encode_raw, render_body, ReportEmail};
pub use pdf_inspector::{classify, PdfOxideExtractor, ReportStatus, TextExtractor};
