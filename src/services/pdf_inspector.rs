//! PDF inspection - capability layer
//!
//! Pulls the text out of a report and decides whether it carries data.

use std::path::Path;

use pdf_oxide::document::PdfDocument;

use crate::error::PdfError;

/// Classification of one downloaded report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// The portal rendered its "no records" page
    Empty,
    HasData,
}

/// Text extraction seam; [`PdfOxideExtractor`] in production
pub trait TextExtractor: Send + Sync {
    /// Text of every page, concatenated in page order
    fn extract_text(&self, path: &Path) -> Result<String, PdfError>;
}

/// Extracts text with `pdf_oxide`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfOxideExtractor;

impl TextExtractor for PdfOxideExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, PdfError> {
        let path_text = path.display().to_string();
        let doc = PdfDocument::open(path).map_err(|e| PdfError::OpenFailed {
            path: path_text.clone(),
            reason: e.to_string(),
        })?;
        let page_count = doc.page_count().map_err(|e| PdfError::OpenFailed {
            path: path_text.clone(),
            reason: e.to_string(),
        })?;

        let mut full_text = String::new();
        for page in 0..page_count {
            let text = doc
                .extract_text(page)
                .map_err(|e| PdfError::ExtractFailed {
                    path: path_text.clone(),
                    page,
                    reason: e.to_string(),
                })?;
            full_text.push_str(&text);
        }
        Ok(full_text)
    }
}

/// `Empty` when `sentinel` occurs anywhere in `text`
pub fn classify(text: &str, sentinel: &str) -> ReportStatus {
    if text.contains(sentinel) {
        ReportStatus::Empty
    } else {
        ReportStatus::HasData
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTINEL: &str = "Nenhum relatório encontrado para os filtros selecionados";

    #[test]
    fn sentinel_anywhere_means_empty() {
        let text = format!("Relação de Vendas\n{}\nPágina 1", SENTINEL);
        assert_eq!(classify(&text, SENTINEL), ReportStatus::Empty);
    }

    #[test]
    fn report_content_means_data() {
        assert_eq!(classify("Total vendas: R$100", SENTINEL), ReportStatus::HasData);
        assert_eq!(classify("", SENTINEL), ReportStatus::HasData);
    }

    fn write_pdf(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut pdf = pdf_oxide::api::Pdf::from_text(text).unwrap();
        pdf.save(&path).unwrap();
        path
    }

    #[test]
    fn pdf_with_no_records_page_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "filial1.pdf", SENTINEL);

        let text = PdfOxideExtractor.extract_text(&path).unwrap();
        assert_eq!(classify(&text, SENTINEL), ReportStatus::Empty);
    }

    #[test]
    fn pdf_with_sales_lines_has_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "filial2.pdf", "Total vendas: R$100");

        let text = PdfOxideExtractor.extract_text(&path).unwrap();
        assert!(text.contains("R$100"));
        assert_eq!(classify(&text, SENTINEL), ReportStatus::HasData);
    }

    #[test]
    fn garbage_file_fails_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filial9.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        assert!(PdfOxideExtractor.extract_text(&path).is_err());
    }

    #[test]
    fn missing_file_fails_extraction() {
        let err = PdfOxideExtractor
            .extract_text(Path::new("/nonexistent/filial1.pdf"))
            .unwrap_err();
        assert!(matches!(err, PdfError::OpenFailed { .. }));
    }
}
