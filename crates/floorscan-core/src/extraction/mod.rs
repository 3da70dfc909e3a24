pub mod pdftotext;

use crate::error::FloorscanError;
use crate::model::TextSpan;

/// Positioned text extracted from a single page of a PDF.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageText {
    /// 1-based page number.
    pub page_number: usize,
    /// Text runs (one per layout line), in extraction order.
    pub spans: Vec<TextSpan>,
    /// Individual word boxes, in extraction order.
    pub words: Vec<TextSpan>,
}

impl PageText {
    /// The page's text runs joined with single spaces.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Trait for PDF text extraction backends.
pub trait PageExtractor: Send + Sync {
    /// Extract positioned text from PDF bytes, returning one PageText per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageText>, FloorscanError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
