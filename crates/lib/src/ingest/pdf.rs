//! # PDF Extraction
//!
//! Turns an uploaded PDF binary into ordered, trimmed page texts with word and
//! character counts, plus the full-document text.
//!
//! The extractor is fail-soft: whatever goes wrong inside the decoder (a parse
//! error, an encrypted file, a panic) it returns an empty document and leaves
//! the accept/reject decision to the caller. The internal `ExtractionOutcome`
//! keeps the distinction between "the decoder failed" and "the decoder found no
//! pages" so it can be logged.

use crate::{constants::PAGE_SEPARATOR, types::PageContent};
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;
use tracing::{info, warn};

// --- Decoder Seam ---

/// A page as reported by a PDF decoder, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub page_content: String,
    /// The page number declared by the source document, if the decoder knows it.
    pub page_number: Option<u32>,
}

impl DecodedPage {
    pub fn new(page_content: impl Into<String>, page_number: Option<u32>) -> Self {
        Self {
            page_content: page_content.into(),
            page_number,
        }
    }
}

#[derive(Error, Debug)]
pub enum PdfDecodeError {
    #[error("Failed to parse PDF document: {0}")]
    Parse(String),
    #[error("Failed to read page {page}: {reason}")]
    Page { page: u32, reason: String },
}

/// The PDF decode primitive: bytes in, per-page text out.
///
/// Implementations are synchronous and may be CPU heavy; the extractor runs
/// them on the blocking thread pool.
pub trait PdfDecoder: Send + Sync + Debug {
    fn decode(&self, data: &[u8]) -> Result<Vec<DecodedPage>, PdfDecodeError>;
}

// --- Extraction Result ---

/// The normalized extraction result.
///
/// `content` is always the `"\n\n"` join of the page contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub content: String,
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    pub fn from_pages(pages: Vec<PageContent>) -> Self {
        let content = pages
            .iter()
            .map(|page| page.content.as_str())
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR);
        Self { content, pages }
    }

    /// Normalizes decoder output, numbering pages by position where needed.
    pub fn from_decoded(decoded: &[DecodedPage]) -> Self {
        let pages = decoded
            .iter()
            .enumerate()
            .map(|(index, page)| PageContent::from_raw(&page.page_content, page.page_number, index))
            .collect();
        Self::from_pages(pages)
    }

    /// True when there is nothing worth storing.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() || self.pages.is_empty()
    }
}

/// What actually happened during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Extracted(ExtractedDocument),
    NoPages,
    DecodeFailed(String),
}

impl ExtractionOutcome {
    pub fn into_document(self) -> ExtractedDocument {
        match self {
            ExtractionOutcome::Extracted(document) => document,
            ExtractionOutcome::NoPages | ExtractionOutcome::DecodeFailed(_) => {
                ExtractedDocument::default()
            }
        }
    }
}

// --- Extractor ---

/// Runs a `PdfDecoder` off the async executor and normalizes its output.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    decoder: Arc<dyn PdfDecoder>,
}

impl PdfExtractor {
    pub fn new(decoder: Arc<dyn PdfDecoder>) -> Self {
        Self { decoder }
    }

    /// Decodes the buffer and reports the tagged outcome.
    pub async fn extract_outcome(&self, pdf_data: &[u8]) -> ExtractionOutcome {
        let decoder = Arc::clone(&self.decoder);
        let data = pdf_data.to_vec();

        let decoded = tokio::task::spawn_blocking(move || decoder.decode(&data)).await;

        match decoded {
            Ok(Ok(pages)) if pages.is_empty() => ExtractionOutcome::NoPages,
            Ok(Ok(pages)) => ExtractionOutcome::Extracted(ExtractedDocument::from_decoded(&pages)),
            Ok(Err(e)) => ExtractionOutcome::DecodeFailed(e.to_string()),
            Err(join_error) => {
                ExtractionOutcome::DecodeFailed(format!("PDF decoder task failed: {join_error}"))
            }
        }
    }

    /// Fail-soft extraction: any failure yields an empty document.
    pub async fn extract(&self, pdf_data: &[u8]) -> ExtractedDocument {
        let outcome = self.extract_outcome(pdf_data).await;
        match &outcome {
            ExtractionOutcome::Extracted(document) => info!(
                pages = document.pages.len(),
                characters = document.content.len(),
                "Extracted text from PDF."
            ),
            ExtractionOutcome::NoPages => warn!("PDF decoder returned no pages."),
            ExtractionOutcome::DecodeFailed(reason) => {
                warn!(%reason, "PDF decoding failed; returning empty extraction.")
            }
        }
        outcome.into_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FixedDecoder(Result<Vec<DecodedPage>, String>);

    impl PdfDecoder for FixedDecoder {
        fn decode(&self, _data: &[u8]) -> Result<Vec<DecodedPage>, PdfDecodeError> {
            self.0.clone().map_err(PdfDecodeError::Parse)
        }
    }

    #[derive(Debug)]
    struct PanickingDecoder;

    impl PdfDecoder for PanickingDecoder {
        fn decode(&self, _data: &[u8]) -> Result<Vec<DecodedPage>, PdfDecodeError> {
            panic!("decoder crashed");
        }
    }

    fn extractor(decoder: impl PdfDecoder + 'static) -> PdfExtractor {
        PdfExtractor::new(Arc::new(decoder))
    }

    #[tokio::test]
    async fn test_zero_pages_yield_empty_document() {
        let result = extractor(FixedDecoder(Ok(vec![]))).extract(b"%PDF").await;
        assert_eq!(result.content, "");
        assert!(result.pages.is_empty());
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_single_page_content_is_page_text() {
        let decoder = FixedDecoder(Ok(vec![DecodedPage::new("  Only page \n", Some(1))]));
        let result = extractor(decoder).extract(b"%PDF").await;
        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.content, "Only page");
    }

    #[tokio::test]
    async fn test_multiple_pages_joined_in_order() {
        let decoder = FixedDecoder(Ok(vec![
            DecodedPage::new("First", None),
            DecodedPage::new("Second", Some(0)),
            DecodedPage::new("Third", Some(7)),
        ]));
        let result = extractor(decoder).extract(b"%PDF").await;

        assert_eq!(result.pages.len(), 3);
        assert_eq!(result.content, "First\n\nSecond\n\nThird");
        let numbers: Vec<u32> = result.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 7]);
    }

    #[tokio::test]
    async fn test_decode_error_is_swallowed() {
        let decoder = FixedDecoder(Err("bad xref".to_string()));
        let ex = extractor(decoder);

        let outcome = ex.extract_outcome(b"garbage").await;
        assert_eq!(
            outcome,
            ExtractionOutcome::DecodeFailed("Failed to parse PDF document: bad xref".to_string())
        );
        assert_eq!(ex.extract(b"garbage").await, ExtractedDocument::default());
    }

    #[tokio::test]
    async fn test_decoder_panic_is_swallowed() {
        let ex = extractor(PanickingDecoder);
        assert!(matches!(
            ex.extract_outcome(b"%PDF").await,
            ExtractionOutcome::DecodeFailed(_)
        ));
        assert!(ex.extract(b"%PDF").await.is_empty());
    }

    #[tokio::test]
    async fn test_outcome_distinguishes_no_pages() {
        let outcome = extractor(FixedDecoder(Ok(vec![])))
            .extract_outcome(b"%PDF")
            .await;
        assert_eq!(outcome, ExtractionOutcome::NoPages);
    }
}
