//! # Document Types
//!
//! The persisted shape of an uploaded PDF and its per-page breakdown.

use crate::ingest::pdf::ExtractedDocument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of extracted text with its derived metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub page_number: u32,
    pub content: String,
    pub word_count: usize,
    pub character_count: usize,
}

impl PageContent {
    /// Builds a page from raw decoder text.
    ///
    /// `reported_number` wins when it is present and non-zero; otherwise the
    /// page is numbered by its 1-based position (`index + 1`).
    pub fn from_raw(raw_text: &str, reported_number: Option<u32>, index: usize) -> Self {
        let content = raw_text.trim().to_string();
        let page_number = match reported_number {
            Some(n) if n != 0 => n,
            _ => u32::try_from(index + 1).unwrap_or(u32::MAX),
        };
        let word_count = content.split_whitespace().count();
        let character_count = content.chars().count();

        Self {
            page_number,
            content,
            word_count,
            character_count,
        }
    }
}

/// The immutable record written once per successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub file_metadata: Value,
    pub file_content: String,
    pub pages: Vec<PageContent>,
    pub total_pages: usize,
    pub created_at: DateTime<Utc>,
}

impl UploadedDocument {
    /// Assembles a record from an extraction result.
    ///
    /// `total_pages` is always derived from the page list.
    pub fn new(
        file_name: impl Into<String>,
        file_size: u64,
        file_type: impl Into<String>,
        file_metadata: Value,
        extracted: ExtractedDocument,
        created_at: DateTime<Utc>,
    ) -> Self {
        let ExtractedDocument { content, pages } = extracted;
        Self {
            file_name: file_name.into(),
            file_size,
            file_type: file_type.into(),
            file_metadata,
            file_content: content,
            total_pages: pages.len(),
            pages,
            created_at,
        }
    }
}

/// A document as read back from the store, together with its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    #[serde(flatten)]
    pub document: UploadedDocument,
}
