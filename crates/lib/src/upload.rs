//! # Upload Pipeline
//!
//! The single orchestration path for an uploaded PDF:
//! presence check → MIME check → extraction → metadata → persistence.
//! Each step runs only after its predecessor succeeds, and nothing is written
//! unless every earlier step passed.

use crate::{
    constants::PDF_MIME_TYPE,
    ingest::{metadata::MetadataError, MetadataGenerator, PdfExtractor},
    providers::db::storage::{DocumentStore, StoreError},
    types::UploadedDocument,
};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// A file part received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    /// The content type declared by the client for this part.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// What the caller gets back after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub file_id: String,
    pub total_pages: usize,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file provided")]
    NoFile,
    #[error("Invalid file type. Only PDF files are allowed")]
    InvalidFileType { declared: Option<String> },
    #[error("Unable to extract content from PDF file")]
    ExtractionFailed,
    #[error("Metadata generation failed: {0}")]
    Metadata(#[from] MetadataError),
    #[error("Database operation failed: {0}")]
    Store(#[from] StoreError),
    #[error("Upload exceeds the allowed size: {0}")]
    PayloadTooLarge(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(#[from] anyhow::Error),
}

/// Exact, case-sensitive match on the declared type. No sniffing.
pub fn is_pdf_content_type(content_type: Option<&str>) -> bool {
    content_type == Some(PDF_MIME_TYPE)
}

/// Wires the extractor, metadata generator and store together.
#[derive(Debug, Clone)]
pub struct UploadPipeline {
    extractor: PdfExtractor,
    metadata: Arc<dyn MetadataGenerator>,
    store: Arc<dyn DocumentStore>,
}

impl UploadPipeline {
    pub fn new(
        extractor: PdfExtractor,
        metadata: Arc<dyn MetadataGenerator>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            extractor,
            metadata,
            store,
        }
    }

    #[instrument(skip(self, file))]
    pub async fn process(&self, file: Option<UploadedFile>) -> Result<UploadReceipt, UploadError> {
        let file = file.ok_or(UploadError::NoFile)?;

        if !is_pdf_content_type(file.content_type.as_deref()) {
            warn!(
                file_name = %file.file_name,
                content_type = ?file.content_type,
                "Rejected upload with non-PDF content type."
            );
            return Err(UploadError::InvalidFileType {
                declared: file.content_type,
            });
        }

        info!(file_name = %file.file_name, size = file.data.len(), "Processing PDF upload.");

        let extracted = self.extractor.extract(&file.data).await;
        if extracted.is_empty() {
            return Err(UploadError::ExtractionFailed);
        }

        let file_metadata = self.metadata.generate(&extracted.content).await?;

        let document = UploadedDocument::new(
            file.file_name,
            file.data.len() as u64,
            PDF_MIME_TYPE,
            file_metadata,
            extracted,
            Utc::now(),
        );
        let total_pages = document.total_pages;

        let file_id = self.store.insert_document(&document).await?;
        info!(%file_id, total_pages, "PDF upload processed.");

        Ok(UploadReceipt {
            file_id,
            total_pages,
        })
    }
}
