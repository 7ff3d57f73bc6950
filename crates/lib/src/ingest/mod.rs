//! # Ingestion Logic
//!
//! The stages of the upload path that transform content: PDF text extraction
//! and AI metadata generation.

pub mod metadata;
pub mod pdf;

pub use metadata::{AiMetadataGenerator, MetadataError, MetadataGenerator};
pub use pdf::{
    DecodedPage, ExtractedDocument, ExtractionOutcome, PdfDecodeError, PdfDecoder, PdfExtractor,
};
