//! # PDF Upload Ingestion
//!
//! This crate holds the core of the admin panel's document ingestion path: the
//! domain types for uploaded documents, the fail-soft PDF extractor, the AI
//! metadata collaborator, the document store, and the upload pipeline that
//! ties them together. The HTTP surface lives in `ielts-ingest-server` and the
//! production PDF decoder lives in `ielts-ingest-pdf`.

pub mod constants;
pub mod errors;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod types;
pub mod upload;

pub use errors::PromptError;
pub use types::{PageContent, StoredDocument, UploadedDocument};
pub use upload::{UploadError, UploadPipeline, UploadReceipt, UploadedFile};
