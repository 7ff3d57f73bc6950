//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared across
//! the crates in the workspace. Using these constants helps to avoid
//! "magic strings" and ensures consistency between the pipeline and its tests.

/// The only MIME type accepted by the upload endpoint.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Separator placed between page texts in the full-document text.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// The file name recorded when a multipart part carries none.
pub const DEFAULT_UPLOAD_FILE_NAME: &str = "upload.pdf";

/// The default path for the main application SQLite database.
pub const DEFAULT_DB_FILE: &str = "db/ielts_ingest.db";
