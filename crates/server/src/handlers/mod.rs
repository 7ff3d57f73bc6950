//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the ingestion server,
//! split into logical sub-modules by endpoint family.

pub mod document_handlers;
pub mod general;
pub mod upload;

// Re-export all handlers so the router can reach them under `handlers::`.
pub use document_handlers::*;
pub use general::*;
pub use upload::*;
