use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ielts_ingest::{providers::db::storage::StoreError, UploadError};
use serde_json::json;
use std::any::Any;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// Every variant renders as a JSON body with an `error` field; server-side
/// failures add a `details` field.
#[derive(Debug)]
pub enum AppError {
    /// Errors from the upload pipeline.
    Upload(UploadError),
    /// Errors from the document store outside the upload path.
    Store(StoreError),
    /// A requested document id does not exist.
    DocumentNotFound(String),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Upload(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

const UPLOAD_FAILED: &str = "PDF upload failed";
const DATABASE_FAILED: &str = "Database operation failed";

impl AppError {
    fn status_and_body(&self) -> (StatusCode, serde_json::Value) {
        match self {
            AppError::Upload(err) => match err {
                UploadError::NoFile
                | UploadError::InvalidFileType { .. }
                | UploadError::ExtractionFailed => {
                    (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
                }
                UploadError::Store(store_err) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": DATABASE_FAILED, "details": store_err.to_string() }),
                ),
                UploadError::PayloadTooLarge(details) => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    json!({ "error": UPLOAD_FAILED, "details": details }),
                ),
                UploadError::Metadata(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": UPLOAD_FAILED, "details": e.to_string() }),
                ),
                UploadError::Unexpected(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": UPLOAD_FAILED, "details": e.to_string() }),
                ),
            },
            AppError::Store(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": DATABASE_FAILED, "details": err.to_string() }),
            ),
            AppError::DocumentNotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Document not found" }),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, body) = self.status_and_body();

        if status_code.is_server_error() {
            error!(status = %status_code, error = ?self, "Request failed.");
        } else {
            warn!(status = %status_code, error = ?self, "Request rejected.");
        }

        (status_code, Json(body)).into_response()
    }
}

/// Turns a handler panic into the generic upload failure body.
///
/// Installed through `CatchPanicLayer::custom`, so the connection survives and
/// the client still gets JSON.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Unknown panic".to_string()
    };
    error!(%details, "Request handler panicked.");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": UPLOAD_FAILED, "details": details })),
    )
        .into_response()
}
