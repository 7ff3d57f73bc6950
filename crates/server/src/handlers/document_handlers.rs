//! # Document Route Handlers

use crate::{errors::AppError, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use ielts_ingest::StoredDocument;
use tracing::info;

/// Handler for `GET /documents/{id}`: returns a stored upload record.
pub async fn get_document_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredDocument>, AppError> {
    info!(document_id = %id, "Fetching document.");

    app_state
        .store
        .get_document(&id)
        .await?
        .map(Json)
        .ok_or(AppError::DocumentNotFound(id))
}
