//! # Upload Route Handlers
//!
//! `POST /upload` accepts a `multipart/form-data` body with a `file` part and
//! runs it through the upload pipeline.

use crate::{errors::AppError, state::AppState};
use axum::{
    extract::{FromRequest, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{multipart::MultipartError, Multipart};
use ielts_ingest::{constants::DEFAULT_UPLOAD_FILE_NAME, UploadError, UploadedFile};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

type MultipartRejection = <Multipart as FromRequest<AppState>>::Rejection;

const FILE_FIELD: &str = "file";
const SUCCESS_MESSAGE: &str = "PDF uploaded and processed successfully";

#[derive(Serialize, Deserialize, Debug)]
pub struct UploadResponse {
    pub message: String,
    pub file_id: String,
}

fn multipart_error(err: MultipartError) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::PayloadTooLarge(err.body_text())
    } else {
        UploadError::Unexpected(anyhow::Error::from(err))
    }
}

/// Pulls the first `file` part out of the form, ignoring everything else.
async fn read_file_part(mut multipart: Multipart) -> Result<Option<UploadedFile>, UploadError> {
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        if name != FILE_FIELD || file.is_some() {
            warn!("Ignoring multipart field: {}", name);
            continue;
        }

        let file_name = field
            .file_name()
            .unwrap_or(DEFAULT_UPLOAD_FILE_NAME)
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?.to_vec();

        info!(
            file_name = %file_name,
            content_type = ?content_type,
            size = data.len(),
            "Received file part."
        );
        file = Some(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }

    Ok(file)
}

/// Handler for `POST /upload`.
pub async fn upload_handler(
    State(app_state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    info!("PDF upload request received.");

    // A body that is not multipart cannot carry a `file` part.
    let file = match multipart {
        Ok(multipart) => read_file_part(multipart).await?,
        Err(rejection) => {
            warn!(?rejection, "Upload request is not a multipart form.");
            None
        }
    };

    let receipt = app_state.pipeline.process(file).await?;

    Ok(Json(UploadResponse {
        message: SUCCESS_MESSAGE.to_string(),
        file_id: receipt.file_id,
    }))
}
