//! Submission endpoints.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use docflow_core::{DisplayPayload, SubmissionForm, UploadFile};

use super::error::ApiError;
use crate::state::AppState;

/// Run one submission to completion and return its rendered result.
///
/// Multipart fields: `file`, `processing_type`, `source_language`,
/// `target_language`, `ocr_language`, `confidence_threshold`.
pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<DisplayPayload>, ApiError> {
    let form = read_form(multipart).await?;
    info!(
        filename = form.file.as_ref().map(|f| f.filename.as_str()).unwrap_or(""),
        processing_type = form.processing_type.as_deref().unwrap_or(""),
        "Submission received"
    );

    let payload = state.router().route(form).await?;
    Ok(Json(payload))
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, ApiError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;

                let mut file = UploadFile::new(filename, bytes.to_vec());
                if let Some(ct) = content_type {
                    file = file.with_content_type(ct);
                }
                form.file = Some(file);
            }
            "processing_type" | "source_language" | "target_language" | "ocr_language"
            | "confidence_threshold" => {
                let value = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read field {}: {}", name, e))
                })?;
                let slot = match name.as_str() {
                    "processing_type" => &mut form.processing_type,
                    "source_language" => &mut form.source_language,
                    "target_language" => &mut form.target_language,
                    "ocr_language" => &mut form.ocr_language,
                    _ => &mut form.confidence_threshold,
                };
                *slot = Some(value);
            }
            other => {
                debug!("Ignoring unknown multipart field: {}", other);
            }
        }
    }

    Ok(form)
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

/// Cancel the in-flight submission's polling.
pub async fn cancel_submission(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<CancelResponse>), ApiError> {
    if state.router().cancel() {
        Ok((StatusCode::ACCEPTED, Json(CancelResponse { cancelled: true })))
    } else {
        Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "No submission in progress",
        ))
    }
}
