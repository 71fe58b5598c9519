use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use clipvault_core::models::VideoStatus;
use clipvault_core::AppError;
use clipvault_services::UploadFile;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedVideo {
    pub id: Uuid,
    pub file_name: String,
    pub status: VideoStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub videos: Vec<UploadedVideo>,
}

/// Parse the `is_stream` form value. Accepts the same spellings as the
/// public API contract: `1`/`0` and `true`/`false`.
fn parse_is_stream(value: &str) -> Result<bool, AppError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(AppError::InvalidInput(
            "Invalid value for is_stream. Expecting true/false or 1/0".to_string(),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/videos/upload",
    tag = "videos",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Batch accepted, uploads in process", body = UploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 422, description = "Some files were skipped or failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn upload_videos(
    State(state): State<Arc<AppState>>,
    owner: OwnerContext,
    mut multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let mut files: Vec<UploadFile> = Vec::new();
    let mut is_stream: Option<bool> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid multipart form: {}",
            e
        )))
    })? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().map(str::to_string).ok_or_else(|| {
                    HttpAppError(AppError::InvalidInput(
                        "file part is missing a filename".to_string(),
                    ))
                })?;
                let data = field.bytes().await.map_err(|e| {
                    HttpAppError(AppError::InvalidInput(format!(
                        "Failed to read file '{}': {}",
                        filename, e
                    )))
                })?;
                files.push(UploadFile { filename, data });
            }
            Some("is_stream") => {
                let value = field.text().await.map_err(|e| {
                    HttpAppError(AppError::InvalidInput(format!(
                        "Failed to read is_stream: {}",
                        e
                    )))
                })?;
                is_stream = Some(parse_is_stream(value.trim())?);
            }
            _ => {}
        }
    }

    let is_stream = is_stream.ok_or_else(|| {
        HttpAppError(AppError::InvalidInput(
            "Invalid value for is_stream. Expecting true/false or 1/0".to_string(),
        ))
    })?;

    if files.is_empty() {
        return Err(HttpAppError(AppError::InvalidInput(
            "No file uploaded".to_string(),
        )));
    }

    let report = state.ingest.ingest(owner.owner_id, is_stream, files).await?;

    if let Some(err) = report.to_error() {
        return Err(HttpAppError(err));
    }

    let videos = report
        .stored
        .into_iter()
        .map(|stored| UploadedVideo {
            id: stored.id,
            file_name: stored.filename,
            status: stored.status,
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File upload in process".to_string(),
            videos,
        }),
    )
        .into_response())
}
