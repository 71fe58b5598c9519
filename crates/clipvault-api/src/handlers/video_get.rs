use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use clipvault_core::models::{VideoResponse, VideoStatus};
use clipvault_core::AppError;

#[derive(Debug, Deserialize, IntoParams)]
pub struct VideoQuery {
    /// Narrow to one lifecycle state (e.g. `conv`, `done`, `loading_error`).
    pub status: Option<String>,
    /// Narrow to one record.
    pub id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/videos",
    tag = "videos",
    params(VideoQuery),
    responses(
        (status = 200, description = "Video records for the authenticated owner", body = [VideoResponse]),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    owner: OwnerContext,
    Query(query): Query<VideoQuery>,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(VideoStatus::from_str)
        .transpose()
        .map_err(AppError::InvalidInput)?;

    let records = state.store.list(owner.owner_id, status, query.id).await?;

    let videos = records
        .into_iter()
        .map(|record| {
            let url = state.storage.public_url(&record.storage_path);
            VideoResponse::from_record(record, Some(url))
        })
        .collect();

    Ok(Json(videos))
}
