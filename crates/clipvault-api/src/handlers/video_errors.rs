use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetResponse {
    pub message: String,
    /// Number of records moved back to the transcoding queue.
    pub moved: u64,
}

#[utoipa::path(
    post,
    path = "/videos/errors/reset",
    tag = "videos",
    responses(
        (status = 200, description = "Failed transcodes queued for retry", body = ResetResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn reset_errors(
    State(state): State<Arc<AppState>>,
    owner: OwnerContext,
) -> Result<Json<ResetResponse>, HttpAppError> {
    let moved = state.lifecycle.reset_failed_transcodes(owner.owner_id).await?;

    Ok(Json(ResetResponse {
        message: "Video errors updated successfully".to_string(),
        moved,
    }))
}
