use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::auth::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::MessageResponse;
use crate::state::AppState;

#[utoipa::path(
    delete,
    path = "/videos/{id}",
    tag = "videos",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted successfully", body = MessageResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 409, description = "Video already deleted", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    owner: OwnerContext,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    state.lifecycle.delete_video(owner.owner_id, id).await?;

    Ok(Json(MessageResponse {
        message: "Video deleted successfully".to_string(),
    }))
}
