use std::sync::Arc;

use axum::{extract::State, Json};

use crate::auth::OwnerContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use clipvault_core::models::VideoFormatLinks;

#[utoipa::path(
    get,
    path = "/videos/links",
    tag = "videos",
    responses(
        (status = 200, description = "Playback links for finished videos", body = [VideoFormatLinks]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn video_links(
    State(state): State<Arc<AppState>>,
    owner: OwnerContext,
) -> Result<Json<Vec<VideoFormatLinks>>, HttpAppError> {
    let links = state.links.links_for(owner.owner_id).await?;
    Ok(Json(links))
}
