//! HTTP request handlers.

pub mod health;
pub mod video_delete;
pub mod video_errors;
pub mod video_get;
pub mod video_links;
pub mod video_upload;

use serde::Serialize;
use utoipa::ToSchema;

/// Plain confirmation body for mutating endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
