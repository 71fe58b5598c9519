//! OpenAPI document assembly.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers::health::HealthResponse;
use crate::handlers::video_errors::ResetResponse;
use crate::handlers::video_upload::{UploadResponse, UploadedVideo};
use crate::handlers::MessageResponse;
use clipvault_core::models::{VideoFormat, VideoFormatLinks, VideoResponse, VideoStatus};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health,
        crate::handlers::video_upload::upload_videos,
        crate::handlers::video_get::list_videos,
        crate::handlers::video_links::video_links,
        crate::handlers::video_errors::reset_errors,
        crate::handlers::video_delete::delete_video,
    ),
    components(schemas(
        HealthResponse,
        MessageResponse,
        UploadResponse,
        UploadedVideo,
        ResetResponse,
        VideoResponse,
        VideoStatus,
        VideoFormat,
        VideoFormatLinks,
        ErrorResponse,
    )),
    tags(
        (name = "videos", description = "Video upload, status and lifecycle operations"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
