//! Metadata-store interface.
//!
//! The ingestion pipeline, lifecycle operations and link aggregation are
//! written against this trait rather than a concrete database so the
//! concurrent paths can be exercised against an in-memory implementation.
//! Status mutations are expressed as dedicated operations — there is no way
//! to set an arbitrary status through this interface.

use async_trait::async_trait;
use clipvault_core::models::{VideoFormatLinks, VideoRecord, VideoStatus};
use clipvault_core::AppError;
use uuid::Uuid;

/// Durable record store, one row per uploaded file.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Insert a new record in `loading` state and return it with its
    /// store-assigned id. A storage-path collision yields
    /// [`AppError::Conflict`].
    async fn create_record(
        &self,
        owner_id: Uuid,
        display_name: &str,
        storage_path: &str,
        is_stream: bool,
    ) -> Result<VideoRecord, AppError>;

    /// Move a `loading` record to its post-write state (`conv` for
    /// stream-eligible records, `no_conv` otherwise). A record that already
    /// left `loading` is not touched.
    async fn confirm_stored(&self, id: Uuid) -> Result<(), AppError>;

    /// Move a `loading` record to `loading_error`. The row stays visible as
    /// a failed-to-persist upload.
    async fn mark_load_failed(&self, id: Uuid) -> Result<(), AppError>;

    /// Fetch one record scoped by owner.
    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// List an owner's records, optionally narrowed by status and/or id.
    async fn list(
        &self,
        owner_id: Uuid,
        status: Option<VideoStatus>,
        id: Option<Uuid>,
    ) -> Result<Vec<VideoRecord>, AppError>;

    /// Terminal transition: set `deleted` and replace the display name with
    /// its deleted-marker form. Fails with [`AppError::NotFound`] when no
    /// non-deleted record matches.
    async fn mark_deleted(
        &self,
        owner_id: Uuid,
        id: Uuid,
        display_name: &str,
    ) -> Result<(), AppError>;

    /// Bulk recovery: move every stream-eligible `error` record of the owner
    /// back to `conv`. Returns the number of rows moved.
    async fn reset_errors_to_conv(&self, owner_id: Uuid) -> Result<u64, AppError>;

    /// Join the owner's `done` records with their transcoded playback
    /// variants. A malformed variants payload is an error, not an empty list.
    async fn done_with_formats(&self, owner_id: Uuid) -> Result<Vec<VideoFormatLinks>, AppError>;
}
