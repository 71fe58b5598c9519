//! Record lifecycle operations: deletion and bulk transcode-error recovery.

use std::sync::Arc;

use uuid::Uuid;

use clipvault_core::models::deleted_display_name;
use clipvault_core::AppError;
use clipvault_db::VideoStore;
use clipvault_storage::Storage;

/// Deletion coordinator and status recovery.
pub struct VideoLifecycleService {
    store: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
}

impl VideoLifecycleService {
    pub fn new(store: Arc<dyn VideoStore>, storage: Arc<dyn Storage>) -> Self {
        Self { store, storage }
    }

    /// Delete one record: reclaim its shard directory on disk, then mark the
    /// row deleted and rename it to the deleted-marker form.
    ///
    /// Disk reclamation runs first and aborts the operation on failure, so a
    /// row never claims `deleted` while its bytes silently remain. Deleting
    /// an already-deleted record is a caller error, not a no-op.
    pub async fn delete_video(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let record = self
            .store
            .get(owner_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {} not found", id)))?;

        if record.status.is_deleted() {
            return Err(AppError::AlreadyDeleted(format!(
                "video {} is already deleted",
                id
            )));
        }

        self.storage
            .remove_parent_dir(&record.storage_path)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let marker = deleted_display_name(&record.display_name, record.id);
        self.store.mark_deleted(owner_id, id, &marker).await?;

        tracing::info!(
            owner_id = %owner_id,
            video_id = %id,
            storage_path = %record.storage_path,
            "Video deleted"
        );

        Ok(())
    }

    /// Move every stream-eligible `error` record of the owner back to
    /// `conv` so the transcoding worker picks them up again.
    pub async fn reset_failed_transcodes(&self, owner_id: Uuid) -> Result<u64, AppError> {
        let moved = self.store.reset_errors_to_conv(owner_id).await?;
        tracing::info!(
            owner_id = %owner_id,
            moved,
            "Reset transcode errors for retry"
        );
        Ok(moved)
    }
}
