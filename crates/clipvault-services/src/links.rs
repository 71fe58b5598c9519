//! Playback link aggregation.

use std::sync::Arc;

use uuid::Uuid;

use clipvault_core::models::VideoFormatLinks;
use clipvault_core::AppError;
use clipvault_db::VideoStore;

/// Read-only join of finished records with their transcoded variants.
pub struct PlaybackLinkService {
    store: Arc<dyn VideoStore>,
}

impl PlaybackLinkService {
    pub fn new(store: Arc<dyn VideoStore>) -> Self {
        Self { store }
    }

    /// Every `done` record of the owner with its ordered
    /// (resolution, url) variants.
    pub async fn links_for(&self, owner_id: Uuid) -> Result<Vec<VideoFormatLinks>, AppError> {
        let links = self.store.done_with_formats(owner_id).await?;
        tracing::debug!(
            owner_id = %owner_id,
            records = links.len(),
            "Playback links resolved"
        );
        Ok(links)
    }
}
