//! Disk storage setup

use std::sync::Arc;

use anyhow::Result;

use clipvault_core::Config;
use clipvault_storage::{LocalStorage, Storage, Trimmer};

/// Build the local storage backend, enabling the trim stage when a duration
/// bound is configured.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let mut local = LocalStorage::new(config.media_root.clone(), config.media_base_url.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize local storage: {}", e))?;

    if config.trim_max_seconds > 0 {
        tracing::info!(
            ffmpeg_path = %config.ffmpeg_path,
            trim_max_seconds = config.trim_max_seconds,
            "Trim stage enabled"
        );
        local = local.with_trimmer(Trimmer::new(
            config.ffmpeg_path.clone(),
            config.trim_max_seconds,
        ));
    }

    tracing::info!(media_root = %config.media_root, "Local storage initialized");
    Ok(Arc::new(local))
}
