//! Application state shared across handlers.

use std::sync::Arc;

use clipvault_core::Config;
use clipvault_db::VideoStore;
use clipvault_services::{IngestService, PlaybackLinkService, VideoLifecycleService};
use clipvault_storage::Storage;

/// Long-lived handles constructed once at startup and injected into every
/// handler through Axum state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn VideoStore>,
    pub storage: Arc<dyn Storage>,
    pub ingest: IngestService,
    pub lifecycle: VideoLifecycleService,
    pub links: PlaybackLinkService,
}
