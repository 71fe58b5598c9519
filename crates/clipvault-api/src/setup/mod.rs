//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from
//! main.rs for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::state::AppState;
use clipvault_core::Config;
use clipvault_db::{VideoRepository, VideoStore};
use clipvault_services::{IngestService, PlaybackLinkService, VideoLifecycleService};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_tracing();
    tracing::info!("Configuration loaded and validated successfully");

    // Database pool and migrations
    let pool = database::setup_database(&config).await?;

    // Disk storage with optional trim stage
    let storage = storage::setup_storage(&config).await?;

    // One long-lived store handle shared by every service
    let store: Arc<dyn VideoStore> = Arc::new(VideoRepository::new(pool));

    let state = Arc::new(AppState {
        ingest: IngestService::new(
            Arc::clone(&store),
            Arc::clone(&storage),
            config.video_allowed_extensions.clone(),
        ),
        lifecycle: VideoLifecycleService::new(Arc::clone(&store), Arc::clone(&storage)),
        links: PlaybackLinkService::new(Arc::clone(&store)),
        store,
        storage,
        config,
    });

    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
