//! Clipvault Services Library
//!
//! The operations behind the HTTP boundary: the concurrent upload ingestion
//! pipeline, the deletion/recovery lifecycle, and playback link aggregation.
//! All services hold the metadata store and disk storage behind their
//! interface traits, constructed once at startup.

pub mod ingest;
pub mod lifecycle;
pub mod links;

#[cfg(test)]
pub(crate) mod testing;

pub use ingest::{FailedFile, IngestReport, IngestService, StoredFile, UploadFile};
pub use lifecycle::VideoLifecycleService;
pub use links::PlaybackLinkService;
