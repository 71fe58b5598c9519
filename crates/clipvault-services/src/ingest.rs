//! Upload ingestion pipeline.
//!
//! One call handles one upload batch for one owner: screen filenames,
//! derive storage keys, create the metadata rows synchronously, then fan the
//! disk writes out over a per-batch task group. Every spawned write is
//! joined before the call returns, and the report names the outcome of every
//! file in the batch — a failed sibling never cancels or rolls back a
//! succeeded one.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tokio::task::JoinSet;
use uuid::Uuid;

use clipvault_core::models::VideoStatus;
use clipvault_core::AppError;
use clipvault_db::VideoStore;
use clipvault_storage::{storage_key, Storage};

/// One file of an upload batch.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub data: Bytes,
}

/// Successfully ingested file.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: Uuid,
    pub filename: String,
    pub status: VideoStatus,
}

/// File that was accepted but failed to persist.
#[derive(Debug, Clone)]
pub struct FailedFile {
    pub filename: String,
    pub reason: String,
}

/// Aggregate outcome of one upload batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub stored: Vec<StoredFile>,
    pub skipped: Vec<String>,
    pub failed: Vec<FailedFile>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }

    /// Collapse skipped and failed files into one batch error, or `None`
    /// when every file succeeded.
    pub fn to_error(&self) -> Option<AppError> {
        if self.is_clean() {
            return None;
        }
        let mut parts = Vec::new();
        if !self.skipped.is_empty() {
            parts.push(format!("skipped files: [{}]", self.skipped.join(", ")));
        }
        if !self.failed.is_empty() {
            let failed: Vec<String> = self
                .failed
                .iter()
                .map(|f| format!("{}: {}", f.filename, f.reason))
                .collect();
            parts.push(format!("failed files: [{}]", failed.join("; ")));
        }
        Some(AppError::BatchFailed(parts.join("; ")))
    }
}

/// Concurrent upload ingestion service.
pub struct IngestService {
    store: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    allowed_extensions: Vec<String>,
}

impl IngestService {
    pub fn new(
        store: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        allowed_extensions: Vec<String>,
    ) -> Self {
        Self {
            store,
            storage,
            allowed_extensions,
        }
    }

    fn is_accepted(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|a| *a == ext)
            })
            .unwrap_or(false)
    }

    /// Ingest one upload batch.
    ///
    /// Rejected extensions are skipped before any I/O. For each remaining
    /// file the record is created first (status `loading`), then its disk
    /// write is dispatched while the loop moves on to the next file; writes
    /// across the batch run concurrently and independently. Each write
    /// completion moves its record to the ready state or to `loading_error`,
    /// exactly once. The call returns only after every dispatched write has
    /// been joined.
    pub async fn ingest(
        &self,
        owner_id: Uuid,
        is_stream: bool,
        files: Vec<UploadFile>,
    ) -> Result<IngestReport, AppError> {
        if files.is_empty() {
            return Err(AppError::InvalidInput(
                "upload batch contains no files".to_string(),
            ));
        }

        let batch_size = files.len();
        let mut report = IngestReport::default();
        let mut writes: JoinSet<Result<StoredFile, FailedFile>> = JoinSet::new();

        for file in files {
            if !self.is_accepted(&file.filename) {
                tracing::info!(
                    owner_id = %owner_id,
                    filename = %file.filename,
                    "Skipping file with unsupported extension"
                );
                report.skipped.push(file.filename);
                continue;
            }

            let key = storage_key(owner_id, &file.filename);

            // Create the row before any disk I/O so an id exists for the
            // whole write lifetime. A duplicate storage path fails this file
            // only; siblings keep going.
            let record = match self
                .store
                .create_record(owner_id, &file.filename, &key, is_stream)
                .await
            {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(
                        owner_id = %owner_id,
                        filename = %file.filename,
                        error = %e,
                        "Failed to create video record"
                    );
                    report.failed.push(FailedFile {
                        filename: file.filename,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let store = Arc::clone(&self.store);
            let storage = Arc::clone(&self.storage);
            writes.spawn(async move {
                let UploadFile { filename, data } = file;
                match storage.store(&record.storage_path, data).await {
                    Ok(_url) => match store.confirm_stored(record.id).await {
                        Ok(()) => Ok(StoredFile {
                            id: record.id,
                            filename,
                            status: VideoStatus::ready(record.is_stream),
                        }),
                        Err(e) => Err(FailedFile {
                            filename,
                            reason: format!("stored but status update failed: {}", e),
                        }),
                    },
                    Err(write_err) => {
                        if let Err(e) = store.mark_load_failed(record.id).await {
                            tracing::error!(
                                video_id = %record.id,
                                error = %e,
                                "Failed to record load failure"
                            );
                        }
                        Err(FailedFile {
                            filename,
                            reason: write_err.to_string(),
                        })
                    }
                }
            });
        }

        // Join barrier: nothing dispatched above outlives this call.
        while let Some(joined) = writes.join_next().await {
            match joined {
                Ok(Ok(stored)) => report.stored.push(stored),
                Ok(Err(failed)) => {
                    tracing::warn!(
                        owner_id = %owner_id,
                        filename = %failed.filename,
                        reason = %failed.reason,
                        "File failed to persist"
                    );
                    report.failed.push(failed);
                }
                Err(join_err) => {
                    tracing::error!(error = %join_err, "Upload write task did not complete");
                    report.failed.push(FailedFile {
                        filename: "<unknown>".to_string(),
                        reason: "upload task did not complete".to_string(),
                    });
                }
            }
        }

        tracing::info!(
            owner_id = %owner_id,
            batch_size,
            stored = report.stored.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Upload batch ingested"
        );

        Ok(report)
    }
}
