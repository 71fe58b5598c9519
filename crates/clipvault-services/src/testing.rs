//! In-memory doubles for the store and disk interfaces, used by the service
//! tests. `MemStore` mirrors the Postgres repository's guarantees: scoped
//! queries, the non-deleted storage-path uniqueness constraint, and the
//! loading-guarded status updates.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use clipvault_core::models::{VideoFormat, VideoFormatLinks, VideoRecord, VideoStatus};
use clipvault_core::AppError;
use clipvault_db::VideoStore;
use clipvault_storage::{Storage, StorageError, StorageResult};

#[derive(Default)]
pub(crate) struct MemStore {
    records: Mutex<Vec<VideoRecord>>,
    formats: Mutex<HashMap<Uuid, (Uuid, serde_json::Value)>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Directly set a status, standing in for the external transcoding and
    /// analysis workers.
    pub fn set_status(&self, id: Uuid, status: VideoStatus) {
        let mut records = self.records.lock().unwrap();
        let record = records.iter_mut().find(|r| r.id == id).unwrap();
        record.status = status;
    }

    /// Attach a variants payload to a record, as the transcoding worker
    /// would.
    pub fn add_formats(&self, file_id: Uuid, payload: serde_json::Value) -> Uuid {
        let format_id = Uuid::new_v4();
        self.formats
            .lock()
            .unwrap()
            .insert(file_id, (format_id, payload));
        format_id
    }
}

#[async_trait]
impl VideoStore for MemStore {
    async fn create_record(
        &self,
        owner_id: Uuid,
        display_name: &str,
        storage_path: &str,
        is_stream: bool,
    ) -> Result<VideoRecord, AppError> {
        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|r| r.storage_path == storage_path && !r.status.is_deleted())
        {
            return Err(AppError::Conflict(format!(
                "storage path already in use for '{}'",
                display_name
            )));
        }
        let now = Utc::now();
        let record = VideoRecord {
            id: Uuid::new_v4(),
            owner_id,
            display_name: display_name.to_string(),
            storage_path: storage_path.to_string(),
            is_stream,
            status: VideoStatus::Loading,
            status_ai: None,
            uploaded_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn confirm_stored(&self, id: Uuid) -> Result<(), AppError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records
            .iter_mut()
            .find(|r| r.id == id && r.status == VideoStatus::Loading)
        {
            record.status = VideoStatus::ready(record.is_stream);
            record.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn mark_load_failed(&self, id: Uuid) -> Result<(), AppError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records
            .iter_mut()
            .find(|r| r.id == id && r.status == VideoStatus::Loading)
        {
            record.status = VideoStatus::LoadingError;
            record.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .find(|r| r.id == id && r.owner_id == owner_id)
            .cloned())
    }

    async fn list(
        &self,
        owner_id: Uuid,
        status: Option<VideoStatus>,
        id: Option<Uuid>,
    ) -> Result<Vec<VideoRecord>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .filter(|r| status.map_or(true, |s| r.status == s))
            .filter(|r| id.map_or(true, |i| r.id == i))
            .cloned()
            .collect())
    }

    async fn mark_deleted(
        &self,
        owner_id: Uuid,
        id: Uuid,
        display_name: &str,
    ) -> Result<(), AppError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner_id && !r.status.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("video {} not found", id)))?;
        record.display_name = display_name.to_string();
        record.status = VideoStatus::Deleted;
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn reset_errors_to_conv(&self, owner_id: Uuid) -> Result<u64, AppError> {
        let mut records = self.records.lock().unwrap();
        let mut moved = 0;
        for record in records.iter_mut() {
            if record.owner_id == owner_id
                && record.status == VideoStatus::Error
                && record.is_stream
            {
                record.status = VideoStatus::Conv;
                record.updated_at = Utc::now();
                moved += 1;
            }
        }
        Ok(moved)
    }

    async fn done_with_formats(&self, owner_id: Uuid) -> Result<Vec<VideoFormatLinks>, AppError> {
        let records = self.records.lock().unwrap();
        let formats = self.formats.lock().unwrap();
        let mut results = Vec::new();
        for record in records
            .iter()
            .filter(|r| r.owner_id == owner_id && r.status == VideoStatus::Done)
        {
            if let Some((format_id, payload)) = formats.get(&record.id) {
                let parsed: Vec<VideoFormat> =
                    serde_json::from_value(payload.clone()).map_err(|e| {
                        AppError::Internal(format!(
                            "Malformed formats payload for video {}: {}",
                            record.id, e
                        ))
                    })?;
                results.push(VideoFormatLinks {
                    video_format_id: *format_id,
                    file_id: record.id,
                    filename: record.display_name.clone(),
                    formats: parsed,
                });
            }
        }
        Ok(results)
    }
}

/// In-memory disk stand-in tracking stored keys per shard, with optional
/// forced failures by filename.
#[derive(Default)]
pub(crate) struct MemStorage {
    stored: Mutex<Vec<String>>,
    fail_on: Vec<String>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force every write whose key ends with `filename` to fail.
    pub fn failing_on(mut self, filename: &str) -> Self {
        self.fail_on.push(filename.to_string());
        self
    }

    pub fn stored_keys(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }

    /// Whether any stored key still lives in the given key's shard.
    pub fn shard_exists(&self, storage_key: &str) -> bool {
        let shard = shard_of(storage_key);
        self.stored
            .lock()
            .unwrap()
            .iter()
            .any(|k| shard_of(k) == shard)
    }
}

fn shard_of(storage_key: &str) -> &str {
    storage_key.split('/').next().unwrap_or(storage_key)
}

#[async_trait]
impl Storage for MemStorage {
    async fn store(&self, storage_key: &str, _data: Bytes) -> StorageResult<String> {
        if self.fail_on.iter().any(|f| storage_key.ends_with(f)) {
            return Err(StorageError::WriteFailed(format!(
                "forced failure for {}",
                storage_key
            )));
        }
        self.stored.lock().unwrap().push(storage_key.to_string());
        Ok(self.public_url(storage_key))
    }

    async fn remove_parent_dir(&self, storage_key: &str) -> StorageResult<()> {
        let shard = shard_of(storage_key).to_string();
        self.stored
            .lock()
            .unwrap()
            .retain(|k| shard_of(k) != shard);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self
            .stored
            .lock()
            .unwrap()
            .iter()
            .any(|k| k == storage_key))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("mem://{}", storage_key)
    }
}
