use crate::traits::{Storage, StorageError, StorageResult};
use crate::trim::Trimmer;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
///
/// Writes go to a hidden temporary sibling first and are renamed into place
/// once flushed, so a concurrently listing reader never sees a partial file
/// under the final name. When a [`Trimmer`] is configured it runs on the
/// temporary artifact before the rename.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    trimmer: Option<Trimmer>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/clipvault/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:4000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            trimmer: None,
        })
    }

    /// Enable the trim stage for every stored file.
    pub fn with_trimmer(mut self, trimmer: Trimmer) -> Self {
        self.trimmer = Some(trimmer);
        self
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys that could escape the base storage directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_and_sync(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }

    /// Temporary sibling path for an in-flight write. Lives in the final
    /// file's directory so the closing rename stays on one filesystem.
    fn temp_sibling(path: &Path, stage: &str) -> StorageResult<PathBuf> {
        let parent = path
            .parent()
            .ok_or_else(|| StorageError::InvalidKey("Storage key has no directory".to_string()))?;
        let name = path
            .file_name()
            .ok_or_else(|| StorageError::InvalidKey("Storage key has no file name".to_string()))?;
        Ok(parent.join(format!(
            ".{}.{}-{}",
            name.to_string_lossy(),
            stage,
            Uuid::new_v4()
        )))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(&self, storage_key: &str, data: Bytes) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create directory for {}: {}",
                path.display(),
                e
            ))
        })?;

        let tmp = Self::temp_sibling(&path, "tmp")?;
        if let Err(e) = self.write_and_sync(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StorageError::WriteFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        // Trim runs on the invisible temporary; the untrimmed artifact is
        // discarded either way.
        let ready = if let Some(trimmer) = &self.trimmer {
            let trimmed = Self::temp_sibling(&path, "trim")?;
            match trimmer.trim(&tmp, &trimmed).await {
                Ok(()) => {
                    let _ = fs::remove_file(&tmp).await;
                    trimmed
                }
                Err(e) => {
                    let _ = fs::remove_file(&tmp).await;
                    let _ = fs::remove_file(&trimmed).await;
                    return Err(e);
                }
            }
        } else {
            tmp
        };

        if let Err(e) = fs::rename(&ready, &path).await {
            let _ = fs::remove_file(&ready).await;
            return Err(StorageError::WriteFailed(format!(
                "Failed to finalize file {}: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            trimmed = self.trimmer.is_some(),
            "Local storage write successful"
        );

        Ok(self.public_url(storage_key))
    }

    async fn remove_parent_dir(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let shard = path
            .parent()
            .ok_or_else(|| StorageError::InvalidKey("Storage key has no directory".to_string()))?;

        // A bare filename would make this a removal of the whole storage root
        if shard == self.base_path {
            return Err(StorageError::InvalidKey(
                "Storage key has no shard directory".to_string(),
            ));
        }

        match fs::remove_dir_all(shard).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StorageError::RemoveFailed(format!(
                    "Failed to remove directory {}: {}",
                    shard.display(),
                    e
                )));
            }
        }

        tracing::info!(
            shard = %shard.display(),
            key = %storage_key,
            "Local storage shard removed"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::storage_key;
    use tempfile::tempdir;

    const BASE_URL: &str = "http://localhost:4000/media";

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, BASE_URL.to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn test_store_and_read_back() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let key = storage_key(Uuid::new_v4(), "clip.mp4");
        let data = Bytes::from_static(b"video bytes");

        let url = storage.store(&key, data.clone()).await.unwrap();
        assert!(url.contains("clip.mp4"));
        assert_eq!(url, format!("{}/{}", BASE_URL, key));

        let written = fs::read(dir.path().join(&key)).await.unwrap();
        assert_eq!(written, data.to_vec());
        assert!(storage.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_leaves_no_temporaries() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let key = storage_key(Uuid::new_v4(), "clip.mp4");
        storage
            .store(&key, Bytes::from_static(b"payload"))
            .await
            .unwrap();

        let shard = dir.path().join(key.split('/').next().unwrap());
        let mut entries = fs::read_dir(&shard).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["clip.mp4".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_final_name_absent() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let key = storage_key(Uuid::new_v4(), "clip.mp4");
        // Occupy the shard path with a regular file so directory creation fails
        let shard = key.split('/').next().unwrap();
        fs::write(dir.path().join(shard), b"in the way").await.unwrap();

        let result = storage.store(&key, Bytes::from_static(b"payload")).await;
        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
        assert!(!storage.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage
            .store("../../etc/passwd", Bytes::from_static(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.remove_parent_dir("../etc").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_remove_parent_dir_reclaims_shard() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let key = storage_key(Uuid::new_v4(), "clip.mp4");
        storage
            .store(&key, Bytes::from_static(b"payload"))
            .await
            .unwrap();

        // Sibling artifact inside the shard goes with it
        let shard = dir.path().join(key.split('/').next().unwrap());
        fs::write(shard.join("clip-720p.mp4"), b"variant").await.unwrap();

        storage.remove_parent_dir(&key).await.unwrap();
        assert!(!fs::try_exists(&shard).await.unwrap());

        // Removing an already-absent shard is fine
        storage.remove_parent_dir(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_parent_dir_refuses_unsharded_key() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.remove_parent_dir("clip.mp4").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_store_with_trim_replaces_artifact() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        // Stand-in for ffmpeg: copies the input arg ($3) to the output arg ($8)
        let script = dir.path().join("fake-ffmpeg.sh");
        std::fs::write(&script, "#!/bin/sh\ncp \"$3\" \"$8\"\n").unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();

        let media_root = dir.path().join("media");
        let storage = LocalStorage::new(&media_root, BASE_URL.to_string())
            .await
            .unwrap()
            .with_trimmer(Trimmer::new(script.to_string_lossy().into_owned(), 30));

        let key = storage_key(Uuid::new_v4(), "clip.mp4");
        storage
            .store(&key, Bytes::from_static(b"trimmable"))
            .await
            .unwrap();

        let written = fs::read(media_root.join(&key)).await.unwrap();
        assert_eq!(written, b"trimmable");

        let shard = media_root.join(key.split('/').next().unwrap());
        let mut entries = fs::read_dir(&shard).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_failed_trim_discards_artifacts() {
        let dir = tempdir().unwrap();
        let media_root = dir.path().join("media");
        let storage = LocalStorage::new(&media_root, BASE_URL.to_string())
            .await
            .unwrap()
            .with_trimmer(Trimmer::new("false", 30));

        let key = storage_key(Uuid::new_v4(), "clip.mp4");
        let result = storage.store(&key, Bytes::from_static(b"payload")).await;
        assert!(matches!(result, Err(StorageError::TrimFailed(_))));

        // Neither the final file nor any temporary survives
        let shard = media_root.join(key.split('/').next().unwrap());
        let mut entries = fs::read_dir(&shard).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }
}
