//! Storage abstraction trait
//!
//! This module defines the Storage trait the ingestion pipeline writes
//! through, so the orchestrator can be exercised against fakes in tests.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Trim failed: {0}")]
    TrimFailed(String),

    #[error("Remove failed: {0}")]
    RemoveFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable byte storage for uploaded videos.
///
/// Keys follow the digest-sharded format produced by [`crate::keys`]; one
/// shard directory owns one record's file plus any derived artifacts.
/// Implementations must guarantee that a reader never observes a partially
/// written file under the final key.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Durably persist `data` under `storage_key` and return the public URL.
    ///
    /// Parent directories are created as needed. The write is atomic with
    /// respect to visibility: on failure nothing is left under the final key.
    async fn store(&self, storage_key: &str, data: Bytes) -> StorageResult<String>;

    /// Recursively remove the shard directory owning `storage_key`,
    /// including sibling artifacts. Removing an absent shard is not an error.
    async fn remove_parent_dir(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists under `storage_key`.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Public URL for a stored key. Pure formatting, no existence check.
    fn public_url(&self, storage_key: &str) -> String;
}
