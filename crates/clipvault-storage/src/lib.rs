//! Clipvault Storage Library
//!
//! Disk persistence for uploaded videos: digest-sharded storage keys, an
//! atomic local filesystem writer, and the optional ffmpeg trim stage.
//!
//! # Storage key format
//!
//! Every file lives in its own shard directory named by the hex SHA-256
//! digest of `owner_id || filename`: `"{digest}/{filename}"`. Including the
//! owner in the digest keeps identically-named uploads from different owners
//! apart and makes shard names unguessable from the filename alone. Keys must
//! not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module.

pub mod keys;
pub mod local;
pub mod traits;
pub mod trim;

// Re-export commonly used types
pub use keys::storage_key;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
pub use trim::Trimmer;
