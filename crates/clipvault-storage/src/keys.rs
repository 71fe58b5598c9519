//! Shared storage key generation.
//!
//! Key format: `"{hex(sha256(owner_id || filename))}/{filename}"`. The digest
//! shard keeps two owners' identically-named files on distinct paths and
//! spreads directories across a wide namespace.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Derive the storage key for the given owner and filename.
///
/// Deterministic: the same `(owner_id, filename)` pair always yields the same
/// key, so retried uploads target the same location. Performs no I/O.
pub fn storage_key(owner_id: Uuid, filename: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(owner_id.to_string().as_bytes());
    hasher.update(filename.as_bytes());
    format!("{}/{}", hex::encode(hasher.finalize()), filename)
}
