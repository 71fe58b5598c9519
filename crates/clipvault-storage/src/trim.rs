//! External trim-tool invocation.
//!
//! Stream-copies the first `max_seconds` of a video into a new file via
//! ffmpeg. Runs as a post-write stage on a not-yet-visible temporary
//! artifact, so a failed trim never leaves a truncated file under the final
//! name.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::traits::{StorageError, StorageResult};

/// Bounded-duration trimmer backed by an external ffmpeg binary.
#[derive(Clone, Debug)]
pub struct Trimmer {
    ffmpeg_path: String,
    max_seconds: u64,
}

impl Trimmer {
    pub fn new(ffmpeg_path: impl Into<String>, max_seconds: u64) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            max_seconds,
        }
    }

    /// Write the first `max_seconds` of `input` to `output`.
    ///
    /// `output` must not exist; ffmpeg is invoked with `-y` so a stale
    /// temporary from an interrupted earlier run is overwritten.
    pub async fn trim(&self, input: &Path, output: &Path) -> StorageResult<()> {
        let limit = self.max_seconds.to_string();
        let result = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-t")
            .arg(&limit)
            .arg("-c")
            .arg("copy")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                StorageError::TrimFailed(format!(
                    "failed to spawn {}: {}",
                    self.ffmpeg_path, e
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            // Last line carries the actual ffmpeg error
            let reason = stderr.lines().last().unwrap_or("unknown error");
            return Err(StorageError::TrimFailed(format!(
                "{} exited with {}: {}",
                self.ffmpeg_path, result.status, reason
            )));
        }

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            max_seconds = self.max_seconds,
            "Video trimmed to duration bound"
        );

        Ok(())
    }
}
