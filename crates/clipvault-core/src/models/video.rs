use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of an uploaded video.
///
/// Records are created as `Loading` while their bytes are still being
/// persisted. Once the disk write is confirmed they move to `NoConv` or
/// `Conv` depending on whether the upload was stream-eligible; a failed
/// write moves them to `LoadingError` instead. The transcoding worker owns
/// the `Conv -> Process -> Done`/`Error` edges and this service only reads
/// them back. `Deleted` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "video_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    NoConv,
    Conv,
    Process,
    Done,
    Error,
    Deleted,
    Loading,
    LoadingError,
}

impl VideoStatus {
    /// Post-write state for a confirmed upload: stream-eligible records go
    /// to the transcoding queue, everything else is immediately ready.
    pub fn ready(is_stream: bool) -> Self {
        if is_stream {
            VideoStatus::Conv
        } else {
            VideoStatus::NoConv
        }
    }

    pub fn is_deleted(self) -> bool {
        self == VideoStatus::Deleted
    }

    /// Whether `next` is a legal transition from this state.
    ///
    /// `Deleted` is reachable from every non-deleted state and has no
    /// outgoing edges; `Error -> Conv` is the bulk recovery edge;
    /// `LoadingError` keeps the row visible but admits no retry.
    pub fn may_transition(self, next: VideoStatus) -> bool {
        use VideoStatus::*;
        if self == Deleted {
            return false;
        }
        if next == Deleted {
            return true;
        }
        matches!(
            (self, next),
            (Loading, NoConv)
                | (Loading, Conv)
                | (Loading, LoadingError)
                | (Conv, Process)
                | (Conv, Error)
                | (Process, Done)
                | (Process, Error)
                | (Error, Conv)
        )
    }
}

impl Display for VideoStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            VideoStatus::NoConv => "no_conv",
            VideoStatus::Conv => "conv",
            VideoStatus::Process => "process",
            VideoStatus::Done => "done",
            VideoStatus::Error => "error",
            VideoStatus::Deleted => "deleted",
            VideoStatus::Loading => "loading",
            VideoStatus::LoadingError => "loading_error",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for VideoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_conv" => Ok(VideoStatus::NoConv),
            "conv" => Ok(VideoStatus::Conv),
            "process" => Ok(VideoStatus::Process),
            "done" => Ok(VideoStatus::Done),
            "error" => Ok(VideoStatus::Error),
            "deleted" => Ok(VideoStatus::Deleted),
            "loading" => Ok(VideoStatus::Loading),
            "loading_error" => Ok(VideoStatus::LoadingError),
            other => Err(format!("unknown video status '{}'", other)),
        }
    }
}

/// One metadata row per uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub display_name: String,
    pub storage_path: String,
    pub is_stream: bool,
    pub status: VideoStatus,
    /// Set by the external analysis worker; read back as opaque data.
    pub status_ai: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display-name form for deleted records. Embeds the record id so repeated
/// historical names stay distinguishable after deletion.
pub fn deleted_display_name(current: &str, id: Uuid) -> String {
    format!("{}_deleted_{}", current, id)
}

/// API projection of a record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub file_name: String,
    pub status: VideoStatus,
    pub is_stream: bool,
    /// Public URL of the stored file; never present for deleted records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_ai: Option<String>,
}

impl VideoResponse {
    /// Build the projection, attaching the public link only when the record
    /// still denotes a readable file.
    pub fn from_record(record: VideoRecord, public_url: Option<String>) -> Self {
        let file_path = if record.status.is_deleted() {
            None
        } else {
            public_url
        };
        VideoResponse {
            id: record.id,
            file_name: record.display_name,
            status: record.status,
            is_stream: record.is_stream,
            file_path,
            status_ai: record.status_ai,
        }
    }
}

/// One playback variant produced by the transcoding worker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct VideoFormat {
    pub url: String,
    #[serde(rename = "size")]
    pub resolution: String,
}

/// A `done` record joined with its playback variants.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoFormatLinks {
    pub video_format_id: Uuid,
    pub file_id: Uuid,
    pub filename: String,
    pub formats: Vec<VideoFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: VideoStatus) -> VideoRecord {
        VideoRecord {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            display_name: "clip.mp4".to_string(),
            storage_path: "abc123/clip.mp4".to_string(),
            is_stream: false,
            status,
            status_ai: None,
            uploaded_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_ready_status_follows_stream_flag() {
        assert_eq!(VideoStatus::ready(true), VideoStatus::Conv);
        assert_eq!(VideoStatus::ready(false), VideoStatus::NoConv);
    }

    #[test]
    fn test_wire_names_round_trip() {
        for status in [
            VideoStatus::NoConv,
            VideoStatus::Conv,
            VideoStatus::Process,
            VideoStatus::Done,
            VideoStatus::Error,
            VideoStatus::Deleted,
            VideoStatus::Loading,
            VideoStatus::LoadingError,
        ] {
            let parsed: VideoStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
        assert!("converting".parse::<VideoStatus>().is_err());
    }

    #[test]
    fn test_loading_edges() {
        assert!(VideoStatus::Loading.may_transition(VideoStatus::NoConv));
        assert!(VideoStatus::Loading.may_transition(VideoStatus::Conv));
        assert!(VideoStatus::Loading.may_transition(VideoStatus::LoadingError));
        assert!(!VideoStatus::Loading.may_transition(VideoStatus::Done));
        assert!(!VideoStatus::Loading.may_transition(VideoStatus::Process));
    }

    #[test]
    fn test_deleted_is_terminal_and_reachable() {
        for status in [
            VideoStatus::NoConv,
            VideoStatus::Conv,
            VideoStatus::Process,
            VideoStatus::Done,
            VideoStatus::Error,
            VideoStatus::Loading,
            VideoStatus::LoadingError,
        ] {
            assert!(status.may_transition(VideoStatus::Deleted));
        }
        assert!(!VideoStatus::Deleted.may_transition(VideoStatus::Conv));
        assert!(!VideoStatus::Deleted.may_transition(VideoStatus::Deleted));
    }

    #[test]
    fn test_error_recovers_only_to_conv() {
        assert!(VideoStatus::Error.may_transition(VideoStatus::Conv));
        assert!(!VideoStatus::Error.may_transition(VideoStatus::Process));
        assert!(!VideoStatus::LoadingError.may_transition(VideoStatus::Loading));
        assert!(!VideoStatus::LoadingError.may_transition(VideoStatus::Conv));
    }

    #[test]
    fn test_deleted_marker_embeds_id() {
        let id = Uuid::new_v4();
        let name = deleted_display_name("clip.mp4", id);
        assert!(name.starts_with("clip.mp4"));
        assert!(name.contains(&id.to_string()));
    }

    #[test]
    fn test_response_hides_path_for_deleted() {
        let rec = record(VideoStatus::Deleted);
        let resp = VideoResponse::from_record(rec, Some("http://host/abc/clip.mp4".to_string()));
        assert!(resp.file_path.is_none());

        let rec = record(VideoStatus::Done);
        let resp = VideoResponse::from_record(rec, Some("http://host/abc/clip.mp4".to_string()));
        assert_eq!(
            resp.file_path.as_deref(),
            Some("http://host/abc/clip.mp4")
        );
    }

    #[test]
    fn test_format_serializes_resolution_as_size() {
        let format = VideoFormat {
            url: "http://host/hls/720p.m3u8".to_string(),
            resolution: "720p".to_string(),
        };
        let json = serde_json::to_value(&format).unwrap();
        assert_eq!(json.get("size").and_then(|v| v.as_str()), Some("720p"));
        assert!(json.get("resolution").is_none());
    }
}
