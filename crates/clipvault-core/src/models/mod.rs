//! Domain models

pub mod video;

pub use video::{
    deleted_display_name, VideoFormat, VideoFormatLinks, VideoRecord, VideoResponse, VideoStatus,
};
