//! Clipvault DB Library
//!
//! Metadata persistence for uploaded videos: the [`VideoStore`] interface the
//! services are written against, and its Postgres implementation
//! [`VideoRepository`].

pub mod store;
pub mod videos;

pub use store::VideoStore;
pub use videos::VideoRepository;
