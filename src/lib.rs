//! Tubemeta - YouTube metadata for media libraries
//!
//! Resolves the video id embedded in a file name (`Title [dQw4w9WgXcQ].mkv`),
//! keeps a two-day on-disk cache of the video's snippet, and maps it to the
//! host library's metadata structure. Remote fetches wait out an exhausted
//! daily quota instead of failing immediately.

pub mod api;
pub mod config;
pub mod library;
pub mod metadata;
pub mod telemetry;

pub use tubemeta_common::{Error, MetadataResult, Result, VideoId};
