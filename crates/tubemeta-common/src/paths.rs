//! Path utilities for the metadata cache layout and video file detection.
//!
//! The cache stores one JSON record per identifier at
//! `<cache-root>/youtubemetadata/<id>/ytvideo.json`. [`cache_path_for`] is the
//! only place that layout is spelled out.

use std::path::{Path, PathBuf};

use crate::ids::VideoId;

/// Directory under the cache root that holds all video records.
pub const CACHE_DIR_NAME: &str = "youtubemetadata";

/// File name of a cached record inside its identifier directory.
pub const CACHE_FILE_NAME: &str = "ytvideo.json";

/// List of supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "webm", "mov", "wmv", "flv",
];

/// Compute the cache file path for a video identifier.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use tubemeta_common::paths::cache_path_for;
/// use tubemeta_common::VideoId;
///
/// let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
/// assert_eq!(
///     cache_path_for(Path::new("/var/cache"), &id),
///     PathBuf::from("/var/cache/youtubemetadata/dQw4w9WgXcQ/ytvideo.json"),
/// );
/// ```
#[must_use]
pub fn cache_path_for(root: &Path, id: &VideoId) -> PathBuf {
    root.join(CACHE_DIR_NAME)
        .join(id.as_str())
        .join(CACHE_FILE_NAME)
}

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tubemeta_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("clip [dQw4w9WgXcQ].webm")));
/// assert!(!is_video_file(Path::new("clip [dQw4w9WgXcQ].info.json")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
