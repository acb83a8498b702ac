//! Tubemeta-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across tubemeta:
//!
//! - **Typed IDs**: [`VideoId`], the 11-character remote video identifier
//! - **Core Types**: The cached remote record and the metadata result handed
//!   to the host library
//! - **Path Utilities**: Cache layout and video file detection
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//! use tubemeta_common::paths::cache_path_for;
//! use tubemeta_common::{Error, Result, VideoId};
//!
//! let id = VideoId::find_in("My Video [dQw4w9WgXcQ].mkv").unwrap();
//! assert_eq!(id.as_str(), "dQw4w9WgXcQ");
//!
//! let path = cache_path_for(Path::new("/cache"), &id);
//! assert!(path.ends_with("youtubemetadata/dQw4w9WgXcQ/ytvideo.json"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::library_lookup_empty("missing"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
