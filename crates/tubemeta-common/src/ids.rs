//! Typed identifier for remote videos.
//!
//! A [`VideoId`] is the 11-character token the hosting service uses to name a
//! video. Local files carry it in square brackets, e.g.
//! `My Video [dQw4w9WgXcQ].mkv`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of characters in a video identifier.
pub const VIDEO_ID_LEN: usize = 11;

/// An identifier enclosed in square brackets.
static BRACKETED_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([A-Za-z0-9_-]{11})\]").expect("bracketed video id pattern is valid")
});

/// Identifier of a remote video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Validate and wrap a bare identifier.
    pub fn parse(value: &str) -> Result<Self> {
        if is_valid(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(Error::invalid_video_id(value))
        }
    }

    /// Find the first bracketed identifier in `text`, scanning left to right.
    ///
    /// # Examples
    ///
    /// ```
    /// use tubemeta_common::VideoId;
    ///
    /// let id = VideoId::find_in("/media/My Video [dQw4w9WgXcQ].mkv").unwrap();
    /// assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    /// assert!(VideoId::find_in("/media/no id here.mkv").is_none());
    /// ```
    pub fn find_in(text: &str) -> Option<Self> {
        BRACKETED_ID
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_owned()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid(value: &str) -> bool {
    value.len() == VIDEO_ID_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        if is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidVideoId(value))
        }
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}
