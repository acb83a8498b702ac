//! Core type definitions for cached remote records and host metadata results.
//!
//! [`VideoResource`] mirrors one item of the remote `videos.list` response. Only
//! the snippet fields tubemeta consumes are typed; everything else is kept in
//! flattened maps so the cache file holds the item verbatim.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One video item as returned by the remote API and stored in the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoResource {
    /// Remote identifier of the video.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Descriptive fields of the video.
    #[serde(default)]
    pub snippet: VideoSnippet,
    /// Fields of the item not consumed by tubemeta.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The snippet part of a video item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    /// Video title.
    #[serde(default)]
    pub title: String,
    /// Free-form video description.
    #[serde(default)]
    pub description: String,
    /// Publication timestamp as sent by the API (ISO-8601).
    #[serde(default)]
    pub published_at: String,
    /// Display name of the publishing channel.
    #[serde(default)]
    pub channel_title: String,
    /// Snippet fields not consumed by tubemeta.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VideoSnippet {
    /// Parse [`published_at`](Self::published_at) as a UTC timestamp.
    ///
    /// Accepts RFC 3339 (the API's format), a naive `YYYY-MM-DDTHH:MM:SS`
    /// timestamp (taken as UTC), or a bare `YYYY-MM-DD` date.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        let raw = self.published_at.trim();
        if raw.is_empty() {
            return None;
        }

        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            })
    }
}

/// Role of a person attached to a metadata result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
    /// The creator of the item. Channels are reported in this role.
    Director,
}

impl fmt::Display for PersonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Director => write!(f, "director"),
        }
    }
}

/// A person associated with a metadata result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInfo {
    /// Display name.
    pub name: String,
    /// Role of the person for this item.
    pub role: PersonRole,
}

/// Item fields handed to the host library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Item title.
    pub title: String,
    /// Synopsis / overview text.
    pub overview: Option<String>,
    /// Year the video was published.
    pub production_year: Option<i32>,
    /// Date the video was published.
    pub premiere_date: Option<NaiveDate>,
    /// Map of external provider IDs keyed by provider name
    /// (e.g. `{"youtube": "dQw4w9WgXcQ"}`).
    pub provider_ids: HashMap<String, String>,
}

/// Metadata lookup result returned to the host library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataResult {
    /// Whether metadata was found.
    pub has_metadata: bool,
    /// The mapped item, present when `has_metadata` is set.
    pub item: Option<VideoMetadata>,
    /// People associated with the item.
    pub people: Vec<PersonInfo>,
}

impl MetadataResult {
    /// A well-formed result carrying no metadata.
    pub fn empty() -> Self {
        Self::default()
    }
}
