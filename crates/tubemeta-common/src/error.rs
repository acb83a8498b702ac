//! Common error types used throughout tubemeta.
//!
//! This module provides a unified error type covering identifier extraction,
//! remote API failures, quota exhaustion, cache I/O and cancellation.

use std::sync::Arc;

use crate::ids::VideoId;

/// Common error type for tubemeta.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A string did not match the video identifier pattern.
    #[error("Invalid video id: {0:?}")]
    InvalidVideoId(String),

    /// The host library returned no item for the requested title.
    #[error("No library item named {title:?}")]
    LibraryLookupEmpty {
        /// The title that was looked up.
        title: String,
    },

    /// The remote API returned an empty item list for the identifier.
    #[error("Video not found: {0}")]
    VideoNotFound(VideoId),

    /// Every attempt allowed by the retry policy hit the quota limit.
    #[error("Fetch for {id} exhausted after {attempts} attempts: {reason}")]
    FetchExhausted {
        /// The identifier being fetched.
        id: VideoId,
        /// Number of attempts made.
        attempts: u32,
        /// Quota reason reported by the API on the last attempt.
        reason: String,
    },

    /// The remote API failed for a reason other than quota.
    #[error("API error (status {status:?}): {message}")]
    Api {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding a cached record failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request was cancelled by its caller.
    #[error("Request cancelled")]
    Cancelled,

    /// The outcome of a fetch shared between coalesced requests.
    #[error(transparent)]
    Shared(Arc<Error>),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new InvalidVideoId error.
    pub fn invalid_video_id<S: Into<String>>(value: S) -> Self {
        Self::InvalidVideoId(value.into())
    }

    /// Create a new LibraryLookupEmpty error.
    pub fn library_lookup_empty<S: Into<String>>(title: S) -> Self {
        Self::LibraryLookupEmpty {
            title: title.into(),
        }
    }

    /// Create a new Api error.
    pub fn api<S: Into<String>>(status: Option<u16>, message: S) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// The underlying error, looking through [`Error::Shared`].
    pub fn root(&self) -> &Error {
        match self {
            Self::Shared(inner) => inner.root(),
            other => other,
        }
    }

    /// A copy of this error for requests that joined the same fetch.
    ///
    /// I/O and serialization errors keep their kind and message but lose
    /// their source chain.
    pub fn duplicate(&self) -> Error {
        match self {
            Self::InvalidVideoId(value) => Self::InvalidVideoId(value.clone()),
            Self::LibraryLookupEmpty { title } => Self::LibraryLookupEmpty {
                title: title.clone(),
            },
            Self::VideoNotFound(id) => Self::VideoNotFound(id.clone()),
            Self::FetchExhausted {
                id,
                attempts,
                reason,
            } => Self::FetchExhausted {
                id: id.clone(),
                attempts: *attempts,
                reason: reason.clone(),
            },
            Self::Api { status, message } => Self::Api {
                status: *status,
                message: message.clone(),
            },
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), e.to_string())),
            Self::Serialization(e) => {
                Self::Serialization(serde::de::Error::custom(e.to_string()))
            }
            Self::Cancelled => Self::Cancelled,
            Self::Shared(inner) => Self::Shared(Arc::clone(inner)),
            Self::Internal(msg) => Self::Internal(msg.clone()),
        }
    }

    /// Whether this error is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Self::Cancelled)
    }

    /// Whether this error means the remote video does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::VideoNotFound(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
