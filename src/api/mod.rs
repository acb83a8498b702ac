//! Remote video metadata API.
//!
//! [`VideoApi`] is the single read operation tubemeta needs from the hosting
//! service: the snippet of one video. Implementations classify every response
//! into an [`ApiReply`] so callers drive quota retries with a plain `match`
//! instead of inspecting errors.

mod client;
mod types;

use async_trait::async_trait;
use tubemeta_common::{Error, VideoId, VideoResource};

pub use client::YouTubeClient;

/// Classified outcome of a single API request.
#[derive(Debug)]
pub enum ApiReply {
    /// The request succeeded; the list holds at most one item.
    Success(Vec<VideoResource>),
    /// The daily quota is exhausted until the next reset.
    QuotaExceeded {
        /// Reason reported by the API (e.g. `quotaExceeded`).
        reason: String,
    },
    /// Any other failure. Not retried.
    Fatal(Error),
}

/// Read access to video snippets on the remote service.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// Returns `true` when the API has credentials and can serve requests.
    fn is_available(&self) -> bool {
        true
    }

    /// Fetch the snippet of exactly one video.
    async fn list_snippets(&self, id: &VideoId) -> ApiReply;
}
