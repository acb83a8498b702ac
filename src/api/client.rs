//! YouTube Data API v3 client.
//!
//! Implements [`VideoApi`] with a single `videos.list?part=snippet` request per
//! call. Responses are classified, never retried here:
//!
//! - 2xx -> [`ApiReply::Success`] with the decoded item list.
//! - 403/429 carrying a quota reason, or a bare 429 -> [`ApiReply::QuotaExceeded`].
//! - Anything else, including transport failures -> [`ApiReply::Fatal`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use tubemeta_common::{Error, VideoId};

use super::types::{ErrorEnvelope, VideoListResponse};
use super::{ApiReply, VideoApi};
use crate::config::YouTubeConfig;

/// Error reasons that mean the quota is spent until the next reset.
const QUOTA_REASONS: &[&str] = &[
    "quotaExceeded",
    "dailyLimitExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
];

/// YouTube Data API client.
///
/// # Examples
///
/// ```no_run
/// use tubemeta::api::YouTubeClient;
/// use tubemeta::config::YouTubeConfig;
///
/// let config = YouTubeConfig {
///     api_key: "your-api-key".into(),
///     ..Default::default()
/// };
/// let client = YouTubeClient::new(&config);
/// ```
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    /// Create a client from configuration.
    ///
    /// The application name is sent as the `User-Agent`.
    pub fn new(config: &YouTubeConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.application_name.clone())
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl VideoApi for YouTubeClient {
    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn list_snippets(&self, id: &VideoId) -> ApiReply {
        debug!(video_id = %id, "YouTube videos.list");

        let response = match self
            .client
            .get(self.url("/videos"))
            .query(&[
                ("part", "snippet"),
                ("id", id.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return ApiReply::Fatal(Error::api(
                    None,
                    format!("YouTube request failed: {}", e.without_url()),
                ))
            }
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<VideoListResponse>().await {
                Ok(body) => ApiReply::Success(body.items),
                Err(e) => ApiReply::Fatal(Error::api(
                    Some(status.as_u16()),
                    format!("failed to parse videos.list response: {}", e.without_url()),
                )),
            };
        }

        let body = response.text().await.unwrap_or_default();
        classify_error(status, &body)
    }
}

/// Map a non-success response to a reply.
fn classify_error(status: StatusCode, body: &str) -> ApiReply {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();

    let quota_reason = envelope.as_ref().and_then(|env| {
        env.error
            .errors
            .iter()
            .map(|detail| detail.reason.as_str())
            .find(|reason| QUOTA_REASONS.contains(reason))
    });

    match (status, quota_reason) {
        (StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS, Some(reason)) => {
            ApiReply::QuotaExceeded {
                reason: reason.to_string(),
            }
        }
        (StatusCode::TOO_MANY_REQUESTS, None) => ApiReply::QuotaExceeded {
            reason: "tooManyRequests".to_string(),
        },
        _ => {
            let message = envelope
                .map(|env| env.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            ApiReply::Fatal(Error::api(Some(status.as_u16()), message))
        }
    }
}
