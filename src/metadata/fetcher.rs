//! Remote fetcher with quota-aware retries.
//!
//! [`VideoFetcher`] requests one video's snippet through a [`VideoApi`] and
//! persists the first returned item to the cache path. When the API reports
//! an exhausted quota the fetcher sleeps until the next UTC midnight plus a
//! safety margin, then tries again, up to [`RetryPolicy::max_attempts`] in
//! total. Cancellation is honoured during both the request and the sleep.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tubemeta_common::paths::cache_path_for;
use tubemeta_common::{Error, Result, VideoId, VideoResource};

use crate::api::{ApiReply, VideoApi};
use crate::config::QuotaConfig;

/// Source of the current wall-clock time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Fallback wait when the next midnight cannot be represented.
const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// How quota failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per fetch, including the first.
    pub max_attempts: u32,
    /// Added to the wait until the quota reset.
    pub safety_margin: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            safety_margin: Duration::from_secs(60),
        }
    }
}

impl From<&QuotaConfig> for RetryPolicy {
    fn from(config: &QuotaConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            safety_margin: Duration::from_secs(config.safety_margin_secs),
        }
    }
}

impl RetryPolicy {
    /// Wait before retrying a quota failure observed at `now`.
    pub fn retry_after(&self, now: DateTime<Utc>) -> Duration {
        until_next_utc_midnight(now).saturating_add(self.safety_margin)
    }
}

/// Time remaining from `now` until the next UTC midnight.
///
/// Exactly at midnight the next reset is a full day away.
pub fn until_next_utc_midnight(now: DateTime<Utc>) -> Duration {
    now.date_naive()
        .succ_opt()
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
        .and_then(|midnight| (midnight.and_utc() - now).to_std().ok())
        .unwrap_or(ONE_DAY)
}

/// Fetches video snippets and writes them to the cache.
pub struct VideoFetcher {
    api: Arc<dyn VideoApi>,
    cache_root: PathBuf,
    policy: RetryPolicy,
    clock: Clock,
}

impl VideoFetcher {
    /// Create a fetcher writing records under `cache_root`.
    pub fn new(api: Arc<dyn VideoApi>, cache_root: PathBuf, policy: RetryPolicy) -> Self {
        Self {
            api,
            cache_root,
            policy,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used to compute quota waits.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn api(&self) -> &Arc<dyn VideoApi> {
        &self.api
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetch `id` from the remote API and persist it to the cache.
    ///
    /// # Errors
    ///
    /// - [`Error::VideoNotFound`] if the API returns no item.
    /// - [`Error::FetchExhausted`] if every attempt hit the quota.
    /// - [`Error::Cancelled`] if `cancel` fires during the request or the wait.
    /// - [`Error::Io`] / [`Error::Serialization`] if the record cannot be written;
    ///   any existing record is left untouched.
    pub async fn fetch(&self, id: &VideoId, cancel: &CancellationToken) -> Result<VideoResource> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(video_id = %id, attempt, "Requesting video snippet");

            let reply = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                reply = self.api.list_snippets(id) => reply,
            };

            match reply {
                ApiReply::Success(items) => {
                    let resource = items
                        .into_iter()
                        .next()
                        .ok_or_else(|| Error::VideoNotFound(id.clone()))?;

                    self.persist(id, &resource).await?;
                    info!(video_id = %id, title = %resource.snippet.title, "Cached video metadata");
                    return Ok(resource);
                }
                ApiReply::QuotaExceeded { reason } => {
                    if attempt >= self.policy.max_attempts {
                        warn!(
                            video_id = %id,
                            attempts = attempt,
                            reason = %reason,
                            "YouTube quota still exceeded, giving up"
                        );
                        return Err(Error::FetchExhausted {
                            id: id.clone(),
                            attempts: attempt,
                            reason,
                        });
                    }

                    let wait = self.policy.retry_after((self.clock)());
                    warn!(
                        video_id = %id,
                        attempt,
                        wait_secs = wait.as_secs(),
                        reason = %reason,
                        "YouTube quota exceeded, waiting for reset"
                    );

                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(Error::Cancelled),
                        _ = tokio::time::sleep(wait) => {}
                    }
                }
                ApiReply::Fatal(e) => return Err(e),
            }
        }
    }

    /// Write `resource` to its cache path via a temp file and rename.
    async fn persist(&self, id: &VideoId, resource: &VideoResource) -> Result<()> {
        let path = cache_path_for(&self.cache_root, id);
        let data = serde_json::to_vec_pretty(resource)?;

        tokio::task::spawn_blocking(move || write_atomic(&path, &data))
            .await
            .map_err(|e| Error::internal(format!("spawn_blocking join error: {e}")))?
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::internal(format!("cache path has no parent: {}", path.display())))?;
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
