//! Freshness-bounded metadata cache.
//!
//! [`MetadataCache`] guarantees a recent copy of a video's record on disk
//! before it is read. Records older than the configured maximum age are
//! refetched through the [`VideoFetcher`]; a failed refresh keeps serving the
//! stale record.
//!
//! Concurrent [`ensure_fresh`](MetadataCache::ensure_fresh) calls for the same
//! identifier are coalesced so only one fetch runs at a time. Waiters receive
//! the leader's outcome; if the leader is cancelled, a waiter takes over.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tubemeta_common::paths::cache_path_for;
use tubemeta_common::{Error, Result, VideoId, VideoResource};

use super::fetcher::VideoFetcher;

/// Default freshness window: two days.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// State of the cached record after [`MetadataCache::ensure_fresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The record was within the freshness window; no request was made.
    Fresh,
    /// No record existed and one was fetched.
    Fetched,
    /// A stale record was replaced by a fresh fetch.
    Refreshed,
    /// A stale record could not be refreshed and is served as-is.
    Stale,
}

/// A fetch in progress for one identifier.
#[derive(Default)]
struct InFlight {
    notify: Notify,
    finished: AtomicBool,
    /// Outcome shared with waiters. `None` once finished means the leader was
    /// cancelled and a waiter should retry.
    outcome: Mutex<Option<std::result::Result<CacheStatus, Arc<Error>>>>,
}

/// Removes the in-flight entry and wakes waiters when the leader finishes or
/// is dropped.
struct FlightGuard<'a> {
    in_flight: &'a DashMap<VideoId, Arc<InFlight>>,
    id: VideoId,
    flight: Arc<InFlight>,
}

impl FlightGuard<'_> {
    /// Record the leader's result for waiters and hand it back to the leader.
    fn complete(self, result: Result<CacheStatus>) -> Result<CacheStatus> {
        self.detach();

        // Only the guard holds the flight once detached, unless someone joined.
        let has_waiters = Arc::strong_count(&self.flight) > 1;

        match result {
            Ok(status) => {
                *self.flight.outcome.lock() = Some(Ok(status));
                Ok(status)
            }
            // A cancelled leader leaves no outcome so a waiter takes over.
            Err(Error::Cancelled) => Err(Error::Cancelled),
            // The leader keeps its own error; waiters get a copy.
            Err(e) => {
                if has_waiters {
                    *self.flight.outcome.lock() = Some(Err(Arc::new(e.duplicate())));
                }
                Err(e)
            }
        }
    }

    fn detach(&self) {
        self.in_flight
            .remove_if(&self.id, |_, flight| Arc::ptr_eq(flight, &self.flight));
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.detach();
        self.flight.finished.store(true, Ordering::Release);
        self.flight.notify.notify_waiters();
    }
}

/// On-disk cache of remote video records.
pub struct MetadataCache {
    fetcher: Arc<VideoFetcher>,
    max_age: Duration,
    in_flight: DashMap<VideoId, Arc<InFlight>>,
}

impl MetadataCache {
    /// Create a cache over the fetcher's cache root.
    pub fn new(fetcher: Arc<VideoFetcher>, max_age: Duration) -> Self {
        Self {
            fetcher,
            max_age,
            in_flight: DashMap::new(),
        }
    }

    pub fn fetcher(&self) -> &Arc<VideoFetcher> {
        &self.fetcher
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Cache file location for `id`.
    pub fn path_for(&self, id: &VideoId) -> PathBuf {
        cache_path_for(self.fetcher.cache_root(), id)
    }

    /// Make sure a fresh record for `id` is on disk, fetching if needed.
    ///
    /// Must be awaited before [`load_cached`](Self::load_cached).
    ///
    /// # Errors
    ///
    /// Fetch errors are returned when no record existed beforehand. For a
    /// stale record, cancellation and [`Error::VideoNotFound`] are returned;
    /// any other failure is logged and reported as [`CacheStatus::Stale`].
    /// A request that joined another's fetch gets its error as
    /// [`Error::Shared`].
    pub async fn ensure_fresh(
        &self,
        id: &VideoId,
        cancel: &CancellationToken,
    ) -> Result<CacheStatus> {
        let path = self.path_for(id);

        // Fast path: fresh record, no coordination needed.
        if self.is_fresh(&path).await? {
            debug!(video_id = %id, "Cached metadata is fresh");
            return Ok(CacheStatus::Fresh);
        }

        loop {
            let flight = match self.in_flight.entry(id.clone()) {
                Entry::Occupied(e) => Arc::clone(e.get()),
                Entry::Vacant(e) => {
                    let flight = Arc::new(InFlight::default());
                    e.insert(Arc::clone(&flight));

                    let guard = FlightGuard {
                        in_flight: &self.in_flight,
                        id: id.clone(),
                        flight,
                    };
                    let result = self.refresh(id, &path, cancel).await;
                    return guard.complete(result);
                }
            };

            debug!(video_id = %id, "Joining in-flight fetch");
            let notified = flight.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if !flight.finished.load(Ordering::Acquire) {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(Error::Cancelled),
                    _ = notified => {}
                }
            }

            let outcome = flight.outcome.lock().clone();
            match outcome {
                Some(Ok(status)) => return Ok(status),
                Some(Err(e)) => return Err(Error::Shared(e)),
                None => {
                    debug!(video_id = %id, "In-flight fetch was cancelled, retrying");
                }
            }
        }
    }

    /// Load the cached record for `id`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded.
    pub async fn load_cached(&self, id: &VideoId) -> Result<Option<VideoResource>> {
        let path = self.path_for(id);
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_slice(&data)?))
    }

    /// Decide between fresh, fetch and refresh while holding the in-flight slot.
    async fn refresh(
        &self,
        id: &VideoId,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<CacheStatus> {
        match record_age(path).await? {
            None => {
                debug!(video_id = %id, "No cached metadata, fetching");
                self.fetcher.fetch(id, cancel).await?;
                Ok(CacheStatus::Fetched)
            }
            // Another request may have refreshed it since the fast-path check.
            Some(age) if age <= self.max_age => Ok(CacheStatus::Fresh),
            Some(age) => {
                debug!(video_id = %id, age_secs = age.as_secs(), "Cached metadata is stale, refreshing");
                match self.fetcher.fetch(id, cancel).await {
                    Ok(_) => Ok(CacheStatus::Refreshed),
                    Err(Error::Cancelled) => Err(Error::Cancelled),
                    // The video is gone; the old record stays on disk but is not served.
                    Err(e) if e.is_not_found() => {
                        info!(video_id = %id, "Video no longer exists on YouTube");
                        Err(e)
                    }
                    Err(e) => {
                        warn!(
                            video_id = %id,
                            error = %e,
                            "Failed to refresh stale metadata; serving cached copy"
                        );
                        Ok(CacheStatus::Stale)
                    }
                }
            }
        }
    }

    async fn is_fresh(&self, path: &Path) -> Result<bool> {
        Ok(matches!(record_age(path).await?, Some(age) if age <= self.max_age))
    }
}

/// Age of the file at `path` by modification time, `None` if it does not exist.
///
/// A modification time in the future counts as age zero.
async fn record_age(path: &Path) -> Result<Option<Duration>> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let modified = metadata.modified()?;
    Ok(Some(
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO),
    ))
}
