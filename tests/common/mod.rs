//! Shared test harness for integration tests.
//!
//! Provides [`ScriptedApi`], a [`VideoApi`] that replays queued replies and
//! counts calls, and [`TestHarness`], which wires it to a fetcher, cache and
//! provider over a temporary cache root.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::json;
use tempfile::TempDir;

use tubemeta::api::{ApiReply, VideoApi};
use tubemeta::library::{LibraryItem, StaticLibrary};
use tubemeta::metadata::{
    IdentifierExtractor, MetadataCache, RetryPolicy, VideoFetcher, YouTubeMetadataProvider,
};
use tubemeta::{Error, VideoId};
use tubemeta_common::paths::cache_path_for;
use tubemeta_common::VideoResource;

pub const VIDEO_ID: &str = "dQw4w9WgXcQ";
pub const TITLE: &str = "My Video [dQw4w9WgXcQ]";

pub fn video_id() -> VideoId {
    VideoId::parse(VIDEO_ID).unwrap()
}

/// A remote item with the given snippet fields.
pub fn video(title: &str, description: &str, published_at: &str, channel: &str) -> VideoResource {
    serde_json::from_value(json!({
        "kind": "youtube#video",
        "id": VIDEO_ID,
        "snippet": {
            "title": title,
            "description": description,
            "publishedAt": published_at,
            "channelTitle": channel,
            "channelId": "UC0000000000000000000000"
        }
    }))
    .unwrap()
}

pub fn success(items: Vec<VideoResource>) -> ApiReply {
    ApiReply::Success(items)
}

pub fn quota() -> ApiReply {
    ApiReply::QuotaExceeded {
        reason: "quotaExceeded".into(),
    }
}

pub fn server_error() -> ApiReply {
    ApiReply::Fatal(Error::api(Some(500), "backend error"))
}

/// A [`VideoApi`] that replays queued replies in order.
#[derive(Default)]
pub struct ScriptedApi {
    replies: Mutex<VecDeque<ApiReply>>,
    calls: AtomicUsize,
    latency: Option<Duration>,
}

impl ScriptedApi {
    pub fn new(replies: Vec<ApiReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    /// Delay every reply by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoApi for ScriptedApi {
    async fn list_snippets(&self, _id: &VideoId) -> ApiReply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| ApiReply::Fatal(Error::internal("no scripted reply left")))
    }
}

/// 23:59:00 UTC: the quota resets one minute later.
pub fn one_minute_to_midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap()
}

/// Fetcher, cache and provider over a temporary cache root.
pub struct TestHarness {
    pub dir: TempDir,
    pub api: Arc<ScriptedApi>,
    pub fetcher: Arc<VideoFetcher>,
    pub cache: Arc<MetadataCache>,
    pub provider: YouTubeMetadataProvider,
}

impl TestHarness {
    /// Harness whose library maps [`TITLE`] to a file carrying [`VIDEO_ID`].
    pub fn new(api: ScriptedApi) -> Self {
        Self::with_library(
            api,
            StaticLibrary::new(vec![LibraryItem::new(
                TITLE,
                format!("/media/youtube/{TITLE}.mkv"),
            )]),
        )
    }

    pub fn with_library(api: ScriptedApi, library: StaticLibrary) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let api = Arc::new(api);

        let fetcher = VideoFetcher::new(
            api.clone(),
            dir.path().to_path_buf(),
            RetryPolicy::default(),
        )
        .with_clock(Arc::new(one_minute_to_midnight));
        let fetcher = Arc::new(fetcher);

        let cache = Arc::new(MetadataCache::new(
            fetcher.clone(),
            tubemeta::metadata::cache::DEFAULT_MAX_AGE,
        ));
        let provider =
            YouTubeMetadataProvider::new(IdentifierExtractor::new(Arc::new(library)), cache.clone());

        Self {
            dir,
            api,
            fetcher,
            cache,
            provider,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn record_path(&self) -> PathBuf {
        cache_path_for(self.root(), &video_id())
    }

    /// Write a cached record directly, backdated by `age`.
    pub fn seed_record(&self, resource: &VideoResource, age: Duration) {
        let path = self.record_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serde_json::to_vec_pretty(resource).unwrap()).unwrap();
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::now() - age)
            .unwrap();
    }

    pub fn read_record(&self) -> Option<VideoResource> {
        let data = std::fs::read(self.record_path()).ok()?;
        Some(serde_json::from_slice(&data).unwrap())
    }
}

pub const ONE_HOUR: Duration = Duration::from_secs(60 * 60);
pub const THREE_DAYS: Duration = Duration::from_secs(3 * 24 * 60 * 60);
