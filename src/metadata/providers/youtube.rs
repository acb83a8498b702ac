//! YouTube metadata provider.
//!
//! Implements [`MetadataProvider`] by chaining the identifier extractor, the
//! metadata cache and the remote fetcher:
//!
//! 1. Resolve the title to a library path and pull the `[id]` token out of it.
//! 2. Make sure a fresh record for that id is cached (fetching if needed).
//! 3. Load the cached record and map it to a [`MetadataResult`].
//!
//! The channel is reported as the item's director.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tubemeta_common::{
    MetadataResult, PersonInfo, PersonRole, Result, VideoId, VideoMetadata, VideoResource,
};

use crate::api::{VideoApi, YouTubeClient};
use crate::config::Config;
use crate::library::LibraryLookup;
use crate::metadata::cache::MetadataCache;
use crate::metadata::extractor::IdentifierExtractor;
use crate::metadata::fetcher::{RetryPolicy, VideoFetcher};
use crate::metadata::provider::MetadataProvider;

/// Key used for the video id in [`VideoMetadata::provider_ids`].
pub const PROVIDER_ID_KEY: &str = "youtube";

/// Metadata provider backed by the YouTube Data API and a local cache.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tubemeta::config::Config;
/// use tubemeta::library::DirectoryLibrary;
/// use tubemeta::metadata::providers::YouTubeMetadataProvider;
///
/// let config = Config::default();
/// let library = Arc::new(DirectoryLibrary::new(config.library.paths.clone()));
/// let provider = YouTubeMetadataProvider::from_config(&config, library);
/// ```
pub struct YouTubeMetadataProvider {
    extractor: IdentifierExtractor,
    cache: Arc<MetadataCache>,
}

impl YouTubeMetadataProvider {
    /// Assemble a provider from its parts.
    pub fn new(extractor: IdentifierExtractor, cache: Arc<MetadataCache>) -> Self {
        Self { extractor, cache }
    }

    /// Build the full provider stack from configuration.
    pub fn from_config(config: &Config, library: Arc<dyn LibraryLookup>) -> Self {
        let api: Arc<dyn VideoApi> = Arc::new(YouTubeClient::new(&config.youtube));
        let fetcher = VideoFetcher::new(
            api,
            config.cache.resolved_dir(),
            RetryPolicy::from(&config.quota),
        );
        let cache = MetadataCache::new(Arc::new(fetcher), config.cache.max_age());

        Self::new(IdentifierExtractor::new(library), Arc::new(cache))
    }

    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }
}

#[async_trait]
impl MetadataProvider for YouTubeMetadataProvider {
    fn name(&self) -> &'static str {
        "YouTube Metadata"
    }

    fn is_available(&self) -> bool {
        self.cache.fetcher().api().is_available()
    }

    async fn try_get_metadata(
        &self,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<MetadataResult> {
        let Some(id) = self.extractor.extract(title).await? else {
            info!(title = title, "No video id in file name; skipping metadata fetch");
            return Ok(MetadataResult::empty());
        };

        debug!(title = title, video_id = %id, "Resolved video id");

        match self.cache.ensure_fresh(&id, cancel).await {
            Ok(status) => debug!(video_id = %id, status = ?status, "Cache ready"),
            Err(e) if e.is_not_found() => {
                info!(video_id = %id, "Video not found on YouTube");
                return Ok(MetadataResult::empty());
            }
            Err(e) => return Err(e),
        }

        match self.cache.load_cached(&id).await? {
            Some(resource) => Ok(to_metadata_result(&id, &resource)),
            None => {
                warn!(video_id = %id, "No cached record after refresh");
                Ok(MetadataResult::empty())
            }
        }
    }
}

/// Map a cached record to the host's metadata structure.
fn to_metadata_result(id: &VideoId, resource: &VideoResource) -> MetadataResult {
    let snippet = &resource.snippet;

    let published = snippet.published();
    if published.is_none() && !snippet.published_at.is_empty() {
        warn!(
            video_id = %id,
            published_at = %snippet.published_at,
            "Unparseable publish date"
        );
    }
    let premiere_date = published.map(|dt| dt.date_naive());

    let mut provider_ids = HashMap::new();
    provider_ids.insert(PROVIDER_ID_KEY.to_string(), id.to_string());

    let people = if snippet.channel_title.is_empty() {
        Vec::new()
    } else {
        vec![PersonInfo {
            name: snippet.channel_title.clone(),
            role: PersonRole::Director,
        }]
    };

    MetadataResult {
        has_metadata: true,
        item: Some(VideoMetadata {
            title: snippet.title.clone(),
            overview: Some(snippet.description.clone()).filter(|d| !d.is_empty()),
            production_year: premiere_date.map(|d| d.year()),
            premiere_date,
            provider_ids,
        }),
        people,
    }
}
