//! Metadata provider system for enriching library items with YouTube data.
//!
//! # Module layout
//!
//! - [`provider`] -- The [`MetadataProvider`] trait the host calls.
//! - [`providers`] -- Concrete providers (YouTube).
//! - [`extractor`] -- Resolves a title to the video id in its file name.
//! - [`cache`] -- Freshness-bounded on-disk cache with request coalescing.
//! - [`fetcher`] -- Remote fetch with quota-aware retries.

pub mod cache;
pub mod extractor;
pub mod fetcher;
pub mod provider;
pub mod providers;

pub use cache::{CacheStatus, MetadataCache};
pub use extractor::IdentifierExtractor;
pub use fetcher::{RetryPolicy, VideoFetcher};
pub use provider::MetadataProvider;
pub use providers::YouTubeMetadataProvider;
