//! Trait definition for metadata providers.
//!
//! This module defines the [`MetadataProvider`] trait the host library calls
//! to enrich an item. The result type, [`MetadataResult`], lives in
//! `tubemeta_common` so hosts can depend on it without the provider stack.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tubemeta_common::{MetadataResult, Result};

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait implemented by metadata providers.
///
/// Providers are expected to be wrapped in an `Arc` so they can be shared
/// across tasks.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Display name of this provider.
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider has been configured with valid
    /// credentials and is ready to serve requests.
    fn is_available(&self) -> bool;

    /// Look up metadata for the library item named `title`.
    ///
    /// Returns [`MetadataResult::empty`] when the item carries no identifier
    /// or the remote record does not exist.
    async fn try_get_metadata(
        &self,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<MetadataResult>;

    /// Like [`try_get_metadata`](Self::try_get_metadata) but never fails:
    /// errors are logged and reported as an empty result.
    async fn get_metadata(&self, title: &str, cancel: &CancellationToken) -> MetadataResult {
        match self.try_get_metadata(title, cancel).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                tracing::debug!(provider = self.name(), title = title, "Metadata request cancelled");
                MetadataResult::empty()
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.name(),
                    title = title,
                    error = %e,
                    "Metadata lookup failed"
                );
                MetadataResult::empty()
            }
        }
    }
}
