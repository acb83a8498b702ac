//! Video identifier extraction from library items.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use tubemeta_common::{Error, Result, VideoId};

use crate::library::LibraryLookup;

/// Resolves a title to the video identifier embedded in its file path.
pub struct IdentifierExtractor {
    library: Arc<dyn LibraryLookup>,
}

impl IdentifierExtractor {
    pub fn new(library: Arc<dyn LibraryLookup>) -> Self {
        Self { library }
    }

    /// Look `title` up in the library and extract the identifier from the
    /// first match's path.
    ///
    /// Returns `Ok(None)` when the path carries no bracketed identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LibraryLookupEmpty`] when no library item has this
    /// exact name, or the lookup's own error.
    pub async fn extract(&self, title: &str) -> Result<Option<VideoId>> {
        let items = self.library.find_by_name(title).await?;
        let item = items
            .first()
            .ok_or_else(|| Error::library_lookup_empty(title))?;

        if items.len() > 1 {
            debug!(
                title = title,
                matches = items.len(),
                path = %item.path.display(),
                "Several library items share this name; using the first"
            );
        }

        Ok(extract_from_path(&item.path))
    }
}

/// Find the first `[xxxxxxxxxxx]` identifier in `path`, scanning left to right.
pub fn extract_from_path(path: &Path) -> Option<VideoId> {
    VideoId::find_in(&path.to_string_lossy())
}
