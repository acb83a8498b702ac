//! Host library lookup.
//!
//! The host media library is an external collaborator: tubemeta only asks it
//! for the items whose name matches a title exactly and reads the first item's
//! path. [`LibraryLookup`] is that seam. Two implementations ship with the
//! crate:
//!
//! - [`StaticLibrary`] -- an in-memory item list, for hosts that already hold
//!   their catalogue.
//! - [`DirectoryLibrary`] -- walks library directories and matches video files
//!   by file stem.

mod directory;

use std::path::PathBuf;

use async_trait::async_trait;
use tubemeta_common::Result;

pub use directory::DirectoryLibrary;

/// An item known to the host library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryItem {
    /// Display name of the item.
    pub name: String,
    /// Location of the item's media file.
    pub path: PathBuf,
}

impl LibraryItem {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Query-by-exact-name access to the host library.
#[async_trait]
pub trait LibraryLookup: Send + Sync {
    /// Return the items named exactly `name`, in the library's order.
    async fn find_by_name(&self, name: &str) -> Result<Vec<LibraryItem>>;
}

/// A fixed, in-memory library.
#[derive(Debug, Clone, Default)]
pub struct StaticLibrary {
    items: Vec<LibraryItem>,
}

impl StaticLibrary {
    pub fn new(items: Vec<LibraryItem>) -> Self {
        Self { items }
    }

    /// Add an item after the existing ones.
    pub fn push(&mut self, item: LibraryItem) {
        self.items.push(item);
    }
}

#[async_trait]
impl LibraryLookup for StaticLibrary {
    async fn find_by_name(&self, name: &str) -> Result<Vec<LibraryItem>> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.name == name)
            .cloned()
            .collect())
    }
}
