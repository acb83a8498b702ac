//! Filesystem-backed library lookup.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use tubemeta_common::paths::is_video_file;
use tubemeta_common::{Error, Result};
use walkdir::WalkDir;

use super::{LibraryItem, LibraryLookup};
use crate::config::LibraryConfig;

/// Library lookup over one or more media directories.
///
/// An item's name is its file stem, so `My Video [dQw4w9WgXcQ].mkv` is found
/// under the title `My Video [dQw4w9WgXcQ]`. Matches are returned sorted by
/// path so the first match is stable across scans.
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    roots: Vec<PathBuf>,
}

impl DirectoryLibrary {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Library over the configured `[library] paths`, tilde expanded.
    pub fn from_config(config: &LibraryConfig) -> Self {
        let roots = config
            .paths
            .iter()
            .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref()))
            .collect();
        Self::new(roots)
    }
}

#[async_trait]
impl LibraryLookup for DirectoryLibrary {
    async fn find_by_name(&self, name: &str) -> Result<Vec<LibraryItem>> {
        let roots = self.roots.clone();
        let name = name.to_owned();

        tokio::task::spawn_blocking(move || scan_roots(&roots, &name))
            .await
            .map_err(|e| Error::internal(format!("spawn_blocking join error: {e}")))
    }
}

fn scan_roots(roots: &[PathBuf], name: &str) -> Vec<LibraryItem> {
    let mut items = Vec::new();

    for root in roots {
        if !root.exists() {
            warn!("Library path does not exist: {:?}", root);
            continue;
        }
        items.extend(scan_directory(root, name));
    }

    items.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(name = name, matches = items.len(), "Library lookup complete");
    items
}

fn scan_directory(root: &Path, name: &str) -> Vec<LibraryItem> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_video_file(entry.path()))
        .filter(|entry| entry.path().file_stem().and_then(|s| s.to_str()) == Some(name))
        .map(|entry| LibraryItem::new(name, entry.into_path()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    #[tokio::test]
    async fn finds_video_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("channel/My Video [dQw4w9WgXcQ].mkv");
        touch(&video);
        touch(&dir.path().join("channel/My Video [dQw4w9WgXcQ].info.json"));
        touch(&dir.path().join("channel/Other [aaaaaaaaaaa].mp4"));

        let library = DirectoryLibrary::new(vec![dir.path().to_path_buf()]);
        let found = library.find_by_name("My Video [dQw4w9WgXcQ]").await.unwrap();

        assert_eq!(found, vec![LibraryItem::new("My Video [dQw4w9WgXcQ]", video)]);
    }

    #[tokio::test]
    async fn matches_are_sorted_across_roots() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(&second.path().join("b/Clip.webm"));
        touch(&first.path().join("a/Clip.mp4"));
        touch(&first.path().join("z/Clip.mkv"));

        let library = DirectoryLibrary::new(vec![
            second.path().to_path_buf(),
            first.path().to_path_buf(),
        ]);
        let found = library.find_by_name("Clip").await.unwrap();

        assert_eq!(found.len(), 3);
        let mut expected: Vec<PathBuf> = found.iter().map(|i| i.path.clone()).collect();
        expected.sort();
        assert_eq!(found.iter().map(|i| i.path.clone()).collect::<Vec<_>>(), expected);
    }

    #[tokio::test]
    async fn missing_root_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let library = DirectoryLibrary::new(vec![dir.path().join("does-not-exist")]);
        assert!(library.find_by_name("Clip").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn directories_are_not_items() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Clip.mkv")).unwrap();
        let library = DirectoryLibrary::new(vec![dir.path().to_path_buf()]);
        assert!(library.find_by_name("Clip").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn built_from_config_paths() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("My Video [dQw4w9WgXcQ].mp4");
        touch(&video);

        let library = DirectoryLibrary::from_config(&LibraryConfig {
            paths: vec![dir.path().to_path_buf()],
        });
        let found = library.find_by_name("My Video [dQw4w9WgXcQ]").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, video);
    }
}
