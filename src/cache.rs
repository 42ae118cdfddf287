//! Per-pass memoisation of filesystem existence checks and reads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::fs;

/// Memoisation tables scoped to exactly one bundling pass.
///
/// Many asset rewrites are in flight at once and frequently touch the same
/// file, for example an icon reused across several declared sizes. The cache
/// guarantees one disk read per path per pass. Races on the same key are
/// benign: both contenders compute the same immutable value and one insert
/// wins.
///
/// The pipeline clears the cache at pass start and pass end, so entries never
/// survive into the next pass of a watch-mode build.
#[derive(Debug, Default)]
pub struct PassCache {
    exists: DashMap<PathBuf, bool>,
    contents: DashMap<PathBuf, Arc<[u8]>>,
}

impl PassCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` exists on disk, memoised for the current pass.
    pub async fn ensure_exists(&self, path: &Path) -> bool {
        if let Some(hit) = self.exists.get(path) {
            return *hit;
        }
        let found = fs::try_exists(path).await.unwrap_or(false);
        self.exists.insert(path.to_path_buf(), found);
        found
    }

    /// Contents of `path`, read from disk at most once per pass.
    pub async fn read_cached(&self, path: &Path) -> std::io::Result<Arc<[u8]>> {
        if let Some(hit) = self.contents.get(path) {
            return Ok(Arc::clone(&hit));
        }
        let bytes: Arc<[u8]> = fs::read(path).await?.into();
        self.contents.insert(path.to_path_buf(), Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Drop every memoised entry.
    pub fn clear(&self) {
        self.exists.clear();
        self.contents.clear();
    }
}
