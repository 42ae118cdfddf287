//! Discovery of the manifest file through the HTML entry point.

use std::path::{Path, PathBuf};

use crate::asset_paths::resolve_asset_path;
use crate::cache::PassCache;
use crate::error::PipelineError;
use crate::html;

/// Resolve the absolute path of the manifest linked from the entry HTML.
///
/// Fails when the entry file is missing, when it carries no manifest link
/// with a non-empty href, or when the linked file does not exist on disk.
/// Each condition is fatal to the surrounding pass; a manifest-less output is
/// never produced silently.
pub async fn locate_manifest(
    root: &Path,
    entry_file: &str,
    cache: &PassCache,
) -> Result<PathBuf, PipelineError> {
    let entry_path = root.join(entry_file);
    if !cache.ensure_exists(&entry_path).await {
        return Err(PipelineError::EntryNotFound(entry_path));
    }

    let bytes = cache
        .read_cached(&entry_path)
        .await
        .map_err(|source| PipelineError::read_failed(entry_path.clone(), source))?;
    let markup = String::from_utf8_lossy(&bytes);

    let Some(href) = html::manifest_href(&markup) else {
        return Err(PipelineError::ManifestLinkMissing(entry_path));
    };

    let manifest_path = resolve_asset_path(&href, root);
    if !cache.ensure_exists(&manifest_path).await {
        return Err(PipelineError::ManifestNotFound(manifest_path));
    }
    Ok(manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_entry(root: &Path, href: &str) {
        fs::write(
            root.join("index.html"),
            format!(r#"<html><head><link rel="manifest" href="{href}"></head></html>"#),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn resolves_root_relative_hrefs() {
        let dir = tempdir().unwrap();
        write_entry(dir.path(), "/manifest.webmanifest");
        fs::write(dir.path().join("manifest.webmanifest"), "{}").unwrap();

        let cache = PassCache::new();
        let located = locate_manifest(dir.path(), "index.html", &cache)
            .await
            .unwrap();
        assert_eq!(located, dir.path().join("manifest.webmanifest"));
    }

    #[tokio::test]
    async fn resolves_plain_hrefs_against_the_root() {
        let dir = tempdir().unwrap();
        write_entry(dir.path(), "static/manifest.json");
        fs::create_dir_all(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/manifest.json"), "{}").unwrap();

        let cache = PassCache::new();
        let located = locate_manifest(dir.path(), "index.html", &cache)
            .await
            .unwrap();
        assert_eq!(located, dir.path().join("static/manifest.json"));
    }

    #[tokio::test]
    async fn missing_entry_is_fatal() {
        let dir = tempdir().unwrap();
        let cache = PassCache::new();
        let err = locate_manifest(dir.path(), "index.html", &cache)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EntryNotFound(_)));
    }

    #[tokio::test]
    async fn entry_without_manifest_link_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let cache = PassCache::new();
        let err = locate_manifest(dir.path(), "index.html", &cache)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ManifestLinkMissing(_)));
    }

    #[tokio::test]
    async fn dangling_href_is_fatal() {
        let dir = tempdir().unwrap();
        write_entry(dir.path(), "/manifest.webmanifest");

        let cache = PassCache::new();
        let err = locate_manifest(dir.path(), "index.html", &cache)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ManifestNotFound(_)));
    }
}
