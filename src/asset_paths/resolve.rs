use std::path::{Path, PathBuf};

/// Resolve a manifest `src` reference to an absolute path under the project
/// root.
///
/// A reference beginning with a path separator is root-relative: the leading
/// separator is stripped and the remainder joined onto the root. Anything
/// else is treated as relative to the root as well. References are never
/// resolved against the manifest's own directory; this is a deliberate
/// simplification, not a general web-URL resolver.
pub fn resolve_asset_path(src_ref: &str, root: &Path) -> PathBuf {
    match src_ref.strip_prefix('/') {
        Some(root_relative) => root.join(root_relative),
        None => root.join(src_ref),
    }
}
