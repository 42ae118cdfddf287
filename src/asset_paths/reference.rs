use crate::config::ManifestPlacement;

/// Compute the externally-visible reference for a host-assigned output name.
///
/// This is the single place the base path is prefixed onto emitted names; the
/// manifest rewriter and the HTML finaliser both go through it so the two can
/// never disagree.
pub fn final_reference(base_path: &str, assigned_name: &str) -> String {
    format!("{base_path}{assigned_name}")
}

/// Logical output name for the manifest file under a placement policy.
///
/// The generated name always uses forward slashes, regardless of the native
/// directory separator.
pub fn manifest_logical_name(
    placement: ManifestPlacement,
    assets_dir: &str,
    base_name: &str,
    extension: &str,
) -> String {
    match placement {
        ManifestPlacement::Assets => format!("{assets_dir}/{base_name}{extension}"),
        ManifestPlacement::Root => format!("{base_name}{extension}"),
    }
}
