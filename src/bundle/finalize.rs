//! Final bundle mutation: manifest emission, HTML rewiring and stale-file
//! removal.

use crate::asset_paths::final_reference;
use crate::bundle::emit::AssetEmitter;
use crate::bundle::{Bundle, OutputFile};
use crate::html;

/// Emit the finished manifest and rewire the bundle around it.
///
/// The serialised manifest text is emitted through the host contract under
/// `logical_name` and placed in the bundle under the assigned name. Every
/// HTML page's manifest link is then pointed at the assigned name, prefixed
/// with the base path, and every other bundle entry sharing the manifest's
/// extension is removed. Rewiring and stale detection share one traversal;
/// neither depends on the other's result.
///
/// After this call exactly one file with the manifest extension remains in
/// the bundle, and every page that carries a manifest link references it.
/// Returns the assigned manifest name.
pub fn finalize_bundle<E: AssetEmitter + ?Sized>(
    bundle: &mut Bundle,
    emitter: &E,
    manifest_json: &str,
    logical_name: &str,
    extension: &str,
    base_path: &str,
) -> String {
    let final_name = emitter.emit(logical_name, manifest_json.as_bytes());
    bundle.insert(
        final_name.clone(),
        OutputFile::Asset(manifest_json.as_bytes().to_vec()),
    );

    let href = final_reference(base_path, &final_name);
    let mut stale = Vec::new();
    for (name, file) in bundle.iter_mut() {
        if name.ends_with(extension) && *name != final_name {
            stale.push(name.clone());
            continue;
        }
        if let OutputFile::Page(source) = file {
            if let Some(patched) = html::set_manifest_href(source, &href) {
                *source = patched;
            }
        }
    }
    for name in stale {
        bundle.remove(&name);
    }

    final_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::emit::HashedStore;

    fn seeded_bundle() -> Bundle {
        let mut bundle = Bundle::new();
        bundle.insert(
            "index.html",
            OutputFile::Page(
                r#"<html><head><link rel="manifest" href="/manifest.webmanifest"></head></html>"#
                    .to_string(),
            ),
        );
        bundle.insert(
            "about.html",
            OutputFile::Page("<html><head></head></html>".to_string()),
        );
        bundle.insert(
            "manifest.webmanifest",
            OutputFile::Asset(b"{ \"stale\": true }".to_vec()),
        );
        bundle.insert("assets/app.js", OutputFile::Asset(b"js".to_vec()));
        bundle
    }

    #[test]
    fn exactly_one_manifest_file_survives() {
        let mut bundle = seeded_bundle();
        let emitter = HashedStore::new();
        let final_name = finalize_bundle(
            &mut bundle,
            &emitter,
            "{\n  \"icons\": []\n}",
            "assets/manifest.webmanifest",
            ".webmanifest",
            "/",
        );

        let manifest_files: Vec<&String> = bundle
            .iter()
            .map(|(name, _)| name)
            .filter(|name| name.ends_with(".webmanifest"))
            .collect();
        assert_eq!(manifest_files, vec![&final_name]);
        assert!(final_name.starts_with("assets/manifest-"));
    }

    #[test]
    fn every_page_with_a_link_points_at_the_new_manifest() {
        let mut bundle = seeded_bundle();
        let emitter = HashedStore::new();
        let final_name = finalize_bundle(
            &mut bundle,
            &emitter,
            "{}",
            "assets/manifest.webmanifest",
            ".webmanifest",
            "/",
        );

        let Some(OutputFile::Page(index)) = bundle.get("index.html") else {
            panic!("index.html missing from bundle");
        };
        assert!(index.contains(&format!("href=\"/{final_name}\"")));

        // A page without a manifest link is left untouched.
        let Some(OutputFile::Page(about)) = bundle.get("about.html") else {
            panic!("about.html missing from bundle");
        };
        assert_eq!(about, "<html><head></head></html>");
    }

    #[test]
    fn root_placement_keeps_the_manifest_out_of_the_assets_folder() {
        let mut bundle = seeded_bundle();
        let emitter = HashedStore::new();
        let final_name = finalize_bundle(
            &mut bundle,
            &emitter,
            "{}",
            "manifest.webmanifest",
            ".webmanifest",
            "./",
        );

        assert!(!final_name.contains("assets/"));
        let Some(OutputFile::Page(index)) = bundle.get("index.html") else {
            panic!("index.html missing from bundle");
        };
        assert!(index.contains(&format!("href=\"./{final_name}\"")));
    }

    #[test]
    fn unrelated_assets_are_untouched() {
        let mut bundle = seeded_bundle();
        let emitter = HashedStore::new();
        finalize_bundle(
            &mut bundle,
            &emitter,
            "{}",
            "assets/manifest.webmanifest",
            ".webmanifest",
            "/",
        );
        assert_eq!(
            bundle.get("assets/app.js"),
            Some(&OutputFile::Asset(b"js".to_vec()))
        );
    }
}
