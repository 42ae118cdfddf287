//! Pass orchestration connecting locator, mutator and finaliser.

use std::path::{Path, PathBuf};

use crate::asset_paths::manifest_logical_name;
use crate::bundle::Bundle;
use crate::bundle::emit::AssetEmitter;
use crate::bundle::finalize::finalize_bundle;
use crate::cache::PassCache;
use crate::config::BundlerConfig;
use crate::error::{AssetWarning, PipelineError};
use crate::manifest::{ProcessContext, locate_manifest, process_manifest};
use crate::models::Manifest;

/// Outcome of a completed bundling pass.
#[derive(Debug)]
pub struct PipelineReport {
    /// Final (hashed) name of the emitted manifest inside the bundle.
    pub manifest_name: String,
    /// Number of asset references rewritten to emitted files.
    pub rewritten: usize,
    /// Classified warnings for references whose source files were missing.
    pub warnings: Vec<AssetWarning>,
}

/// One-pass driver for the manifest pipeline.
///
/// Constructed once configuration is final and reused across passes; every
/// [`ManifestPipeline::run`] call operates on a fresh per-pass cache, so
/// repeated builds in watch mode never observe stale filesystem state.
pub struct ManifestPipeline<E> {
    config: BundlerConfig,
    root: PathBuf,
    emitter: E,
}

impl<E: AssetEmitter> ManifestPipeline<E> {
    /// Create a pipeline for the project at `root` using a finalised
    /// configuration.
    pub fn new(root: impl Into<PathBuf>, config: BundlerConfig, emitter: E) -> Self {
        Self {
            config: config.normalized(),
            root: root.into(),
            emitter,
        }
    }

    /// The host emission facility the pipeline was constructed with.
    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Run one full pass against `bundle`.
    ///
    /// On success the bundle holds the emitted assets, exactly one manifest
    /// file, and pages whose manifest links reference it. Fatal errors abort
    /// the pass and leave the bundle as it was at the point of failure.
    pub async fn run(&self, bundle: &mut Bundle) -> Result<PipelineReport, PipelineError> {
        let cache = PassCache::new();
        let report = self.run_pass(bundle, &cache).await;
        cache.clear();
        report
    }

    async fn run_pass(
        &self,
        bundle: &mut Bundle,
        cache: &PassCache,
    ) -> Result<PipelineReport, PipelineError> {
        let manifest_path = locate_manifest(&self.root, &self.config.entry_file, cache).await?;

        let bytes = cache
            .read_cached(&manifest_path)
            .await
            .map_err(|source| PipelineError::read_failed(manifest_path.clone(), source))?;
        let text = String::from_utf8_lossy(&bytes);
        let mut manifest =
            Manifest::parse(&text).map_err(|source| PipelineError::ManifestParse {
                path: manifest_path.clone(),
                source,
            })?;

        let ctx = ProcessContext {
            root: &self.root,
            base_path: &self.config.base_path,
            assets_dir: &self.config.assets_dir,
            cache,
            emitter: &self.emitter,
        };
        let processed = process_manifest(&mut manifest, &ctx).await?;

        let json = manifest
            .to_pretty_json()
            .map_err(PipelineError::ManifestSerialise)?;

        let extension = manifest_extension(&manifest_path);
        let logical_name = manifest_logical_name(
            self.config.placement,
            &self.config.assets_dir,
            &self.config.manifest_base_name,
            &extension,
        );

        self.emitter.drain_into(bundle);
        let manifest_name = finalize_bundle(
            bundle,
            &self.emitter,
            &json,
            &logical_name,
            &extension,
            &self.config.base_path,
        );

        tracing::info!(
            manifest = %manifest_name,
            rewritten = processed.rewritten,
            warnings = processed.warnings.len(),
            "manifest pass complete"
        );

        Ok(PipelineReport {
            manifest_name,
            rewritten: processed.rewritten,
            warnings: processed.warnings,
        })
    }
}

/// Extension of the authored manifest file, dot included.
fn manifest_extension(path: &Path) -> String {
    path.extension()
        .map(|extension| format!(".{}", extension.to_string_lossy()))
        .unwrap_or_else(|| ".webmanifest".to_string())
}
