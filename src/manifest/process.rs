//! Concurrent rewriting of manifest asset references.

use std::path::Path;

use futures_util::future::join_all;

use crate::asset_paths::{final_reference, resolve_asset_path};
use crate::bundle::emit::AssetEmitter;
use crate::cache::PassCache;
use crate::error::{AssetKind, AssetWarning, PipelineError};
use crate::models::{Icon, Manifest, Shortcut};

/// Shared state for one manifest-processing pass.
pub struct ProcessContext<'a> {
    /// Project root that asset references resolve against.
    pub root: &'a Path,
    /// Base path prefixed onto every emitted reference.
    pub base_path: &'a str,
    /// Output subfolder emitted assets are placed under.
    pub assets_dir: &'a str,
    /// Per-pass filesystem memoisation shared by all in-flight rewrites.
    pub cache: &'a PassCache,
    /// Host emission facility.
    pub emitter: &'a dyn AssetEmitter,
}

/// Outcome of rewriting one manifest.
#[derive(Debug, Default)]
pub struct ProcessReport {
    /// Number of asset references rewritten to emitted files.
    pub rewritten: usize,
    /// Classified warnings for references whose source files were missing.
    pub warnings: Vec<AssetWarning>,
}

impl ProcessReport {
    fn merge(&mut self, other: ProcessReport) {
        self.rewritten += other.rewritten;
        self.warnings.extend(other.warnings);
    }
}

/// Rewrite every asset reference in `manifest` and align its metadata with
/// the build's base path.
///
/// Icons, screenshots and shortcut icons are processed concurrently; no
/// ordering is guaranteed between entries and none is needed, since they are
/// independent. A reference whose source file is missing is reported and left
/// unchanged (never fatal); a read failure on an existing file aborts the
/// pass. Afterwards `scope` and `start_url` are overwritten with the base
/// path verbatim and empty `screenshots`/`shortcuts` sequences are pruned.
pub async fn process_manifest(
    manifest: &mut Manifest,
    ctx: &ProcessContext<'_>,
) -> Result<ProcessReport, PipelineError> {
    let Manifest {
        scope,
        start_url,
        icons,
        screenshots,
        shortcuts,
        ..
    } = &mut *manifest;

    let (icon_report, screenshot_report, shortcut_report) = tokio::join!(
        rewrite_collection(icons.as_mut(), AssetKind::Icon, ctx),
        rewrite_collection(screenshots.as_mut(), AssetKind::Screenshot, ctx),
        rewrite_shortcuts(shortcuts.as_mut(), ctx),
    );

    let mut report = icon_report?;
    report.merge(screenshot_report?);
    report.merge(shortcut_report?);

    *scope = Some(ctx.base_path.to_string());
    *start_url = Some(ctx.base_path.to_string());
    manifest.prune_empty_collections();

    Ok(report)
}

async fn rewrite_collection(
    set: Option<&mut Vec<Icon>>,
    kind: AssetKind,
    ctx: &ProcessContext<'_>,
) -> Result<ProcessReport, PipelineError> {
    let Some(icons) = set else {
        return Ok(ProcessReport::default());
    };
    let outcomes = join_all(icons.iter_mut().map(|icon| rewrite_icon(icon, kind, ctx))).await;
    gather(outcomes)
}

async fn rewrite_shortcuts(
    set: Option<&mut Vec<Shortcut>>,
    ctx: &ProcessContext<'_>,
) -> Result<ProcessReport, PipelineError> {
    let Some(shortcuts) = set else {
        return Ok(ProcessReport::default());
    };
    let nested = join_all(shortcuts.iter_mut().map(|shortcut| {
        rewrite_collection(Some(&mut shortcut.icons), AssetKind::ShortcutIcon, ctx)
    }))
    .await;

    let mut report = ProcessReport::default();
    for outcome in nested {
        report.merge(outcome?);
    }
    Ok(report)
}

enum RewriteOutcome {
    Rewritten,
    Skipped,
    Missing(AssetWarning),
}

/// Resolve, emit and rewrite a single icon reference.
async fn rewrite_icon(
    icon: &mut Icon,
    kind: AssetKind,
    ctx: &ProcessContext<'_>,
) -> Result<RewriteOutcome, PipelineError> {
    if icon.src.is_empty() {
        return Ok(RewriteOutcome::Skipped);
    }

    let resolved = resolve_asset_path(&icon.src, ctx.root);
    if !ctx.cache.ensure_exists(&resolved).await {
        let warning = AssetWarning::new(kind, &icon.src, resolved);
        tracing::warn!(
            code = warning.kind.code(),
            src = %warning.src,
            path = %warning.resolved.display(),
            "manifest references a file that does not exist"
        );
        return Ok(RewriteOutcome::Missing(warning));
    }

    let bytes = ctx
        .cache
        .read_cached(&resolved)
        .await
        .map_err(|source| PipelineError::read_failed(resolved.clone(), source))?;
    let assigned = ctx
        .emitter
        .emit(&logical_asset_name(ctx.assets_dir, &icon.src), &bytes);
    icon.src = final_reference(ctx.base_path, &assigned);
    Ok(RewriteOutcome::Rewritten)
}

/// Logical output name an asset reference is emitted under. Only the file
/// name survives; emitted assets are flattened into the assets subfolder.
fn logical_asset_name(assets_dir: &str, src_ref: &str) -> String {
    let file_name = src_ref.rsplit('/').next().unwrap_or(src_ref);
    format!("{assets_dir}/{file_name}")
}

fn gather(
    outcomes: Vec<Result<RewriteOutcome, PipelineError>>,
) -> Result<ProcessReport, PipelineError> {
    let mut report = ProcessReport::default();
    for outcome in outcomes {
        match outcome? {
            RewriteOutcome::Rewritten => report.rewritten += 1,
            RewriteOutcome::Skipped => {}
            RewriteOutcome::Missing(warning) => report.warnings.push(warning),
        }
    }
    Ok(report)
}
