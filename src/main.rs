//! Standalone host for the manifest pipeline: post-process an
//! already-written build output directory in place.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pwa_manifest_bundler::{
    Bundle, BundlerConfig, HashedStore, ManifestPipeline, ManifestPlacement,
};

/// Rewrite the web app manifest of a bundled site for its final base path.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Project root containing the entry HTML and the authored manifest.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Build output directory to post-process in place.
    #[arg(long, default_value = "dist")]
    dist: PathBuf,

    /// Base path the site is served under, overriding the configuration file.
    #[arg(long)]
    base: Option<String>,

    /// Manifest placement policy, overriding the configuration file.
    #[arg(long, value_enum)]
    placement: Option<ManifestPlacement>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = BundlerConfig::discover(&cli.root);
    if let Some(base) = cli.base {
        config.base_path = base;
    }
    if let Some(placement) = cli.placement {
        config.placement = placement;
    }

    let mut bundle = Bundle::load_dir(&cli.dist)
        .with_context(|| format!("failed to load build output from {}", cli.dist.display()))?;

    let pipeline = ManifestPipeline::new(cli.root, config, HashedStore::new());
    let report = pipeline.run(&mut bundle).await?;

    bundle
        .write_dir(&cli.dist)
        .with_context(|| format!("failed to write build output to {}", cli.dist.display()))?;

    tracing::info!(
        manifest = %report.manifest_name,
        rewritten = report.rewritten,
        warnings = report.warnings.len(),
        "bundle updated"
    );
    Ok(())
}
