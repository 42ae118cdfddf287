//! Configuration surface for the manifest pipeline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "manifest.bundler.json";

/// Where the finished manifest file is placed inside the build output.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ManifestPlacement {
    /// Alongside the other hashed static assets.
    #[default]
    Assets,
    /// At the top level of the output directory.
    Root,
}

/// Discoverable configuration describing how the manifest is rewritten.
///
/// Every field is defaulted, so an absent or partial configuration file keeps
/// the pipeline operational with sensible assumptions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// Root URL prefix the built site is served under. Always normalised to
    /// end with a separator before the pipeline runs.
    pub base_path: String,
    /// Placement policy for the emitted manifest file.
    pub placement: ManifestPlacement,
    /// File name of the application entry point HTML.
    pub entry_file: String,
    /// Output subfolder holding hashed static assets.
    pub assets_dir: String,
    /// Base name used for the emitted manifest file.
    pub manifest_base_name: String,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            base_path: "/".into(),
            placement: ManifestPlacement::Assets,
            entry_file: "index.html".into(),
            assets_dir: "assets".into(),
            manifest_base_name: "manifest".into(),
        }
    }
}

impl BundlerConfig {
    /// Attempt to load configuration from the provided project root.
    ///
    /// An absent or unparsable configuration file yields the defaults; the
    /// pipeline never fails over configuration.
    pub fn discover(project_root: &Path) -> Self {
        let candidate = project_root.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str::<Self>(&content)
            .ok()
            .map(Self::normalized)
    }

    /// Return the configuration with its base path guaranteed to end with a
    /// separator, so reference concatenation never produces `/distassets`.
    pub fn normalized(mut self) -> Self {
        if !self.base_path.ends_with('/') {
            self.base_path.push('/');
        }
        self
    }
}
