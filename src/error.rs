//! Error taxonomy for the manifest pipeline.
//!
//! Fatal conditions abort the whole pass and surface as [`PipelineError`];
//! a missing asset source file is non-fatal and surfaces as a classified
//! [`AssetWarning`] so one broken reference never blocks the rest.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures that abort a bundling pass.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The HTML entry point does not exist under the project root.
    #[error("entry point `{0}` was not found, so no manifest can be processed")]
    EntryNotFound(PathBuf),

    /// The entry HTML has no manifest link, or its href is empty.
    #[error(
        "`{0}` does not contain a `<link rel=\"manifest\">` element with a non-empty href; add one so the manifest can be located"
    )]
    ManifestLinkMissing(PathBuf),

    /// The linked manifest file is absent on disk.
    #[error(
        "manifest `{0}` was not found; make sure the `<link rel=\"manifest\">` href in the entry HTML points at an existing file"
    )]
    ManifestNotFound(PathBuf),

    /// The manifest file exists but is not valid JSON.
    #[error("failed to parse manifest `{path}`: {source}")]
    ManifestParse {
        /// Path of the offending manifest file.
        path: PathBuf,
        /// Underlying JSON parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The processed manifest could not be serialised back to JSON.
    #[error("failed to serialise the processed manifest")]
    ManifestSerialise(#[source] serde_json::Error),

    /// Filesystem failure while reading a build input.
    #[error("failed to read `{path}`")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub(crate) fn read_failed(path: PathBuf, source: std::io::Error) -> Self {
        Self::Io { path, source }
    }
}

/// Classification of a manifest asset reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Top-level `icons` entry.
    Icon,
    /// `screenshots` entry, structurally identical to an icon.
    Screenshot,
    /// Icon nested inside a `shortcuts` entry.
    ShortcutIcon,
}

impl AssetKind {
    /// Stable classification code attached to warning reports.
    pub fn code(self) -> &'static str {
        match self {
            AssetKind::Icon | AssetKind::Screenshot => "missing-icon",
            AssetKind::ShortcutIcon => "missing-shortcut-icon",
        }
    }

    /// Manifest key the reference was found under.
    pub fn key(self) -> &'static str {
        match self {
            AssetKind::Icon => "icons",
            AssetKind::Screenshot => "screenshots",
            AssetKind::ShortcutIcon => "shortcuts",
        }
    }
}

/// Non-fatal report for a reference whose source file does not exist.
///
/// The original reference is left untouched in the output manifest; the
/// warning carries everything a user needs to fix the authored path.
#[derive(Debug, Clone)]
pub struct AssetWarning {
    /// Classification of the reference.
    pub kind: AssetKind,
    /// The reference exactly as written in the manifest.
    pub src: String,
    /// Absolute path the reference resolved to.
    pub resolved: PathBuf,
}

impl AssetWarning {
    /// Build a warning for a missing source file.
    pub fn new(kind: AssetKind, src: impl Into<String>, resolved: PathBuf) -> Self {
        Self {
            kind,
            src: src.into(),
            resolved,
        }
    }
}

impl fmt::Display for AssetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] `{}` in `{}` resolved to `{}`, which does not exist; the reference was left unchanged",
            self.kind.code(),
            self.src,
            self.kind.key(),
            self.resolved.display()
        )
    }
}
