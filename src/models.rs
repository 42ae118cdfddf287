//! Serde data model for the web app manifest document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parsed web app manifest, read once per build pass and mutated in place.
///
/// Only the fields the pipeline interprets are typed; everything else is
/// collected into [`Manifest::extra`] and round-tripped unchanged.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Manifest {
    /// Navigation scope, overwritten with the build's base path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Start URL, overwritten identically to `scope`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,
    /// Application icons. Serialised even when the sequence is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<Icon>>,
    /// Screenshot entries, structurally icons under a different key. Pruned
    /// from the output when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<Vec<Icon>>,
    /// Application shortcuts with their own nested icon sets. Pruned from the
    /// output when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<Vec<Shortcut>>,
    /// Fields the pipeline does not interpret, preserved in input order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single icon, screenshot or shortcut-icon entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Icon {
    /// Reference to the image file. Starts as a project-relative or
    /// root-relative path and is overwritten with the final emitted reference.
    #[serde(default)]
    pub src: String,
    /// Declared icon dimensions, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    /// Declared MIME type, passed through untouched.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Unrecognised entry fields, preserved in input order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An application shortcut whose nested icons follow the same resolution rule
/// as top-level icons, one level deeper.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Shortcut {
    /// Shortcut display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Target URL opened by the shortcut, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Optional shortcut description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icons rendered for the shortcut.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<Icon>,
    /// Unrecognised shortcut fields, preserved in input order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Parse a manifest from its JSON source text.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serialise the manifest with stable 2-space indentation.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Remove `screenshots` and `shortcuts` when their sequences are empty.
    ///
    /// `icons` is intentionally exempt and stays in the output even as an
    /// empty sequence.
    pub fn prune_empty_collections(&mut self) {
        if self.screenshots.as_ref().is_some_and(Vec::is_empty) {
            self.screenshots = None;
        }
        if self.shortcuts.as_ref().is_some_and(Vec::is_empty) {
            self.shortcuts = None;
        }
    }
}
