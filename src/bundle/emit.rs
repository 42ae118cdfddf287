//! Content-addressed asset emission.

use dashmap::DashMap;

use crate::bundle::{Bundle, OutputFile};

/// Host-side contract for content-addressed asset emission.
///
/// The pipeline hands every asset to `emit` exactly as the host bundler would
/// receive it: a logical output name plus the file bytes. The host returns
/// the name it actually assigned, typically with a content hash folded in.
/// Implementations must be idempotent; emitting identical bytes under the
/// same logical name twice returns the same assigned name and stores one
/// file.
pub trait AssetEmitter: Send + Sync {
    /// Emit `bytes` under `logical_name`, returning the final assigned name.
    fn emit(&self, logical_name: &str, bytes: &[u8]) -> String;

    /// Hand buffered output files to the bundle ahead of finalisation.
    ///
    /// Hosts that route emitted files into their own output pipeline keep
    /// the default no-op.
    fn drain_into(&self, _bundle: &mut Bundle) {}
}

/// Built-in emitter that fingerprints content into the file name.
///
/// `assets/icon.png` with bytes hashing to `1f2e3d4c` is assigned
/// `assets/icon-1f2e3d4c.png`, so an asset's name changes exactly when its
/// content does. Used by the standalone CLI host and by tests.
#[derive(Debug, Default)]
pub struct HashedStore {
    emitted: DashMap<String, Vec<u8>>,
}

impl HashedStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct files emitted so far.
    pub fn len(&self) -> usize {
        self.emitted.len()
    }

    /// Whether nothing has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.emitted.is_empty()
    }
}

impl AssetEmitter for HashedStore {
    fn emit(&self, logical_name: &str, bytes: &[u8]) -> String {
        let assigned = hashed_name(logical_name, &content_fingerprint(bytes));
        self.emitted
            .entry(assigned.clone())
            .or_insert_with(|| bytes.to_vec());
        assigned
    }

    fn drain_into(&self, bundle: &mut Bundle) {
        let names: Vec<String> = self.emitted.iter().map(|entry| entry.key().clone()).collect();
        for name in names {
            if let Some((name, bytes)) = self.emitted.remove(&name) {
                bundle.insert(name, OutputFile::Asset(bytes));
            }
        }
    }
}

/// 8-hex-char blake3 fingerprint of `bytes`, used for cache busting.
pub fn content_fingerprint(bytes: &[u8]) -> String {
    let hex = blake3::hash(bytes).to_hex();
    hex[..8].to_string()
}

/// Fold a fingerprint into a logical name, ahead of the extension.
fn hashed_name(logical_name: &str, fingerprint: &str) -> String {
    let stem_start = logical_name.rfind('/').map_or(0, |slash| slash + 1);
    match logical_name[stem_start..].rfind('.') {
        Some(relative_dot) => {
            let dot = stem_start + relative_dot;
            format!(
                "{}-{}{}",
                &logical_name[..dot],
                fingerprint,
                &logical_name[dot..]
            )
        }
        None => format!("{logical_name}-{fingerprint}"),
    }
}
