//! The in-memory output bundle and its on-disk round-trip.

pub mod emit;
pub mod finalize;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A single output file held in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFile {
    /// Binary asset carried as its final bytes.
    Asset(Vec<u8>),
    /// HTML page carried as source text so it can still be patched.
    Page(String),
}

/// In-memory mapping from output file name to content for one build pass.
///
/// The host bundler owns the bundle for the duration of the pass; this crate
/// mutates it only inside the finalise step. Names use forward slashes on
/// every platform.
#[derive(Debug, Default)]
pub struct Bundle {
    files: BTreeMap<String, OutputFile>,
}

impl Bundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an output file.
    pub fn insert(&mut self, name: impl Into<String>, file: OutputFile) {
        self.files.insert(name.into(), file);
    }

    /// Remove an output file by name.
    pub fn remove(&mut self, name: &str) -> Option<OutputFile> {
        self.files.remove(name)
    }

    /// Look up an output file by name.
    pub fn get(&self, name: &str) -> Option<&OutputFile> {
        self.files.get(name)
    }

    /// Number of output files currently held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the bundle holds no files at all.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate the bundle in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OutputFile)> {
        self.files.iter()
    }

    /// Iterate the bundle mutably in name order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut OutputFile)> {
        self.files.iter_mut()
    }

    /// Read a previously written build output directory into bundle form.
    ///
    /// `.html` files are loaded as patchable pages, everything else as raw
    /// assets.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut bundle = Self::new();
        collect_output_files(dir, Path::new(""), &mut bundle)?;
        Ok(bundle)
    }

    /// Write the bundle back to `dir`, removing files no longer present.
    pub fn write_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;

        for (name, file) in &self.files {
            let destination = dir.join(name);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            match file {
                OutputFile::Asset(bytes) => fs::write(&destination, bytes),
                OutputFile::Page(source) => fs::write(&destination, source),
            }
            .with_context(|| format!("failed to write {}", destination.display()))?;
        }

        prune_stale_outputs(self, dir, Path::new(""))?;
        Ok(())
    }
}

fn collect_output_files(dir: &Path, relative: &Path, bundle: &mut Bundle) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read build output directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let child_relative = if relative.as_os_str().is_empty() {
            PathBuf::from(&file_name)
        } else {
            relative.join(&file_name)
        };

        if entry.file_type()?.is_dir() {
            collect_output_files(&entry.path(), &child_relative, bundle)?;
            continue;
        }

        let name = child_relative.to_string_lossy().replace('\\', "/");
        let path = entry.path();
        if name.ends_with(".html") {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            bundle.insert(name, OutputFile::Page(source));
        } else {
            let bytes =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            bundle.insert(name, OutputFile::Asset(bytes));
        }
    }
    Ok(())
}

/// Delete on-disk files absent from the bundle, returning whether the
/// traversed subtree ended up empty and should itself be removed.
fn prune_stale_outputs(bundle: &Bundle, root: &Path, relative: &Path) -> Result<bool> {
    let current = if relative.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    };

    let mut occupied = false;
    for entry in fs::read_dir(&current)
        .with_context(|| format!("failed to read {}", current.display()))?
    {
        let entry = entry?;
        let file_name = entry.file_name();
        let child_relative = if relative.as_os_str().is_empty() {
            PathBuf::from(&file_name)
        } else {
            relative.join(&file_name)
        };

        if entry.file_type()?.is_dir() {
            if prune_stale_outputs(bundle, root, &child_relative)? {
                fs::remove_dir_all(entry.path())?;
            } else {
                occupied = true;
            }
            continue;
        }

        let name = child_relative.to_string_lossy().replace('\\', "/");
        if bundle.get(&name).is_some() {
            occupied = true;
        } else {
            fs::remove_file(entry.path())?;
        }
    }

    Ok(!occupied && !relative.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_dir_distinguishes_pages_from_assets() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("assets/app.js"), b"console.log(1)").unwrap();

        let bundle = Bundle::load_dir(dir.path()).unwrap();
        assert_eq!(bundle.len(), 2);
        assert!(matches!(
            bundle.get("index.html"),
            Some(OutputFile::Page(_))
        ));
        assert!(matches!(
            bundle.get("assets/app.js"),
            Some(OutputFile::Asset(_))
        ));
    }

    #[test]
    fn write_dir_round_trips_and_prunes_removed_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("manifest.webmanifest"), "{}").unwrap();
        fs::write(dir.path().join("assets/stale.webmanifest"), "{}").unwrap();

        let mut bundle = Bundle::load_dir(dir.path()).unwrap();
        bundle.remove("manifest.webmanifest");
        bundle.remove("assets/stale.webmanifest");
        bundle.insert(
            "assets/manifest-1a2b3c4d.webmanifest",
            OutputFile::Asset(b"{}".to_vec()),
        );
        bundle.write_dir(dir.path()).unwrap();

        assert!(dir.path().join("index.html").exists());
        assert!(dir.path().join("assets/manifest-1a2b3c4d.webmanifest").exists());
        assert!(!dir.path().join("manifest.webmanifest").exists());
        assert!(!dir.path().join("assets/stale.webmanifest").exists());
    }

    #[test]
    fn write_dir_removes_directories_left_empty() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("old")).unwrap();
        fs::write(dir.path().join("old/asset.bin"), b"bytes").unwrap();
        fs::write(dir.path().join("keep.txt"), b"kept").unwrap();

        let mut bundle = Bundle::load_dir(dir.path()).unwrap();
        bundle.remove("old/asset.bin");
        bundle.write_dir(dir.path()).unwrap();

        assert!(dir.path().join("keep.txt").exists());
        assert!(!dir.path().join("old").exists());
    }
}
