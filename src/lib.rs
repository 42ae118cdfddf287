#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod error;
pub mod html;
pub mod manifest;
pub mod models;

pub use builder::{ManifestPipeline, PipelineReport};
pub use bundle::emit::{AssetEmitter, HashedStore};
pub use bundle::{Bundle, OutputFile};
pub use config::{BundlerConfig, ManifestPlacement};
pub use error::{AssetKind, AssetWarning, PipelineError};
