//! Path mathematics for manifest asset references.
//!
//! Source-side resolution (where a reference points on disk) and emitted-side
//! references (what the rewritten manifest and HTML should say) are split into
//! focused submodules so each can be tested independently.

mod reference;
mod resolve;

pub use reference::{final_reference, manifest_logical_name};
pub use resolve::resolve_asset_path;
