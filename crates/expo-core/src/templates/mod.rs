//! Template acquisition, copying, and customization
//!
//! This module provides:
//! - Ephemeral staging workspaces with guaranteed cleanup
//! - Template acquisition from git, zip archives or local directories
//! - Recursive tree copying
//! - Manifest (app.json / package.json) customization

pub mod copier;
pub mod ephemeral;
pub mod fetcher;
pub mod manifest;

pub use copier::{copy_tree, CopyStats};
pub use ephemeral::EphemeralWorkspace;
pub use fetcher::{extract_archive, TemplateAcquirer, TemplateSource};
pub use manifest::{customize_project, slugify, ManifestDocument};
