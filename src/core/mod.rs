//! Core data structures for modcheck.
//!
//! This module contains the dependency model the checks run on:
//! - Module references and manifest parsing
//! - Packages and their owning modules, as the import-graph loader sees them
//! - Per-manifest dependency sets with replace directives applied
//! - Provenance chains explaining where a version came from

pub mod dependency;
pub mod dependency_set;
pub mod errors;
pub mod location;
pub mod manifest;
pub mod module_ref;
pub mod package;

pub use dependency::Dependency;
pub use dependency_set::DependencySet;
pub use errors::DependencyError;
pub use location::{FilePosition, LocationAncestry, MAX_ANCESTRY_DEPTH};
pub use manifest::{ManifestError, ModFile, Replace, Require, MANIFEST_NAME};
pub use module_ref::ModuleRef;
pub use package::{ModuleInfo, Package};
