//! Package and manifest sources.
//!
//! Loaders turn a build-target pattern into packages with their owning
//! modules; the manifest cache turns each module's manifest into a
//! dependency set exactly once.

pub mod cache;
pub mod go_list;
pub mod source;

pub use cache::ManifestCache;
pub use go_list::{decode_package_stream, GoListLoader, JsonFileLoader};
pub use source::{PackageLoader, StaticLoader};
