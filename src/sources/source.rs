//! PackageLoader trait - common interface for import-graph loaders.

use anyhow::Result;

use crate::core::Package;

/// Turns a build-target pattern into packages.
pub trait PackageLoader {
    /// Get the loader name for display.
    fn name(&self) -> &str;

    /// Load the packages matched by `pattern`, each with its direct imports.
    fn load(&self, pattern: &str) -> Result<Vec<Package>>;
}

/// A loader returning a fixed set of packages.
///
/// Useful when the package graph is already known, e.g. in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    packages: Vec<Package>,
}

impl StaticLoader {
    pub fn new(packages: Vec<Package>) -> Self {
        StaticLoader { packages }
    }
}

impl PackageLoader for StaticLoader {
    fn name(&self) -> &str {
        "static"
    }

    fn load(&self, _pattern: &str) -> Result<Vec<Package>> {
        Ok(self.packages.clone())
    }
}
