//! Module references.
//!
//! A ModuleRef names one module at one version, the way it appears on a
//! require or replace line of a manifest.

use std::fmt;

/// A module path paired with a version string.
///
/// The version may be empty: replacements that point at a local directory
/// carry no version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef {
    path: String,
    version: String,
}

impl ModuleRef {
    /// Create a new module reference.
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        ModuleRef {
            path: path.into(),
            version: version.into(),
        }
    }

    /// Create a reference with no version (a local directory or a bare module
    /// declaration).
    pub fn unversioned(path: impl Into<String>) -> Self {
        ModuleRef::new(path, "")
    }

    /// Get the module path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Check whether a version is present.
    pub fn has_version(&self) -> bool {
        !self.version.is_empty()
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_version() {
            write!(f, "{}@{}", self.path, self.version)
        } else {
            write!(f, "{}", self.path)
        }
    }
}
