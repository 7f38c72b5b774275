//! Packages handed over by the import-graph loader.
//!
//! A package knows which module owns it and where that module's manifest
//! lives. Only root packages carry their imports; imports are one level deep.

use std::path::{Path, PathBuf};

/// The module a package belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Module path
    pub path: String,

    /// Selected version (empty for the main module)
    pub version: String,

    /// Manifest file of the module, if it has one
    pub manifest: Option<PathBuf>,

    /// Module this one is replaced by
    pub replace: Option<Box<ModuleInfo>>,

    /// Whether this is a main module of the build
    pub main: bool,
}

impl ModuleInfo {
    /// Create module info with a manifest path.
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        ModuleInfo {
            path: path.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Set the manifest file.
    pub fn with_manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    /// Set the replacement module.
    pub fn with_replace(mut self, replace: ModuleInfo) -> Self {
        self.replace = Some(Box::new(replace));
        self
    }

    /// Mark as a main module.
    pub fn main(mut self) -> Self {
        self.main = true;
        self
    }

    /// The manifest that decides this module's requirements.
    ///
    /// When the module is replaced the replacement's manifest is used, even if
    /// the replacement has none.
    pub fn manifest_path(&self) -> Option<&Path> {
        let manifest = match &self.replace {
            Some(replace) => replace.manifest.as_deref(),
            None => self.manifest.as_deref(),
        };
        manifest.filter(|p| !p.as_os_str().is_empty())
    }
}

/// A package in the import graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Import path
    pub import_path: String,

    /// Owning module (absent for standard library packages)
    pub module: Option<ModuleInfo>,

    /// Direct imports
    pub imports: Vec<Package>,
}

impl Package {
    /// Create a package owned by `module`.
    pub fn new(import_path: impl Into<String>, module: Option<ModuleInfo>) -> Self {
        Package {
            import_path: import_path.into(),
            module,
            imports: Vec::new(),
        }
    }

    /// Add a direct import.
    pub fn with_import(mut self, import: Package) -> Self {
        self.imports.push(import);
        self
    }

    /// Path of the owning module, or the empty string.
    pub fn module_path(&self) -> &str {
        self.module.as_ref().map_or("", |m| m.path.as_str())
    }

    /// Manifest of the owning module, honoring replacements.
    pub fn manifest_path(&self) -> Option<&Path> {
        self.module.as_ref().and_then(ModuleInfo::manifest_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_path_prefers_replacement() {
        let module = ModuleInfo::new("example.com/a", "v1.0.0")
            .with_manifest("/cache/a/go.mod")
            .with_replace(ModuleInfo::new("../a", "").with_manifest("/src/a/go.mod"));

        assert_eq!(module.manifest_path(), Some(Path::new("/src/a/go.mod")));
    }

    #[test]
    fn test_replacement_without_manifest() {
        let module = ModuleInfo::new("example.com/a", "v1.0.0")
            .with_manifest("/cache/a/go.mod")
            .with_replace(ModuleInfo::new("example.com/b", "v1.0.0"));

        assert_eq!(module.manifest_path(), None);
    }

    #[test]
    fn test_empty_manifest_path_is_absent() {
        let pkg = Package::new(
            "example.com/a/sub",
            Some(ModuleInfo::new("example.com/a", "v1.0.0").with_manifest("")),
        );
        assert_eq!(pkg.manifest_path(), None);
        assert_eq!(pkg.module_path(), "example.com/a");

        let std_pkg = Package::new("fmt", None);
        assert_eq!(std_pkg.manifest_path(), None);
        assert_eq!(std_pkg.module_path(), "");
    }
}
