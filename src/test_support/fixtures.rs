//! Test fixtures for common test scenarios.
//!
//! This module provides on-disk manifest trees and package builders for
//! exercising the loading and reconciliation code together.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::{ModuleInfo, Package, MANIFEST_NAME};

/// A temporary directory holding one manifest per module directory.
#[derive(Debug)]
pub struct TestTree {
    root: TempDir,
}

impl TestTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        TestTree {
            root: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Root directory of the tree.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Path inside the tree; nothing is created.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Write `<dir>/go.mod` and return its path.
    pub fn manifest(&self, dir: &str, contents: &str) -> PathBuf {
        let dir = self.path(dir);
        std::fs::create_dir_all(&dir).expect("failed to create module dir");

        let path = dir.join(MANIFEST_NAME);
        std::fs::write(&path, contents).expect("failed to write manifest");
        path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        TestTree::new()
    }
}

/// A package of the main module, backed by `manifest`.
pub fn project_package(import_path: &str, manifest: &Path) -> Package {
    let module = ModuleInfo::new(import_path, "")
        .with_manifest(manifest)
        .main();
    Package::new(import_path, Some(module))
}

/// A package whose module root is its import path, backed by `manifest`.
pub fn dependency_package(module_path: &str, version: &str, manifest: &Path) -> Package {
    let module = ModuleInfo::new(module_path, version).with_manifest(manifest);
    Package::new(module_path, Some(module))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_writes_manifests() {
        let tree = TestTree::new();
        let path = tree.manifest("a/b", "module example.com/ab\n");

        assert!(path.starts_with(tree.root()));
        assert!(path.ends_with("a/b/go.mod"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "module example.com/ab\n"
        );
    }

    #[test]
    fn test_package_builders() {
        let pkg = project_package("example.com/app", Path::new("/src/go.mod"));
        assert!(pkg.module.as_ref().unwrap().main);
        assert_eq!(pkg.manifest_path(), Some(Path::new("/src/go.mod")));

        let dep = dependency_package("example.com/d", "v1.0.0", Path::new("/d/go.mod"));
        assert_eq!(dep.module_path(), "example.com/d");
        assert_eq!(dep.module.as_ref().unwrap().version, "v1.0.0");
    }
}
