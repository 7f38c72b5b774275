//! Manifest loading cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::core::{DependencySet, LocationAncestry, ModFile};

/// Loads each manifest at most once per run.
///
/// The first load of a manifest decides the ancestry of its dependencies;
/// later requests for the same file get the cached set unchanged.
#[derive(Debug, Default)]
pub struct ManifestCache {
    /// Manifest file -> dependencies read from it
    loaded: HashMap<PathBuf, Rc<DependencySet>>,
}

impl ManifestCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        ManifestCache::default()
    }

    /// Get the dependency set for a manifest, loading it if needed.
    ///
    /// Returns `None` when there is no manifest to load. The flag is `true`
    /// only when this call read the file.
    pub fn get_or_load(
        &mut self,
        manifest_path: Option<&Path>,
        caller: Option<&Rc<LocationAncestry>>,
    ) -> Result<Option<(Rc<DependencySet>, bool)>> {
        let Some(path) = manifest_path.filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(None);
        };

        if let Some(set) = self.loaded.get(path) {
            tracing::debug!("manifest already loaded: {}", path.display());
            return Ok(Some((Rc::clone(set), false)));
        }

        let set = load_manifest(path, caller)
            .with_context(|| format!("loading dependency info for: {}", path.display()))?;
        tracing::debug!(
            "loaded {} ({} requirements, {} replaced) from {}",
            set.identity(),
            set.len(),
            set.overridden().count(),
            path.display()
        );

        let set = Rc::new(set);
        self.loaded.insert(path.to_path_buf(), Rc::clone(&set));

        Ok(Some((set, true)))
    }

    /// Check whether a manifest has been loaded.
    pub fn contains(&self, path: &Path) -> bool {
        self.loaded.contains_key(path)
    }

    /// Number of manifests loaded so far.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Check if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

fn load_manifest(path: &Path, caller: Option<&Rc<LocationAncestry>>) -> Result<DependencySet> {
    let mod_file = ModFile::load(path)?;
    if let Some(ref go) = mod_file.go_version {
        tracing::debug!("{} declares go {}", mod_file.module, go);
    }
    let set = DependencySet::from_mod_file(&mod_file, caller)?;
    Ok(set.with_manifest_path(path))
}
