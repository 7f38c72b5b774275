//! Per-manifest dependency sets.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::core::errors::DependencyError;
use crate::core::location::LocationAncestry;
use crate::core::manifest::ModFile;
use crate::core::Dependency;

/// Every dependency declared by one manifest, after replace directives.
///
/// Maps iterate in manifest order.
#[derive(Debug, Clone)]
pub struct DependencySet {
    /// Declared module path of the manifest
    identity: String,

    /// File the manifest was read from
    manifest_path: Option<PathBuf>,

    /// module path -> dependency, for every require entry
    all: IndexMap<String, Dependency>,

    /// Paths of requirements without an `// indirect` marker
    direct: Vec<String>,

    /// Paths of requirements a replace directive changed
    overridden: Vec<String>,
}

impl DependencySet {
    /// Build the dependency set for a parsed manifest.
    ///
    /// `parent` is the requirement in the manifest that caused this one to
    /// load; it becomes the ancestor of every new location. Replace
    /// directives apply in file order.
    pub fn from_mod_file(
        mod_file: &ModFile,
        parent: Option<&Rc<LocationAncestry>>,
    ) -> Result<Self, DependencyError> {
        let mut set = DependencySet {
            identity: mod_file.module.clone(),
            manifest_path: None,
            all: IndexMap::with_capacity(mod_file.requires.len()),
            direct: Vec::new(),
            overridden: Vec::new(),
        };

        for req in &mod_file.requires {
            let path = req.module.path();
            if set.all.contains_key(path) {
                return Err(DependencyError::DuplicateRequirement {
                    module: path.to_string(),
                });
            }

            let location = LocationAncestry::new(&mod_file.module, req.position, parent.cloned());
            let dep = Dependency::new(req.module.clone(), !req.indirect, location);

            if dep.is_direct() {
                set.direct.push(path.to_string());
            }
            set.all.insert(path.to_string(), dep);
        }

        for rep in &mod_file.replaces {
            // Replacing a module that isn't required has no effect.
            let Some(dep) = set.all.get_mut(&rep.old_path) else {
                continue;
            };

            if dep.apply_override(rep)? {
                tracing::debug!(
                    "{}: {} replaced by {} ({})",
                    mod_file.module,
                    dep.original_version(),
                    dep.effective_version(),
                    if rep.is_targeted() { "this version" } else { "all versions" }
                );
            }
        }

        set.overridden = set
            .all
            .values()
            .filter(|d| d.is_overridden())
            .map(|d| d.path().to_string())
            .collect();

        Ok(set)
    }

    /// Record which file this set was loaded from.
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Declared module path of the manifest.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// File the manifest was read from, if known.
    pub fn manifest_path(&self) -> Option<&Path> {
        self.manifest_path.as_deref()
    }

    /// Look up a requirement by module path.
    pub fn get(&self, path: &str) -> Option<&Dependency> {
        self.all.get(path)
    }

    /// All requirements, in manifest order.
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.all.values()
    }

    /// Requirements without an `// indirect` marker.
    pub fn direct(&self) -> impl Iterator<Item = &Dependency> {
        self.direct.iter().filter_map(|p| self.all.get(p))
    }

    /// Requirements changed by a replace directive.
    pub fn overridden(&self) -> impl Iterator<Item = &Dependency> {
        self.overridden.iter().filter_map(|p| self.all.get(p))
    }

    /// Number of requirements.
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Check if the manifest requires nothing.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
