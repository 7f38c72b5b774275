//! The `modcheck` operation: load manifests along the import graph and
//! reconcile versions.

use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::core::{DependencySet, Package};
use crate::ops::match_config::MatchConfig;
use crate::ops::reconcile::{find_mismatches, MismatchReport};
use crate::sources::{ManifestCache, PackageLoader};

/// State of one check run.
///
/// Owns the manifest cache, so each manifest is read at most once per
/// session and ancestry links only point at sets built earlier in the same
/// session.
#[derive(Debug)]
pub struct CheckSession<'a> {
    config: &'a MatchConfig,

    cache: ManifestCache,

    /// Dependency sets of the project's own manifests, in load order
    project: Vec<Rc<DependencySet>>,

    /// Package path -> dependency set, for packages named in the config
    dependencies: HashMap<String, Rc<DependencySet>>,
}

impl<'a> CheckSession<'a> {
    /// Start a session for a configuration.
    pub fn new(config: &'a MatchConfig) -> Self {
        CheckSession {
            config,
            cache: ManifestCache::new(),
            project: Vec::new(),
            dependencies: HashMap::new(),
        }
    }

    /// Load the manifests behind a set of root packages and the watched
    /// packages they import.
    ///
    /// A root package's manifest joins the project the first time it is
    /// seen. An imported package's manifest is loaded only if the config
    /// names its module, and its requirements get the importing manifest's
    /// entry for that module as ancestor.
    pub fn add_packages(&mut self, packages: &[Package]) -> Result<()> {
        for pkg in packages {
            let pkg_set = match self
                .cache
                .get_or_load(pkg.manifest_path(), None)
                .context("loading project deps")?
            {
                Some((set, fresh)) => {
                    if fresh {
                        tracing::debug!("project manifest for module {}", set.identity());
                        self.project.push(Rc::clone(&set));
                    }
                    Some(set)
                }
                None => None,
            };

            for import in &pkg.imports {
                let module_path = import.module_path();
                if !self.config.watches(module_path) {
                    continue;
                }

                let caller = pkg_set
                    .as_ref()
                    .and_then(|set| set.get(module_path))
                    .map(|dep| dep.location());

                let loaded = self
                    .cache
                    .get_or_load(import.manifest_path(), caller)
                    .with_context(|| format!("loading deps for dependency {}", module_path))?;

                if let Some((set, true)) = loaded {
                    tracing::debug!("dependency manifest for module {}", module_path);
                    self.dependencies.insert(module_path.to_string(), set);
                }
            }
        }

        Ok(())
    }

    /// Reconcile everything loaded so far.
    pub fn find_mismatches(&self) -> Vec<MismatchReport> {
        find_mismatches(&self.project, &self.dependencies, self.config)
    }

    /// Project dependency sets, in load order.
    pub fn project_sets(&self) -> &[Rc<DependencySet>] {
        &self.project
    }

    /// Dependency set loaded for a watched package.
    pub fn dependency_set(&self, package_path: &str) -> Option<&Rc<DependencySet>> {
        self.dependencies.get(package_path)
    }

    /// Number of distinct manifests read.
    pub fn manifests_loaded(&self) -> usize {
        self.cache.len()
    }
}

/// Outcome of a check run.
#[derive(Debug)]
pub struct CheckResult {
    /// Mismatches found, in discovery order
    pub mismatches: Vec<MismatchReport>,

    /// Number of root packages considered
    pub packages: usize,

    /// Number of manifests read
    pub manifests_loaded: usize,
}

impl CheckResult {
    /// Whether the project and its dependencies agree.
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Run a check for a package pattern.
pub fn check(loader: &dyn PackageLoader, pattern: &str, config: &MatchConfig) -> Result<CheckResult> {
    let packages = loader
        .load(pattern)
        .with_context(|| format!("loading packages for `{}` via {}", pattern, loader.name()))?;

    let mut session = CheckSession::new(config);
    session
        .add_packages(&packages)
        .context("reading dependency mappings")?;

    let mismatches = session.find_mismatches();
    tracing::info!(
        "checked {} packages across {} manifests: {} mismatches",
        packages.len(),
        session.manifests_loaded(),
        mismatches.len()
    );

    Ok(CheckResult {
        mismatches,
        packages: packages.len(),
        manifests_loaded: session.manifests_loaded(),
    })
}
