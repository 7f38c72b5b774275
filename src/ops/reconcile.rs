//! Version reconciliation between the project and its dependencies.

use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::core::{Dependency, DependencySet, LocationAncestry};
use crate::ops::match_config::MatchConfig;

/// A module whose version in the project differs from the one a dependency
/// expects.
#[derive(Debug, Clone)]
pub struct MismatchReport {
    /// Module path as required
    pub module_path: String,

    /// Effective version in the dependency
    pub want_version: String,

    /// Effective version in the project
    pub got_version: String,

    /// Where the dependency's version came from
    pub want: Rc<LocationAncestry>,

    /// Where the project's version came from
    pub got: Rc<LocationAncestry>,
}

/// Collect the dependency entries whose versions the project must share,
/// keyed by module path.
///
/// Targets a dependency doesn't require, and dependencies that were never
/// loaded, are skipped. When two replace sources redirect the same module
/// the later one wins.
pub fn collect_candidates<'a>(
    dependencies: &'a HashMap<String, Rc<DependencySet>>,
    config: &MatchConfig,
) -> IndexMap<String, &'a Dependency> {
    let mut candidates: IndexMap<String, &'a Dependency> = IndexMap::new();

    for (dep_package, targets) in config.match_deps() {
        // No manifest, or no import of this package from the project.
        let Some(set) = dependencies.get(dep_package) else {
            tracing::debug!("no manifest loaded for {}", dep_package);
            continue;
        };

        for target in targets {
            if let Some(dep) = set.get(target) {
                candidates.insert(target.clone(), dep);
            }
        }
    }

    // TODO: reject a replaced module that is also claimed by another source,
    // like duplicate --match-dep targets are.
    for dep_package in config.replace_sources() {
        let Some(set) = dependencies.get(dep_package) else {
            tracing::debug!("no manifest loaded for {}", dep_package);
            continue;
        };

        for dep in set.overridden() {
            let key = dep.original_version().path();
            if let Some(previous) = candidates.insert(key.to_string(), dep) {
                tracing::debug!(
                    "{} from {} overrides earlier candidate {}",
                    key,
                    dep_package,
                    previous.effective_version()
                );
            }
        }
    }

    candidates
}

/// Compare candidate versions against every project manifest.
///
/// Versions are compared as exact strings. Reports come out in candidate
/// order, then project manifest order.
pub fn find_mismatches(
    project: &[Rc<DependencySet>],
    dependencies: &HashMap<String, Rc<DependencySet>>,
    config: &MatchConfig,
) -> Vec<MismatchReport> {
    let candidates = collect_candidates(dependencies, config);
    let mut reports = Vec::new();

    for (module_path, candidate) in &candidates {
        for project_set in project {
            let Some(project_dep) = project_set.get(module_path) else {
                continue;
            };

            let want = candidate.effective_version().version();
            let got = project_dep.effective_version().version();

            if want != got {
                reports.push(MismatchReport {
                    module_path: module_path.clone(),
                    want_version: want.to_string(),
                    got_version: got.to_string(),
                    want: Rc::clone(candidate.location()),
                    got: Rc::clone(project_dep.location()),
                });
            }
        }
    }

    reports
}
