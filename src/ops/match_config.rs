//! Which dependency versions must match the project's.
//!
//! A `--match-dep <dependency>:<module>` pair says: the version of `module`
//! required by `dependency` is the one the project must use too. A
//! `--match-replaces <dependency>` says the same for every module the
//! dependency redirects with a replace directive.

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

/// Error in the match configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchConfigError {
    #[error("unexpected dep match input: {input}")]
    Malformed { input: String },

    #[error("empty package path in dep match input: {input}")]
    EmptyPath { input: String },

    #[error("dep {target} being sourced from multiple packages: {first} and {second}")]
    DuplicateTarget {
        target: String,
        first: String,
        second: String,
    },
}

/// Validated match configuration.
///
/// Both collections keep the order entries were given in.
#[derive(Debug, Clone, Default)]
pub struct MatchConfig {
    /// dependency package path -> modules whose versions must match
    match_dep: IndexMap<String, IndexSet<String>>,

    /// dependency package paths whose replace directives must match
    replace_sources: IndexSet<String>,
}

impl MatchConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        MatchConfig::default()
    }

    /// Build a configuration from raw `<dependency>:<module>` pairs and
    /// replace sources.
    pub fn from_flags<D, R>(match_deps: D, replace_sources: R) -> Result<Self, MatchConfigError>
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let mut config = MatchConfig::new();

        for raw in match_deps {
            let (dependency, target) = parse_match_dep(raw.as_ref())?;
            config.add_match_dep(dependency, target)?;
        }

        for source in replace_sources {
            config.add_replace_source(source);
        }

        Ok(config)
    }

    /// Require `target`'s version in `dependency` to match the project.
    ///
    /// Fails if another dependency already supplies the version of `target`.
    pub fn add_match_dep(
        &mut self,
        dependency: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<(), MatchConfigError> {
        let dependency = dependency.into();
        let target = target.into();

        if let Some(owner) = self.owner_of(&target) {
            if owner != dependency {
                return Err(MatchConfigError::DuplicateTarget {
                    target,
                    first: owner.to_string(),
                    second: dependency,
                });
            }
        }

        self.match_dep.entry(dependency).or_default().insert(target);
        Ok(())
    }

    /// Require every replaced module of `dependency` to match the project.
    pub fn add_replace_source(&mut self, dependency: impl Into<String>) {
        self.replace_sources.insert(dependency.into());
    }

    /// Dependency supplying the version of `target`, if any.
    pub fn owner_of(&self, target: &str) -> Option<&str> {
        self.match_dep
            .iter()
            .find(|(_, targets)| targets.contains(target))
            .map(|(dep, _)| dep.as_str())
    }

    /// dependency -> targets pairs.
    pub fn match_deps(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.match_dep
    }

    /// Dependencies whose replace directives are checked.
    pub fn replace_sources(&self) -> &IndexSet<String> {
        &self.replace_sources
    }

    /// Whether packages from `package_path` need their manifest loaded.
    pub fn watches(&self, package_path: &str) -> bool {
        self.match_dep.contains_key(package_path) || self.replace_sources.contains(package_path)
    }

    /// Check if nothing is configured.
    pub fn is_empty(&self) -> bool {
        self.match_dep.is_empty() && self.replace_sources.is_empty()
    }
}

/// Split a `<dependency>:<module>` pair.
pub fn parse_match_dep(input: &str) -> Result<(&str, &str), MatchConfigError> {
    let parts: Vec<&str> = input.split(':').collect();

    let &[dependency, target] = parts.as_slice() else {
        return Err(MatchConfigError::Malformed {
            input: input.to_string(),
        });
    };

    if dependency.is_empty() || target.is_empty() {
        return Err(MatchConfigError::EmptyPath {
            input: input.to_string(),
        });
    }

    Ok((dependency, target))
}
