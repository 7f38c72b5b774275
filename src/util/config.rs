//! Configuration file support for modcheck.
//!
//! modcheck supports two configuration file locations:
//! - Global: `~/.modcheck/config.toml` - User-wide defaults
//! - Project: `.modcheck/config.toml` - Project-specific settings
//!
//! Project config takes precedence over global config for single values;
//! lists from both are combined, global entries first.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// modcheck configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Check settings
    pub check: CheckConfig,

    /// Go toolchain settings
    pub go: GoConfig,
}

/// What to check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CheckConfig {
    /// `<dependency>:<module>` pairs, same as `--match-dep`
    pub match_dep: Vec<String>,

    /// Dependencies whose replace directives must match, same as
    /// `--match-replaces`
    pub match_replaces: Vec<String>,

    /// Default output format (human, json)
    pub output_format: Option<String>,
}

/// How to invoke the Go toolchain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoConfig {
    /// Path to the `go` binary (defaults to PATH lookup)
    pub binary: Option<PathBuf>,

    /// Extra flags for `go list` (e.g. `-tags=integration`)
    pub flags: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or
    /// broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        self.check.match_dep.extend(other.check.match_dep);
        self.check.match_replaces.extend(other.check.match_replaces);
        if other.check.output_format.is_some() {
            self.check.output_format = other.check.output_format;
        }

        if other.go.binary.is_some() {
            self.go.binary = other.go.binary;
        }
        self.go.flags.extend(other.go.flags);
    }
}

/// Get the global modcheck config directory (~/.modcheck).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".modcheck"))
}

/// Get the global config path (~/.modcheck/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.modcheck/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".modcheck").join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Priority (highest first):
/// 1. Project config (.modcheck/config.toml)
/// 2. Global config (~/.modcheck/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}
