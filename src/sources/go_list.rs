//! Import-graph loading through `go list`.
//!
//! `go list -e -deps -json <pattern>` prints one JSON object per package,
//! dependencies first. Packages matched by the pattern have `DepOnly` unset;
//! their `Imports` name other packages in the same stream.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{ModuleInfo, Package};
use crate::sources::source::PackageLoader;
use crate::util::process::{find_executable, ProcessBuilder};

/// Loads packages by running the `go` tool.
#[derive(Debug, Clone)]
pub struct GoListLoader {
    /// Path to the `go` binary
    go: PathBuf,

    /// Extra flags passed to `go list` (e.g. `-tags=integration`)
    flags: Vec<String>,

    /// Directory to run in
    cwd: Option<PathBuf>,
}

impl GoListLoader {
    /// Create a loader using `go` from PATH.
    pub fn from_path() -> Result<Self> {
        let go = find_executable("go").ok_or_else(|| {
            anyhow::anyhow!(
                "could not find `go` in PATH\n\
                 help: Install Go, pass `--go <PATH>`, or use `--from-json` with saved `go list` output"
            )
        })?;
        Ok(GoListLoader::new(go))
    }

    /// Create a loader for a specific `go` binary.
    pub fn new(go: impl Into<PathBuf>) -> Self {
        GoListLoader {
            go: go.into(),
            flags: Vec::new(),
            cwd: None,
        }
    }

    /// Add extra `go list` flags.
    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.flags = flags;
        self
    }

    /// Run `go list` in this directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    fn command(&self, pattern: &str) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.go)
            .args(["list", "-e", "-deps", "-json"])
            .args(&self.flags)
            .arg(pattern);
        if let Some(ref cwd) = self.cwd {
            cmd = cmd.cwd(cwd);
        }
        cmd
    }
}

impl PackageLoader for GoListLoader {
    fn name(&self) -> &str {
        "go list"
    }

    fn load(&self, pattern: &str) -> Result<Vec<Package>> {
        let cmd = self.command(pattern);
        tracing::debug!("running `{}`", cmd.display_command());

        let output = cmd.exec_and_check().context("getting packages")?;
        decode_package_stream(&output.stdout)
    }
}

/// Loads packages from a file holding saved `go list -deps -json` output.
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileLoader { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PackageLoader for JsonFileLoader {
    fn name(&self) -> &str {
        "json file"
    }

    /// The pattern is ignored; the file already holds the matched packages.
    fn load(&self, _pattern: &str) -> Result<Vec<Package>> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("failed to read package list: {}", self.path.display()))?;
        decode_package_stream(&bytes)
            .with_context(|| format!("failed to decode package list: {}", self.path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedPackage {
    import_path: String,
    #[serde(default)]
    dep_only: bool,
    #[serde(default)]
    module: Option<ListedModule>,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    error: Option<ListedError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedModule {
    path: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    go_mod: Option<PathBuf>,
    #[serde(default)]
    replace: Option<Box<ListedModule>>,
    #[serde(default)]
    main: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedError {
    err: String,
}

impl From<ListedModule> for ModuleInfo {
    fn from(m: ListedModule) -> Self {
        ModuleInfo {
            path: m.path,
            version: m.version,
            manifest: m.go_mod,
            replace: m.replace.map(|r| Box::new(ModuleInfo::from(*r))),
            main: m.main,
        }
    }
}

/// Decode a concatenated stream of `go list -json` objects into root
/// packages with their direct imports attached.
pub fn decode_package_stream(bytes: &[u8]) -> Result<Vec<Package>> {
    let mut listed = Vec::new();
    for item in serde_json::Deserializer::from_slice(bytes).into_iter::<ListedPackage>() {
        listed.push(item.context("malformed `go list` output")?);
    }

    if listed.is_empty() {
        tracing::warn!("no packages matched");
        return Ok(Vec::new());
    }

    let mut modules: HashMap<String, Option<ModuleInfo>> = HashMap::with_capacity(listed.len());
    let mut roots = Vec::new();

    for pkg in listed {
        if let Some(ref err) = pkg.error {
            if !pkg.dep_only {
                tracing::warn!("package {}: {}", pkg.import_path, err.err);
            }
        }

        let module = pkg.module.map(ModuleInfo::from);
        if !pkg.dep_only {
            roots.push((pkg.import_path.clone(), module.clone(), pkg.imports));
        }
        modules.insert(pkg.import_path, module);
    }

    let packages = roots
        .into_iter()
        .map(|(import_path, module, imports)| {
            let mut pkg = Package::new(import_path, module);
            for import in imports {
                let module = modules.get(&import).cloned().flatten();
                pkg = pkg.with_import(Package::new(import, module));
            }
            pkg
        })
        .collect();

    Ok(packages)
}
