//! CLI integration tests for modcheck.
//!
//! These tests drive the binary with `--from-json`, pointing saved
//! `go list` output at go.mod files in a temporary tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

/// Get the modcheck binary command, isolated from the user's global config.
fn modcheck(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("modcheck").unwrap();
    cmd.env("HOME", home).env_remove("MODCHECK_GO");
    cmd
}

/// A project `example.com/app` importing `github.com/dep/lib`.
struct Fixture {
    tmp: TempDir,
}

impl Fixture {
    fn new(app_mod: &str, lib_mod: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let fixture = Fixture { tmp };

        let app = fixture.write("app/go.mod", app_mod);
        let lib = fixture.write("lib/go.mod", lib_mod);

        let packages = [
            json!({
                "ImportPath": "github.com/dep/lib",
                "DepOnly": true,
                "Module": {
                    "Path": "github.com/dep/lib",
                    "Version": "v1.0.0",
                    "GoMod": lib,
                }
            }),
            json!({
                "ImportPath": "example.com/app",
                "Module": {
                    "Path": "example.com/app",
                    "Main": true,
                    "GoMod": app,
                },
                "Imports": ["github.com/dep/lib"]
            }),
        ];
        let stream: String = packages
            .iter()
            .map(|p| serde_json::to_string_pretty(p).unwrap() + "\n")
            .collect();
        fixture.write("packages.json", &stream);

        fixture
    }

    fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.tmp.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn packages(&self) -> PathBuf {
        self.tmp.path().join("packages.json")
    }

    fn cmd(&self) -> Command {
        let mut cmd = modcheck(self.root());
        cmd.current_dir(self.root())
            .arg("--from-json")
            .arg(self.packages());
        cmd
    }
}

const APP_MOD: &str = "module example.com/app

go 1.21

require (
\tgithub.com/dep/lib v1.0.0
\tgithub.com/shared/mod v1.0.0
)
";

const LIB_MOD: &str = "module github.com/dep/lib

go 1.21

require github.com/shared/mod v1.2.0
";

// ============================================================================
// flag validation
// ============================================================================

#[test]
fn test_requires_pattern() {
    let tmp = TempDir::new().unwrap();

    modcheck(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("<PATTERN>"));
}

#[test]
fn test_malformed_match_dep() {
    let tmp = TempDir::new().unwrap();

    modcheck(tmp.path())
        .args(["--match-dep", "github.com/dep/lib", "./..."])
        .args(["--from-json", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "unexpected dep match input: github.com/dep/lib",
        ))
        .stderr(predicate::str::contains("help: consider:"));
}

#[test]
fn test_empty_match_dep_path() {
    let tmp = TempDir::new().unwrap();

    modcheck(tmp.path())
        .args(["--match-dep", ":github.com/shared/mod", "./..."])
        .args(["--from-json", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty package path"));
}

#[test]
fn test_duplicate_match_dep_target() {
    let tmp = TempDir::new().unwrap();

    modcheck(tmp.path())
        .args(["--match-dep", "a.com/x:github.com/shared/mod"])
        .args(["--match-dep", "b.com/y:github.com/shared/mod"])
        .args(["--from-json", "does-not-exist.json", "./..."])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "dep github.com/shared/mod being sourced from multiple packages: a.com/x and b.com/y",
        ));
}

#[test]
fn test_invalid_output_format() {
    let fixture = Fixture::new(APP_MOD, LIB_MOD);

    fixture
        .cmd()
        .args(["--output-format", "yaml", "./..."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid output format 'yaml'"));
}

#[test]
fn test_missing_package_list() {
    let tmp = TempDir::new().unwrap();

    modcheck(tmp.path())
        .args(["--from-json", "does-not-exist.json", "./..."])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read package list"));
}

// ============================================================================
// checking
// ============================================================================

#[test]
fn test_reports_mismatch() {
    let fixture = Fixture::new(APP_MOD, LIB_MOD);

    fixture
        .cmd()
        .args(["--match-dep", "github.com/dep/lib:github.com/shared/mod"])
        .arg("./...")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Module mismatch: in modfile for module example.com/app line 7, col 2: \
             have version v1.0.0 but want version v1.2.0",
        ))
        .stderr(predicate::str::contains(
            "originally included in modfile for module github.com/dep/lib line 5, col 1",
        ))
        .stderr(predicate::str::contains("found dependency mismatches (1)"));
}

#[test]
fn test_passes_when_versions_agree() {
    let lib = "module github.com/dep/lib\n\nrequire github.com/shared/mod v1.0.0\n";
    let fixture = Fixture::new(APP_MOD, lib);

    fixture
        .cmd()
        .args(["--match-dep", "github.com/dep/lib:github.com/shared/mod"])
        .arg("./...")
        .assert()
        .success()
        .stderr(predicate::str::contains("Module mismatch").not());
}

#[test]
fn test_unwatched_dependency_is_ignored() {
    let fixture = Fixture::new(APP_MOD, LIB_MOD);

    fixture.cmd().arg("./...").assert().success();
}

#[test]
fn test_comma_separated_match_dep() {
    let fixture = Fixture::new(APP_MOD, LIB_MOD);

    fixture
        .cmd()
        .args([
            "--match-dep",
            "github.com/dep/lib:github.com/shared/mod,github.com/dep/lib:github.com/other/mod",
        ])
        .arg("./...")
        .assert()
        .failure()
        .stderr(predicate::str::contains("have version v1.0.0 but want version v1.2.0"));
}

#[test]
fn test_replace_source_mismatch() {
    let app = "module example.com/app\n\
               \n\
               require (\n\
               \tgithub.com/dep/lib v1.0.0\n\
               \tgithub.com/shared/mod v0.1.0\n\
               )\n";
    let lib = "module github.com/dep/lib\n\
               \n\
               require github.com/shared/mod v0.1.0\n\
               \n\
               replace github.com/shared/mod => github.com/fork/mod v0.2.0\n";
    let fixture = Fixture::new(app, lib);

    fixture
        .cmd()
        .args(["--match-replaces", "github.com/dep/lib"])
        .arg("./...")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "have version v0.1.0 but want version v0.2.0",
        ))
        .stderr(predicate::str::contains("replaced at line 5, col 1"));
}

#[test]
fn test_json_output() {
    let fixture = Fixture::new(APP_MOD, LIB_MOD);

    let output = fixture
        .cmd()
        .args(["--match-dep", "github.com/dep/lib:github.com/shared/mod"])
        .args(["--output-format", "json", "./..."])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["packages"], 1);
    assert_eq!(json["mismatches"][0]["module"], "github.com/shared/mod");
    assert_eq!(json["mismatches"][0]["want_version"], "v1.2.0");
    assert_eq!(json["mismatches"][0]["got_version"], "v1.0.0");
    assert_eq!(json["mismatches"][0]["want"][1]["manifest"], "example.com/app");
}

#[test]
fn test_project_config_file() {
    let fixture = Fixture::new(APP_MOD, LIB_MOD);
    fixture.write(
        ".modcheck/config.toml",
        "[check]\nmatch-dep = [\"github.com/dep/lib:github.com/shared/mod\"]\n",
    );

    fixture
        .cmd()
        .arg("-C")
        .arg(fixture.root())
        .arg("./...")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Module mismatch"));
}

#[test]
fn test_duplicate_require_is_reported() {
    let app = "module example.com/app\n\
               \n\
               require github.com/shared/mod v1.0.0\n\
               require github.com/shared/mod v1.1.0\n";
    let fixture = Fixture::new(app, LIB_MOD);

    fixture
        .cmd()
        .arg("./...")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "module `github.com/shared/mod` is required more than once",
        ));
}

#[test]
fn test_conflicting_replaces_name_the_manifest() {
    let lib = "module github.com/dep/lib\n\
               \n\
               require github.com/shared/mod v1.0.0\n\
               \n\
               replace github.com/shared/mod => github.com/fork/mod v1.1.0\n\
               replace github.com/shared/mod => ../mod\n";
    let fixture = Fixture::new(APP_MOD, lib);
    let lib_manifest = fixture.root().join("lib").join("go.mod");

    fixture
        .cmd()
        .args(["--match-replaces", "github.com/dep/lib"])
        .arg("./...")
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!(
            "loading dependency info for: {}",
            lib_manifest.display()
        )))
        .stderr(predicate::str::contains(
            "multiple non-version-specific overrides for module github.com/shared/mod",
        ))
        .stderr(predicate::str::contains("loading deps for dependency github.com/dep/lib"));
}

#[test]
fn test_empty_package_list_passes() {
    let fixture = Fixture::new(APP_MOD, LIB_MOD);
    fixture.write("packages.json", "");

    fixture
        .cmd()
        .args(["--match-dep", "github.com/dep/lib:github.com/shared/mod"])
        .arg("./...")
        .assert()
        .success()
        .stderr(predicate::str::contains("no packages matched"));
}

#[test]
fn test_syntax_error_is_reported() {
    let fixture = Fixture::new("module example.com/app\nfrobnicate x\n", LIB_MOD);

    fixture
        .cmd()
        .arg("./...")
        .assert()
        .failure()
        .stderr(predicate::str::contains("go.mod:2:1"));
}
