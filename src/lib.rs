//! modcheck - Check that a Go project agrees with its dependencies on module
//! versions
//!
//! This crate provides the core library functionality for modcheck,
//! including go.mod parsing, the dependency model with its override rules,
//! and reconciliation of versions across manifests.

pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities for modcheck unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides on-disk manifest trees and package builders.
#[cfg(test)]
pub mod test_support;

pub use core::{
    dependency::Dependency, dependency_set::DependencySet, location::LocationAncestry,
    manifest::ModFile, module_ref::ModuleRef, package::Package,
};

pub use ops::{check, CheckResult, MatchConfig};
