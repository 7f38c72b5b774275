//! Declared dependencies.
//!
//! A Dependency is one `require` entry of one manifest. It tracks the version
//! as written next to the version left after the manifest's `replace`
//! directives were applied.

use std::rc::Rc;

use crate::core::errors::DependencyError;
use crate::core::location::LocationAncestry;
use crate::core::manifest::Replace;
use crate::core::module_ref::ModuleRef;

/// A required module inside one manifest.
#[derive(Debug, Clone)]
pub struct Dependency {
    /// Module as written on the require line
    original: ModuleRef,

    /// Module after replace directives
    effective: ModuleRef,

    /// Required without an `// indirect` marker
    direct: bool,

    /// The current effective module came from a replace with no old version
    global_override: bool,

    /// Where this requirement came from
    location: Rc<LocationAncestry>,
}

impl Dependency {
    /// Create a dependency whose effective version is the declared one.
    pub fn new(module: ModuleRef, direct: bool, location: LocationAncestry) -> Self {
        Dependency {
            effective: module.clone(),
            original: module,
            direct,
            global_override: false,
            location: Rc::new(location),
        }
    }

    /// Module path as required.
    pub fn path(&self) -> &str {
        self.original.path()
    }

    /// Module as written in the manifest.
    pub fn original_version(&self) -> &ModuleRef {
        &self.original
    }

    /// Module after replace directives.
    pub fn effective_version(&self) -> &ModuleRef {
        &self.effective
    }

    /// Check if this was required directly.
    pub fn is_direct(&self) -> bool {
        self.direct
    }

    /// Check if the effective module came from a replace for every version.
    pub fn global_override_applied(&self) -> bool {
        self.global_override
    }

    /// Check if a replace changed this dependency.
    pub fn is_overridden(&self) -> bool {
        self.original != self.effective
    }

    /// Provenance of this requirement.
    pub fn location(&self) -> &Rc<LocationAncestry> {
        &self.location
    }

    /// Apply a replace directive whose old path names this module.
    ///
    /// Returns whether the effective module changed. A version-specific
    /// replace beats a replace for every version regardless of order, but two
    /// replaces of the same kind that both apply are a conflict.
    pub fn apply_override(&mut self, rep: &Replace) -> Result<bool, DependencyError> {
        if let Some(old_version) = rep.old_version.as_deref() {
            if self.original.version() != old_version {
                return Ok(false);
            }

            if self.is_overridden() && !self.global_override {
                return Err(DependencyError::ConflictingTargetedOverride {
                    module: self.original.path().to_string(),
                });
            }

            self.set_effective(rep, false);
            return Ok(true);
        }

        if self.is_overridden() {
            if self.global_override {
                return Err(DependencyError::ConflictingUntargetedOverride {
                    module: self.original.path().to_string(),
                });
            }

            // A version-specific replace already won.
            return Ok(false);
        }

        self.set_effective(rep, true);
        Ok(true)
    }

    fn set_effective(&mut self, rep: &Replace, global: bool) {
        self.effective = rep.new.clone();
        self.global_override = global;
        Rc::make_mut(&mut self.location).set_overridden_at(rep.position);
    }
}
