//! Dependency model error types and diagnostics.

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error while building or walking a manifest's dependency model.
#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("duplicate dependency {module}")]
    DuplicateRequirement { module: String },

    #[error("multiple version-specific overrides for module {module}")]
    ConflictingTargetedOverride { module: String },

    #[error("multiple non-version-specific overrides for module {module}")]
    ConflictingUntargetedOverride { module: String },

    #[error("ancestry chain from `{manifest}` exceeds {limit} manifests")]
    AncestryTooDeep { manifest: String, limit: usize },
}

impl DependencyError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DependencyError::DuplicateRequirement { module } => {
                Diagnostic::error(format!("module `{}` is required more than once", module))
                    .with_suggestion(format!(
                        "Keep a single require line for `{}`",
                        module
                    ))
                    .with_suggestion("Run `go mod tidy` to normalize the manifest")
            }

            DependencyError::ConflictingTargetedOverride { module } => Diagnostic::error(
                format!("conflicting version-specific replace directives for `{}`", module),
            )
            .with_context("two replace directives target the same required version")
            .with_suggestion(format!("Remove one of the replace directives for `{}`", module)),

            DependencyError::ConflictingUntargetedOverride { module } => Diagnostic::error(
                format!("conflicting replace directives for `{}`", module),
            )
            .with_context("two replace directives apply to every version of the module")
            .with_suggestion(format!("Remove one of the replace directives for `{}`", module)),

            DependencyError::AncestryTooDeep { manifest, limit } => Diagnostic::error(format!(
                "ancestry of `{}` is deeper than {} manifests",
                manifest, limit
            ))
            .with_context("the package graph may contain a cycle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_messages() {
        let err = DependencyError::ConflictingTargetedOverride {
            module: "example.com/a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "multiple version-specific overrides for module example.com/a"
        );

        let err = DependencyError::ConflictingUntargetedOverride {
            module: "example.com/a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "multiple non-version-specific overrides for module example.com/a"
        );
    }

    #[test]
    fn test_duplicate_diagnostic() {
        let err = DependencyError::DuplicateRequirement {
            module: "example.com/dup".to_string(),
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("required more than once"));
        assert!(output.contains("example.com/dup"));
        assert!(output.contains("help: consider:"));
    }
}
