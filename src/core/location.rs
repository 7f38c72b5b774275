//! Provenance chains for declared modules.
//!
//! Every dependency remembers where it was required and, when a replace
//! directive changed it, where that happened. The `ancestor` link points at
//! the entry in the parent manifest for the module whose manifest pulled this
//! one in, so a chain walks from a dependency back to the project root.

use std::fmt;
use std::rc::Rc;

use crate::core::errors::DependencyError;

/// Longest ancestry chain walked before giving up.
pub const MAX_ANCESTRY_DEPTH: usize = 64;

/// A 1-based row/column position in a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FilePosition {
    pub row: usize,
    pub col: usize,
}

impl FilePosition {
    pub fn new(row: usize, col: usize) -> Self {
        FilePosition { row, col }
    }
}

impl fmt::Display for FilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, col {}", self.row, self.col)
    }
}

/// One entry in a provenance chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationAncestry {
    /// Identity of the manifest this entry belongs to
    manifest_identity: String,

    /// Where the require statement is
    declared_at: FilePosition,

    /// Where the replace statement that changed this module is
    overridden_at: Option<FilePosition>,

    /// Entry in the parent manifest that caused this manifest to load
    ancestor: Option<Rc<LocationAncestry>>,
}

impl LocationAncestry {
    /// Create a new entry for a require statement.
    pub fn new(
        manifest_identity: impl Into<String>,
        declared_at: FilePosition,
        ancestor: Option<Rc<LocationAncestry>>,
    ) -> Self {
        LocationAncestry {
            manifest_identity: manifest_identity.into(),
            declared_at,
            overridden_at: None,
            ancestor,
        }
    }

    /// Identity (module path) of the owning manifest.
    pub fn manifest_identity(&self) -> &str {
        &self.manifest_identity
    }

    /// Position of the require statement.
    pub fn declared_at(&self) -> FilePosition {
        self.declared_at
    }

    /// Position of the replace statement, if one applied.
    pub fn overridden_at(&self) -> Option<FilePosition> {
        self.overridden_at
    }

    /// The position that decided the effective version.
    pub fn effective_position(&self) -> FilePosition {
        self.overridden_at.unwrap_or(self.declared_at)
    }

    /// Parent manifest entry, if any.
    pub fn ancestor(&self) -> Option<&LocationAncestry> {
        self.ancestor.as_deref()
    }

    pub(crate) fn set_overridden_at(&mut self, pos: FilePosition) {
        self.overridden_at = Some(pos);
    }

    /// Lazily walk this entry and its ancestors, nearest first.
    pub fn chain(&self) -> AncestryChain<'_> {
        AncestryChain {
            next: Some(self),
            walked: 0,
        }
    }

    /// Collect the whole chain, failing if it exceeds [`MAX_ANCESTRY_DEPTH`].
    pub fn full_chain(&self) -> Result<Vec<&LocationAncestry>, DependencyError> {
        self.chain().collect()
    }
}

/// Iterator over an ancestry chain.
///
/// Yields a single `AncestryTooDeep` error and stops if the chain is longer
/// than [`MAX_ANCESTRY_DEPTH`].
#[derive(Debug)]
pub struct AncestryChain<'a> {
    next: Option<&'a LocationAncestry>,
    walked: usize,
}

impl<'a> Iterator for AncestryChain<'a> {
    type Item = Result<&'a LocationAncestry, DependencyError>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        if self.walked == MAX_ANCESTRY_DEPTH {
            return Some(Err(DependencyError::AncestryTooDeep {
                manifest: current.manifest_identity.clone(),
                limit: MAX_ANCESTRY_DEPTH,
            }));
        }

        self.walked += 1;
        self.next = current.ancestor();
        Some(Ok(current))
    }
}
