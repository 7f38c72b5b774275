//! Test utilities for modcheck unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use modcheck::test_support::{project_package, TestTree};
//!
//! #[test]
//! fn test_example() {
//!     let tree = TestTree::new();
//!     let app = tree.manifest("app", "module example.com/app\n");
//!     let pkg = project_package("example.com/app", &app);
//!     // Hand `pkg` to a StaticLoader...
//! }
//! ```

pub mod fixtures;

// Re-export fixtures for convenience
pub use fixtures::*;
