//! High-level operations.
//!
//! This module contains the implementation of the check: configuration,
//! loading, reconciliation and output.

pub mod check;
pub mod match_config;
pub mod reconcile;
pub mod report;

pub use check::{check, CheckResult, CheckSession};
pub use match_config::{parse_match_dep, MatchConfig, MatchConfigError};
pub use reconcile::{collect_candidates, find_mismatches, MismatchReport};
pub use report::{
    format_mismatch, format_result, format_result_for_output, format_result_json, OutputFormat,
};
