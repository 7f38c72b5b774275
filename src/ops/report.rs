//! Output formatting for check results (human/JSON).

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::{DependencyError, LocationAncestry};
use crate::ops::check::CheckResult;
use crate::ops::reconcile::MismatchReport;

/// Output format for check results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(OutputFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing output format option.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid output format '{0}', valid values: human, json")]
pub struct OutputFormatParseError(pub String);

const RED_BOLD: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

/// Format one mismatch for the terminal.
pub fn format_mismatch(report: &MismatchReport, color: bool) -> Result<String, DependencyError> {
    let mut output = String::new();
    let got_at = report.got.effective_position();

    let (start, end) = if color { (RED_BOLD, RESET) } else { ("", "") };
    writeln!(
        output,
        "{}Module mismatch{}: in modfile for module {} line {}, col {}: \
         have version {} but want version {}",
        start,
        end,
        report.got.manifest_identity(),
        got_at.row,
        got_at.col,
        report.got_version,
        report.want_version
    )
    .unwrap();

    output.push_str("\tgot version:\n");
    format_ancestry(&mut output, &report.got)?;
    output.push_str("\twant version:\n");
    format_ancestry(&mut output, &report.want)?;

    Ok(output)
}

fn format_ancestry(output: &mut String, location: &LocationAncestry) -> Result<(), DependencyError> {
    for entry in location.chain() {
        let entry = entry?;
        let declared = entry.declared_at();

        writeln!(
            output,
            "\t\toriginally included in modfile for module {} line {}, col {}",
            entry.manifest_identity(),
            declared.row,
            declared.col
        )
        .unwrap();

        if let Some(replaced) = entry.overridden_at() {
            writeln!(
                output,
                "\t\t\treplaced at line {}, col {}",
                replaced.row, replaced.col
            )
            .unwrap();
        }
    }
    Ok(())
}

/// Format a whole check result for display (human-readable).
pub fn format_result(result: &CheckResult, color: bool) -> Result<String, DependencyError> {
    let mut output = String::new();
    for report in &result.mismatches {
        output.push_str(&format_mismatch(report, color)?);
    }
    Ok(output)
}

#[derive(Serialize)]
struct JsonResult<'a> {
    passed: bool,
    packages: usize,
    manifests_loaded: usize,
    mismatches: Vec<JsonMismatch<'a>>,
}

#[derive(Serialize)]
struct JsonMismatch<'a> {
    module: &'a str,
    want_version: &'a str,
    got_version: &'a str,
    want: Vec<JsonLocation<'a>>,
    got: Vec<JsonLocation<'a>>,
}

#[derive(Serialize)]
struct JsonLocation<'a> {
    manifest: &'a str,
    line: usize,
    col: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    replaced_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replaced_col: Option<usize>,
}

fn json_chain(location: &LocationAncestry) -> Result<Vec<JsonLocation<'_>>, DependencyError> {
    location
        .chain()
        .map(|entry| {
            let entry = entry?;
            let replaced = entry.overridden_at();
            Ok(JsonLocation {
                manifest: entry.manifest_identity(),
                line: entry.declared_at().row,
                col: entry.declared_at().col,
                replaced_line: replaced.map(|p| p.row),
                replaced_col: replaced.map(|p| p.col),
            })
        })
        .collect()
}

/// Format a check result as JSON.
pub fn format_result_json(result: &CheckResult) -> Result<String, DependencyError> {
    let mismatches = result
        .mismatches
        .iter()
        .map(|r| {
            Ok(JsonMismatch {
                module: &r.module_path,
                want_version: &r.want_version,
                got_version: &r.got_version,
                want: json_chain(&r.want)?,
                got: json_chain(&r.got)?,
            })
        })
        .collect::<Result<Vec<_>, DependencyError>>()?;

    let json = JsonResult {
        passed: result.passed(),
        packages: result.packages,
        manifests_loaded: result.manifests_loaded,
        mismatches,
    };

    Ok(serde_json::to_string_pretty(&json)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize result: {}"}}"#, e)))
}

/// Format a check result in the requested format.
pub fn format_result_for_output(
    result: &CheckResult,
    format: OutputFormat,
    color: bool,
) -> Result<String, DependencyError> {
    match format {
        OutputFormat::Human => format_result(result, color),
        OutputFormat::Json => format_result_json(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FilePosition;
    use std::rc::Rc;

    fn report() -> MismatchReport {
        let root_d = Rc::new(LocationAncestry::new(
            "example.com/app",
            FilePosition::new(4, 2),
            None,
        ));
        let mut want = LocationAncestry::new("example.com/d", FilePosition::new(3, 1), Some(root_d));
        want.set_overridden_at(FilePosition::new(7, 1));
        let got = LocationAncestry::new("example.com/app", FilePosition::new(5, 2), None);

        MismatchReport {
            module_path: "example.com/m".to_string(),
            want_version: "v2.0".to_string(),
            got_version: "v1.0".to_string(),
            want: Rc::new(want),
            got: Rc::new(got),
        }
    }

    #[test]
    fn test_format_mismatch() {
        let output = format_mismatch(&report(), false).unwrap();
        let expected = "Module mismatch: in modfile for module example.com/app line 5, col 2: \
                        have version v1.0 but want version v2.0\n\
                        \tgot version:\n\
                        \t\toriginally included in modfile for module example.com/app line 5, col 2\n\
                        \twant version:\n\
                        \t\toriginally included in modfile for module example.com/d line 3, col 1\n\
                        \t\t\treplaced at line 7, col 1\n\
                        \t\toriginally included in modfile for module example.com/app line 4, col 2\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_format_mismatch_color() {
        let output = format_mismatch(&report(), true).unwrap();
        assert!(output.starts_with("\x1b[1;31mModule mismatch\x1b[0m:"));
    }

    #[test]
    fn test_format_json() {
        let result = CheckResult {
            mismatches: vec![report()],
            packages: 3,
            manifests_loaded: 2,
        };

        let json: serde_json::Value =
            serde_json::from_str(&format_result_json(&result).unwrap()).unwrap();
        assert_eq!(json["passed"], false);
        assert_eq!(json["mismatches"][0]["module"], "example.com/m");
        assert_eq!(json["mismatches"][0]["want"][0]["replaced_line"], 7);
        assert_eq!(json["mismatches"][0]["want"][1]["manifest"], "example.com/app");
        assert!(json["mismatches"][0]["got"][0].get("replaced_line").is_none());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("human".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("valid values: human, json"));
    }
}
