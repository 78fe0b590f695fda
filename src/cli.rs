//! CLI front door.
//!
//! Provides the command-line helpers behind the `jupgrade` binary:
//! - `convert` - rewrite JUnit 4 test sources in place (or preview with a diff)
//! - `rules` - print the effective rule tables
//!
//! ## Error Handling
//!
//! All functions return `Result<T, JupError>`. The `JupError` type provides
//! stable error codes for JSON output and exit statuses.

use std::path::{Path, PathBuf};

use jupgrade_core::error::JupError;
use jupgrade_core::files::FileSelector;
use jupgrade_core::output::{BatchReport, RulesResponse};

use crate::batch::{run_batch, BatchOptions};
use crate::rules::RuleTables;

/// Loads the rule tables, from `path` when given, else the built-in ones.
pub fn load_rules(path: Option<&Path>) -> Result<RuleTables, JupError> {
    match path {
        Some(path) => Ok(RuleTables::from_json_file(path)?),
        None => Ok(RuleTables::default()),
    }
}

/// Runs `convert` over `paths`.
///
/// # Arguments
///
/// * `paths` - Files or directories to convert
/// * `include` - File name globs; empty means the default `*Test.java`
/// * `rules_path` - Optional JSON rule table override
/// * `options` - Dry-run flag and conversion options
pub fn run_convert(
    paths: &[PathBuf],
    include: &[String],
    rules_path: Option<&Path>,
    options: &BatchOptions,
) -> Result<BatchReport, JupError> {
    if paths.is_empty() {
        return Err(JupError::invalid_args("at least one path is required"));
    }
    let rules = load_rules(rules_path)?;
    let selector = FileSelector::new(include)?;
    run_batch(paths, &selector, &rules, options)
}

/// Builds the `rules` response.
pub fn run_rules(rules_path: Option<&Path>) -> Result<RulesResponse, JupError> {
    let rules = load_rules(rules_path)?;
    Ok(RulesResponse::new(rules.to_json()))
}

/// Exit error for a finished batch: `ApplyError` when any file failed.
pub fn batch_outcome(report: &BatchReport) -> Result<(), JupError> {
    if !report.has_failures() {
        return Ok(());
    }
    let first = report.files.iter().find(|file| file.error.is_some());
    Err(JupError::apply(
        format!("{} of {} files failed", report.totals.failed, report.totals.files),
        first.map(|file| file.path.clone()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn convert_requires_paths() {
        let err = run_convert(&[], &[], None, &BatchOptions::default()).unwrap_err();
        assert!(matches!(err, JupError::InvalidArguments { .. }));
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_convert(
            &[dir.path().join("missing")],
            &[],
            None,
            &BatchOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, JupError::FileNotFound { .. }));
    }

    #[test]
    fn bad_rules_file_is_invalid_args() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("rules.json");
        fs::write(&rules, "[1, 2]").unwrap();
        let err = run_rules(Some(&rules)).unwrap_err();
        assert!(matches!(err, JupError::InvalidArguments { .. }));
    }

    #[test]
    fn rules_response_lists_tables() {
        let response = run_rules(None).unwrap();
        assert_eq!(response.status, "ok");
        assert_eq!(
            response.rules["annotations"]["Before"],
            serde_json::json!("BeforeEach")
        );
    }

    #[test]
    fn failed_files_make_an_apply_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("BadTest.java"), "class BadTest {").unwrap();
        let report = run_convert(
            &[dir.path().to_path_buf()],
            &[],
            None,
            &BatchOptions::default(),
        )
        .unwrap();
        let err = batch_outcome(&report).unwrap_err();
        assert_eq!(err.error_code().code(), 4);
    }
}
