//! Batch conversion over a set of paths.
//!
//! Files are converted one at a time. A file that fails to read, parse or
//! write is recorded as failed in the report; the remaining files still run.
//! A converted file is written back only when its content changed, and never
//! in dry-run mode.

use std::path::{Path, PathBuf};

use jupgrade_core::diff::unified_diff;
use jupgrade_core::error::JupError;
use jupgrade_core::files::{read_source, write_atomic, FileSelector};
use jupgrade_core::output::{BatchReport, DiagnosticInfo, FileReport};
use tracing::{info, warn};

use crate::convert::{convert_source, ConvertOptions};
use crate::rules::RuleTables;

/// Settings for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub dry_run: bool,
    pub convert: ConvertOptions,
}

/// Converts every file selected under `roots`.
///
/// Only selection errors (a bad glob, a missing root) fail the whole run;
/// per-file failures end up in the report.
pub fn run_batch(
    roots: &[PathBuf],
    selector: &FileSelector,
    rules: &RuleTables,
    options: &BatchOptions,
) -> Result<BatchReport, JupError> {
    let files = selector.collect(roots)?;
    info!(files = files.len(), dry_run = options.dry_run, "starting batch");
    let reports = files
        .iter()
        .map(|path| convert_file(path, rules, options))
        .collect();
    let report = BatchReport::new(reports, options.dry_run);
    info!(
        converted = report.totals.converted,
        unchanged = report.totals.unchanged,
        failed = report.totals.failed,
        "batch finished"
    );
    Ok(report)
}

/// Converts one file and, unless this is a dry run, writes it back.
pub fn convert_file(path: &Path, rules: &RuleTables, options: &BatchOptions) -> FileReport {
    let label = path.display().to_string();
    let source = match read_source(path) {
        Ok(source) => source,
        Err(err) => {
            warn!(path = %label, error = %err, "cannot read file");
            return FileReport::failed(label, None, err.to_string());
        }
    };

    let conversion = match convert_source(&source, &label, rules, &options.convert) {
        Ok(conversion) => conversion,
        Err(err) => {
            warn!(path = %label, "conversion failed");
            return FileReport::failed(label, Some(&source), err.to_string());
        }
    };

    let mut report = FileReport::converted(label.clone(), &source, &conversion.output);
    let summary = conversion.summary;
    report.rules_fired = summary
        .rules_fired
        .iter()
        .map(|(rule, count)| (rule.as_str().to_string(), *count))
        .collect();
    report.imports_added = summary.imports_added;
    report.diagnostics = summary
        .diagnostics
        .iter()
        .map(|diagnostic| DiagnosticInfo::new(diagnostic.rule.as_str(), &diagnostic.message))
        .collect();

    if !report.is_changed() {
        info!(path = %label, "unchanged");
        return report;
    }
    if options.dry_run {
        report.diff = Some(unified_diff(&label, &source, &conversion.output));
        info!(path = %label, "would convert");
        return report;
    }
    if let Err(err) = write_atomic(path, &conversion.output) {
        warn!(path = %label, error = %err, "cannot write file");
        return FileReport::failed(label, Some(&source), err.to_string());
    }
    info!(path = %label, "converted");
    report
}
