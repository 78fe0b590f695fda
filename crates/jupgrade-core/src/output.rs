//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Structured JSON:** every response serializes to JSON; the text format
//!    is a rendering of the same data
//! 2. **Status first:** every response has `status` as first field
//! 3. **Deterministic:** same input, same output (maps are ordered, files
//!    are sorted by path)
//! 4. **Nullable vs absent:** optional fields are omitted when not applicable
//! 5. **Versioned:** schema version in every response

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{JupError, OutputErrorCode};
use crate::hash::ContentHash;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Per-file Types
// ============================================================================

/// Outcome of converting one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// The file changed (and was written, unless this is a dry run).
    Converted,
    /// The converter produced identical text; nothing was written.
    Unchanged,
    /// Parsing, printing or writing failed; the file on disk is untouched.
    Failed,
}

/// Something a rule noticed but did not act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticInfo {
    /// Stable name of the rule that produced it.
    pub rule: String,
    /// Human-readable message.
    pub message: String,
}

impl DiagnosticInfo {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        DiagnosticInfo {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Report entry for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_before: Option<ContentHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_after: Option<ContentHash>,
    /// How many times each rule fired.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules_fired: BTreeMap<String, usize>,
    /// Imports injected by rules, in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports_added: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DiagnosticInfo>,
    /// Unified diff, only filled in on dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    /// A successful conversion. The status follows from the hashes.
    pub fn converted(path: impl Into<String>, before: &str, after: &str) -> Self {
        let hash_before = ContentHash::compute(before.as_bytes());
        let hash_after = ContentHash::compute(after.as_bytes());
        let status = if hash_before == hash_after {
            FileStatus::Unchanged
        } else {
            FileStatus::Converted
        };
        FileReport {
            path: path.into(),
            status,
            hash_before: Some(hash_before),
            hash_after: Some(hash_after),
            rules_fired: BTreeMap::new(),
            imports_added: Vec::new(),
            diagnostics: Vec::new(),
            diff: None,
            error: None,
        }
    }

    /// A failed conversion. `before` is the text read from disk, if any.
    pub fn failed(path: impl Into<String>, before: Option<&str>, error: impl Into<String>) -> Self {
        FileReport {
            path: path.into(),
            status: FileStatus::Failed,
            hash_before: before.map(|text| ContentHash::compute(text.as_bytes())),
            hash_after: None,
            rules_fired: BTreeMap::new(),
            imports_added: Vec::new(),
            diagnostics: Vec::new(),
            diff: None,
            error: Some(error.into()),
        }
    }

    pub fn is_changed(&self) -> bool {
        self.status == FileStatus::Converted
    }
}

// ============================================================================
// Batch Report
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTotals {
    pub files: usize,
    pub converted: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Response for the convert command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// "ok" when every file converted, "error" otherwise.
    pub status: String,
    pub schema_version: String,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub totals: BatchTotals,
}

impl BatchReport {
    pub fn new(mut files: Vec<FileReport>, dry_run: bool) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let mut totals = BatchTotals {
            files: files.len(),
            ..BatchTotals::default()
        };
        for file in &files {
            match file.status {
                FileStatus::Converted => totals.converted += 1,
                FileStatus::Unchanged => totals.unchanged += 1,
                FileStatus::Failed => totals.failed += 1,
            }
        }
        let status = if totals.failed == 0 { "ok" } else { "error" };
        BatchReport {
            status: status.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            dry_run,
            files,
            totals,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.totals.failed > 0
    }

    /// Human-readable rendering for `--format text`.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            let label = match file.status {
                FileStatus::Converted if self.dry_run => "would convert",
                FileStatus::Converted => "converted",
                FileStatus::Unchanged => "unchanged",
                FileStatus::Failed => "failed",
            };
            let _ = writeln!(out, "{:>13}  {}", label, file.path);
            if let Some(error) = &file.error {
                for line in error.lines() {
                    let _ = writeln!(out, "               {}", line);
                }
            }
            for diagnostic in &file.diagnostics {
                let _ = writeln!(
                    out,
                    "               note [{}]: {}",
                    diagnostic.rule, diagnostic.message
                );
            }
            if let Some(diff) = &file.diff {
                out.push_str(diff);
            }
        }
        let _ = writeln!(
            out,
            "{} files: {} converted, {} unchanged, {} failed",
            self.totals.files, self.totals.converted, self.totals.unchanged, self.totals.failed
        );
        out
    }
}

// ============================================================================
// Rules Response
// ============================================================================

/// Response for the rules command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesResponse {
    pub status: String,
    pub schema_version: String,
    pub rules: serde_json::Value,
}

impl RulesResponse {
    pub fn new(rules: serde_json::Value) -> Self {
        RulesResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            rules,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error information for error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a JupError.
    pub fn from_error(err: &JupError) -> Self {
        let details = match err {
            JupError::InvalidArguments { details, .. } => details.clone(),
            JupError::FileNotFound { path } => Some(serde_json::json!({ "path": path })),
            JupError::ApplyError { file, .. } => {
                file.as_ref().map(|f| serde_json::json!({ "file": f }))
            }
            JupError::InternalError { .. } => None,
        };
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            details,
        }
    }
}

/// Response for any command that failed before producing its own response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a JupError.
    pub fn from_error(err: &JupError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Response Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
///
/// This is the single output path for CLI, ensuring consistency.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Emit a response as compact JSON (single line) to a writer.
pub fn emit_response_compact<T: Serialize>(
    response: &T,
    writer: &mut impl Write,
) -> io::Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
