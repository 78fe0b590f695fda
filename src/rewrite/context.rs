//! Per-file bookkeeping shared by the rewrite rules.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The rule families, used as keys when counting what fired in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    ImportRename,
    AnnotationRename,
    IgnoreToDisabled,
    TestTimeout,
    TestExpected,
    TestDemote,
    RunWith,
    AssertionMessage,
    AssertionPrefix,
    DisplayName,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::ImportRename => "import_rename",
            RuleKind::AnnotationRename => "annotation_rename",
            RuleKind::IgnoreToDisabled => "ignore_to_disabled",
            RuleKind::TestTimeout => "test_timeout",
            RuleKind::TestExpected => "test_expected",
            RuleKind::TestDemote => "test_demote",
            RuleKind::RunWith => "run_with",
            RuleKind::AssertionMessage => "assertion_message",
            RuleKind::AssertionPrefix => "assertion_prefix",
            RuleKind::DisplayName => "display_name",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An import requested by a rule, merged into the file after the walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingImport {
    pub name: String,
    pub is_static: bool,
}

impl fmt::Display for PendingImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "static {}", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Something a rule dropped or could not handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: RuleKind,
    pub message: String,
}

/// Transient state for one conversion.
#[derive(Debug)]
pub struct RewriteContext {
    path: String,
    line_ending: &'static str,
    imports: Vec<PendingImport>,
    rules_fired: BTreeMap<RuleKind, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for RewriteContext {
    fn default() -> Self {
        RewriteContext {
            path: String::new(),
            line_ending: "\n",
            imports: Vec::new(),
            rules_fired: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }
}

impl RewriteContext {
    pub fn new(path: impl Into<String>) -> Self {
        RewriteContext {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the line ending used for synthesized lines.
    pub fn with_line_ending(mut self, eol: &'static str) -> Self {
        self.line_ending = eol;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn line_ending(&self) -> &'static str {
        self.line_ending
    }

    /// Requests a type import. Repeated requests collapse to one.
    pub fn add_import(&mut self, name: &str) {
        self.push_import(name, false);
    }

    /// Requests a static import. Repeated requests collapse to one.
    pub fn add_static_import(&mut self, name: &str) {
        self.push_import(name, true);
    }

    fn push_import(&mut self, name: &str, is_static: bool) {
        let pending = PendingImport {
            name: name.to_string(),
            is_static,
        };
        if !self.imports.contains(&pending) {
            self.imports.push(pending);
        }
    }

    /// Imports requested so far, in request order.
    pub fn pending_imports(&self) -> &[PendingImport] {
        &self.imports
    }

    pub fn record(&mut self, rule: RuleKind) {
        *self.rules_fired.entry(rule).or_insert(0) += 1;
    }

    pub fn rules_fired(&self) -> &BTreeMap<RuleKind, usize> {
        &self.rules_fired
    }

    pub fn diagnose(&mut self, rule: RuleKind, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            rule,
            message: message.into(),
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (BTreeMap<RuleKind, usize>, Vec<Diagnostic>) {
        (self.rules_fired, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_are_deduplicated() {
        let mut ctx = RewriteContext::new("ATest.java");
        ctx.add_import("org.junit.jupiter.api.DisplayName");
        ctx.add_import("org.junit.jupiter.api.DisplayName");
        ctx.add_static_import("org.junit.jupiter.api.DisplayName");
        assert_eq!(ctx.pending_imports().len(), 2);
        assert_eq!(
            ctx.pending_imports()[1].to_string(),
            "static org.junit.jupiter.api.DisplayName"
        );
    }

    #[test]
    fn records_rule_counts() {
        let mut ctx = RewriteContext::new("ATest.java");
        ctx.record(RuleKind::DisplayName);
        ctx.record(RuleKind::DisplayName);
        ctx.record(RuleKind::RunWith);
        ctx.diagnose(RuleKind::TestDemote, "dropped");
        let (fired, diagnostics) = ctx.into_parts();
        assert_eq!(fired[&RuleKind::DisplayName], 2);
        assert_eq!(fired[&RuleKind::RunWith], 1);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn rule_names_match_serde() {
        let json = serde_json::to_string(&RuleKind::AssertionMessage).unwrap();
        assert_eq!(json, format!("\"{}\"", RuleKind::AssertionMessage.as_str()));
    }
}
