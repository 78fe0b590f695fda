//! Single-file conversion: parse, rewrite in one walk, merge imports, print.

use std::collections::BTreeMap;

use jupgrade_java_cst::{parse_compilation_unit, prettify_error, walk, TreeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info_span};

use crate::rewrite::imports::merge_imports;
use crate::rewrite::layout::line_ending;
use crate::rewrite::{Junit4Rewriter, RewriteContext};
use crate::rules::RuleTables;

pub use crate::rewrite::{CombinedWrapPolicy, Diagnostic, RuleKind};

/// Knobs for one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Attach `@DisplayName` to test classes and test methods.
    pub display_names: bool,
    pub combined_wrap: CombinedWrapPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            display_names: true,
            combined_wrap: CombinedWrapPolicy::default(),
        }
    }
}

/// What a conversion did to one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub rules_fired: BTreeMap<RuleKind, usize>,
    pub imports_added: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output: String,
    pub summary: ConversionSummary,
}

impl Conversion {
    pub fn is_changed(&self, input: &str) -> bool {
        self.output != input
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{path}:{line}:{column}: parse error\n{snippet}")]
    Parse {
        path: String,
        line: usize,
        column: usize,
        snippet: String,
    },

    #[error("{path}: rewrite failed: {source}")]
    Rewrite {
        path: String,
        #[source]
        source: TreeError,
    },

    #[error("{path}: cannot serialize: {message}")]
    Serialize { path: String, message: String },
}

impl ConvertError {
    pub fn path(&self) -> &str {
        match self {
            ConvertError::Parse { path, .. }
            | ConvertError::Rewrite { path, .. }
            | ConvertError::Serialize { path, .. } => path,
        }
    }
}

/// Converts one source file.
///
/// `path` is only used to label diagnostics and errors.
pub fn convert_source(
    source: &str,
    path: &str,
    rules: &RuleTables,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    let _span = info_span!("convert", path = %path).entered();

    let mut tree = parse_compilation_unit(source).map_err(|err| {
        let position = err.position();
        ConvertError::Parse {
            path: path.to_string(),
            line: position.line,
            column: position.column,
            snippet: prettify_error(err, path),
        }
    })?;
    let Some(root) = tree.root() else {
        return Ok(Conversion {
            output: source.to_string(),
            summary: ConversionSummary::default(),
        });
    };

    let rewrite_error = |source: TreeError| ConvertError::Rewrite {
        path: path.to_string(),
        source,
    };

    let ctx = RewriteContext::new(path).with_line_ending(line_ending(source));
    let mut rewriter = Junit4Rewriter::new(rules, ctx)
        .with_policy(options.combined_wrap)
        .with_display_names(options.display_names);
    walk(&mut rewriter, &mut tree, root);
    let ctx = rewriter.finish().map_err(rewrite_error)?;
    let imports_added = merge_imports(&mut tree, &ctx).map_err(rewrite_error)?;

    let output = tree.to_source().map_err(|err| ConvertError::Serialize {
        path: path.to_string(),
        message: err.to_string(),
    })?;

    let (rules_fired, diagnostics) = ctx.into_parts();
    debug!(
        rules = rules_fired.values().sum::<usize>(),
        imports = imports_added.len(),
        "conversion finished"
    );
    Ok(Conversion {
        output,
        summary: ConversionSummary {
            rules_fired,
            imports_added,
            diagnostics,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(source: &str) -> Conversion {
        convert_source(source, "T.java", &RuleTables::default(), &ConvertOptions::default())
            .unwrap()
    }

    #[test]
    fn parse_errors_carry_position() {
        let err = convert_source(
            "class T {\n  void m( {\n}\n",
            "src/T.java",
            &RuleTables::default(),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        match &err {
            ConvertError::Parse {
                path, line, snippet, ..
            } => {
                assert_eq!(path, "src/T.java");
                assert!(*line >= 2);
                assert!(snippet.contains("src/T.java"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.path(), "src/T.java");
    }

    #[test]
    fn untouched_file_is_identical() {
        let source = "package p;\n\nimport java.util.List;\n\nenum Mode { A }\n";
        let conversion = convert(source);
        assert_eq!(conversion.output, source);
        assert!(!conversion.is_changed(source));
        assert!(conversion.summary.rules_fired.is_empty());
    }

    #[test]
    fn summary_lists_rules_and_imports() {
        let conversion = convert(
            "import org.junit.Test;\n\npublic class ATest {\n    @Test\n    public void works() {}\n}\n",
        );
        assert_eq!(
            conversion.output,
            "import org.junit.jupiter.api.Test;\nimport org.junit.jupiter.api.DisplayName;\n\n@DisplayName(\"A Test\")\npublic class ATest {\n    @Test\n    @DisplayName(\"Works\")\n    public void works() {}\n}\n"
        );
        let summary = &conversion.summary;
        assert_eq!(summary.rules_fired[&RuleKind::ImportRename], 1);
        assert_eq!(summary.rules_fired[&RuleKind::DisplayName], 2);
        assert_eq!(summary.imports_added, vec!["org.junit.jupiter.api.DisplayName"]);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ConvertOptions = serde_json::from_str(r#"{"combined_wrap": "nested"}"#).unwrap();
        assert!(options.display_names);
        assert_eq!(options.combined_wrap, CombinedWrapPolicy::Nested);
    }

    #[test]
    fn empty_source() {
        assert_eq!(convert("").output, "");
    }
}
