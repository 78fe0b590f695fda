// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A lossless Java parser and arena Concrete Syntax Tree (CST).
//!
//! The parser produces a mutable [`Tree`] in which every token keeps its
//! leading whitespace and comments, so printing an untouched tree reproduces
//! the input byte for byte.
//!
//! # Overview
//!
//! - **Parsing**: [`parse_compilation_unit`] tokenizes a source file and runs
//!   the PEG grammar over the tokens.
//! - **Editing**: nodes live in an arena addressed by [`NodeId`]. Use
//!   [`Tree::replace`], [`Tree::remove`] and the constructors in [`make`].
//! - **Traversal**: implement [`TreeVisitor`] and call [`walk`].
//! - **Code Generation**: [`Tree::to_source`] prints the tree.
//!
//! # Quick Start
//!
//! ```
//! use jupgrade_java_cst::parse_compilation_unit;
//!
//! let source = "class A { void f() { g(1); } }\n";
//! let tree = parse_compilation_unit(source).expect("parse error");
//! assert_eq!(tree.to_source().expect("codegen"), source);
//! ```

use std::cmp::max;

/// Tokenizer for Java source code.
pub mod tokenizer;
use tokenizer::{TokState, Token};

mod nodes;
pub use nodes::*;

mod inflate_ctx;
use inflate_ctx::{Inflate, InflateCtx};

mod parser;
use parser::TokVec;
pub use parser::{ParserError, Result};

/// Visitor infrastructure for tree traversal.
pub mod visitor;
pub use visitor::{walk, TreeVisitor, VisitResult};

/// Tokenizes Java source code into a sequence of tokens, ending with an
/// end marker.
///
/// # Errors
///
/// Returns a [`ParserError::TokenizerError`] if the source contains invalid tokens.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    TokState::new(text)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|err| ParserError::TokenizerError(err, text))
}

/// Parses one Java source file into a [`Tree`].
///
/// # Example
///
/// ```
/// use jupgrade_java_cst::{parse_compilation_unit, NodeKind};
///
/// let tree = parse_compilation_unit("import org.junit.Test;\nclass T {}\n").expect("parse error");
/// let root = tree.root().expect("root");
/// let imports = tree.find_all(root, |kind| matches!(kind, NodeKind::Import(_)));
/// assert_eq!(imports.len(), 1);
/// ```
pub fn parse_compilation_unit(source: &str) -> Result<Tree> {
    let tokens = tokenize(source)?;
    let tokvec: TokVec = tokens.into();
    let unit = parser::java::compilation_unit(&tokvec)
        .map_err(|err| ParserError::ParserError(err, source))?;
    let mut tree = Tree::new();
    let root = unit.inflate(&mut InflateCtx::new(&mut tree));
    tree.set_root(root);
    Ok(tree)
}

/// Returns the byte offset of the beginning of line `n` (1-indexed).
fn bol_offset(source: &str, n: i64) -> usize {
    if n <= 1 {
        return 0;
    }
    source
        .match_indices('\n')
        .nth((n - 2) as usize)
        .map(|(index, _)| index + 1)
        .unwrap_or_else(|| source.len())
}

/// Formats a parser error into a human-readable string with source context.
///
/// # Example
///
/// ```
/// use jupgrade_java_cst::{parse_compilation_unit, prettify_error};
///
/// if let Err(e) = parse_compilation_unit("class A {") {
///     let formatted = prettify_error(e, "A.java");
///     assert!(formatted.contains("A.java"));
/// }
/// ```
pub fn prettify_error(err: ParserError<'_>, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let (message, source, loc) = match &err {
        ParserError::ParserError(e, source) => {
            (format!("expected {} at {}", e.expected, e.location), *source, e.location)
        }
        ParserError::TokenizerError(e, source) => (e.to_string(), *source, e.position()),
    };

    let context = 1;
    let line_start = max(1, loc.line.saturating_sub(context));
    let start_offset = bol_offset(source, loc.line as i64 - context as i64);
    let end_offset = bol_offset(source, loc.line as i64 + context as i64 + 1);
    let snippet = &source[start_offset..end_offset];
    let mut start = loc.offset.saturating_sub(start_offset).min(snippet.len());
    while !snippet.is_char_boundary(start) {
        start -= 1;
    }
    // The span must end on a char boundary or the renderer panics.
    let end = snippet[start..]
        .chars()
        .next()
        .map_or(start + 1, |c| start + c.len_utf8())
        .min(snippet.len());
    let rendered = Renderer::plain()
        .render(
            Level::Error.title(label).snippet(
                Snippet::source(snippet)
                    .line_start(line_start)
                    .fold(false)
                    .annotations(vec![Level::Error.span(start..end).label(&message)]),
            ),
        )
        .to_string();
    rendered
}

#[cfg(test)]
mod test {
    use super::*;
    use tokenizer::{TextPosition, TokError};

    #[test]
    fn test_tokenizer_error() {
        let err = parse_compilation_unit("class A { char c = 'x; }").expect_err("should fail");
        assert!(matches!(
            err,
            ParserError::TokenizerError(TokError::UnterminatedChar(_), _)
        ));
    }

    #[test]
    fn test_parser_error_position() {
        let err = parse_compilation_unit("class A {\n  void f() {\n}\n").expect_err("should fail");
        let position = err.position();
        assert_eq!(position.line, 4);
    }

    #[test]
    fn test_unbalanced_brackets_fail() {
        parse_compilation_unit("class A { void f() { g(]; } }").expect_err("should fail");
    }

    #[test]
    fn test_empty_source() {
        let tree = parse_compilation_unit("").expect("parse error");
        assert_eq!(tree.to_source().expect("codegen"), "");
    }

    #[test]
    fn test_prettify_error_mentions_label_and_expectation() {
        let err = parse_compilation_unit("class A {\n  int x = ;\n  }}\n").expect_err("should fail");
        let pretty = prettify_error(err, "A.java");
        assert!(pretty.contains("A.java"), "{pretty}");
        assert!(pretty.contains("expected"), "{pretty}");
    }

    #[test]
    fn test_prettify_error_on_multibyte_char() {
        let source = "class ATest {\n  void m() { String s = \u{201c}hi\u{201d}; }\n}\n";
        let err = parse_compilation_unit(source).expect_err("should fail");
        let pretty = prettify_error(err, "ATest.java");
        assert!(pretty.contains("ATest.java"), "{pretty}");
        assert!(pretty.contains('\u{201c}'), "{pretty}");
    }

    #[test]
    fn test_prettify_tokenizer_error() {
        let err = parse_compilation_unit("class A { # }").expect_err("should fail");
        assert_eq!(
            err.position(),
            TextPosition {
                line: 1,
                column: 11,
                offset: 10
            }
        );
        let pretty = prettify_error(err, "A.java");
        assert!(pretty.contains("unexpected character"), "{pretty}");
    }

    #[test]
    fn bol_offset_first_line() {
        assert_eq!(0, bol_offset("hello", 1));
        assert_eq!(0, bol_offset("hello", 0));
        assert_eq!(0, bol_offset("hello\nhello", 1));
    }

    #[test]
    fn bol_offset_second_line() {
        assert_eq!(5, bol_offset("hello", 2));
        assert_eq!(6, bol_offset("hello\nhello", 2));
        assert_eq!(6, bol_offset("hello\nhello\nhello", 2));
    }

    #[test]
    fn bol_offset_last_line() {
        assert_eq!(5, bol_offset("hello", 3));
        assert_eq!(11, bol_offset("hello\nhello", 3));
        assert_eq!(12, bol_offset("hello\nhello\nhello", 3));
    }
}
