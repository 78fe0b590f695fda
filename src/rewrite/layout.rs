//! Indentation helpers for synthesized code.
//!
//! Trivia is the only place layout lives, so these functions read and build
//! the whitespace that goes in front of tokens.

/// The indentation on the last line of `trivia`: everything after the final
/// line break. Empty when the trivia holds no line break.
pub fn line_indent(trivia: &str) -> &str {
    match trivia.rfind('\n') {
        Some(index) => trivia[index + 1..].trim_end_matches('\r'),
        None => "",
    }
}

pub fn has_line_break(trivia: &str) -> bool {
    trivia.contains('\n')
}

/// The line ending of the first line of `source`: `"\r\n"` or `"\n"`.
/// Sources without any line break get `"\n"`.
pub fn line_ending(source: &str) -> &'static str {
    match source.find('\n') {
        Some(index) if source[..index].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// A line break in the file's own style, followed by `indent`.
pub fn newline_with(eol: &str, indent: &str) -> String {
    format!("{}{}", eol, indent)
}

/// The indentation unit of a body whose first statement is indented by
/// `inner` and whose declaration is indented by `outer`. Falls back to four
/// spaces, or a tab when the file indents with tabs.
pub fn indent_unit(outer: &str, inner: Option<&str>) -> String {
    if let Some(inner) = inner {
        if let Some(unit) = inner.strip_prefix(outer) {
            if !unit.is_empty() && unit.chars().all(|ch| ch == ' ' || ch == '\t') {
                return unit.to_string();
            }
        }
    }
    if outer.starts_with('\t') {
        "\t".to_string()
    } else {
        "    ".to_string()
    }
}
