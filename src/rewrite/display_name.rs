//! `@DisplayName` synthesis for test classes and test methods.

use jupgrade_java_cst::{make, ClassKind, NodeId, NodeKind, NodeTag, Part, Tree, TreeError};
use tracing::debug;

use super::annotations::has_annotation;
use super::context::{RewriteContext, RuleKind};
use super::layout::{has_line_break, line_indent, newline_with};
use crate::rules::DISPLAY_NAME_IMPORT;

const DISPLAY_NAME: &str = "DisplayName";
const TEST_ANNOTATIONS: &[&str] = &["Test", "ParameterizedTest"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Digit,
    Connector,
    Currency,
    Other,
}

fn char_class(ch: char) -> CharClass {
    if ch.is_uppercase() {
        CharClass::Upper
    } else if ch.is_lowercase() {
        CharClass::Lower
    } else if ch.is_ascii_digit() {
        CharClass::Digit
    } else if ch == '_' {
        CharClass::Connector
    } else if ch == '$' {
        CharClass::Currency
    } else {
        CharClass::Other
    }
}

/// Splits an identifier where the character class changes. An upper-case
/// run followed by a lower-case letter gives its last letter to the next
/// word, so `ABTest` splits into `AB` and `Test`.
pub fn split_camel_case(identifier: &str) -> Vec<String> {
    let chars: Vec<char> = identifier.chars().collect();
    let Some(first) = chars.first() else {
        return Vec::new();
    };
    let mut words = Vec::new();
    let mut start = 0;
    let mut current = char_class(*first);
    for (pos, ch) in chars.iter().enumerate().skip(1) {
        let class = char_class(*ch);
        if class == current {
            continue;
        }
        if class == CharClass::Lower && current == CharClass::Upper {
            let new_start = pos - 1;
            if new_start != start {
                words.push(chars[start..new_start].iter().collect());
                start = new_start;
            }
        } else {
            words.push(chars[start..pos].iter().collect());
            start = pos;
        }
        current = class;
    }
    words.push(chars[start..].iter().collect());
    words
}

/// The display text for an identifier: its words joined by spaces, the
/// first one capitalized.
pub fn display_text(identifier: &str) -> String {
    let mut words = split_camel_case(identifier);
    if let Some(first) = words.first_mut() {
        let mut chars = first.chars();
        if let Some(head) = chars.next() {
            *first = head
                .to_uppercase()
                .chain(chars.as_str().to_lowercase().chars())
                .collect();
        }
    }
    words.join(" ")
}

fn header(tree: &Tree, decl: NodeId) -> Option<&Vec<Part>> {
    match tree.get(decl)? {
        NodeKind::ClassDecl(class) => Some(&class.header),
        NodeKind::MethodDecl(method) => Some(&method.header),
        _ => None,
    }
}

/// Trivia in front of whatever follows header part `index`.
fn leading_after(tree: &Tree, decl: NodeId, index: usize) -> String {
    let Some(kind) = tree.get(decl) else {
        return String::new();
    };
    let (header, fallback) = match kind {
        NodeKind::ClassDecl(class) => (&class.header, class.keyword.first()),
        NodeKind::MethodDecl(method) => (&method.header, Some(&method.name)),
        _ => return String::new(),
    };
    match header.get(index + 1) {
        Some(Part::Token(tok)) => tok.leading.clone(),
        Some(Part::Node(id)) => tree.leading_trivia(*id).unwrap_or("").to_string(),
        None => fallback.map(|tok| tok.leading.clone()).unwrap_or_default(),
    }
}

/// Adds `@DisplayName` to a class or interface unless it already has one.
pub fn name_class(tree: &mut Tree, id: NodeId, ctx: &mut RewriteContext) -> Result<(), TreeError> {
    let identifier = match tree.node(id)? {
        NodeKind::ClassDecl(class)
            if matches!(class.kind, ClassKind::Class | ClassKind::Interface)
                && !has_annotation(tree, &class.header, DISPLAY_NAME) =>
        {
            class.name.text.clone()
        }
        _ => return Ok(()),
    };
    attach(tree, id, &identifier, ctx)
}

/// Adds `@DisplayName` to a test method unless it already has one.
pub fn name_method(tree: &mut Tree, id: NodeId, ctx: &mut RewriteContext) -> Result<(), TreeError> {
    let identifier = match tree.node(id)? {
        NodeKind::MethodDecl(method)
            if TEST_ANNOTATIONS
                .iter()
                .any(|name| has_annotation(tree, &method.header, name))
                && !has_annotation(tree, &method.header, DISPLAY_NAME) =>
        {
            method.name.text.clone()
        }
        _ => return Ok(()),
    };
    attach(tree, id, &identifier, ctx)
}

fn attach(
    tree: &mut Tree,
    decl: NodeId,
    identifier: &str,
    ctx: &mut RewriteContext,
) -> Result<(), TreeError> {
    let text = display_text(identifier);
    debug!(identifier, display = %text, "add display name");

    let eol = ctx.line_ending();
    let indent = line_indent(tree.leading_trivia(decl).unwrap_or("")).to_string();
    let last_annotation = header(tree, decl)
        .ok_or(TreeError::MissingNode(decl))?
        .iter()
        .rposition(|part| {
            part.as_node()
                .is_some_and(|id| tree.tag(id) == Some(NodeTag::Annotation))
        });

    let literal = make::string_literal_expr(tree, &text);
    let annotation = make::single_annotation(tree, DISPLAY_NAME, literal);
    let index = match last_annotation {
        Some(last) => {
            let separator = if has_line_break(&leading_after(tree, decl, last)) {
                newline_with(eol, &indent)
            } else {
                " ".to_string()
            };
            tree.set_leading_trivia(annotation, separator);
            last + 1
        }
        None => {
            // The annotation gets a line of its own even for a declaration
            // at the very start of the file.
            let taken = tree.take_leading_trivia(decl).unwrap_or_default();
            tree.set_leading_trivia(decl, newline_with(eol, &indent));
            tree.set_leading_trivia(annotation, taken);
            0
        }
    };

    match tree.node_mut(decl)? {
        NodeKind::ClassDecl(class) => class.header.insert(index, Part::Node(annotation)),
        NodeKind::MethodDecl(method) => method.header.insert(index, Part::Node(annotation)),
        _ => return Err(TreeError::MissingNode(decl)),
    }
    tree.set_parent(annotation, Some(decl));
    ctx.add_import(DISPLAY_NAME_IMPORT);
    ctx.record(RuleKind::DisplayName);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jupgrade_java_cst::parse_compilation_unit;

    fn name_all(source: &str) -> String {
        let mut ctx = RewriteContext::new("T.java");
        let mut tree = parse_compilation_unit(source).unwrap();
        let root = tree.root().unwrap();
        for id in tree.find_all(root, |kind| matches!(kind, NodeKind::ClassDecl(_))) {
            name_class(&mut tree, id, &mut ctx).unwrap();
        }
        for id in tree.find_all(root, |kind| matches!(kind, NodeKind::MethodDecl(_))) {
            name_method(&mut tree, id, &mut ctx).unwrap();
        }
        tree.to_source().unwrap()
    }

    #[test]
    fn splits_like_camel_case_words() {
        assert_eq!(split_camel_case("ABTest"), vec!["AB", "Test"]);
        assert_eq!(split_camel_case("JUnit4Test"), vec!["J", "Unit", "4", "Test"]);
        assert_eq!(split_camel_case("name0a"), vec!["name", "0", "a"]);
        assert_eq!(split_camel_case("ASFRules"), vec!["ASF", "Rules"]);
        assert_eq!(split_camel_case("snake_case"), vec!["snake", "_", "case"]);
        assert!(split_camel_case("").is_empty());
    }

    #[test]
    fn display_text_capitalizes_first_word_only() {
        assert_eq!(display_text("ABTest"), "Ab Test");
        assert_eq!(display_text("JUnit4Test"), "J Unit 4 Test");
        assert_eq!(display_text("name0a"), "Name 0 a");
        assert_eq!(display_text("shouldParseURL"), "Should Parse URL");
        assert_eq!(display_text("HTTPServerTest"), "Http Server Test");
    }

    #[test]
    fn class_without_annotations() {
        assert_eq!(
            name_all("import a.B;\n\npublic class ABTest {}\n"),
            "import a.B;\n\n@DisplayName(\"Ab Test\")\npublic class ABTest {}\n"
        );
    }

    #[test]
    fn class_after_existing_annotation() {
        assert_eq!(
            name_all("@RunWith(X.class)\npublic class FooTest {}\n"),
            "@RunWith(X.class)\n@DisplayName(\"Foo Test\")\npublic class FooTest {}\n"
        );
    }

    #[test]
    fn test_methods_only() {
        let out = name_all(
            "@DisplayName(\"T\")\nclass T {\n    /** docs */\n    @Test\n    public void checksValue() {}\n\n    void helper() {}\n    @ParameterizedTest @ValueSource(ints = 1) void each(int x) {}\n}\n",
        );
        assert_eq!(
            out,
            "@DisplayName(\"T\")\nclass T {\n    /** docs */\n    @Test\n    @DisplayName(\"Checks Value\")\n    public void checksValue() {}\n\n    void helper() {}\n    @ParameterizedTest @ValueSource(ints = 1) @DisplayName(\"Each\") void each(int x) {}\n}\n"
        );
    }

    #[test]
    fn existing_display_name_is_kept() {
        let source = "class T {\n    @Test @DisplayName(\"custom\") void m() {}\n}\n";
        let out = name_all(source);
        assert_eq!(out, format!("@DisplayName(\"T\")\n{}", source));
    }

    #[test]
    fn enums_are_skipped() {
        let source = "enum Mode { A, B }\n";
        assert_eq!(name_all(source), source);
    }
}
