//! Expansion of `@Test(timeout = ..., expected = ...)`.
//!
//! Each supported attribute turns the method body into a deferred block
//! passed to `assertTimeout` or `assertThrows`. The annotation is then
//! demoted to a plain marker.

use jupgrade_java_cst::{make, NodeId, NodeKind, NodeTag, Tok, Tree, TreeError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::context::{RewriteContext, RuleKind};
use super::layout::{has_line_break, indent_unit, line_indent, newline_with};
use crate::rules::{ASSERT_THROWS_IMPORT, ASSERT_TIMEOUT_IMPORT, OF_MILLIS_IMPORT};

/// How a method carrying both `timeout` and `expected` is rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinedWrapPolicy {
    /// One wrap statement per attribute, each around its own copy of the
    /// original body.
    #[default]
    Sibling,
    /// Later wraps enclose earlier ones.
    Nested,
}

#[derive(Debug, Clone, Copy)]
enum Wrap {
    Timeout(NodeId),
    Expected(NodeId),
}

/// Layout of the method being rewritten, read before anything moves.
struct BodyLayout {
    method_indent: String,
    unit: String,
    stmt_leading: String,
    close_leading: String,
}

impl BodyLayout {
    fn read(tree: &Tree, method: NodeId, body: NodeId, eol: &str) -> Result<Self, TreeError> {
        let method_indent = line_indent(tree.leading_trivia(method).unwrap_or("")).to_string();
        let block = tree
            .node(body)?
            .as_block()
            .ok_or(TreeError::MissingNode(body))?;
        let first_stmt_indent = block
            .stmts
            .first()
            .and_then(|stmt| tree.leading_trivia(*stmt))
            .filter(|trivia| has_line_break(trivia))
            .map(line_indent);
        let unit = indent_unit(&method_indent, first_stmt_indent);
        let close_leading = if has_line_break(&block.rbrace.leading) {
            block.rbrace.leading.clone()
        } else {
            newline_with(eol, &method_indent)
        };
        let stmt_leading = newline_with(eol, &format!("{}{}", method_indent, unit));
        Ok(BodyLayout {
            method_indent,
            unit,
            stmt_leading,
            close_leading,
        })
    }
}

/// Handles a key-value `@Test` annotation: wraps the method body per
/// attribute, then demotes the annotation to a marker.
pub fn expand_test_attributes(
    tree: &mut Tree,
    annotation: NodeId,
    policy: CombinedWrapPolicy,
    ctx: &mut RewriteContext,
) -> Result<(), TreeError> {
    let (name, pairs) = match tree.node(annotation)? {
        NodeKind::Annotation(node) => (
            node.name(),
            node.pairs()
                .iter()
                .map(|pair| (pair.name.text.clone(), pair.value))
                .collect::<Vec<_>>(),
        ),
        _ => return Ok(()),
    };

    let mut wraps = Vec::new();
    for (key, value) in pairs {
        match key.as_str() {
            "timeout" => wraps.push(Wrap::Timeout(value)),
            "expected" => wraps.push(Wrap::Expected(value)),
            other => {
                warn!(path = %ctx.path(), attribute = %other, "dropping unsupported @Test attribute");
                ctx.diagnose(
                    RuleKind::TestDemote,
                    format!("dropped unsupported @Test attribute `{}`", other),
                );
            }
        }
    }

    let method = tree
        .parent(annotation)
        .filter(|parent| tree.tag(*parent) == Some(NodeTag::MethodDecl));
    let body = method.and_then(|method| tree.get(method)?.as_method_decl()?.body);
    if let (Some(method), Some(body)) = (method, body) {
        if !wraps.is_empty() {
            wrap_body(tree, method, body, &wraps, policy, ctx)?;
        }
    }

    let marker = make::marker_annotation(tree, &name);
    let leading = tree.leading_trivia(annotation).unwrap_or("").to_string();
    tree.set_leading_trivia(marker, leading);
    tree.replace(annotation, marker)?;
    ctx.record(RuleKind::TestDemote);
    Ok(())
}

fn wrap_body(
    tree: &mut Tree,
    method: NodeId,
    body: NodeId,
    wraps: &[Wrap],
    policy: CombinedWrapPolicy,
    ctx: &mut RewriteContext,
) -> Result<(), TreeError> {
    let layout = BodyLayout::read(tree, method, body, ctx.line_ending())?;
    let lbrace = tree
        .node(body)?
        .as_block()
        .map(|block| block.lbrace.clone())
        .unwrap_or_else(|| Tok::spaced("{"));

    let stmts = match policy {
        CombinedWrapPolicy::Sibling => {
            // Copies are taken before the first wrap re-indents the body.
            let mut blocks = vec![body];
            for _ in 1..wraps.len() {
                blocks.push(tree.deep_clone(body)?);
            }
            let mut stmts = Vec::with_capacity(wraps.len());
            for (wrap, block) in wraps.iter().zip(blocks) {
                stmts.push(wrap_block(tree, block, *wrap, &layout, ctx));
            }
            stmts
        }
        CombinedWrapPolicy::Nested => {
            let mut inner = body;
            let mut stmt = None;
            for wrap in wraps {
                if let Some(previous) = stmt {
                    inner = make::block(
                        tree,
                        Tok::bare("{"),
                        vec![previous],
                        Tok::new(newline_with(ctx.line_ending(), &layout.method_indent), "}"),
                    );
                }
                stmt = Some(wrap_block(tree, inner, *wrap, &layout, ctx));
            }
            stmt.into_iter().collect()
        }
    };

    let outer = make::block(
        tree,
        lbrace,
        stmts,
        Tok::new(layout.close_leading.clone(), "}"),
    );
    if let Some(decl) = tree.node_mut(method)?.as_method_decl_mut() {
        decl.body = Some(outer);
    }
    tree.set_parent(outer, Some(method));
    Ok(())
}

/// `assertTimeout(ofMillis(n), () -> block);` or
/// `assertThrows(Type.class, () -> block);`
fn wrap_block(
    tree: &mut Tree,
    block: NodeId,
    wrap: Wrap,
    layout: &BodyLayout,
    ctx: &mut RewriteContext,
) -> NodeId {
    tree.indent(block, &layout.unit);
    let lambda = make::lambda_expr(tree, block);
    let (first, assertion) = match wrap {
        Wrap::Timeout(value) => {
            tree.set_leading_trivia(value, "");
            let millis = make::call(tree, None, "ofMillis", vec![value]);
            ctx.add_static_import(OF_MILLIS_IMPORT);
            ctx.add_static_import(ASSERT_TIMEOUT_IMPORT);
            ctx.record(RuleKind::TestTimeout);
            (make::node_expr(tree, millis), "assertTimeout")
        }
        Wrap::Expected(value) => {
            tree.set_leading_trivia(value, "");
            ctx.add_static_import(ASSERT_THROWS_IMPORT);
            ctx.record(RuleKind::TestExpected);
            (value, "assertThrows")
        }
    };
    debug!(assertion, "wrap test body");
    let call = make::call(tree, None, assertion, vec![first, lambda]);
    let expr = make::node_expr(tree, call);
    let stmt = make::expr_statement(tree, expr);
    tree.set_leading_trivia(stmt, layout.stmt_leading.clone());
    stmt
}

#[cfg(test)]
mod tests {
    use super::*;
    use jupgrade_java_cst::parse_compilation_unit;

    fn expand(source: &str, policy: CombinedWrapPolicy) -> (String, RewriteContext) {
        let mut ctx = RewriteContext::new("T.java");
        let mut tree = parse_compilation_unit(source).unwrap();
        let root = tree.root().unwrap();
        let tests = tree.find_all(root, |kind| {
            kind.as_annotation()
                .is_some_and(|annotation| annotation.simple_name() == "Test")
        });
        for id in tests {
            expand_test_attributes(&mut tree, id, policy, &mut ctx).unwrap();
        }
        (tree.to_source().unwrap(), ctx)
    }

    #[test]
    fn timeout_wraps_body() {
        let (out, ctx) = expand(
            "class T {\n    @Test(timeout = 20)\n    void m() {\n        s1();\n        s2();\n    }\n}\n",
            CombinedWrapPolicy::Sibling,
        );
        assert_eq!(
            out,
            "class T {\n    @Test\n    void m() {\n        assertTimeout(ofMillis(20), () -> {\n            s1();\n            s2();\n        });\n    }\n}\n"
        );
        let names: Vec<String> = ctx.pending_imports().iter().map(|i| i.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "static java.time.Duration.ofMillis",
                "static org.junit.jupiter.api.Assertions.assertTimeout"
            ]
        );
    }

    #[test]
    fn expected_wraps_body() {
        let (out, _) = expand(
            "class T {\n  @Test(expected = NullPointerException.class)\n  void m() {\n    s1();\n  }\n}\n",
            CombinedWrapPolicy::Sibling,
        );
        assert_eq!(
            out,
            "class T {\n  @Test\n  void m() {\n    assertThrows(NullPointerException.class, () -> {\n      s1();\n    });\n  }\n}\n"
        );
    }

    #[test]
    fn single_line_body() {
        let (out, _) = expand(
            "class T {\n    @Test(timeout = 20) void m(){ s1(); s2(); }\n}\n",
            CombinedWrapPolicy::Sibling,
        );
        assert_eq!(
            out,
            "class T {\n    @Test void m(){\n        assertTimeout(ofMillis(20), () -> { s1(); s2(); });\n    }\n}\n"
        );
    }

    #[test]
    fn non_literal_timeout_is_carried_verbatim() {
        let (out, _) = expand(
            "class T {\n    @Test(timeout = LIMIT * 2)\n    void m() {\n        s();\n    }\n}\n",
            CombinedWrapPolicy::Sibling,
        );
        assert!(out.contains("assertTimeout(ofMillis(LIMIT * 2), () -> {"), "{out}");
    }

    #[test]
    fn both_attributes_as_siblings() {
        let (out, _) = expand(
            "class T {\n    @Test(timeout = 5, expected = E.class)\n    void m() {\n        s();\n    }\n}\n",
            CombinedWrapPolicy::Sibling,
        );
        assert_eq!(
            out,
            "class T {\n    @Test\n    void m() {\n        assertTimeout(ofMillis(5), () -> {\n            s();\n        });\n        assertThrows(E.class, () -> {\n            s();\n        });\n    }\n}\n"
        );
    }

    #[test]
    fn both_attributes_nested() {
        let (out, _) = expand(
            "class T {\n    @Test(timeout = 5, expected = E.class)\n    void m() {\n        s();\n    }\n}\n",
            CombinedWrapPolicy::Nested,
        );
        assert_eq!(
            out,
            "class T {\n    @Test\n    void m() {\n        assertThrows(E.class, () -> {\n            assertTimeout(ofMillis(5), () -> {\n                s();\n            });\n        });\n    }\n}\n"
        );
    }

    #[test]
    fn empty_parens_and_unknown_attributes_demote() {
        let (out, ctx) = expand(
            "class T {\n    @Test()\n    void a() {}\n    @Test(description = \"x\")\n    void b() {}\n}\n",
            CombinedWrapPolicy::Sibling,
        );
        assert_eq!(out, "class T {\n    @Test\n    void a() {}\n    @Test\n    void b() {}\n}\n");
        assert_eq!(ctx.diagnostics().len(), 1);
        assert!(ctx.diagnostics()[0].message.contains("description"));
        assert_eq!(ctx.rules_fired()[&RuleKind::TestDemote], 2);
    }

    #[test]
    fn empty_body_with_timeout() {
        let (out, _) = expand(
            "class T {\n    @Test(timeout = 1)\n    void m() {}\n}\n",
            CombinedWrapPolicy::Sibling,
        );
        assert_eq!(
            out,
            "class T {\n    @Test\n    void m() {\n        assertTimeout(ofMillis(1), () -> {});\n    }\n}\n"
        );
    }

    #[test]
    fn qualified_test_keeps_its_name() {
        let (out, _) = expand(
            "class T {\n    @org.junit.jupiter.api.Test(expected = E.class)\n    void m() {\n        s();\n    }\n}\n",
            CombinedWrapPolicy::Sibling,
        );
        assert!(out.contains("    @org.junit.jupiter.api.Test\n    void m() {\n"), "{out}");
    }
}
