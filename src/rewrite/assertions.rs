//! Assertion and assumption calls: the failure message moves from the first
//! argument to the last, and the call is bound to its Jupiter class.

use jupgrade_java_cst::{make, LiteralKind, NodeId, NodeKind, Part, Tok, Tree, TreeError};
use tracing::debug;

use super::context::{RewriteContext, RuleKind};
use crate::rules::RuleTables;

/// Whether `item` is an argument consisting of exactly one string literal.
fn is_string_literal(tree: &Tree, item: NodeId) -> bool {
    let Some(expression) = tree.get(item).and_then(NodeKind::as_expression) else {
        return false;
    };
    match expression.parts.as_slice() {
        [Part::Node(id)] => tree
            .get(*id)
            .and_then(NodeKind::as_literal)
            .is_some_and(|literal| {
                matches!(literal.kind, LiteralKind::String | LiteralKind::TextBlock)
            }),
        _ => false,
    }
}

/// Moves the first argument of `group` to the end. Every position keeps the
/// trivia it had, so separators and spacing stay where they were.
fn rotate_first_to_last(tree: &mut Tree, group: NodeId) -> Result<(), TreeError> {
    let items = match tree.node(group)? {
        NodeKind::Group(group) => group.items.clone(),
        _ => return Ok(()),
    };
    let leadings: Vec<String> = items
        .iter()
        .map(|item| tree.leading_trivia(*item).unwrap_or("").to_string())
        .collect();
    let mut rotated = items;
    rotated.rotate_left(1);
    for (item, leading) in rotated.iter().zip(leadings) {
        tree.set_leading_trivia(*item, leading);
    }
    if let Some(group) = tree.node_mut(group)?.as_group_mut() {
        group.items = rotated;
    }
    Ok(())
}

pub fn rewrite_call(
    tree: &mut Tree,
    id: NodeId,
    rules: &RuleTables,
    ctx: &mut RewriteContext,
) -> Result<(), TreeError> {
    let (name, scope, args) = match tree.node(id)? {
        NodeKind::Call(call) => (call.name.text.clone(), call.scope, call.args),
        _ => return Ok(()),
    };
    let Some(binding) = rules.call_binding(&name) else {
        return Ok(());
    };
    let first = match tree.node(args)?.as_group() {
        Some(group) => group.items.first().copied(),
        None => None,
    };
    let Some(first) = first else {
        return Ok(());
    };
    let prefix = binding.rsplit('.').next().unwrap_or(binding);

    let moved = is_string_literal(tree, first);
    if moved {
        debug!(call = %name, "move message argument last");
        rotate_first_to_last(tree, args)?;
        ctx.record(RuleKind::AssertionMessage);
    }

    match scope {
        Some(scope) => {
            let current = tree.node_source(scope).unwrap_or_default();
            let current = current.trim();
            // A qualified scope stays qualified, so no import is needed.
            let target = if current.contains('.') { binding } else { prefix };
            if current != target {
                debug!(call = %name, from = %current, to = %target, "rebind call");
                let leading = tree.leading_trivia(scope).unwrap_or("").to_string();
                let replacement = make::name_expr(tree, target);
                tree.set_leading_trivia(replacement, leading);
                tree.replace(scope, replacement)?;
                ctx.record(RuleKind::AssertionPrefix);
            }
        }
        None if moved => {
            debug!(call = %name, to = %prefix, "qualify call");
            let scope = make::name_expr(tree, prefix);
            let mut leading = String::new();
            if let Some(call) = tree.node_mut(id)?.as_call_mut() {
                leading = std::mem::take(&mut call.name.leading);
                call.scope = Some(scope);
                call.dot = Some(Tok::bare("."));
            }
            tree.set_leading_trivia(scope, leading);
            tree.set_parent(scope, Some(id));
            ctx.add_import(binding);
            ctx.record(RuleKind::AssertionPrefix);
        }
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jupgrade_java_cst::parse_compilation_unit;

    fn rewrite(body: &str) -> (String, RewriteContext) {
        let rules = RuleTables::default();
        let mut ctx = RewriteContext::new("T.java");
        let source = format!("class T {{ void m() {{ {} }} }}", body);
        let mut tree = parse_compilation_unit(&source).unwrap();
        let root = tree.root().unwrap();
        for id in tree.find_all(root, |kind| matches!(kind, NodeKind::Call(_))) {
            rewrite_call(&mut tree, id, &rules, &mut ctx).unwrap();
        }
        let out = tree.to_source().unwrap();
        let inner = out
            .strip_prefix("class T { void m() { ")
            .and_then(|rest| rest.strip_suffix(" } }"))
            .unwrap()
            .to_string();
        (inner, ctx)
    }

    #[test]
    fn message_moves_last_and_call_is_qualified() {
        let (out, ctx) = rewrite("assertEquals(\"msg\", a, b);");
        assert_eq!(out, "Assertions.assertEquals(a, b, \"msg\");");
        assert_eq!(ctx.pending_imports()[0].name, "org.junit.jupiter.api.Assertions");
    }

    #[test]
    fn existing_scope_is_rebound() {
        let (out, ctx) = rewrite("Assert.assertTrue(\"msg\", ok);");
        assert_eq!(out, "Assertions.assertTrue(ok, \"msg\");");
        assert!(ctx.pending_imports().is_empty());
    }

    #[test]
    fn assumptions_bind_to_assumptions() {
        let (out, _) = rewrite("Assume.assumeTrue(\"why\", ready);");
        assert_eq!(out, "Assumptions.assumeTrue(ready, \"why\");");
    }

    #[test]
    fn qualified_scope_stays_qualified() {
        let (out, ctx) = rewrite("org.junit.Assert.assertEquals(1, x);");
        assert_eq!(out, "org.junit.jupiter.api.Assertions.assertEquals(1, x);");
        assert!(ctx.pending_imports().is_empty());

        let (out, _) = rewrite("org.junit.Assume.assumeTrue(\"why\", ready);");
        assert_eq!(out, "org.junit.jupiter.api.Assumptions.assumeTrue(ready, \"why\");");

        let (out, ctx) = rewrite("org.junit.jupiter.api.Assertions.assertTrue(ok);");
        assert_eq!(out, "org.junit.jupiter.api.Assertions.assertTrue(ok);");
        assert!(ctx.rules_fired().is_empty());
    }

    #[test]
    fn no_message_no_scope_is_untouched() {
        let (out, ctx) = rewrite("assertEquals(1, x);");
        assert_eq!(out, "assertEquals(1, x);");
        assert!(ctx.rules_fired().is_empty());
    }

    #[test]
    fn message_expression_is_not_moved() {
        let (out, _) = rewrite("assertTrue(\"a\" + b, ok);");
        assert_eq!(out, "assertTrue(\"a\" + b, ok);");
    }

    #[test]
    fn single_message_argument() {
        let (out, _) = rewrite("assertNotNull(\"x\");");
        assert_eq!(out, "Assertions.assertNotNull(\"x\");");
    }

    #[test]
    fn names_outside_the_set_are_untouched() {
        let source = "assertNull(\"msg\", x); Assert.fail(\"no\"); assertEquals();";
        assert_eq!(rewrite(source).0, source);
    }

    #[test]
    fn nested_calls_in_arguments() {
        let (out, _) = rewrite("assertEquals(\"m\", f(\"x\", 1), 2);");
        assert_eq!(out, "Assertions.assertEquals(f(\"x\", 1), 2, \"m\");");
    }
}
