//! Annotation rules: generic renames, `@Ignore`, `@RunWith` and the
//! dispatch of attribute-bearing `@Test` annotations.

use jupgrade_java_cst::{make, AnnotationArgs, NodeId, NodeKind, Part, Tree, TreeError};
use tracing::debug;

use super::context::{RewriteContext, RuleKind};
use super::test_attributes::{expand_test_attributes, CombinedWrapPolicy};
use crate::rules::{RuleTables, EXTEND_WITH_IMPORT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Marker,
    Single,
    Pairs,
}

/// Applies the annotation rules to `id`, in precedence order.
pub fn rewrite_annotation(
    tree: &mut Tree,
    id: NodeId,
    rules: &RuleTables,
    policy: CombinedWrapPolicy,
    ctx: &mut RewriteContext,
) -> Result<(), TreeError> {
    let id = rename(tree, id, rules, ctx)?;
    let (simple, shape) = match tree.node(id)? {
        NodeKind::Annotation(annotation) => {
            let shape = match annotation.args {
                AnnotationArgs::Marker => Shape::Marker,
                AnnotationArgs::Single { .. } => Shape::Single,
                AnnotationArgs::Pairs { .. } => Shape::Pairs,
            };
            (annotation.simple_name().to_string(), shape)
        }
        _ => return Ok(()),
    };
    match (simple.as_str(), shape) {
        ("Ignore", _) => ignore_to_disabled(tree, id, ctx),
        ("Test", Shape::Pairs) => expand_test_attributes(tree, id, policy, ctx),
        ("RunWith", Shape::Single) => run_with(tree, id, rules, ctx),
        _ => Ok(()),
    }
}

/// Replaces `old` with `new`, carrying the trivia in front of `old`.
fn swap(tree: &mut Tree, old: NodeId, new: NodeId) -> Result<(), TreeError> {
    let leading = tree.leading_trivia(old).unwrap_or_default().to_string();
    tree.set_leading_trivia(new, leading);
    tree.replace(old, new)
}

/// Generic rename. Returns the id now standing where `id` was.
fn rename(
    tree: &mut Tree,
    id: NodeId,
    rules: &RuleTables,
    ctx: &mut RewriteContext,
) -> Result<NodeId, TreeError> {
    let (name, qualified) = match tree.node(id)? {
        NodeKind::Annotation(annotation) => (annotation.name(), annotation.is_qualified()),
        _ => return Ok(id),
    };
    if qualified {
        if let Some(mapped) = rules.type_import(&name) {
            debug!(from = %name, to = %mapped, "rename qualified annotation");
            if let Some(annotation) = tree.node_mut(id)?.as_annotation_mut() {
                annotation.set_name(mapped);
            }
            ctx.record(RuleKind::AnnotationRename);
        }
        return Ok(id);
    }
    match rules.annotation(&name) {
        Some(mapped) => {
            debug!(from = %name, to = %mapped, "rename annotation");
            let marker = make::marker_annotation(tree, mapped);
            swap(tree, id, marker)?;
            ctx.record(RuleKind::AnnotationRename);
            Ok(marker)
        }
        None => Ok(id),
    }
}

fn ignore_to_disabled(
    tree: &mut Tree,
    id: NodeId,
    ctx: &mut RewriteContext,
) -> Result<(), TreeError> {
    let reason = match tree.node(id)? {
        NodeKind::Annotation(annotation) => annotation
            .single_value()
            .or_else(|| annotation.pair("value").map(|pair| pair.value)),
        _ => return Ok(()),
    };
    let replacement = match reason {
        Some(value) => make::single_annotation(tree, "Disabled", value),
        None => make::marker_annotation(tree, "Disabled"),
    };
    debug!(with_reason = reason.is_some(), "ignore to disabled");
    swap(tree, id, replacement)?;
    ctx.record(RuleKind::IgnoreToDisabled);
    Ok(())
}

/// The type named by a class literal expression such as `a.B.class`.
fn class_literal_type(tree: &Tree, value: NodeId) -> Option<String> {
    let expression = tree.get(value)?.as_expression()?;
    let texts: Vec<&str> = expression
        .parts
        .iter()
        .map(|part| part.as_token().map(|tok| tok.text.as_str()))
        .collect::<Option<_>>()?;
    match texts.as_slice() {
        [name @ .., ".", "class"] if !name.is_empty() => Some(name.concat()),
        _ => None,
    }
}

fn run_with(
    tree: &mut Tree,
    id: NodeId,
    rules: &RuleTables,
    ctx: &mut RewriteContext,
) -> Result<(), TreeError> {
    let Some(value) = tree.node(id)?.as_annotation().and_then(|a| a.single_value()) else {
        return Ok(());
    };
    let Some(runner) = class_literal_type(tree, value) else {
        return Ok(());
    };
    let simple = runner.rsplit('.').next().unwrap_or(&runner);
    let Some(extension) = rules.runner_extension(simple) else {
        debug!(runner = %runner, "unknown runner left in place");
        return Ok(());
    };
    // A qualified runner keeps a qualified extension.
    let extension = if runner.contains('.') {
        rules
            .type_import(&runner)
            .unwrap_or(extension)
            .to_string()
    } else {
        extension.to_string()
    };
    debug!(runner = %runner, extension = %extension, "run with to extend with");
    let literal = make::class_literal_expr(tree, &extension);
    let replacement = make::single_annotation(tree, "ExtendWith", literal);
    swap(tree, id, replacement)?;
    ctx.add_import(EXTEND_WITH_IMPORT);
    ctx.record(RuleKind::RunWith);
    Ok(())
}

/// Whether any annotation in `header` has simple name `name`.
pub fn has_annotation(tree: &Tree, header: &[Part], name: &str) -> bool {
    header
        .iter()
        .filter_map(Part::as_node)
        .filter_map(|id| tree.get(id)?.as_annotation())
        .any(|annotation| annotation.simple_name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jupgrade_java_cst::parse_compilation_unit;

    fn rewrite_all(source: &str) -> (String, RewriteContext) {
        let rules = RuleTables::default();
        let mut ctx = RewriteContext::new("T.java");
        let mut tree = parse_compilation_unit(source).unwrap();
        let root = tree.root().unwrap();
        for id in tree.find_all(root, |kind| matches!(kind, NodeKind::Annotation(_))) {
            if tree.is_live(id) {
                rewrite_annotation(&mut tree, id, &rules, CombinedWrapPolicy::Sibling, &mut ctx)
                    .unwrap();
            }
        }
        (tree.to_source().unwrap(), ctx)
    }

    #[test]
    fn generic_renames() {
        let (out, ctx) = rewrite_all(
            "class T {\n    @Before\n    public void a() {}\n    @AfterClass public static void b() {}\n}\n",
        );
        assert_eq!(
            out,
            "class T {\n    @BeforeEach\n    public void a() {}\n    @AfterAll public static void b() {}\n}\n"
        );
        assert_eq!(ctx.rules_fired()[&RuleKind::AnnotationRename], 2);
    }

    #[test]
    fn qualified_rename() {
        let (out, _) = rewrite_all("class T { @org.junit.Before void a() {} }");
        assert_eq!(out, "class T { @org.junit.jupiter.api.BeforeEach void a() {} }");
    }

    #[test]
    fn ignore_shapes() {
        let (out, _) = rewrite_all(
            "class T {\n  @Ignore void a() {}\n  @Ignore(\"flaky\") void b() {}\n  @Ignore(value = \"slow\") void c() {}\n}\n",
        );
        assert_eq!(
            out,
            "class T {\n  @Disabled void a() {}\n  @Disabled(\"flaky\") void b() {}\n  @Disabled(\"slow\") void c() {}\n}\n"
        );
    }

    #[test]
    fn spring_runners_converge() {
        let (a, ctx) = rewrite_all("@RunWith(SpringRunner.class)\nclass T {}\n");
        let (b, _) = rewrite_all("@RunWith(SpringJUnit4ClassRunner.class)\nclass T {}\n");
        assert_eq!(a, "@ExtendWith(SpringExtension.class)\nclass T {}\n");
        assert_eq!(a, b);
        assert_eq!(ctx.pending_imports()[0].name, EXTEND_WITH_IMPORT);
    }

    #[test]
    fn mockito_runner() {
        let (out, _) = rewrite_all("@RunWith( MockitoJUnitRunner.class )\nclass T {}\n");
        assert_eq!(out, "@ExtendWith(MockitoExtension.class)\nclass T {}\n");
    }

    #[test]
    fn unknown_runner_is_left_alone() {
        let source = "@RunWith(Parameterized.class)\nclass T {}\n";
        let (out, ctx) = rewrite_all(source);
        assert_eq!(out, source);
        assert!(ctx.pending_imports().is_empty());
    }

    #[test]
    fn other_annotations_are_untouched() {
        let source = "@SuppressWarnings(\"x\")\nclass T { @Override public String toString() { return \"\"; } }\n";
        assert_eq!(rewrite_all(source).0, source);
    }
}
