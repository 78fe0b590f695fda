//! The JUnit 4 to JUnit 5 rewrite rules and the visitor that dispatches them.
//!
//! [`Junit4Rewriter`] is a [`TreeVisitor`]: one pre-order walk over the tree,
//! each hook handing its node to the rule family for that node kind. Rules
//! replace nodes in place; the walker then descends into the replacement, so
//! calls moved into a freshly wrapped deferred block are still rewritten.
//!
//! | Node | Rules |
//! |------|-------|
//! | `Import` | [`imports::rename_import`] |
//! | `Annotation` | [`annotations::rewrite_annotation`] (rename, `@Ignore`, `@Test` attributes, `@RunWith`) |
//! | `Call` | [`assertions::rewrite_call`] |
//! | `ClassDecl`, `MethodDecl` | [`display_name`] |
//!
//! Imports requested by rules are merged once the walk is done
//! ([`imports::merge_imports`]).

pub mod annotations;
pub mod assertions;
pub mod context;
pub mod display_name;
pub mod imports;
pub mod layout;
pub mod test_attributes;

use jupgrade_java_cst::{NodeId, Tree, TreeError, TreeVisitor, VisitResult};

use crate::rules::RuleTables;
pub use context::{Diagnostic, PendingImport, RewriteContext, RuleKind};
pub use test_attributes::CombinedWrapPolicy;

/// Visitor applying every rewrite rule in a single walk.
///
/// The first tree error stops the walk; it is kept in the rewriter and
/// handed back by [`Junit4Rewriter::finish`].
pub struct Junit4Rewriter<'r> {
    rules: &'r RuleTables,
    policy: CombinedWrapPolicy,
    display_names: bool,
    ctx: RewriteContext,
    error: Option<TreeError>,
}

impl<'r> Junit4Rewriter<'r> {
    pub fn new(rules: &'r RuleTables, ctx: RewriteContext) -> Self {
        Junit4Rewriter {
            rules,
            policy: CombinedWrapPolicy::default(),
            display_names: true,
            ctx,
            error: None,
        }
    }

    pub fn with_policy(mut self, policy: CombinedWrapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_display_names(mut self, enabled: bool) -> Self {
        self.display_names = enabled;
        self
    }

    pub fn context(&self) -> &RewriteContext {
        &self.ctx
    }

    /// The collected context, or the error that stopped the walk.
    pub fn finish(self) -> Result<RewriteContext, TreeError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.ctx),
        }
    }

    fn guard(&mut self, result: Result<(), TreeError>) -> VisitResult {
        match result {
            Ok(()) => VisitResult::Continue,
            Err(err) => {
                self.error = Some(err);
                VisitResult::Stop
            }
        }
    }
}

impl TreeVisitor for Junit4Rewriter<'_> {
    fn visit_import(&mut self, tree: &mut Tree, id: NodeId) -> VisitResult {
        let result = imports::rename_import(tree, id, self.rules, &mut self.ctx);
        self.guard(result)
    }

    fn visit_class_decl(&mut self, tree: &mut Tree, id: NodeId) -> VisitResult {
        if !self.display_names {
            return VisitResult::Continue;
        }
        let result = display_name::name_class(tree, id, &mut self.ctx);
        self.guard(result)
    }

    fn visit_method_decl(&mut self, tree: &mut Tree, id: NodeId) -> VisitResult {
        if !self.display_names {
            return VisitResult::Continue;
        }
        let result = display_name::name_method(tree, id, &mut self.ctx);
        self.guard(result)
    }

    fn visit_annotation(&mut self, tree: &mut Tree, id: NodeId) -> VisitResult {
        let result =
            annotations::rewrite_annotation(tree, id, self.rules, self.policy, &mut self.ctx);
        self.guard(result)
    }

    fn visit_call(&mut self, tree: &mut Tree, id: NodeId) -> VisitResult {
        let result = assertions::rewrite_call(tree, id, self.rules, &mut self.ctx);
        self.guard(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jupgrade_java_cst::{parse_compilation_unit, walk};

    fn run(source: &str, display_names: bool) -> (String, RewriteContext) {
        let rules = RuleTables::default();
        let mut tree = parse_compilation_unit(source).unwrap();
        let root = tree.root().unwrap();
        let mut rewriter = Junit4Rewriter::new(&rules, RewriteContext::new("T.java"))
            .with_display_names(display_names);
        walk(&mut rewriter, &mut tree, root);
        let ctx = rewriter.finish().unwrap();
        (tree.to_source().unwrap(), ctx)
    }

    #[test]
    fn calls_inside_wrapped_body_are_rewritten() {
        let (out, ctx) = run(
            "class T {\n    @Test(expected = E.class)\n    void m() {\n        assertEquals(\"msg\", 1, f());\n    }\n}\n",
            false,
        );
        assert_eq!(
            out,
            "class T {\n    @Test\n    void m() {\n        assertThrows(E.class, () -> {\n            Assertions.assertEquals(1, f(), \"msg\");\n        });\n    }\n}\n"
        );
        assert_eq!(ctx.rules_fired()[&RuleKind::AssertionMessage], 1);
        assert_eq!(ctx.rules_fired()[&RuleKind::TestExpected], 1);
    }

    #[test]
    fn display_names_and_annotation_rules_both_fire() {
        let (out, _) = run(
            "class T {\n    @Test(timeout = 1)\n    void quick() {}\n}\n",
            true,
        );
        assert_eq!(
            out,
            "@DisplayName(\"T\")\nclass T {\n    @Test\n    @DisplayName(\"Quick\")\n    void quick() {\n        assertTimeout(ofMillis(1), () -> {});\n    }\n}\n"
        );
    }

    #[test]
    fn display_names_can_be_disabled() {
        let source = "class T {\n    @Test\n    void m() {}\n}\n";
        assert_eq!(run(source, false).0, source);
    }
}
