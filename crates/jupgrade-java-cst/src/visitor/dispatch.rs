// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The walk function.
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children but still call `leave_*`
//! - `VisitResult::Stop` - halt traversal immediately (no `leave_*` called)

use super::traits::{TreeVisitor, VisitResult};
use crate::nodes::{NodeId, NodeTag, Tree};

fn dispatch_visit<V: TreeVisitor + ?Sized>(
    visitor: &mut V,
    tree: &mut Tree,
    id: NodeId,
    tag: NodeTag,
) -> VisitResult {
    match tag {
        NodeTag::CompilationUnit => visitor.visit_compilation_unit(tree, id),
        NodeTag::Package => visitor.visit_package(tree, id),
        NodeTag::Import => visitor.visit_import(tree, id),
        NodeTag::ClassDecl => visitor.visit_class_decl(tree, id),
        NodeTag::ClassBody => visitor.visit_class_body(tree, id),
        NodeTag::MethodDecl => visitor.visit_method_decl(tree, id),
        NodeTag::Annotation => visitor.visit_annotation(tree, id),
        NodeTag::Block => visitor.visit_block(tree, id),
        NodeTag::Statement => visitor.visit_statement(tree, id),
        NodeTag::Expression => visitor.visit_expression(tree, id),
        NodeTag::Call => visitor.visit_call(tree, id),
        NodeTag::Group => visitor.visit_group(tree, id),
        NodeTag::Literal => visitor.visit_literal(tree, id),
    }
}

fn dispatch_leave<V: TreeVisitor + ?Sized>(
    visitor: &mut V,
    tree: &mut Tree,
    id: NodeId,
    tag: NodeTag,
) {
    match tag {
        NodeTag::CompilationUnit => visitor.leave_compilation_unit(tree, id),
        NodeTag::Package => visitor.leave_package(tree, id),
        NodeTag::Import => visitor.leave_import(tree, id),
        NodeTag::ClassDecl => visitor.leave_class_decl(tree, id),
        NodeTag::ClassBody => visitor.leave_class_body(tree, id),
        NodeTag::MethodDecl => visitor.leave_method_decl(tree, id),
        NodeTag::Annotation => visitor.leave_annotation(tree, id),
        NodeTag::Block => visitor.leave_block(tree, id),
        NodeTag::Statement => visitor.leave_statement(tree, id),
        NodeTag::Expression => visitor.leave_expression(tree, id),
        NodeTag::Call => visitor.leave_call(tree, id),
        NodeTag::Group => visitor.leave_group(tree, id),
        NodeTag::Literal => visitor.leave_literal(tree, id),
    }
}

/// Walk the subtree rooted at `id`.
///
/// Traversal order:
/// 1. `visit_*` for the node
/// 2. If the hook replaced the node, continue with the replacement
/// 3. Walk each child in source order, re-reading the child list each step
/// 4. `leave_*` for the (possibly replaced) node
pub fn walk<V: TreeVisitor + ?Sized>(visitor: &mut V, tree: &mut Tree, id: NodeId) -> VisitResult {
    let Some(tag) = tree.tag(id) else {
        return VisitResult::Continue;
    };
    let result = dispatch_visit(visitor, tree, id, tag);
    let current = tree.resolve(id);
    let Some(current_tag) = tree.tag(current) else {
        return match result {
            VisitResult::Stop => VisitResult::Stop,
            _ => VisitResult::Continue,
        };
    };
    match result {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let mut index = 0;
            while let Some(child) = tree.child_at(current, index) {
                if walk(visitor, tree, child) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
                index += 1;
            }
        }
    }
    dispatch_leave(visitor, tree, current, current_tag);
    VisitResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_compilation_unit;
    use crate::nodes::{make, NodeKind};

    #[derive(Default)]
    struct Recorder {
        visited: Vec<NodeTag>,
        left: Vec<NodeTag>,
    }

    impl TreeVisitor for Recorder {
        fn visit_class_decl(&mut self, _tree: &mut Tree, _id: NodeId) -> VisitResult {
            self.visited.push(NodeTag::ClassDecl);
            VisitResult::Continue
        }

        fn visit_method_decl(&mut self, _tree: &mut Tree, _id: NodeId) -> VisitResult {
            self.visited.push(NodeTag::MethodDecl);
            VisitResult::SkipChildren
        }

        fn visit_call(&mut self, _tree: &mut Tree, _id: NodeId) -> VisitResult {
            self.visited.push(NodeTag::Call);
            VisitResult::Continue
        }

        fn leave_method_decl(&mut self, _tree: &mut Tree, _id: NodeId) {
            self.left.push(NodeTag::MethodDecl);
        }

        fn leave_class_decl(&mut self, _tree: &mut Tree, _id: NodeId) {
            self.left.push(NodeTag::ClassDecl);
        }
    }

    #[test]
    fn test_skip_children_still_leaves() {
        let mut tree =
            parse_compilation_unit("class A { void f() { g(); } int x = h(); }").expect("parse");
        let root = tree.root().expect("root");
        let mut recorder = Recorder::default();
        walk(&mut recorder, &mut tree, root);
        assert_eq!(
            recorder.visited,
            vec![NodeTag::ClassDecl, NodeTag::MethodDecl, NodeTag::Call]
        );
        assert_eq!(recorder.left, vec![NodeTag::MethodDecl, NodeTag::ClassDecl]);
    }

    struct Stopper {
        calls: usize,
    }

    impl TreeVisitor for Stopper {
        fn visit_call(&mut self, _tree: &mut Tree, _id: NodeId) -> VisitResult {
            self.calls += 1;
            VisitResult::Stop
        }
    }

    #[test]
    fn test_stop_halts_walk() {
        let mut tree = parse_compilation_unit("class A { void f() { a(); b(); } }").expect("parse");
        let root = tree.root().expect("root");
        let mut stopper = Stopper { calls: 0 };
        assert_eq!(walk(&mut stopper, &mut tree, root), VisitResult::Stop);
        assert_eq!(stopper.calls, 1);
    }

    /// Replaces every call named `old` with a call named `wrapped(old())`
    /// and records the names of all calls it sees.
    struct Wrapper {
        seen: Vec<String>,
    }

    impl TreeVisitor for Wrapper {
        fn visit_call(&mut self, tree: &mut Tree, id: NodeId) -> VisitResult {
            let name = match tree.get(id).and_then(NodeKind::as_call) {
                Some(call) => call.name.text.clone(),
                None => return VisitResult::Continue,
            };
            self.seen.push(name.clone());
            if name == "old" {
                let leading = tree.take_leading_trivia(id).unwrap_or_default();
                let inner = make::call(tree, None, "inner", Vec::new());
                let arg = make::node_expr(tree, inner);
                let outer = make::call(tree, None, "wrapped", vec![arg]);
                tree.set_leading_trivia(outer, leading);
                tree.replace(id, outer).expect("replace");
            }
            VisitResult::Continue
        }
    }

    #[test]
    fn test_walk_descends_into_replacement() {
        let mut tree = parse_compilation_unit("class A { void f() { old(); } }").expect("parse");
        let root = tree.root().expect("root");
        let mut wrapper = Wrapper { seen: Vec::new() };
        walk(&mut wrapper, &mut tree, root);
        assert_eq!(wrapper.seen, vec!["old", "inner"]);
        assert_eq!(
            tree.to_source().expect("codegen"),
            "class A { void f() { wrapped(inner()); } }"
        );
    }
}
