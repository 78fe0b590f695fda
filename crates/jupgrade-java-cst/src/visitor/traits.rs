// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for tree traversal.

use crate::nodes::{NodeId, Tree};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// `leave_*` is still called for this node.
    SkipChildren,

    /// Stop traversal entirely. No further hooks are called.
    Stop,
}

/// Macro to generate visitor trait method signatures.
///
/// Generates `visit_*` / `leave_*` pairs whose defaults continue the walk and
/// do nothing, respectively.
macro_rules! visitor_methods {
    (
        $(
            $base_name:ident : $node_type:ident
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                #[doc = concat!("Visit a [`", stringify!($node_type), "`](crate::", stringify!($node_type), ") node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. The hook may replace the node; the walker then descends into the replacement."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, tree: &mut Tree, id: NodeId) -> VisitResult {
                    VisitResult::Continue
                }

                #[doc = concat!("Leave a [`", stringify!($node_type), "`](crate::", stringify!($node_type), ") node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited. Called even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, tree: &mut Tree, id: NodeId) {}
            )*
        }
    };
}

/// Mutable visitor over an arena [`Tree`].
///
/// Each node kind has a `visit_*` and `leave_*` hook. Hooks get the tree and
/// the id of the node being visited and may rewrite anything reachable from
/// it.
pub trait TreeVisitor {
    visitor_methods! {
        compilation_unit: CompilationUnit,
        package: Package,
        import: Import,
        class_decl: ClassDecl,
        class_body: ClassBody,
        method_decl: MethodDecl,
        annotation: Annotation,
        block: Block,
        statement: Statement,
        expression: Expression,
        call: Call,
        group: Group,
        literal: Literal,
    }
}
