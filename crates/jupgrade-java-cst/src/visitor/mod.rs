// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for tree traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in source order
//!
//! Visitors receive the tree mutably and may rewrite it while it is being
//! walked. After a `visit_*` hook returns, the walker resolves the node id (so
//! it descends into a replacement, never into a retired node) and re-reads
//! the child list before each step, so edits to not-yet-visited children are
//! observed.
//!
//! ```
//! use jupgrade_java_cst::{parse_compilation_unit, walk, NodeId, Tree, TreeVisitor, VisitResult};
//!
//! struct CallCounter {
//!     count: usize,
//! }
//!
//! impl TreeVisitor for CallCounter {
//!     fn visit_call(&mut self, _tree: &mut Tree, _id: NodeId) -> VisitResult {
//!         self.count += 1;
//!         VisitResult::Continue
//!     }
//! }
//!
//! let mut tree = parse_compilation_unit("class A { void f() { a(b(), c()); } }").unwrap();
//! let root = tree.root().unwrap();
//! let mut counter = CallCounter { count: 0 };
//! walk(&mut counter, &mut tree, root);
//! assert_eq!(counter.count, 3);
//! ```

mod dispatch;
mod traits;

pub use dispatch::walk;
pub use traits::{TreeVisitor, VisitResult};
