// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

mod codegen;
pub(crate) mod deflated;
mod kinds;
pub mod make;
mod tree;

pub use codegen::{Codegen, CodegenError, CodegenState};
pub use kinds::{
    dotted_tokens, Annotation, AnnotationArgs, Block, Call, ClassBody, ClassDecl, ClassKind,
    CompilationUnit, Expression, Group, Import, Literal, LiteralKind, MemberValuePair,
    MethodDecl, NodeId, NodeKind, NodeTag, Package, Part, Statement, Tok,
};
pub use tree::{Tree, TreeError};
