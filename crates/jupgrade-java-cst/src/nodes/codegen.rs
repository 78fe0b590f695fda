// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Printing arena nodes back to source text.

use std::fmt;

use thiserror::Error;

use super::kinds::*;
use super::tree::Tree;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("{0} is referenced but is not live in the tree")]
    MissingNode(NodeId),
}

#[derive(Debug, Default)]
pub struct CodegenState {
    out: String,
}

impl CodegenState {
    pub fn add_token(&mut self, tok: &Tok) {
        self.out.push_str(&tok.leading);
        self.out.push_str(&tok.text);
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.out)
    }
}

pub trait Codegen {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError>;
}

impl Codegen for Tok {
    fn codegen(&self, _tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        state.add_token(self);
        Ok(())
    }
}

impl Codegen for Part {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        match self {
            Part::Token(tok) => tok.codegen(tree, state),
            Part::Node(id) => id.codegen(tree, state),
        }
    }
}

impl<T: Codegen> Codegen for [T] {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        for item in self {
            item.codegen(tree, state)?;
        }
        Ok(())
    }
}

impl<T: Codegen> Codegen for Option<T> {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        match self {
            Some(item) => item.codegen(tree, state),
            None => Ok(()),
        }
    }
}

impl Codegen for NodeId {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        tree.get(*self)
            .ok_or(CodegenError::MissingNode(*self))?
            .codegen(tree, state)
    }
}

impl Codegen for NodeKind {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        match self {
            NodeKind::CompilationUnit(node) => node.codegen(tree, state),
            NodeKind::Package(node) => node.codegen(tree, state),
            NodeKind::Import(node) => node.codegen(tree, state),
            NodeKind::ClassDecl(node) => node.codegen(tree, state),
            NodeKind::ClassBody(node) => node.codegen(tree, state),
            NodeKind::MethodDecl(node) => node.codegen(tree, state),
            NodeKind::Annotation(node) => node.codegen(tree, state),
            NodeKind::Block(node) => node.codegen(tree, state),
            NodeKind::Statement(node) => node.codegen(tree, state),
            NodeKind::Expression(node) => node.codegen(tree, state),
            NodeKind::Call(node) => node.codegen(tree, state),
            NodeKind::Group(node) => node.codegen(tree, state),
            NodeKind::Literal(node) => node.codegen(tree, state),
        }
    }
}

impl Codegen for CompilationUnit {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.items.codegen(tree, state)?;
        self.eof.codegen(tree, state)
    }
}

impl Codegen for Package {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.annotations.codegen(tree, state)?;
        self.package_kw.codegen(tree, state)?;
        self.name.codegen(tree, state)?;
        self.semi.codegen(tree, state)
    }
}

impl Codegen for Import {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.import_kw.codegen(tree, state)?;
        self.static_kw.codegen(tree, state)?;
        self.path.codegen(tree, state)?;
        self.semi.codegen(tree, state)
    }
}

impl Codegen for ClassDecl {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.header.codegen(tree, state)?;
        self.keyword.codegen(tree, state)?;
        self.name.codegen(tree, state)?;
        self.rest.codegen(tree, state)?;
        self.body.codegen(tree, state)
    }
}

impl Codegen for ClassBody {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.lbrace.codegen(tree, state)?;
        self.members.codegen(tree, state)?;
        self.rbrace.codegen(tree, state)
    }
}

impl Codegen for MethodDecl {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.header.codegen(tree, state)?;
        self.name.codegen(tree, state)?;
        self.params.codegen(tree, state)?;
        self.tail.codegen(tree, state)?;
        self.body.codegen(tree, state)?;
        self.semi.codegen(tree, state)
    }
}

impl Codegen for Annotation {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.at.codegen(tree, state)?;
        self.name.codegen(tree, state)?;
        match &self.args {
            AnnotationArgs::Marker => Ok(()),
            AnnotationArgs::Single {
                lparen,
                value,
                rparen,
            } => {
                lparen.codegen(tree, state)?;
                value.codegen(tree, state)?;
                rparen.codegen(tree, state)
            }
            AnnotationArgs::Pairs {
                lparen,
                pairs,
                commas,
                rparen,
            } => {
                lparen.codegen(tree, state)?;
                for (index, pair) in pairs.iter().enumerate() {
                    pair.name.codegen(tree, state)?;
                    pair.eq.codegen(tree, state)?;
                    pair.value.codegen(tree, state)?;
                    commas.get(index).codegen(tree, state)?;
                }
                rparen.codegen(tree, state)
            }
        }
    }
}

impl Codegen for &Tok {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        (*self).codegen(tree, state)
    }
}

impl Codegen for Block {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.lbrace.codegen(tree, state)?;
        self.stmts.codegen(tree, state)?;
        self.rbrace.codegen(tree, state)
    }
}

impl Codegen for Statement {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.parts.codegen(tree, state)?;
        self.semi.codegen(tree, state)
    }
}

impl Codegen for Expression {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.parts.codegen(tree, state)
    }
}

impl Codegen for Call {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.scope.codegen(tree, state)?;
        self.dot.codegen(tree, state)?;
        self.name.codegen(tree, state)?;
        self.args.codegen(tree, state)
    }
}

impl Codegen for Group {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.open.codegen(tree, state)?;
        for index in 0..self.items.len().max(self.commas.len()) {
            self.items.get(index).copied().codegen(tree, state)?;
            self.commas.get(index).codegen(tree, state)?;
        }
        self.close.codegen(tree, state)
    }
}

impl Codegen for Literal {
    fn codegen(&self, tree: &Tree, state: &mut CodegenState) -> Result<(), CodegenError> {
        self.token.codegen(tree, state)
    }
}
