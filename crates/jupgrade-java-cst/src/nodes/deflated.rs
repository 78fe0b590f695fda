// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Deflated nodes produced by the grammar.
//!
//! These borrow tokens straight out of the token vector. [`crate::inflate_ctx`]
//! turns them into owned arena nodes.

use crate::nodes::ClassKind;
use crate::tokenizer::Token;

pub type TokenRef<'r, 'a> = &'r Token<'a>;

#[derive(Debug, Clone)]
pub struct DeflatedUnit<'r, 'a> {
    pub package: Option<DeflatedPackage<'r, 'a>>,
    pub items: Vec<DeflatedItem<'r, 'a>>,
    pub eof: TokenRef<'r, 'a>,
}

#[derive(Debug, Clone)]
pub struct DeflatedPackage<'r, 'a> {
    pub annotations: Vec<DeflatedAnnotation<'r, 'a>>,
    pub package_kw: TokenRef<'r, 'a>,
    pub name: Vec<TokenRef<'r, 'a>>,
    pub semi: TokenRef<'r, 'a>,
}

#[derive(Debug, Clone)]
pub enum DeflatedItem<'r, 'a> {
    Import(DeflatedImport<'r, 'a>),
    Class(DeflatedClassDecl<'r, 'a>),
    Stray(TokenRef<'r, 'a>),
}

#[derive(Debug, Clone)]
pub struct DeflatedImport<'r, 'a> {
    pub import_kw: TokenRef<'r, 'a>,
    pub static_kw: Option<TokenRef<'r, 'a>>,
    pub path: Vec<TokenRef<'r, 'a>>,
    pub semi: TokenRef<'r, 'a>,
}

#[derive(Debug, Clone)]
pub struct DeflatedClassDecl<'r, 'a> {
    pub header: Vec<DeflatedHeaderPart<'r, 'a>>,
    pub kind: ClassKind,
    pub keyword: Vec<TokenRef<'r, 'a>>,
    pub name: TokenRef<'r, 'a>,
    pub rest: Vec<DeflatedPart<'r, 'a>>,
    pub body: DeflatedClassBody<'r, 'a>,
}

#[derive(Debug, Clone)]
pub enum DeflatedHeaderPart<'r, 'a> {
    Annotation(DeflatedAnnotation<'r, 'a>),
    Token(TokenRef<'r, 'a>),
}

#[derive(Debug, Clone)]
pub struct DeflatedClassBody<'r, 'a> {
    pub lbrace: TokenRef<'r, 'a>,
    pub members: Vec<DeflatedMember<'r, 'a>>,
    pub rbrace: TokenRef<'r, 'a>,
}

#[derive(Debug, Clone)]
pub enum DeflatedMember<'r, 'a> {
    Class(DeflatedClassDecl<'r, 'a>),
    Method(DeflatedMethodDecl<'r, 'a>),
    /// Fields, initializers, enum constants and anything else kept as soup.
    Statement(DeflatedStatement<'r, 'a>),
}

#[derive(Debug, Clone)]
pub struct DeflatedMethodDecl<'r, 'a> {
    pub header: Vec<DeflatedHeaderPart<'r, 'a>>,
    pub name: TokenRef<'r, 'a>,
    pub params: DeflatedGroup<'r, 'a>,
    pub tail: Vec<DeflatedPart<'r, 'a>>,
    pub body: Option<DeflatedBlock<'r, 'a>>,
    pub semi: Option<TokenRef<'r, 'a>>,
}

#[derive(Debug, Clone)]
pub struct DeflatedAnnotation<'r, 'a> {
    pub at: TokenRef<'r, 'a>,
    pub name: Vec<TokenRef<'r, 'a>>,
    pub args: DeflatedAnnotationArgs<'r, 'a>,
}

#[derive(Debug, Clone)]
pub enum DeflatedAnnotationArgs<'r, 'a> {
    Marker,
    Single {
        lparen: TokenRef<'r, 'a>,
        value: Vec<DeflatedPart<'r, 'a>>,
        rparen: TokenRef<'r, 'a>,
    },
    Pairs {
        lparen: TokenRef<'r, 'a>,
        pairs: Vec<DeflatedPair<'r, 'a>>,
        commas: Vec<TokenRef<'r, 'a>>,
        rparen: TokenRef<'r, 'a>,
    },
}

#[derive(Debug, Clone)]
pub struct DeflatedPair<'r, 'a> {
    pub name: TokenRef<'r, 'a>,
    pub eq: TokenRef<'r, 'a>,
    pub value: Vec<DeflatedPart<'r, 'a>>,
}

#[derive(Debug, Clone)]
pub struct DeflatedBlock<'r, 'a> {
    pub lbrace: TokenRef<'r, 'a>,
    pub stmts: Vec<DeflatedStatement<'r, 'a>>,
    pub rbrace: TokenRef<'r, 'a>,
}

#[derive(Debug, Clone)]
pub enum DeflatedStatement<'r, 'a> {
    Block(DeflatedBlock<'r, 'a>),
    Class(Box<DeflatedClassDecl<'r, 'a>>),
    Soup {
        parts: Vec<DeflatedPart<'r, 'a>>,
        semi: Option<TokenRef<'r, 'a>>,
    },
}

impl<'r, 'a> DeflatedStatement<'r, 'a> {
    pub fn soup(parts: Vec<DeflatedPart<'r, 'a>>, semi: Option<TokenRef<'r, 'a>>) -> Self {
        DeflatedStatement::Soup { parts, semi }
    }
}

#[derive(Debug, Clone)]
pub enum DeflatedPart<'r, 'a> {
    Token(TokenRef<'r, 'a>),
    Literal(TokenRef<'r, 'a>),
    Annotation(DeflatedAnnotation<'r, 'a>),
    Call(DeflatedCall<'r, 'a>),
    Creation(Box<DeflatedCreation<'r, 'a>>),
    Group(DeflatedGroup<'r, 'a>),
    Block(DeflatedBlock<'r, 'a>),
    Statement(Box<DeflatedStatement<'r, 'a>>),
}

#[derive(Debug, Clone)]
pub struct DeflatedCall<'r, 'a> {
    pub name: TokenRef<'r, 'a>,
    pub args: DeflatedGroup<'r, 'a>,
}

/// `new Type<...>(args) { body }`
#[derive(Debug, Clone)]
pub struct DeflatedCreation<'r, 'a> {
    pub new_kw: TokenRef<'r, 'a>,
    pub ty: Vec<TokenRef<'r, 'a>>,
    pub args: DeflatedGroup<'r, 'a>,
    pub body: Option<DeflatedClassBody<'r, 'a>>,
}

#[derive(Debug, Clone)]
pub struct DeflatedGroup<'r, 'a> {
    pub open: TokenRef<'r, 'a>,
    pub items: Vec<Vec<DeflatedPart<'r, 'a>>>,
    pub commas: Vec<TokenRef<'r, 'a>>,
    pub close: TokenRef<'r, 'a>,
}

#[derive(Debug, Clone)]
pub enum GroupElem<'r, 'a> {
    Part(DeflatedPart<'r, 'a>),
    Comma(TokenRef<'r, 'a>),
}

impl<'r, 'a> DeflatedGroup<'r, 'a> {
    /// Splits a flat element list on its commas.
    ///
    /// An empty segment after the last comma is a trailing comma and produces
    /// no item. Empty segments anywhere else are kept so that items and commas
    /// stay aligned.
    pub fn new(
        open: TokenRef<'r, 'a>,
        elems: Vec<GroupElem<'r, 'a>>,
        close: TokenRef<'r, 'a>,
    ) -> Self {
        let mut items = Vec::new();
        let mut commas = Vec::new();
        let mut current = Vec::new();
        for elem in elems {
            match elem {
                GroupElem::Part(part) => current.push(part),
                GroupElem::Comma(comma) => {
                    items.push(std::mem::take(&mut current));
                    commas.push(comma);
                }
            }
        }
        if !current.is_empty() {
            items.push(current);
        }
        DeflatedGroup {
            open,
            items,
            commas,
            close,
        }
    }
}
