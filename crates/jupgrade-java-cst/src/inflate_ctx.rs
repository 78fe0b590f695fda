// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Inflation of deflated grammar output into the arena.
//!
//! Tokens are copied out of the source (text plus leading trivia) and every
//! node is allocated with its children already pointing back at it. Method
//! calls get their qualifying scope attached here: the grammar sees
//! `a.b.assertEquals(...)` as the soup `a . b . <call>`, and inflation folds
//! the `a . b .` prefix into the call's scope expression.

use crate::nodes::deflated::*;
use crate::nodes::{
    Annotation, AnnotationArgs, Block, Call, ClassBody, ClassDecl, CompilationUnit, Expression,
    Group, Import, Literal, LiteralKind, MemberValuePair, MethodDecl, NodeId, NodeTag, Package,
    Part, Statement, Tok, Tree,
};
use crate::tokenizer::{is_keyword, TokType};

pub struct InflateCtx<'t> {
    pub tree: &'t mut Tree,
}

impl<'t> InflateCtx<'t> {
    pub fn new(tree: &'t mut Tree) -> Self {
        InflateCtx { tree }
    }
}

pub(crate) trait Inflate {
    type Inflated;

    fn inflate(self, ctx: &mut InflateCtx) -> Self::Inflated;
}

fn tok(token: TokenRef) -> Tok {
    Tok::new(token.leading, token.string)
}

fn toks(tokens: Vec<TokenRef>) -> Vec<Tok> {
    tokens.into_iter().map(tok).collect()
}

impl Inflate for DeflatedUnit<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        if let Some(package) = self.package {
            items.push(package.inflate(ctx));
        }
        for item in self.items {
            items.push(item.inflate(ctx));
        }
        ctx.tree.alloc_with_children(CompilationUnit {
            items,
            eof: tok(self.eof),
        })
    }
}

impl Inflate for DeflatedPackage<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        let annotations = self
            .annotations
            .into_iter()
            .map(|annotation| annotation.inflate(ctx))
            .collect();
        ctx.tree.alloc_with_children(Package {
            annotations,
            package_kw: tok(self.package_kw),
            name: toks(self.name),
            semi: tok(self.semi),
        })
    }
}

impl Inflate for DeflatedItem<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        match self {
            DeflatedItem::Import(import) => import.inflate(ctx),
            DeflatedItem::Class(class) => class.inflate(ctx),
            DeflatedItem::Stray(semi) => ctx.tree.alloc(Statement {
                parts: Vec::new(),
                semi: Some(tok(semi)),
            }),
        }
    }
}

impl Inflate for DeflatedImport<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        ctx.tree.alloc(Import {
            import_kw: tok(self.import_kw),
            static_kw: self.static_kw.map(tok),
            path: toks(self.path),
            semi: tok(self.semi),
        })
    }
}

fn inflate_header(header: Vec<DeflatedHeaderPart>, ctx: &mut InflateCtx) -> Vec<Part> {
    header
        .into_iter()
        .map(|part| match part {
            DeflatedHeaderPart::Annotation(annotation) => Part::Node(annotation.inflate(ctx)),
            DeflatedHeaderPart::Token(token) => Part::Token(tok(token)),
        })
        .collect()
}

impl Inflate for DeflatedClassDecl<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        let header = inflate_header(self.header, ctx);
        let rest = inflate_parts(self.rest, ctx);
        let body = self.body.inflate(ctx);
        ctx.tree.alloc_with_children(ClassDecl {
            header,
            kind: self.kind,
            keyword: toks(self.keyword),
            name: tok(self.name),
            rest,
            body,
        })
    }
}

impl Inflate for DeflatedClassBody<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        let members = self
            .members
            .into_iter()
            .map(|member| match member {
                DeflatedMember::Class(class) => class.inflate(ctx),
                DeflatedMember::Method(method) => method.inflate(ctx),
                DeflatedMember::Statement(statement) => statement.inflate(ctx),
            })
            .collect();
        ctx.tree.alloc_with_children(ClassBody {
            lbrace: tok(self.lbrace),
            members,
            rbrace: tok(self.rbrace),
        })
    }
}

impl Inflate for DeflatedMethodDecl<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        let header = inflate_header(self.header, ctx);
        let params = self.params.inflate(ctx);
        let tail = inflate_parts(self.tail, ctx);
        let body = self.body.map(|body| body.inflate(ctx));
        ctx.tree.alloc_with_children(MethodDecl {
            header,
            name: tok(self.name),
            params,
            tail,
            body,
            semi: self.semi.map(tok),
        })
    }
}

impl Inflate for DeflatedAnnotation<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        let args = match self.args {
            DeflatedAnnotationArgs::Marker => AnnotationArgs::Marker,
            DeflatedAnnotationArgs::Single {
                lparen,
                value,
                rparen,
            } => AnnotationArgs::Single {
                lparen: tok(lparen),
                value: inflate_expression(value, ctx),
                rparen: tok(rparen),
            },
            DeflatedAnnotationArgs::Pairs {
                lparen,
                pairs,
                commas,
                rparen,
            } => AnnotationArgs::Pairs {
                lparen: tok(lparen),
                pairs: pairs
                    .into_iter()
                    .map(|pair| MemberValuePair {
                        name: tok(pair.name),
                        eq: tok(pair.eq),
                        value: inflate_expression(pair.value, ctx),
                    })
                    .collect(),
                commas: toks(commas),
                rparen: tok(rparen),
            },
        };
        ctx.tree.alloc_with_children(Annotation {
            at: tok(self.at),
            name: toks(self.name),
            args,
        })
    }
}

impl Inflate for DeflatedBlock<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        let stmts = self
            .stmts
            .into_iter()
            .map(|stmt| stmt.inflate(ctx))
            .collect();
        ctx.tree.alloc_with_children(Block {
            lbrace: tok(self.lbrace),
            stmts,
            rbrace: tok(self.rbrace),
        })
    }
}

impl Inflate for DeflatedStatement<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        match self {
            DeflatedStatement::Block(block) => block.inflate(ctx),
            DeflatedStatement::Class(class) => class.inflate(ctx),
            DeflatedStatement::Soup { parts, semi } => {
                let parts = inflate_parts(parts, ctx);
                ctx.tree.alloc_with_children(Statement {
                    parts,
                    semi: semi.map(tok),
                })
            }
        }
    }
}

impl Inflate for DeflatedGroup<'_, '_> {
    type Inflated = NodeId;

    fn inflate(self, ctx: &mut InflateCtx) -> NodeId {
        let items = self
            .items
            .into_iter()
            .map(|item| inflate_expression(item, ctx))
            .collect();
        ctx.tree.alloc_with_children(Group {
            open: tok(self.open),
            items,
            commas: toks(self.commas),
            close: tok(self.close),
        })
    }
}

fn inflate_expression(parts: Vec<DeflatedPart>, ctx: &mut InflateCtx) -> NodeId {
    let parts = inflate_parts(parts, ctx);
    ctx.tree.alloc_with_children(Expression { parts })
}

fn literal_kind(kind: TokType) -> LiteralKind {
    match kind {
        TokType::Float => LiteralKind::Float,
        TokType::String => LiteralKind::String,
        TokType::TextBlock => LiteralKind::TextBlock,
        TokType::Char => LiteralKind::Char,
        _ => LiteralKind::Integer,
    }
}

fn inflate_parts(parts: Vec<DeflatedPart>, ctx: &mut InflateCtx) -> Vec<Part> {
    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            DeflatedPart::Token(token) => out.push(Part::Token(tok(token))),
            DeflatedPart::Literal(token) => {
                let id = ctx.tree.alloc(Literal {
                    token: tok(token),
                    kind: literal_kind(token.kind),
                });
                out.push(Part::Node(id));
            }
            DeflatedPart::Annotation(annotation) => out.push(Part::Node(annotation.inflate(ctx))),
            DeflatedPart::Call(call) => {
                let (scope, dot) = match split_call_scope(&mut out, ctx.tree) {
                    Some((parts, dot)) => {
                        let scope = ctx.tree.alloc_with_children(Expression { parts });
                        (Some(scope), Some(dot))
                    }
                    None => (None, None),
                };
                let args = call.args.inflate(ctx);
                let id = ctx.tree.alloc_with_children(Call {
                    scope,
                    dot,
                    name: tok(call.name),
                    args,
                });
                out.push(Part::Node(id));
            }
            DeflatedPart::Creation(creation) => {
                out.push(Part::Token(tok(creation.new_kw)));
                out.extend(creation.ty.into_iter().map(|t| Part::Token(tok(t))));
                out.push(Part::Node(creation.args.inflate(ctx)));
                if let Some(body) = creation.body {
                    out.push(Part::Node(body.inflate(ctx)));
                }
            }
            DeflatedPart::Group(group) => out.push(Part::Node(group.inflate(ctx))),
            DeflatedPart::Block(block) => out.push(Part::Node(block.inflate(ctx))),
            DeflatedPart::Statement(statement) => out.push(Part::Node(statement.inflate(ctx))),
        }
    }
    out
}

fn is_dot(part: &Part) -> bool {
    matches!(part, Part::Token(tok) if tok.text == ".")
}

fn is_index_group(part: &Part, tree: &Tree) -> bool {
    match part {
        Part::Node(id) => tree
            .get(*id)
            .and_then(|kind| kind.as_group())
            .is_some_and(|group| group.open.text == "["),
        Part::Token(_) => false,
    }
}

/// A part that can qualify a method call: a name, `this`, `super`, a call,
/// a literal or a parenthesized expression.
fn is_chain_link(part: &Part, tree: &Tree) -> bool {
    match part {
        Part::Token(tok) => {
            let starts_like_name = tok
                .text
                .chars()
                .next()
                .is_some_and(|ch| ch.is_alphabetic() || ch == '_' || ch == '$');
            starts_like_name
                && (!is_keyword(&tok.text) || matches!(tok.text.as_str(), "this" | "super" | "class"))
        }
        Part::Node(id) => match tree.tag(*id) {
            Some(NodeTag::Call) | Some(NodeTag::Literal) => true,
            Some(NodeTag::Group) => tree
                .get(*id)
                .and_then(|kind| kind.as_group())
                .is_some_and(|group| group.open.text == "("),
            _ => false,
        },
    }
}

/// Start index of the chain link (with any `[...]` suffixes) ending at `end`.
fn link_start(out: &[Part], end: usize, tree: &Tree) -> Option<usize> {
    let mut cursor = end;
    while cursor > 0 && is_index_group(&out[cursor - 1], tree) {
        cursor -= 1;
    }
    (cursor > 0 && is_chain_link(&out[cursor - 1], tree)).then(|| cursor - 1)
}

/// If `out` ends with `link . link . ... .`, removes that run and returns the
/// scope parts and the final dot.
fn split_call_scope(out: &mut Vec<Part>, tree: &Tree) -> Option<(Vec<Part>, Tok)> {
    if !out.last().is_some_and(is_dot) {
        return None;
    }
    let dot_index = out.len() - 1;
    let mut start = link_start(out, dot_index, tree)?;
    while start > 0 && is_dot(&out[start - 1]) {
        match link_start(out, start - 1, tree) {
            Some(earlier) => start = earlier,
            None => break,
        }
    }
    let dot = match out.pop() {
        Some(Part::Token(dot)) => dot,
        _ => return None,
    };
    let scope = out.split_off(start);
    Some((scope, dot))
}
