// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Constructors for synthesized nodes.
//!
//! Every function allocates into the given tree and returns the id of a
//! detached node whose own children already point back at it. Layout is
//! canonical Java: single spaces, no trailing trivia. Callers set the leading
//! trivia of the returned node to fit it into its surroundings.

use super::kinds::*;
use super::tree::Tree;

/// An expression made of plain tokens, e.g. `["SpringExtension", ".", "class"]`.
pub fn token_expr(tree: &mut Tree, tokens: &[&str]) -> NodeId {
    let parts = tokens
        .iter()
        .map(|text| Part::Token(Tok::bare(*text)))
        .collect();
    tree.alloc(Expression { parts })
}

/// A dotted name expression such as `Assertions` or `java.time.Duration`.
pub fn name_expr(tree: &mut Tree, name: &str) -> NodeId {
    let parts = dotted_tokens(name, "")
        .into_iter()
        .map(Part::Token)
        .collect();
    tree.alloc(Expression { parts })
}

/// `Type.class`
pub fn class_literal_expr(tree: &mut Tree, type_name: &str) -> NodeId {
    let mut parts: Vec<Part> = dotted_tokens(type_name, "")
        .into_iter()
        .map(Part::Token)
        .collect();
    parts.push(Part::Token(Tok::bare(".")));
    parts.push(Part::Token(Tok::bare("class")));
    tree.alloc(Expression { parts })
}

/// A string literal expression. `value` is written between double quotes
/// with backslashes and quotes escaped.
pub fn string_literal_expr(tree: &mut Tree, value: &str) -> NodeId {
    let mut text = String::with_capacity(value.len() + 2);
    text.push('"');
    for ch in value.chars() {
        match ch {
            '"' => text.push_str("\\\""),
            '\\' => text.push_str("\\\\"),
            '\n' => text.push_str("\\n"),
            _ => text.push(ch),
        }
    }
    text.push('"');
    let literal = tree.alloc(Literal {
        token: Tok::bare(text),
        kind: LiteralKind::String,
    });
    tree.alloc_with_children(Expression {
        parts: vec![Part::Node(literal)],
    })
}

/// An expression wrapping a single node, e.g. a call.
pub fn node_expr(tree: &mut Tree, node: NodeId) -> NodeId {
    tree.alloc_with_children(Expression {
        parts: vec![Part::Node(node)],
    })
}

/// A parenthesized argument list. The first item keeps its trivia; every
/// later item is preceded by a single space.
pub fn args_group(tree: &mut Tree, items: Vec<NodeId>) -> NodeId {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            tree.set_leading_trivia(*item, " ");
        }
    }
    let commas = (1..items.len()).map(|_| Tok::bare(",")).collect();
    tree.alloc_with_children(Group {
        open: Tok::bare("("),
        items,
        commas,
        close: Tok::bare(")"),
    })
}

/// `scope.name(args)`, or `name(args)` without a scope.
pub fn call(tree: &mut Tree, scope: Option<NodeId>, name: &str, args: Vec<NodeId>) -> NodeId {
    let args = args_group(tree, args);
    let dot = scope.map(|_| Tok::bare("."));
    tree.alloc_with_children(Call {
        scope,
        dot,
        name: Tok::bare(name),
        args,
    })
}

/// `() -> body`, where `body` is a block.
pub fn lambda_expr(tree: &mut Tree, body: NodeId) -> NodeId {
    tree.set_leading_trivia(body, " ");
    let params = tree.alloc(Group {
        open: Tok::bare("("),
        items: Vec::new(),
        commas: Vec::new(),
        close: Tok::bare(")"),
    });
    tree.alloc_with_children(Expression {
        parts: vec![
            Part::Node(params),
            Part::Token(Tok::spaced("->")),
            Part::Node(body),
        ],
    })
}

/// An expression statement `expr;`.
pub fn expr_statement(tree: &mut Tree, expr: NodeId) -> NodeId {
    tree.alloc_with_children(Statement {
        parts: vec![Part::Node(expr)],
        semi: Some(Tok::bare(";")),
    })
}

pub fn block(tree: &mut Tree, lbrace: Tok, stmts: Vec<NodeId>, rbrace: Tok) -> NodeId {
    tree.alloc_with_children(Block {
        lbrace,
        stmts,
        rbrace,
    })
}

/// `@name`
pub fn marker_annotation(tree: &mut Tree, name: &str) -> NodeId {
    tree.alloc(Annotation {
        at: Tok::bare("@"),
        name: dotted_tokens(name, ""),
        args: AnnotationArgs::Marker,
    })
}

/// `@name(value)`
pub fn single_annotation(tree: &mut Tree, name: &str, value: NodeId) -> NodeId {
    tree.set_leading_trivia(value, "");
    tree.alloc_with_children(Annotation {
        at: Tok::bare("@"),
        name: dotted_tokens(name, ""),
        args: AnnotationArgs::Single {
            lparen: Tok::bare("("),
            value,
            rparen: Tok::bare(")"),
        },
    })
}

/// `import [static] name[.*];`
pub fn import(tree: &mut Tree, name: &str, is_static: bool, asterisk: bool) -> NodeId {
    let mut path = dotted_tokens(name, " ");
    if asterisk {
        path.push(Tok::bare("."));
        path.push(Tok::bare("*"));
    }
    tree.alloc(Import {
        import_kw: Tok::bare("import"),
        static_kw: is_static.then(|| Tok::spaced("static")),
        path,
        semi: Tok::bare(";"),
    })
}
