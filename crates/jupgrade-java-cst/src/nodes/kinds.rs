// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Arena node types.
//!
//! Nodes own their tokens (text plus leading trivia) and refer to child nodes
//! by [`NodeId`]. Anything the grammar does not model structurally is kept as
//! a sequence of [`Part`]s, a "soup" of tokens and nested nodes that prints
//! back verbatim.

use std::fmt;

/// A stable identifier for a node in a [`crate::Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A token owned by the tree: its text and the trivia in front of it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tok {
    pub leading: String,
    pub text: String,
}

impl Tok {
    pub fn new(leading: impl Into<String>, text: impl Into<String>) -> Self {
        Tok {
            leading: leading.into(),
            text: text.into(),
        }
    }

    /// A token with no leading trivia.
    pub fn bare(text: impl Into<String>) -> Self {
        Tok::new("", text)
    }

    /// A token preceded by a single space.
    pub fn spaced(text: impl Into<String>) -> Self {
        Tok::new(" ", text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Token(Tok),
    Node(NodeId),
}

impl Part {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Part::Node(id) => Some(*id),
            Part::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Tok> {
        match self {
            Part::Token(tok) => Some(tok),
            Part::Node(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    AnnotationType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    /// The package declaration, imports, type declarations and stray
    /// semicolons, in source order.
    pub items: Vec<NodeId>,
    pub eof: Tok,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub annotations: Vec<NodeId>,
    pub package_kw: Tok,
    pub name: Vec<Tok>,
    pub semi: Tok,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub import_kw: Tok,
    pub static_kw: Option<Tok>,
    /// Dotted path tokens, including the trailing `.*` of an asterisk import.
    pub path: Vec<Tok>,
    pub semi: Tok,
}

impl Import {
    pub fn is_static(&self) -> bool {
        self.static_kw.is_some()
    }

    pub fn is_asterisk(&self) -> bool {
        self.path.last().is_some_and(|tok| tok.text == "*")
    }

    /// The dotted name, without the `.*` of an asterisk import.
    pub fn name(&self) -> String {
        let end = if self.is_asterisk() {
            self.path.len().saturating_sub(2)
        } else {
            self.path.len()
        };
        self.path[..end].iter().map(|tok| tok.text.as_str()).collect()
    }

    /// Replaces the dotted name. Asterisk-ness and the trivia in front of the
    /// first path segment are kept.
    pub fn set_name(&mut self, name: &str) {
        let leading = self
            .path
            .first()
            .map(|tok| tok.leading.clone())
            .unwrap_or_else(|| " ".to_string());
        let asterisk = self.is_asterisk();
        self.path = dotted_tokens(name, leading);
        if asterisk {
            self.path.push(Tok::bare("."));
            self.path.push(Tok::bare("*"));
        }
    }
}

/// Splits `a.b.c` into `a`, `.`, `b`, `.`, `c` tokens; the first one gets
/// `leading` in front of it.
pub fn dotted_tokens(name: &str, leading: impl Into<String>) -> Vec<Tok> {
    let mut segments = name.split('.');
    let mut tokens = vec![Tok::new(leading, segments.next().unwrap_or_default())];
    for segment in segments {
        tokens.push(Tok::bare("."));
        tokens.push(Tok::bare(segment));
    }
    tokens
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    /// Modifiers and annotations in front of the declaration keyword.
    pub header: Vec<Part>,
    pub kind: ClassKind,
    pub keyword: Vec<Tok>,
    pub name: Tok,
    /// Type parameters, record components, `extends`, `implements`, `permits`.
    pub rest: Vec<Part>,
    pub body: NodeId,
}

impl ClassDecl {
    pub fn annotations(&self) -> Vec<NodeId> {
        header_annotations(&self.header)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBody {
    pub lbrace: Tok,
    pub members: Vec<NodeId>,
    pub rbrace: Tok,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Annotations, modifiers, type parameters and the return type.
    pub header: Vec<Part>,
    pub name: Tok,
    pub params: NodeId,
    /// Array dimensions, `throws` clause or annotation-method default value.
    pub tail: Vec<Part>,
    pub body: Option<NodeId>,
    pub semi: Option<Tok>,
}

impl MethodDecl {
    pub fn annotations(&self) -> Vec<NodeId> {
        header_annotations(&self.header)
    }
}

fn header_annotations(header: &[Part]) -> Vec<NodeId> {
    header.iter().filter_map(Part::as_node).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub at: Tok,
    pub name: Vec<Tok>,
    pub args: AnnotationArgs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationArgs {
    /// `@Name`
    Marker,
    /// `@Name(value)`
    Single {
        lparen: Tok,
        value: NodeId,
        rparen: Tok,
    },
    /// `@Name(a = x, b = y)`, including the empty `@Name()`.
    Pairs {
        lparen: Tok,
        pairs: Vec<MemberValuePair>,
        commas: Vec<Tok>,
        rparen: Tok,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberValuePair {
    pub name: Tok,
    pub eq: Tok,
    pub value: NodeId,
}

impl Annotation {
    /// The annotation name as written, possibly qualified.
    pub fn name(&self) -> String {
        self.name.iter().map(|tok| tok.text.as_str()).collect()
    }

    /// The last segment of the name.
    pub fn simple_name(&self) -> &str {
        self.name.last().map(|tok| tok.text.as_str()).unwrap_or("")
    }

    /// Renames the annotation; `name` may be simple or qualified.
    pub fn set_name(&mut self, name: &str) {
        let leading = self
            .name
            .first()
            .map(|tok| tok.leading.clone())
            .unwrap_or_default();
        self.name = dotted_tokens(name, leading);
    }

    pub fn is_qualified(&self) -> bool {
        self.name.len() > 1
    }

    pub fn pairs(&self) -> &[MemberValuePair] {
        match &self.args {
            AnnotationArgs::Pairs { pairs, .. } => pairs,
            _ => &[],
        }
    }

    pub fn pair(&self, name: &str) -> Option<&MemberValuePair> {
        self.pairs().iter().find(|pair| pair.name.text == name)
    }

    pub fn single_value(&self) -> Option<NodeId> {
        match &self.args {
            AnnotationArgs::Single { value, .. } => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub lbrace: Tok,
    pub stmts: Vec<NodeId>,
    pub rbrace: Tok,
}

/// A statement kept as soup. Control-flow statements hold their nested
/// statements and blocks as node parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub parts: Vec<Part>,
    pub semi: Option<Tok>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub parts: Vec<Part>,
}

/// A method invocation `scope.name(args)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub scope: Option<NodeId>,
    pub dot: Option<Tok>,
    pub name: Tok,
    /// Always a parenthesized [`Group`].
    pub args: NodeId,
}

/// A bracketed list: `( )`, `[ ]` or `{ }` with comma-separated items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub open: Tok,
    pub items: Vec<NodeId>,
    pub commas: Vec<Tok>,
    pub close: Tok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
    TextBlock,
    Char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub token: Tok,
    pub kind: LiteralKind,
}

/// The first element of a node in source order.
pub(crate) enum FirstElement {
    Token,
    Node(NodeId),
}

macro_rules! node_kinds {
    ($($variant:ident : $snake:ident),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum NodeKind {
            $($variant($variant),)*
        }

        /// Discriminant of a [`NodeKind`], cheap to copy out of a borrowed tree.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeTag {
            $($variant,)*
        }

        impl NodeKind {
            pub fn tag(&self) -> NodeTag {
                match self {
                    $(NodeKind::$variant(_) => NodeTag::$variant,)*
                }
            }

            paste::paste! {
                $(
                    pub fn [<as_ $snake>](&self) -> Option<&$variant> {
                        match self {
                            NodeKind::$variant(node) => Some(node),
                            #[allow(unreachable_patterns)]
                            _ => None,
                        }
                    }

                    pub fn [<as_ $snake _mut>](&mut self) -> Option<&mut $variant> {
                        match self {
                            NodeKind::$variant(node) => Some(node),
                            #[allow(unreachable_patterns)]
                            _ => None,
                        }
                    }
                )*
            }
        }

        $(
            impl From<$variant> for NodeKind {
                fn from(node: $variant) -> Self {
                    NodeKind::$variant(node)
                }
            }
        )*
    };
}

node_kinds! {
    CompilationUnit: compilation_unit,
    Package: package,
    Import: import,
    ClassDecl: class_decl,
    ClassBody: class_body,
    MethodDecl: method_decl,
    Annotation: annotation,
    Block: block,
    Statement: statement,
    Expression: expression,
    Call: call,
    Group: group,
    Literal: literal,
}

fn parts_children(parts: &[Part], f: &mut dyn FnMut(NodeId)) {
    for part in parts {
        if let Part::Node(id) = part {
            f(*id);
        }
    }
}

fn parts_children_mut(parts: &mut [Part], f: &mut dyn FnMut(&mut NodeId)) {
    for part in parts {
        if let Part::Node(id) = part {
            f(id);
        }
    }
}

fn first_of_parts(parts: &[Part]) -> Option<FirstElement> {
    parts.first().map(|part| match part {
        Part::Token(_) => FirstElement::Token,
        Part::Node(id) => FirstElement::Node(*id),
    })
}

fn first_tok_of_parts(parts: &mut [Part]) -> Option<&mut Tok> {
    match parts.first_mut() {
        Some(Part::Token(tok)) => Some(tok),
        _ => None,
    }
}

impl NodeKind {
    /// Calls `f` for every child node, in source order.
    pub fn for_each_child(&self, f: &mut dyn FnMut(NodeId)) {
        match self {
            NodeKind::CompilationUnit(node) => node.items.iter().for_each(|id| f(*id)),
            NodeKind::Package(node) => node.annotations.iter().for_each(|id| f(*id)),
            NodeKind::Import(_) | NodeKind::Literal(_) => {}
            NodeKind::ClassDecl(node) => {
                parts_children(&node.header, f);
                parts_children(&node.rest, f);
                f(node.body);
            }
            NodeKind::ClassBody(node) => node.members.iter().for_each(|id| f(*id)),
            NodeKind::MethodDecl(node) => {
                parts_children(&node.header, f);
                f(node.params);
                parts_children(&node.tail, f);
                if let Some(body) = node.body {
                    f(body);
                }
            }
            NodeKind::Annotation(node) => match &node.args {
                AnnotationArgs::Marker => {}
                AnnotationArgs::Single { value, .. } => f(*value),
                AnnotationArgs::Pairs { pairs, .. } => pairs.iter().for_each(|pair| f(pair.value)),
            },
            NodeKind::Block(node) => node.stmts.iter().for_each(|id| f(*id)),
            NodeKind::Statement(node) => parts_children(&node.parts, f),
            NodeKind::Expression(node) => parts_children(&node.parts, f),
            NodeKind::Call(node) => {
                if let Some(scope) = node.scope {
                    f(scope);
                }
                f(node.args);
            }
            NodeKind::Group(node) => node.items.iter().for_each(|id| f(*id)),
        }
    }

    /// Like [`NodeKind::for_each_child`], but hands out the slots so that
    /// children can be swapped in place.
    pub fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut NodeId)) {
        match self {
            NodeKind::CompilationUnit(node) => node.items.iter_mut().for_each(f),
            NodeKind::Package(node) => node.annotations.iter_mut().for_each(f),
            NodeKind::Import(_) | NodeKind::Literal(_) => {}
            NodeKind::ClassDecl(node) => {
                parts_children_mut(&mut node.header, f);
                parts_children_mut(&mut node.rest, f);
                f(&mut node.body);
            }
            NodeKind::ClassBody(node) => node.members.iter_mut().for_each(f),
            NodeKind::MethodDecl(node) => {
                parts_children_mut(&mut node.header, f);
                f(&mut node.params);
                parts_children_mut(&mut node.tail, f);
                if let Some(body) = node.body.as_mut() {
                    f(body);
                }
            }
            NodeKind::Annotation(node) => match &mut node.args {
                AnnotationArgs::Marker => {}
                AnnotationArgs::Single { value, .. } => f(value),
                AnnotationArgs::Pairs { pairs, .. } => {
                    pairs.iter_mut().for_each(|pair| f(&mut pair.value))
                }
            },
            NodeKind::Block(node) => node.stmts.iter_mut().for_each(f),
            NodeKind::Statement(node) => parts_children_mut(&mut node.parts, f),
            NodeKind::Expression(node) => parts_children_mut(&mut node.parts, f),
            NodeKind::Call(node) => {
                if let Some(scope) = node.scope.as_mut() {
                    f(scope);
                }
                f(&mut node.args);
            }
            NodeKind::Group(node) => node.items.iter_mut().for_each(f),
        }
    }

    /// Calls `f` for every token owned directly by this node (not by its
    /// children).
    pub(crate) fn for_each_token_mut(&mut self, f: &mut dyn FnMut(&mut Tok)) {
        fn parts_tokens(parts: &mut [Part], f: &mut dyn FnMut(&mut Tok)) {
            for part in parts {
                if let Part::Token(tok) = part {
                    f(tok);
                }
            }
        }
        match self {
            NodeKind::CompilationUnit(node) => f(&mut node.eof),
            NodeKind::Package(node) => {
                f(&mut node.package_kw);
                node.name.iter_mut().for_each(&mut *f);
                f(&mut node.semi);
            }
            NodeKind::Import(node) => {
                f(&mut node.import_kw);
                if let Some(tok) = node.static_kw.as_mut() {
                    f(tok);
                }
                node.path.iter_mut().for_each(&mut *f);
                f(&mut node.semi);
            }
            NodeKind::ClassDecl(node) => {
                parts_tokens(&mut node.header, f);
                node.keyword.iter_mut().for_each(&mut *f);
                f(&mut node.name);
                parts_tokens(&mut node.rest, f);
            }
            NodeKind::ClassBody(node) => {
                f(&mut node.lbrace);
                f(&mut node.rbrace);
            }
            NodeKind::MethodDecl(node) => {
                parts_tokens(&mut node.header, f);
                f(&mut node.name);
                parts_tokens(&mut node.tail, f);
                if let Some(tok) = node.semi.as_mut() {
                    f(tok);
                }
            }
            NodeKind::Annotation(node) => {
                f(&mut node.at);
                node.name.iter_mut().for_each(&mut *f);
                match &mut node.args {
                    AnnotationArgs::Marker => {}
                    AnnotationArgs::Single { lparen, rparen, .. } => {
                        f(lparen);
                        f(rparen);
                    }
                    AnnotationArgs::Pairs {
                        lparen,
                        pairs,
                        commas,
                        rparen,
                    } => {
                        f(lparen);
                        for pair in pairs.iter_mut() {
                            f(&mut pair.name);
                            f(&mut pair.eq);
                        }
                        commas.iter_mut().for_each(&mut *f);
                        f(rparen);
                    }
                }
            }
            NodeKind::Block(node) => {
                f(&mut node.lbrace);
                f(&mut node.rbrace);
            }
            NodeKind::Statement(node) => {
                parts_tokens(&mut node.parts, f);
                if let Some(tok) = node.semi.as_mut() {
                    f(tok);
                }
            }
            NodeKind::Expression(node) => parts_tokens(&mut node.parts, f),
            NodeKind::Call(node) => {
                if let Some(tok) = node.dot.as_mut() {
                    f(tok);
                }
                f(&mut node.name);
            }
            NodeKind::Group(node) => {
                f(&mut node.open);
                node.commas.iter_mut().for_each(&mut *f);
                f(&mut node.close);
            }
            NodeKind::Literal(node) => f(&mut node.token),
        }
    }

    /// Removes `child` from a list-valued field. Returns false when the
    /// child sits in a fixed slot or is not present.
    pub(crate) fn remove_child(&mut self, child: NodeId) -> bool {
        fn remove_id(list: &mut Vec<NodeId>, child: NodeId) -> bool {
            let before = list.len();
            list.retain(|id| *id != child);
            list.len() != before
        }
        fn remove_part(list: &mut Vec<Part>, child: NodeId) -> bool {
            let before = list.len();
            list.retain(|part| part.as_node() != Some(child));
            list.len() != before
        }
        match self {
            NodeKind::CompilationUnit(node) => remove_id(&mut node.items, child),
            NodeKind::Package(node) => remove_id(&mut node.annotations, child),
            NodeKind::ClassDecl(node) => {
                remove_part(&mut node.header, child) || remove_part(&mut node.rest, child)
            }
            NodeKind::ClassBody(node) => remove_id(&mut node.members, child),
            NodeKind::MethodDecl(node) => {
                remove_part(&mut node.header, child) || remove_part(&mut node.tail, child)
            }
            NodeKind::Block(node) => remove_id(&mut node.stmts, child),
            NodeKind::Statement(node) => remove_part(&mut node.parts, child),
            NodeKind::Expression(node) => remove_part(&mut node.parts, child),
            NodeKind::Import(_)
            | NodeKind::Literal(_)
            | NodeKind::Annotation(_)
            | NodeKind::Call(_)
            | NodeKind::Group(_) => false,
        }
    }

    pub(crate) fn first_element(&self) -> Option<FirstElement> {
        match self {
            NodeKind::CompilationUnit(node) => Some(
                node.items
                    .first()
                    .map_or(FirstElement::Token, |id| FirstElement::Node(*id)),
            ),
            NodeKind::Package(node) => Some(
                node.annotations
                    .first()
                    .map_or(FirstElement::Token, |id| FirstElement::Node(*id)),
            ),
            NodeKind::ClassDecl(node) => {
                first_of_parts(&node.header).or(Some(FirstElement::Token))
            }
            NodeKind::MethodDecl(node) => {
                first_of_parts(&node.header).or(Some(FirstElement::Token))
            }
            NodeKind::Statement(node) => first_of_parts(&node.parts)
                .or_else(|| node.semi.as_ref().map(|_| FirstElement::Token)),
            NodeKind::Expression(node) => first_of_parts(&node.parts),
            NodeKind::Call(node) => Some(
                node.scope
                    .map_or(FirstElement::Token, FirstElement::Node),
            ),
            NodeKind::Import(_)
            | NodeKind::ClassBody(_)
            | NodeKind::Annotation(_)
            | NodeKind::Block(_)
            | NodeKind::Group(_)
            | NodeKind::Literal(_) => Some(FirstElement::Token),
        }
    }

    /// The first token of this node, if the node starts with a token rather
    /// than a child node.
    pub(crate) fn first_token_mut(&mut self) -> Option<&mut Tok> {
        match self {
            NodeKind::CompilationUnit(node) if node.items.is_empty() => Some(&mut node.eof),
            NodeKind::CompilationUnit(_) => None,
            NodeKind::Package(node) if node.annotations.is_empty() => Some(&mut node.package_kw),
            NodeKind::Package(_) => None,
            NodeKind::Import(node) => Some(&mut node.import_kw),
            NodeKind::ClassDecl(node) => {
                if node.header.is_empty() {
                    node.keyword.first_mut()
                } else {
                    first_tok_of_parts(&mut node.header)
                }
            }
            NodeKind::ClassBody(node) => Some(&mut node.lbrace),
            NodeKind::MethodDecl(node) => {
                if node.header.is_empty() {
                    Some(&mut node.name)
                } else {
                    first_tok_of_parts(&mut node.header)
                }
            }
            NodeKind::Annotation(node) => Some(&mut node.at),
            NodeKind::Block(node) => Some(&mut node.lbrace),
            NodeKind::Statement(node) => {
                if node.parts.is_empty() {
                    node.semi.as_mut()
                } else {
                    first_tok_of_parts(&mut node.parts)
                }
            }
            NodeKind::Expression(node) => first_tok_of_parts(&mut node.parts),
            NodeKind::Call(node) if node.scope.is_none() => Some(&mut node.name),
            NodeKind::Call(_) => None,
            NodeKind::Group(node) => Some(&mut node.open),
            NodeKind::Literal(node) => Some(&mut node.token),
        }
    }
}
