// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! PEG grammar over the token vector.
//!
//! The grammar models the parts of Java that rewriting needs (imports,
//! type and method declarations, annotations, blocks and method calls) and
//! keeps everything else as "soup": balanced runs of tokens, literals and
//! bracketed groups. Any balanced input that is laid out as a compilation
//! unit parses.

use peg::{Parse, ParseElem, RuleResult};

use crate::nodes::deflated::*;
use crate::nodes::ClassKind;
use crate::tokenizer::{is_keyword, is_modifier, TextPosition, TokType, Token};

#[derive(Debug)]
pub struct TokVec<'a>(Vec<Token<'a>>);

impl<'a> From<Vec<Token<'a>>> for TokVec<'a> {
    fn from(vec: Vec<Token<'a>>) -> Self {
        TokVec(vec)
    }
}

impl<'a> Parse for TokVec<'a> {
    type PositionRepr = TextPosition;

    fn start(&self) -> usize {
        0
    }

    fn is_eof(&self, pos: usize) -> bool {
        pos >= self.0.len()
    }

    fn position_repr(&self, pos: usize) -> Self::PositionRepr {
        match self.0.get(pos) {
            Some(tok) => tok.start_pos,
            None => self.0.last().map(|tok| tok.end_pos).unwrap_or_default(),
        }
    }
}

impl<'input, 'a: 'input> ParseElem<'input> for TokVec<'a> {
    type Element = TokenRef<'input, 'a>;

    fn parse_elem(&'input self, pos: usize) -> RuleResult<Self::Element> {
        match self.0.get(pos) {
            Some(tok) => RuleResult::Matched(pos + 1, tok),
            None => RuleResult::Failed,
        }
    }
}

fn is_op(tok: &Token, text: &str) -> bool {
    tok.kind == TokType::Op && tok.string == text
}

fn is_identifier(tok: &Token) -> bool {
    tok.kind == TokType::Name && !is_keyword(tok.string)
}

fn is_literal(tok: &Token) -> bool {
    matches!(
        tok.kind,
        TokType::Integer | TokType::Float | TokType::String | TokType::TextBlock | TokType::Char
    )
}

/// Tokens that may appear loose in a soup. Brackets, separators and `@`
/// are always consumed by a structured rule.
fn is_plain(tok: &Token) -> bool {
    match tok.kind {
        TokType::EndMarker => false,
        TokType::Op => !matches!(
            tok.string,
            "(" | ")" | "[" | "]" | "{" | "}" | ";" | "," | "@"
        ),
        _ => true,
    }
}

/// Tokens between the annotations of a method and its name: modifiers, type
/// parameters and the return type.
fn is_method_header_token(tok: &Token) -> bool {
    match tok.kind {
        TokType::Name => true,
        TokType::Op => matches!(
            tok.string,
            "<" | ">" | ">>" | ">>>" | "," | "." | "[" | "]" | "?" | "&"
        ),
        _ => false,
    }
}

/// Tokens of the type named after `new`.
fn is_creation_type_token(tok: &Token) -> bool {
    match tok.kind {
        TokType::Name => true,
        TokType::Op => matches!(tok.string, "<" | ">" | ">>" | ">>>" | "," | "." | "?" | "&"),
        _ => false,
    }
}

peg::parser! {
    pub grammar java<'a>() for TokVec<'a> {

        pub rule compilation_unit() -> DeflatedUnit<'input, 'a>
            = package:package_decl()? items:top_item()* eof:end_marker()
            { DeflatedUnit { package, items, eof } }

        // Compilation unit

        rule package_decl() -> DeflatedPackage<'input, 'a>
            = annotations:annotation()* package_kw:kw("package") name:qualified_name() semi:lit(";")
            { DeflatedPackage { annotations, package_kw, name, semi } }

        rule top_item() -> DeflatedItem<'input, 'a>
            = import:import_decl() { DeflatedItem::Import(import) }
            / class:class_decl() { DeflatedItem::Class(class) }
            / semi:lit(";") { DeflatedItem::Stray(semi) }

        rule import_decl() -> DeflatedImport<'input, 'a>
            = import_kw:kw("import") static_kw:kw("static")? first:ident()
              rest:(dot:lit(".") segment:(ident() / lit("*")) { [dot, segment] })* semi:lit(";")
            {
                let mut path = vec![first];
                path.extend(rest.into_iter().flatten());
                DeflatedImport { import_kw, static_kw, path, semi }
            }

        // Type declarations

        #[cache]
        rule class_decl() -> DeflatedClassDecl<'input, 'a>
            = header:class_header_part()* keyword:enum_keyword() name:ident()
              rest:class_rest_part()* body:enum_body()
            { DeflatedClassDecl { header, kind: ClassKind::Enum, keyword, name, rest, body } }
            / header:class_header_part()* keyword:class_keyword() name:ident()
              rest:class_rest_part()* body:class_body()
            {
                let (kind, keyword) = keyword;
                DeflatedClassDecl { header, kind, keyword, name, rest, body }
            }

        rule class_keyword() -> (ClassKind, Vec<TokenRef<'input, 'a>>)
            = t:kw("class") { (ClassKind::Class, vec![t]) }
            / t:kw("interface") { (ClassKind::Interface, vec![t]) }
            / t:kw("record") { (ClassKind::Record, vec![t]) }
            / at:lit("@") t:kw("interface") { (ClassKind::AnnotationType, vec![at, t]) }

        rule enum_keyword() -> Vec<TokenRef<'input, 'a>>
            = t:kw("enum") { vec![t] }

        rule class_header_part() -> DeflatedHeaderPart<'input, 'a>
            = a:annotation() { DeflatedHeaderPart::Annotation(a) }
            / t:modifier() { DeflatedHeaderPart::Token(t) }

        rule class_rest_part() -> DeflatedPart<'input, 'a>
            = a:annotation() { DeflatedPart::Annotation(a) }
            / g:group() { DeflatedPart::Group(g) }
            / c:lit(",") { DeflatedPart::Token(c) }
            / t:plain_token() { DeflatedPart::Token(t) }

        #[cache]
        rule class_body() -> DeflatedClassBody<'input, 'a>
            = lbrace:lit("{") members:member()* rbrace:lit("}")
            { DeflatedClassBody { lbrace, members, rbrace } }

        rule enum_body() -> DeflatedClassBody<'input, 'a>
            = lbrace:lit("{") constants:enum_constants()? members:member()* rbrace:lit("}")
            {
                let mut all = Vec::with_capacity(members.len() + 1);
                all.extend(constants.map(DeflatedMember::Statement));
                all.extend(members);
                DeflatedClassBody { lbrace, members: all, rbrace }
            }

        rule enum_constants() -> DeflatedStatement<'input, 'a>
            = parts:stmt_part()+ semi:lit(";")? { DeflatedStatement::soup(parts, semi) }
            / semi:lit(";") { DeflatedStatement::soup(vec![], Some(semi)) }

        rule member() -> DeflatedMember<'input, 'a>
            = semi:lit(";") { DeflatedMember::Statement(DeflatedStatement::soup(vec![], Some(semi))) }
            / c:class_decl() { DeflatedMember::Class(c) }
            / s:kw("static")? b:block()
            {
                let mut parts: Vec<_> = s.into_iter().map(DeflatedPart::Token).collect();
                parts.push(DeflatedPart::Block(b));
                DeflatedMember::Statement(DeflatedStatement::soup(parts, None))
            }
            / m:method_decl() { DeflatedMember::Method(m) }
            / parts:stmt_part()+ semi:lit(";")
            { DeflatedMember::Statement(DeflatedStatement::soup(parts, Some(semi))) }
            / parts:stmt_part()+
            { DeflatedMember::Statement(DeflatedStatement::soup(parts, None)) }

        // Methods and constructors

        #[cache]
        rule method_decl() -> DeflatedMethodDecl<'input, 'a>
            = header:method_header_part()* name:ident() params:paren_group()
              tail:method_tail_part()* end:method_end()
            {
                let (body, semi) = end;
                DeflatedMethodDecl { header, name, params, tail, body, semi }
            }

        rule method_header_part() -> DeflatedHeaderPart<'input, 'a>
            = a:annotation() { DeflatedHeaderPart::Annotation(a) }
            / !(ident() lit("(")) t:method_header_token() { DeflatedHeaderPart::Token(t) }

        rule method_header_token() -> TokenRef<'input, 'a>
            = [t] {? if is_method_header_token(t) { Ok(t) } else { Err("method header") } }

        rule method_tail_part() -> DeflatedPart<'input, 'a>
            = !lit("{") p:stmt_part() { p }

        rule method_end() -> (Option<DeflatedBlock<'input, 'a>>, Option<TokenRef<'input, 'a>>)
            = b:block() { (Some(b), None) }
            / s:lit(";") { (None, Some(s)) }

        // Annotations

        #[cache]
        rule annotation() -> DeflatedAnnotation<'input, 'a>
            = at:lit("@") !kw("interface") name:qualified_name() args:annotation_args()?
            {
                DeflatedAnnotation {
                    at,
                    name,
                    args: args.unwrap_or(DeflatedAnnotationArgs::Marker),
                }
            }

        rule annotation_args() -> DeflatedAnnotationArgs<'input, 'a>
            = lparen:lit("(") first:member_value_pair()
              rest:(c:lit(",") p:member_value_pair() { (c, p) })* rparen:lit(")")
            {
                let mut pairs = vec![first];
                let mut commas = Vec::new();
                for (comma, pair) in rest {
                    commas.push(comma);
                    pairs.push(pair);
                }
                DeflatedAnnotationArgs::Pairs { lparen, pairs, commas, rparen }
            }
            / lparen:lit("(") rparen:lit(")")
            { DeflatedAnnotationArgs::Pairs { lparen, pairs: vec![], commas: vec![], rparen } }
            / lparen:lit("(") value:soup_part()+ rparen:lit(")")
            { DeflatedAnnotationArgs::Single { lparen, value, rparen } }

        rule member_value_pair() -> DeflatedPair<'input, 'a>
            = name:ident() eq:lit("=") value:soup_part()+
            { DeflatedPair { name, eq, value } }

        rule qualified_name() -> Vec<TokenRef<'input, 'a>>
            = first:ident() rest:(dot:lit(".") n:ident() { [dot, n] })*
            {
                let mut name = vec![first];
                name.extend(rest.into_iter().flatten());
                name
            }

        // Statements

        #[cache]
        rule block() -> DeflatedBlock<'input, 'a>
            = lbrace:lit("{") stmts:statement()* rbrace:lit("}")
            { DeflatedBlock { lbrace, stmts, rbrace } }

        #[cache]
        rule statement() -> DeflatedStatement<'input, 'a>
            = b:block() { DeflatedStatement::Block(b) }
            / c:class_decl() { DeflatedStatement::Class(Box::new(c)) }
            / semi:lit(";") { DeflatedStatement::soup(vec![], Some(semi)) }
            / k:kw("if") cond:paren_group() then:statement()
              otherwise:(e:kw("else") s:statement() { (e, s) })?
            {
                let mut parts = vec![
                    DeflatedPart::Token(k),
                    DeflatedPart::Group(cond),
                    DeflatedPart::Statement(Box::new(then)),
                ];
                if let Some((e, s)) = otherwise {
                    parts.push(DeflatedPart::Token(e));
                    parts.push(DeflatedPart::Statement(Box::new(s)));
                }
                DeflatedStatement::soup(parts, None)
            }
            / k:(kw("while") / kw("for")) head:paren_group() body:statement()
            {
                DeflatedStatement::soup(vec![
                    DeflatedPart::Token(k),
                    DeflatedPart::Group(head),
                    DeflatedPart::Statement(Box::new(body)),
                ], None)
            }
            / k:kw("do") body:statement() w:kw("while") cond:paren_group() semi:lit(";")
            {
                DeflatedStatement::soup(vec![
                    DeflatedPart::Token(k),
                    DeflatedPart::Statement(Box::new(body)),
                    DeflatedPart::Token(w),
                    DeflatedPart::Group(cond),
                ], Some(semi))
            }
            / k:kw("try") resources:paren_group()? body:block() clauses:try_clause()*
            {
                let mut parts = vec![DeflatedPart::Token(k)];
                parts.extend(resources.map(DeflatedPart::Group));
                parts.push(DeflatedPart::Block(body));
                parts.extend(clauses.into_iter().flatten());
                DeflatedStatement::soup(parts, None)
            }
            / k:kw("switch") subject:paren_group() body:switch_block()
            {
                DeflatedStatement::soup(vec![
                    DeflatedPart::Token(k),
                    DeflatedPart::Group(subject),
                    DeflatedPart::Block(body),
                ], None)
            }
            / k:kw("synchronized") lock:paren_group() body:block()
            {
                DeflatedStatement::soup(vec![
                    DeflatedPart::Token(k),
                    DeflatedPart::Group(lock),
                    DeflatedPart::Block(body),
                ], None)
            }
            / label:ident() colon:lit(":") body:statement()
            {
                DeflatedStatement::soup(vec![
                    DeflatedPart::Token(label),
                    DeflatedPart::Token(colon),
                    DeflatedPart::Statement(Box::new(body)),
                ], None)
            }
            / parts:stmt_part()+ semi:lit(";") { DeflatedStatement::soup(parts, Some(semi)) }

        rule try_clause() -> Vec<DeflatedPart<'input, 'a>>
            = k:kw("catch") param:paren_group() body:block()
            { vec![DeflatedPart::Token(k), DeflatedPart::Group(param), DeflatedPart::Block(body)] }
            / k:kw("finally") body:block()
            { vec![DeflatedPart::Token(k), DeflatedPart::Block(body)] }

        rule switch_block() -> DeflatedBlock<'input, 'a>
            = lbrace:lit("{") stmts:switch_item()* rbrace:lit("}")
            { DeflatedBlock { lbrace, stmts, rbrace } }

        rule switch_item() -> DeflatedStatement<'input, 'a>
            = k:(kw("case") / kw("default")) parts:switch_label_part()* end:(lit(":") / lit("->"))
            {
                let mut all = vec![DeflatedPart::Token(k)];
                all.extend(parts);
                all.push(DeflatedPart::Token(end));
                DeflatedStatement::soup(all, None)
            }
            / statement()

        rule switch_label_part() -> DeflatedPart<'input, 'a>
            = !lit(":") !lit("->") p:stmt_part() { p }

        // Soup

        rule stmt_part() -> DeflatedPart<'input, 'a>
            = soup_part()
            / c:lit(",") { DeflatedPart::Token(c) }

        rule soup_part() -> DeflatedPart<'input, 'a>
            = a:annotation() { DeflatedPart::Annotation(a) }
            / c:creation() { DeflatedPart::Creation(Box::new(c)) }
            / c:call() { DeflatedPart::Call(c) }
            / l:literal() { DeflatedPart::Literal(l) }
            / g:group() { DeflatedPart::Group(g) }
            / b:brace() { b }
            / t:plain_token() { DeflatedPart::Token(t) }

        #[cache]
        rule creation() -> DeflatedCreation<'input, 'a>
            = new_kw:kw("new") ty:creation_type_token()+ args:paren_group() body:class_body()?
            { DeflatedCreation { new_kw, ty, args, body } }

        rule creation_type_token() -> TokenRef<'input, 'a>
            = [t] {? if is_creation_type_token(t) { Ok(t) } else { Err("type") } }

        rule call() -> DeflatedCall<'input, 'a>
            = name:ident() args:paren_group() { DeflatedCall { name, args } }

        #[cache]
        rule group() -> DeflatedGroup<'input, 'a>
            = paren_group()
            / open:lit("[") elems:group_elem()* close:lit("]")
            { DeflatedGroup::new(open, elems, close) }

        #[cache]
        rule paren_group() -> DeflatedGroup<'input, 'a>
            = open:lit("(") elems:group_elem()* close:lit(")")
            { DeflatedGroup::new(open, elems, close) }

        rule brace() -> DeflatedPart<'input, 'a>
            = b:block() { DeflatedPart::Block(b) }
            / open:lit("{") elems:group_elem()* close:lit("}")
            { DeflatedPart::Group(DeflatedGroup::new(open, elems, close)) }

        rule group_elem() -> GroupElem<'input, 'a>
            = c:lit(",") { GroupElem::Comma(c) }
            / s:lit(";") { GroupElem::Part(DeflatedPart::Token(s)) }
            / p:soup_part() { GroupElem::Part(p) }

        // Tokens

        rule literal() -> TokenRef<'input, 'a>
            = [t] {? if is_literal(t) { Ok(t) } else { Err("literal") } }

        rule plain_token() -> TokenRef<'input, 'a>
            = [t] {? if is_plain(t) { Ok(t) } else { Err("token") } }

        rule ident() -> TokenRef<'input, 'a>
            = [t] {? if is_identifier(t) { Ok(t) } else { Err("identifier") } }

        rule modifier() -> TokenRef<'input, 'a>
            = [t] {? if t.kind == TokType::Name && is_modifier(t.string) { Ok(t) } else { Err("modifier") } }

        rule kw(word: &'static str) -> TokenRef<'input, 'a>
            = [t] {? if t.kind == TokType::Name && t.string == word { Ok(t) } else { Err(word) } }

        rule lit(text: &'static str) -> TokenRef<'input, 'a>
            = [t] {? if is_op(t, text) { Ok(t) } else { Err(text) } }

        rule end_marker() -> TokenRef<'input, 'a>
            = [t] {? if t.kind == TokType::EndMarker { Ok(t) } else { Err("end of file") } }
    }
}
