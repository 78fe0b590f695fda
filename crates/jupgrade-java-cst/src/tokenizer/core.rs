// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use memchr::{memchr, memmem};
use thiserror::Error;

/// Java reserved words, plus the `true`, `false` and `null` literals.
///
/// Contextual keywords (`var`, `record`, `yield`, `sealed`, `permits`) are
/// ordinary identifiers as far as the tokenizer is concerned.
const KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
];

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "strictfp",
    "sealed",
    "transient",
    "volatile",
    "native",
    "synchronized",
];

/// Operators and separators, longest first so that prefix matching is greedy.
const OPERATORS: &[&str] = &[
    ">>>=", "<<=", ">>=", ">>>", "...", "->", "::", "++", "--", "&&", "||", "==", "!=", "<=",
    ">=", "+=", "-=", "*=", "/=", "&=", "|=", "^=", "%=", "<<", ">>", "(", ")", "{", "}", "[",
    "]", ";", ",", ".", "@", "=", ">", "<", "!", "~", "?", ":", "+", "-", "*", "/", "&", "|",
    "^", "%",
];

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

pub fn is_modifier(text: &str) -> bool {
    MODIFIERS.contains(&text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokType {
    /// Identifiers and keywords.
    Name,
    Integer,
    Float,
    String,
    TextBlock,
    Char,
    Op,
    EndMarker,
}

/// A position in the source text. `line` and `column` are 1-indexed,
/// `offset` is a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokType,
    pub string: &'a str,
    /// Whitespace and comments between the previous token and this one.
    pub leading: &'a str,
    pub start_pos: TextPosition,
    pub end_pos: TextPosition,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokError {
    #[error("unterminated block comment starting at {0}")]
    UnterminatedComment(TextPosition),
    #[error("unterminated string literal starting at {0}")]
    UnterminatedString(TextPosition),
    #[error("unterminated text block starting at {0}")]
    UnterminatedTextBlock(TextPosition),
    #[error("unterminated character literal starting at {0}")]
    UnterminatedChar(TextPosition),
    #[error("unexpected character {ch:?} at {pos}")]
    BadCharacter { ch: char, pos: TextPosition },
}

impl TokError {
    pub fn position(&self) -> TextPosition {
        match self {
            TokError::UnterminatedComment(pos)
            | TokError::UnterminatedString(pos)
            | TokError::UnterminatedTextBlock(pos)
            | TokError::UnterminatedChar(pos) => *pos,
            TokError::BadCharacter { pos, .. } => *pos,
        }
    }
}

/// Iterator state for tokenizing a source string.
pub struct TokState<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    done: bool,
}

impl<'a> TokState<'a> {
    pub fn new(text: &'a str) -> Self {
        TokState {
            text,
            pos: 0,
            line: 1,
            column: 1,
            done: false,
        }
    }

    fn text_position(&self) -> TextPosition {
        TextPosition {
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn advance(&mut self, len: usize) {
        let end = self.pos + len;
        for ch in self.text[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    fn skip_trivia(&mut self) -> Result<(), TokError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                let end = memchr(b'\n', rest.as_bytes()).unwrap_or(rest.len());
                self.advance(end);
            } else if rest.starts_with("/*") {
                match memmem::find(&rest.as_bytes()[2..], b"*/") {
                    Some(index) => self.advance(index + 4),
                    None => return Err(TokError::UnterminatedComment(self.text_position())),
                }
            } else {
                match rest.chars().next() {
                    Some(ch) if ch.is_whitespace() || ch == '\u{feff}' => {
                        self.advance(ch.len_utf8())
                    }
                    _ => return Ok(()),
                }
            }
        }
    }

    fn next_token(&mut self) -> Result<Token<'a>, TokError> {
        let trivia_start = self.pos;
        self.skip_trivia()?;
        let leading = &self.text[trivia_start..self.pos];
        let start_pos = self.text_position();
        let rest = self.rest();

        let Some(ch) = rest.chars().next() else {
            self.done = true;
            return Ok(Token {
                kind: TokType::EndMarker,
                string: "",
                leading,
                start_pos,
                end_pos: start_pos,
            });
        };

        let (kind, len) = if is_identifier_start(ch) {
            (TokType::Name, identifier_len(rest))
        } else if ch.is_ascii_digit() || (ch == '.' && starts_with_digit(&rest[1..])) {
            number_len(rest)
        } else if rest.starts_with("\"\"\"") {
            let len = text_block_len(rest)
                .ok_or(TokError::UnterminatedTextBlock(start_pos))?;
            (TokType::TextBlock, len)
        } else if ch == '"' {
            let len = quoted_len(rest, '"').ok_or(TokError::UnterminatedString(start_pos))?;
            (TokType::String, len)
        } else if ch == '\'' {
            let len = quoted_len(rest, '\'').ok_or(TokError::UnterminatedChar(start_pos))?;
            (TokType::Char, len)
        } else if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            (TokType::Op, op.len())
        } else {
            return Err(TokError::BadCharacter { ch, pos: start_pos });
        };

        let string = &rest[..len];
        self.advance(len);
        Ok(Token {
            kind,
            string,
            leading,
            start_pos,
            end_pos: self.text_position(),
        })
    }
}

impl<'a> Iterator for TokState<'a> {
    type Item = Result<Token<'a>, TokError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn identifier_len(text: &str) -> usize {
    text.char_indices()
        .find(|(_, ch)| !is_identifier_part(*ch))
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

fn starts_with_digit(text: &str) -> bool {
    text.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

fn skip_while(bytes: &[u8], mut index: usize, pred: impl Fn(u8) -> bool) -> usize {
    while index < bytes.len() && pred(bytes[index]) {
        index += 1;
    }
    index
}

fn number_len(text: &str) -> (TokType, usize) {
    let bytes = text.as_bytes();
    let mut float = false;
    let mut index;

    let radix_prefix = bytes.len() > 1 && bytes[0] == b'0';
    if radix_prefix && matches!(bytes[1], b'x' | b'X') {
        index = skip_while(bytes, 2, |b| b.is_ascii_hexdigit() || b == b'_');
    } else if radix_prefix && matches!(bytes[1], b'b' | b'B') {
        index = skip_while(bytes, 2, |b| matches!(b, b'0' | b'1' | b'_'));
    } else {
        index = skip_while(bytes, 0, |b| b.is_ascii_digit() || b == b'_');
        if index < bytes.len() && bytes[index] == b'.' {
            let after = bytes.get(index + 1).copied();
            let fraction = after.is_some_and(|b| b.is_ascii_digit());
            let bare_dot = after.is_none_or(|b| {
                (b != b'.' && !is_identifier_start(b as char))
                    || matches!(b, b'e' | b'E' | b'f' | b'F' | b'd' | b'D')
            });
            if fraction || bare_dot {
                float = true;
                index = skip_while(bytes, index + 1, |b| b.is_ascii_digit() || b == b'_');
            }
        }
        if index < bytes.len() && matches!(bytes[index], b'e' | b'E') {
            let mut exp = index + 1;
            if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
                exp += 1;
            }
            if exp < bytes.len() && bytes[exp].is_ascii_digit() {
                float = true;
                index = skip_while(bytes, exp, |b| b.is_ascii_digit() || b == b'_');
            }
        }
    }

    if index < bytes.len() {
        match bytes[index] {
            b'l' | b'L' => index += 1,
            b'f' | b'F' | b'd' | b'D' => {
                float = true;
                index += 1;
            }
            _ => {}
        }
    }

    let kind = if float {
        TokType::Float
    } else {
        TokType::Integer
    };
    (kind, index)
}

/// Length of a single-line quoted literal including both quotes, or `None`
/// when the literal runs into a newline or the end of input.
fn quoted_len(text: &str, quote: char) -> Option<usize> {
    let mut chars = text.char_indices().skip(1);
    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '\n' => return None,
            c if c == quote => return Some(index + ch.len_utf8()),
            _ => {}
        }
    }
    None
}

fn text_block_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut index = 3;
    while index < bytes.len() {
        if bytes[index] == b'\\' {
            index += 2;
        } else if bytes[index..].starts_with(b"\"\"\"") {
            return Some(index + 3);
        } else {
            index += 1;
        }
    }
    None
}
