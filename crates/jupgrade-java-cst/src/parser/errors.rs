// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use peg::Parse;
use thiserror::Error;

use crate::parser::grammar::TokVec;
use crate::tokenizer::{TextPosition, TokError};

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParserError<'a> {
    #[error("tokenizer error: {0}")]
    TokenizerError(TokError, &'a str),
    #[error("parser error: {0}")]
    ParserError(
        peg::error::ParseError<<TokVec<'a> as Parse>::PositionRepr>,
        &'a str,
    ),
}

impl ParserError<'_> {
    /// Where in the source the error was detected.
    pub fn position(&self) -> TextPosition {
        match self {
            ParserError::TokenizerError(err, _) => err.position(),
            ParserError::ParserError(err, _) => err.location,
        }
    }
}
