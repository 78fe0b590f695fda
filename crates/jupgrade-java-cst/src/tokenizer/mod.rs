// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for Java source code.
//!
//! Every token carries the trivia (whitespace and comments) that precedes it,
//! so concatenating `leading + string` over the token stream reproduces the
//! input exactly. The final [`TokType::EndMarker`] token holds whatever trivia
//! trails the last real token.

mod core;

pub use self::core::{is_keyword, is_modifier, TextPosition, TokError, TokState, TokType, Token};
