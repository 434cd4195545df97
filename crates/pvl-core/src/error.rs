// PVL - Parameter Value Language toolkit
//
// Copyright (c) 2025 the PVL toolkit contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for reading PVL text.
//!
//! Every error carries a [`SourcePos`] so callers can point users at the
//! offending line and column.  Lex errors additionally carry a short
//! snippet of the surrounding text.

use thiserror::Error;

use crate::token::SourcePos;

/// A lexical error: an unexpected character in the input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unexpected {found} (expected {expected}): {pos} near \"{context}\"")]
pub struct LexError {
    pub pos: SourcePos,
    /// Description of what was found, e.g. `'#'` or `end of input`.
    pub found: String,
    /// Summary of what would have been acceptable.
    pub expected: String,
    /// A short slice of the source around the offending character.
    pub context: String,
}

impl LexError {
    pub fn new(
        pos: SourcePos,
        found: impl Into<String>,
        expected: impl Into<String>,
        source_text: &str,
    ) -> Self {
        Self {
            pos,
            found: found.into(),
            expected: expected.into(),
            context: context_snippet(source_text, pos.offset),
        }
    }
}

/// Builds a context string of whole words around *offset*; fragments are
/// hard to read.
fn context_snippet(text: &str, offset: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let lo = offset.saturating_sub(15);
    let hi = (offset + 15).min(chars.len());
    let window: String = chars[lo..hi].iter().collect();
    let words: Vec<&str> = window.split(' ').collect();
    if words.len() > 2 {
        words[1..words.len() - 1].join(" ")
    } else {
        window
    }
    .replace('\n', " ")
    .trim()
    .to_string()
}

/// A structural error: the token stream did not match a PVL production.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("expected {expected} but found {found}: {pos}")]
pub struct ParseError {
    pub pos: SourcePos,
    /// The production or token that was expected.
    pub expected: String,
    /// What was actually present.
    pub found: String,
}

impl ParseError {
    pub fn new(pos: SourcePos, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn end_of_input(pos: SourcePos, expected: impl Into<String>) -> Self {
        Self::new(pos, expected, "end of input")
    }
}

/// A token that could not be converted to a typed scalar value.
///
/// The raw token text is kept so callers can build their own messages.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot decode \"{token}\" as {target}: {pos}{}", detail_suffix(.detail))]
pub struct DecodeError {
    pub pos: SourcePos,
    /// The raw token text.
    pub token: String,
    /// The type the token failed to become.
    pub target: String,
    /// Optional explanation of the specific rule that failed.
    pub detail: Option<String>,
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" ({})", d),
        None => String::new(),
    }
}

impl DecodeError {
    pub fn new(pos: SourcePos, token: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            pos,
            token: token.into(),
            target: target.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// A units expression that an injected quantity factory rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("quantity error: {0}")]
pub struct QuantityError(pub String);

/// Any error raised while loading PVL text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

impl LoadError {
    /// The source position the error points at, when it has one.
    pub fn pos(&self) -> Option<SourcePos> {
        match self {
            Self::Lex(e) => Some(e.pos),
            Self::Parse(e) => Some(e.pos),
            Self::Decode(e) => Some(e.pos),
            Self::Quantity(_) => None,
        }
    }
}
