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

//! Tokens and source positions.

use std::fmt;

use crate::decoder;
use crate::grammar::Grammar;

/// A position in PVL text.
///
/// Lines and columns are 1-based; `offset` is the 0-based character
/// offset from the start of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl SourcePos {
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The position of the first character of a text.
    pub const fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {} column {} (char {})",
            self.line, self.column, self.offset
        )
    }
}

/// The lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An unquoted run of characters: identifier, keyword, number, or date.
    Word,
    /// A quoted string, including its quote characters.
    QuotedString,
    /// A comment, including its delimiters.
    Comment,
    /// A whole units expression, including the `<` and `>` delimiters.
    Units,
    /// A single reserved character such as `=`, `(`, or `;`.
    Punct,
}

/// One token of PVL text: its class, its literal text, and where it began.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: SourcePos,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: SourcePos) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    /// White space or comment.  The lexer never emits bare white space, so
    /// only comments qualify.
    pub fn is_wsc(&self) -> bool {
        self.is_comment()
    }

    /// True if this token is the single punctuation character *c*.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.chars().eq(std::iter::once(c))
    }

    /// The statement-end delimiter of *grammar* (`;` in every dialect).
    pub fn is_delimiter(&self, grammar: &Grammar) -> bool {
        self.is_punct(grammar.delimiter)
    }

    pub fn is_begin_aggregation(&self, grammar: &Grammar) -> bool {
        self.kind == TokenKind::Word && grammar.is_begin_aggregation(&self.text)
    }

    pub fn is_aggregation_end(&self, grammar: &Grammar) -> bool {
        self.kind == TokenKind::Word && grammar.is_aggregation_end(&self.text)
    }

    pub fn is_end_statement(&self, grammar: &Grammar) -> bool {
        self.kind == TokenKind::Word && grammar.is_end_statement(&self.text)
    }

    /// An unquoted string: a word with no reserved or white-space
    /// characters and no comment delimiters, that is not a number or a
    /// date/time.
    pub fn is_unquoted_string(&self, grammar: &Grammar) -> bool {
        if self.kind != TokenKind::Word {
            return false;
        }
        if self
            .text
            .chars()
            .any(|c| grammar.is_reserved(c) || grammar.is_whitespace(c))
        {
            return false;
        }
        for (open, close) in grammar.comments {
            if self.text.contains(open) || self.text.contains(close) {
                return false;
            }
        }
        !decoder::looks_numeric(&self.text, grammar)
            && !decoder::looks_datetime(&self.text, grammar)
    }

    /// An unquoted string that is not a reserved keyword: usable as a
    /// parameter name or block name.
    pub fn is_parameter_name(&self, grammar: &Grammar) -> bool {
        !grammar.is_reserved_keyword(&self.text) && self.is_unquoted_string(grammar)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
