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

//! The PVL lexer.
//!
//! [`Lexer`] turns text into a lazy stream of [`Token`]s under the rules of
//! a [`Grammar`].  The stream is restartable: a caller that looks at a
//! token and decides not to consume it returns it with
//! [`Lexer::push_back`], and the next call hands it out again.  Tokens
//! after a top-level `END` statement are never produced unless asked for,
//! which is what lets labels with trailing binary data load safely.

use crate::error::LexError;
use crate::grammar::Grammar;
use crate::token::{SourcePos, Token, TokenKind};

/// Removes ISIS-style dash continuations: a `-` immediately followed by a
/// line break is dropped together with the break and all leading white
/// space of the following line.
pub fn strip_dash_continuations(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '-'
            && matches!(chars.get(i + 1), Some('\n') | Some('\r') | Some('\x0c'))
        {
            i += 2;
            while matches!(chars.get(i), Some(w) if w.is_whitespace()) {
                i += 1;
            }
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

/// A restartable token stream over PVL text.
pub struct Lexer<'a> {
    grammar: &'a Grammar,
    src: &'a str,
    chars: Vec<char>,
    i: usize,
    line: usize,
    column: usize,
    pushback: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, grammar: &'a Grammar) -> Self {
        Self {
            grammar,
            src,
            chars: src.chars().collect(),
            i: 0,
            line: 1,
            column: 1,
            pushback: Vec::new(),
        }
    }

    /// Returns a token to the stream; the next [`Lexer::next_token`] call
    /// yields it again.  Multiple tokens may be returned, last in first
    /// out.
    pub fn push_back(&mut self, token: Token) {
        self.pushback.push(token);
    }

    /// The next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if let Some(t) = self.pushback.pop() {
            return Ok(Some(t));
        }

        while let Some(c) = self.peek() {
            if !self.grammar.is_whitespace(c) {
                break;
            }
            self.advance(c);
        }

        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let start = self.pos();

        if c == '/' && self.peek_at(1) == Some('*') {
            return self.lex_block_comment(start).map(Some);
        }
        if c == '#' {
            if self.grammar.has_hash_comments() {
                return Ok(Some(self.lex_line_comment(start)));
            }
            return Err(LexError::new(
                start,
                "'#'",
                "a statement or value",
                self.src,
            ));
        }
        if c == '\u{FFFD}' {
            return Err(LexError::new(
                start,
                "an undecodable character",
                "a statement or value",
                self.src,
            ));
        }
        if self.grammar.is_quote(c) {
            return self.lex_quoted(start).map(Some);
        }
        if c == self.grammar.units_delimiters.0 {
            return Ok(Some(self.lex_units(start)));
        }
        if self.grammar.is_reserved(c) {
            // A sign that starts a number belongs to the number.
            if (c == '+' || c == '-') && self.starts_number_after_sign() {
                return self.lex_word(start).map(Some);
            }
            self.advance(c);
            return Ok(Some(Token::new(TokenKind::Punct, c, start)));
        }
        self.lex_word(start).map(Some)
    }

    fn pos(&self) -> SourcePos {
        SourcePos::new(self.line, self.column, self.i)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.i).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.i + ahead).copied()
    }

    /// Advances past *c*, which must be the character `peek()` just
    /// returned.
    fn advance(&mut self, c: char) {
        self.i += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Peeks and advances in one step.
    fn take(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.advance(c);
        Some(c)
    }

    fn starts_number_after_sign(&self) -> bool {
        matches!(self.peek_at(1), Some(d) if d.is_ascii_digit() || d == '.')
    }

    fn lex_block_comment(&mut self, start: SourcePos) -> Result<Token, LexError> {
        let mut text = String::from("/*");
        self.advance('/');
        self.advance('*');
        loop {
            match self.peek() {
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.advance('*');
                    self.advance('/');
                    text.push_str("*/");
                    return Ok(Token::new(TokenKind::Comment, text, start));
                }
                Some(c) => {
                    text.push(c);
                    self.advance(c);
                }
                None => {
                    return Err(LexError::new(
                        self.pos(),
                        "end of input",
                        "\"*/\" closing a comment",
                        self.src,
                    ))
                }
            }
        }
    }

    fn lex_line_comment(&mut self, start: SourcePos) -> Token {
        let mut text = String::new();
        while let Some(c) = self.take() {
            text.push(c);
            if c == '\n' {
                break;
            }
        }
        Token::new(TokenKind::Comment, text, start)
    }

    fn lex_quoted(&mut self, start: SourcePos) -> Result<Token, LexError> {
        let Some(quote) = self.take() else {
            return Err(LexError::new(start, "end of input", "a quote", self.src));
        };
        let mut text = String::new();
        text.push(quote);
        loop {
            match self.peek() {
                None => {
                    return Err(LexError::new(
                        self.pos(),
                        "end of input",
                        format!("a closing {}", quote),
                        self.src,
                    ))
                }
                Some('\\') if self.grammar.backslash_escape => {
                    text.push('\\');
                    self.advance('\\');
                    match self.take() {
                        Some(escaped) => text.push(escaped),
                        None => {
                            return Err(LexError::new(
                                self.pos(),
                                "end of input",
                                "an escaped character",
                                self.src,
                            ))
                        }
                    }
                }
                Some(c) if c == quote => {
                    text.push(c);
                    self.advance(c);
                    if self.grammar.doubled_quote_escape && self.peek() == Some(quote) {
                        text.push(quote);
                        self.advance(quote);
                        continue;
                    }
                    return Ok(Token::new(TokenKind::QuotedString, text, start));
                }
                Some(c) => {
                    text.push(c);
                    self.advance(c);
                }
            }
        }
    }

    /// A whole `<units>` expression is one token; everything up to the
    /// closing delimiter is preserved verbatim.
    fn lex_units(&mut self, start: SourcePos) -> Token {
        let close = self.grammar.units_delimiters.1;
        let mut text = String::new();
        while let Some(c) = self.take() {
            text.push(c);
            if c == close && text.len() > close.len_utf8() {
                break;
            }
        }
        Token::new(TokenKind::Units, text, start)
    }

    fn lex_word(&mut self, start: SourcePos) -> Result<Token, LexError> {
        let mut text = String::new();
        if let Some(sign @ ('+' | '-')) = self.peek() {
            text.push(sign);
            self.advance(sign);
        }
        loop {
            let Some(c) = self.peek() else { break };
            if self.grammar.is_whitespace(c) {
                break;
            }
            if c == '/' && self.peek_at(1) == Some('*') {
                break;
            }
            if c == '\u{FFFD}' {
                return Err(LexError::new(
                    self.pos(),
                    "an undecodable character",
                    "a word character",
                    self.src,
                ));
            }
            if c == '#' {
                if is_radix_prefix(&text) {
                    self.lex_based_tail(&mut text)?;
                }
                break;
            }
            if self.grammar.is_reserved(c) {
                // Signed exponents: the sign of "1E+10" stays in the word.
                if (c == '+' || c == '-')
                    && text.ends_with(['e', 'E'])
                    && matches!(self.peek_at(1), Some(d) if d.is_ascii_digit())
                {
                    text.push(c);
                    self.advance(c);
                    continue;
                }
                break;
            }
            text.push(c);
            self.advance(c);
        }
        Ok(Token::new(TokenKind::Word, text, start))
    }

    /// Consumes `#[sign]digits#` after a radix prefix, appending to *text*.
    fn lex_based_tail(&mut self, text: &mut String) -> Result<(), LexError> {
        text.push('#');
        self.advance('#');
        if let Some(sign @ ('+' | '-')) = self.peek() {
            text.push(sign);
            self.advance(sign);
        }
        let mut digit_count = 0;
        while let Some(d) = self.peek() {
            if !d.is_ascii_alphanumeric() {
                break;
            }
            text.push(d);
            self.advance(d);
            digit_count += 1;
        }
        if digit_count == 0 {
            return Err(LexError::new(
                self.pos(),
                match self.peek() {
                    Some(c) => format!("'{}'", c),
                    None => "end of input".to_string(),
                },
                "digits in a based integer",
                self.src,
            ));
        }
        match self.peek() {
            Some('#') => {
                text.push('#');
                self.advance('#');
                Ok(())
            }
            found => Err(LexError::new(
                self.pos(),
                match found {
                    Some(c) => format!("'{}'", c),
                    None => "end of input".to_string(),
                },
                "'#' closing a based integer",
                self.src,
            )),
        }
    }
}

/// `[sign]digits` — the part of a based-integer literal before the first
/// `#`.
fn is_radix_prefix(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tokens(src: &str, grammar: &Grammar) -> Vec<Token> {
        let mut lx = Lexer::new(src, grammar);
        let mut out = Vec::new();
        while let Some(t) = lx.next_token().unwrap() {
            out.push(t);
        }
        out
    }

    fn texts(src: &str, grammar: &Grammar) -> Vec<String> {
        all_tokens(src, grammar)
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    // ==================== Word and punct tests ====================

    #[test]
    fn test_simple_assignment() {
        let g = Grammar::pvl();
        assert_eq!(texts("foo = bar", &g), vec!["foo", "=", "bar"]);
    }

    #[test]
    fn test_no_spaces() {
        let g = Grammar::pvl();
        assert_eq!(texts("a=b", &g), vec!["a", "=", "b"]);
    }

    #[test]
    fn test_sequence_punctuation() {
        let g = Grammar::pvl();
        assert_eq!(
            texts("items = (1, 2, 3)", &g),
            vec!["items", "=", "(", "1", ",", "2", ",", "3", ")"]
        );
    }

    #[test]
    fn test_signed_numbers_stay_whole() {
        let g = Grammar::pvl();
        assert_eq!(texts("a = -79", &g), vec!["a", "=", "-79"]);
        assert_eq!(texts("a = +80", &g), vec!["a", "=", "+80"]);
        assert_eq!(texts("a = 1E+10", &g), vec!["a", "=", "1E+10"]);
        assert_eq!(texts("a = 1e-10", &g), vec!["a", "=", "1e-10"]);
    }

    #[test]
    fn test_bare_plus_is_punct_in_pvl() {
        let g = Grammar::pvl();
        let toks = all_tokens("a = +x", &g);
        assert_eq!(toks[2].kind, TokenKind::Punct);
        assert_eq!(toks[2].text, "+");
    }

    #[test]
    fn test_plus_in_word_for_isis() {
        let g = Grammar::isis();
        assert_eq!(texts("key = a+b", &g), vec!["key", "=", "a+b"]);
    }

    #[test]
    fn test_nul_splits_tokens_in_omni() {
        let g = Grammar::omni();
        let toks = all_tokens("a\0b", &g);
        assert_eq!(
            toks.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["a", "\0", "b"]
        );
    }

    // ==================== Position tests ====================

    #[test]
    fn test_positions() {
        let g = Grammar::pvl();
        let toks = all_tokens("ab = c\nde = f", &g);
        assert_eq!(toks[0].pos, SourcePos::new(1, 1, 0));
        assert_eq!(toks[1].pos, SourcePos::new(1, 4, 3));
        assert_eq!(toks[3].pos, SourcePos::new(2, 1, 7));
    }

    // ==================== Comment tests ====================

    #[test]
    fn test_block_comment() {
        let g = Grammar::pvl();
        let toks = all_tokens("/* a comment */ foo", &g);
        assert_eq!(toks[0].kind, TokenKind::Comment);
        assert_eq!(toks[0].text, "/* a comment */");
        assert_eq!(toks[1].text, "foo");
    }

    #[test]
    fn test_comment_splits_word() {
        let g = Grammar::omni();
        assert_eq!(
            texts("weird/* in the */=/*middle*/comments", &g),
            vec!["weird", "/* in the */", "=", "/*middle*/", "comments"]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let g = Grammar::pvl();
        let mut lx = Lexer::new("/* never ends", &g);
        let err = lx.next_token().unwrap_err();
        assert!(err.expected.contains("*/"));
    }

    #[test]
    fn test_hash_comment_isis() {
        let g = Grammar::isis();
        let toks = all_tokens("# note\nk = v # trailing\n", &g);
        assert_eq!(toks[0].kind, TokenKind::Comment);
        assert_eq!(toks[0].text, "# note\n");
        assert_eq!(toks[4].kind, TokenKind::Comment);
        assert_eq!(toks[4].text, "# trailing\n");
    }

    #[test]
    fn test_hash_rejected_in_strict_pvl() {
        let g = Grammar::pvl();
        let mut lx = Lexer::new("# comment\nK = V\nEND", &g);
        let err = lx.next_token().unwrap_err();
        assert_eq!(err.found, "'#'");
        assert_eq!(err.pos.line, 1);
    }

    // ==================== Quoted string tests ====================

    #[test]
    fn test_quoted_string() {
        let g = Grammar::pvl();
        let toks = all_tokens("a = \"hello world\"", &g);
        assert_eq!(toks[2].kind, TokenKind::QuotedString);
        assert_eq!(toks[2].text, "\"hello world\"");
    }

    #[test]
    fn test_quoted_string_multiline() {
        let g = Grammar::pvl();
        let toks = all_tokens("a = 'two\nlines'", &g);
        assert_eq!(toks[2].text, "'two\nlines'");
    }

    #[test]
    fn test_doubled_quote_escape() {
        let g = Grammar::pvl();
        let toks = all_tokens(r#"a = "say ""hi""""#, &g);
        assert_eq!(toks[2].text, r#""say ""hi""""#);
    }

    #[test]
    fn test_backslash_escape_odl() {
        let g = Grammar::odl();
        let toks = all_tokens(r#"a = "say \"hi\"""#, &g);
        assert_eq!(toks[2].text, r#""say \"hi\"""#);
    }

    #[test]
    fn test_unterminated_string() {
        let g = Grammar::pvl();
        let mut lx = Lexer::new("a = \"open", &g);
        lx.next_token().unwrap();
        lx.next_token().unwrap();
        assert!(lx.next_token().is_err());
    }

    // ==================== Units tests ====================

    #[test]
    fn test_units_single_token() {
        let g = Grammar::pvl();
        let toks = all_tokens("42 <m/s>", &g);
        assert_eq!(toks[1].kind, TokenKind::Units);
        assert_eq!(toks[1].text, "<m/s>");
    }

    #[test]
    fn test_units_with_spaces_and_newline() {
        let g = Grammar::pvl();
        let toks = all_tokens("5 < m\nfoo >", &g);
        assert_eq!(toks[1].text, "< m\nfoo >");
    }

    // ==================== Based integer tests ====================

    #[test]
    fn test_based_integer_whole_token() {
        let g = Grammar::pvl();
        assert_eq!(texts("2#0101#", &g), vec!["2#0101#"]);
        assert_eq!(texts("-16#9F#", &g), vec!["-16#9F#"]);
    }

    #[test]
    fn test_based_integer_sign_inside() {
        let g = Grammar::omni();
        assert_eq!(texts("16#-9F#", &g), vec!["16#-9F#"]);
        assert_eq!(texts("+2#+101#", &g), vec!["+2#+101#"]);
    }

    #[test]
    fn test_based_integer_empty_digits() {
        let g = Grammar::pvl();
        let mut lx = Lexer::new("empty = 2##", &g);
        lx.next_token().unwrap();
        lx.next_token().unwrap();
        let err = lx.next_token().unwrap_err();
        assert!(err.expected.contains("digits"));
    }

    #[test]
    fn test_hash_after_word_is_comment_in_isis() {
        let g = Grammar::isis();
        let toks = all_tokens("items# note\n", &g);
        assert_eq!(toks[0].text, "items");
        assert_eq!(toks[1].kind, TokenKind::Comment);
    }

    // ==================== Push-back tests ====================

    #[test]
    fn test_push_back_restores_order() {
        let g = Grammar::pvl();
        let mut lx = Lexer::new("a b c", &g);
        let a = lx.next_token().unwrap().unwrap();
        let b = lx.next_token().unwrap().unwrap();
        lx.push_back(b.clone());
        lx.push_back(a.clone());
        assert_eq!(lx.next_token().unwrap().unwrap(), a);
        assert_eq!(lx.next_token().unwrap().unwrap(), b);
        assert_eq!(lx.next_token().unwrap().unwrap().text, "c");
        assert!(lx.next_token().unwrap().is_none());
    }

    // ==================== Dash continuation tests ====================

    #[test]
    fn test_strip_dash_continuations() {
        assert_eq!(
            strip_dash_continuations("foo = /path/with-\n     continuation"),
            "foo = /path/withcontinuation"
        );
        assert_eq!(strip_dash_continuations("a - b"), "a - b");
        assert_eq!(strip_dash_continuations("no dashes"), "no dashes");
    }

    #[test]
    fn test_strip_dash_inside_quoted_text() {
        // The original strips continuations everywhere, quoted or not.
        assert_eq!(
            strip_dash_continuations("'/path/with-\n     more'"),
            "'/path/withmore'"
        );
    }

    // ==================== Replacement character tests ====================

    #[test]
    fn test_replacement_char_is_error() {
        let g = Grammar::omni();
        let mut lx = Lexer::new("k = \u{FFFD}\u{FFFD}", &g);
        lx.next_token().unwrap();
        lx.next_token().unwrap();
        assert!(lx.next_token().is_err());
    }
}
