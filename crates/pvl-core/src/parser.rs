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

//! The PVL parser.
//!
//! A [`Parser`] consumes the token stream and builds a [`Label`],
//! enforcing the structural rules of its dialect:
//!
//! ```text
//! module       := statement* end_stmt?
//! statement    := assignment | aggregation_block
//! assignment   := name '=' value terminator?
//! aggregation  := BEGIN_KW '=' name statement* END_KW ('=' name)?
//! value        := scalar | sequence | set | quantity
//! ```
//!
//! Under the permissive dialects (Omni, ISIS) an assignment whose value is
//! missing yields [`Value::EmptyAtLine`] instead of an error, and dash
//! continuations are stripped before lexing.  After the top-level `END`
//! statement no further token is requested, so labels followed by raw
//! binary data parse cleanly.

use std::borrow::Cow;

use crate::decoder::Decoder;
use crate::error::{LoadError, ParseError};
use crate::grammar::{Dialect, Grammar};
use crate::label::Label;
use crate::lexer::{strip_dash_continuations, Lexer};
use crate::token::{Token, TokenKind};
use crate::value::Value;

const DEFAULT_MAX_DEPTH: usize = 100;

/// Parses PVL text into a [`Label`] under one dialect's rules.
pub struct Parser {
    decoder: Decoder,
    permissive: bool,
    max_depth: usize,
}

impl Parser {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_decoder(Decoder::for_dialect(dialect))
    }

    /// Builds a parser around an existing decoder (which may carry
    /// quantity and real factories).
    pub fn with_decoder(decoder: Decoder) -> Self {
        let permissive = decoder.grammar().dialect.is_permissive();
        Self {
            decoder,
            permissive,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Overrides the dialect's default recovery behavior.
    pub fn permissive(mut self, permissive: bool) -> Self {
        self.permissive = permissive;
        self
    }

    /// Bounds block and collection nesting.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn grammar(&self) -> &Grammar {
        self.decoder.grammar()
    }

    /// Parses *text* into a label tree.
    pub fn parse(&self, text: &str) -> Result<Label, LoadError> {
        let doc: Cow<str> = if self.grammar().continuation_lines {
            Cow::Owned(strip_dash_continuations(text))
        } else {
            Cow::Borrowed(text)
        };
        let mut lexer = Lexer::new(&doc, self.grammar());
        self.parse_module(&mut lexer)
    }

    fn parse_module(&self, lx: &mut Lexer) -> Result<Label, LoadError> {
        let g = self.grammar();
        let mut label = Label::new();
        loop {
            self.skip_wsc(lx)?;
            let Some(t) = lx.next_token()? else {
                return Ok(label);
            };
            if t.is_end_statement(g) {
                // Anything after END may be binary image data; do not ask
                // the lexer for another token.
                return Ok(label);
            }
            let (key, value) = if t.is_begin_aggregation(g) {
                self.parse_aggregation_block(t, lx, 0)?
            } else {
                self.parse_assignment(t, lx)?
            };
            label.append(key, value);
        }
    }

    fn parse_aggregation_block(
        &self,
        begin: Token,
        lx: &mut Lexer,
        depth: usize,
    ) -> Result<(String, Value), LoadError> {
        let g = self.grammar();
        if depth >= self.max_depth {
            return Err(ParseError::new(
                begin.pos,
                format!("nesting no deeper than {} blocks", self.max_depth),
                "a deeper aggregation block",
            )
            .into());
        }
        let end_kw = g.aggregation_end_for(&begin.text).ok_or_else(|| {
            ParseError::new(begin.pos, "a begin aggregation keyword", format!("\"{}\"", begin.text))
        })?;

        self.expect_equals(lx, &begin)?;
        self.skip_wsc(lx)?;
        let name_tok = lx
            .next_token()?
            .ok_or_else(|| ParseError::end_of_input(begin.pos, "a block name"))?;
        if !name_tok.is_parameter_name(g) {
            return Err(ParseError::new(
                name_tok.pos,
                format!("a block name after \"{} =\"", begin.text),
                format!("\"{}\"", name_tok.text),
            )
            .into());
        }
        let name = name_tok.text;
        self.parse_statement_delimiter(lx)?;

        let mut body = Label::new();
        loop {
            self.skip_wsc(lx)?;
            let Some(t) = lx.next_token()? else {
                return Err(ParseError::end_of_input(
                    begin.pos,
                    format!("\"{}\" closing the \"{}\" block", end_kw, name),
                )
                .into());
            };
            if t.kind == TokenKind::Word && t.text.eq_ignore_ascii_case(end_kw) {
                self.parse_end_aggregation(lx, &name, &t)?;
                break;
            }
            if t.is_end_statement(g) || t.is_aggregation_end(g) {
                // A mismatched end keyword must fail, not silently unwind.
                return Err(ParseError::new(
                    t.pos,
                    format!("\"{}\" matching \"{} = {}\"", end_kw, begin.text, name),
                    format!("\"{}\"", t.text),
                )
                .into());
            }
            let (key, value) = if t.is_begin_aggregation(g) {
                self.parse_aggregation_block(t, lx, depth + 1)?
            } else {
                self.parse_assignment(t, lx)?
            };
            body.append(key, value);
        }

        let value = if g.is_begin_group(&begin.text) {
            Value::Group(body)
        } else {
            Value::Object(body)
        };
        Ok((name, value))
    }

    /// The optional `= name` tail of an end aggregation statement.  When a
    /// name is present it must match the begin statement's name.
    fn parse_end_aggregation(
        &self,
        lx: &mut Lexer,
        name: &str,
        end_tok: &Token,
    ) -> Result<(), LoadError> {
        self.skip_wsc(lx)?;
        match lx.next_token()? {
            Some(eq) if eq.is_punct('=') => {
                self.skip_wsc(lx)?;
                let name_tok = lx
                    .next_token()?
                    .ok_or_else(|| ParseError::end_of_input(eq.pos, "a block name"))?;
                if name_tok.text != name {
                    return Err(ParseError::new(
                        name_tok.pos,
                        format!("the block name \"{}\" after \"{} =\"", name, end_tok.text),
                        format!("\"{}\"", name_tok.text),
                    )
                    .into());
                }
                self.parse_statement_delimiter(lx)?;
            }
            Some(other) => {
                lx.push_back(other);
                self.parse_statement_delimiter(lx)?;
            }
            None => {}
        }
        Ok(())
    }

    fn parse_assignment(
        &self,
        first: Token,
        lx: &mut Lexer,
    ) -> Result<(String, Value), LoadError> {
        let g = self.grammar();
        if !first.is_parameter_name(g) {
            return Err(ParseError::new(
                first.pos,
                "a parameter name",
                format!("\"{}\"", first.text),
            )
            .into());
        }
        let eq = self.expect_equals(lx, &first)?;
        self.skip_wsc(lx)?;
        let value = self.parse_assignment_value(lx, &eq)?;
        self.parse_statement_delimiter(lx)?;
        Ok((first.text, value))
    }

    /// The right-hand side of an assignment, or an empty-value sentinel
    /// when the dialect permits a missing one.
    fn parse_assignment_value(&self, lx: &mut Lexer, eq: &Token) -> Result<Value, LoadError> {
        let g = self.grammar();
        let Some(t1) = lx.next_token()? else {
            return if self.permissive {
                Ok(Value::EmptyAtLine(eq.pos.line))
            } else {
                Err(ParseError::end_of_input(eq.pos, "a value").into())
            };
        };

        let at_an_end = t1.is_end_statement(g)
            || t1.is_aggregation_end(g)
            || t1.is_delimiter(g)
            || (self.permissive && t1.is_begin_aggregation(g));
        if at_an_end {
            lx.push_back(t1.clone());
            return if self.permissive {
                Ok(Value::EmptyAtLine(eq.pos.line))
            } else {
                Err(ParseError::new(eq.pos, "a value", format!("\"{}\"", t1.text)).into())
            };
        }

        // A parameter name directly followed by `=` means the previous
        // assignment had no value; hand both tokens back.
        if self.permissive && t1.kind == TokenKind::Word && t1.is_parameter_name(g) {
            self.skip_wsc(lx)?;
            match lx.next_token()? {
                Some(t2) if t2.is_punct('=') => {
                    lx.push_back(t2);
                    lx.push_back(t1);
                    return Ok(Value::EmptyAtLine(eq.pos.line));
                }
                Some(t2) => lx.push_back(t2),
                None => {}
            }
        }

        lx.push_back(t1);
        self.parse_value(lx, 0)
    }

    /// A scalar, sequence, or set, with an optional trailing units
    /// expression.
    fn parse_value(&self, lx: &mut Lexer, depth: usize) -> Result<Value, LoadError> {
        let g = self.grammar();
        if depth >= self.max_depth {
            return Err(ParseError::new(
                Default::default(),
                format!("nesting no deeper than {} collections", self.max_depth),
                "a deeper collection",
            )
            .into());
        }
        let Some(t) = lx.next_token()? else {
            return Err(ParseError::end_of_input(Default::default(), "a value").into());
        };

        let value = if t.is_punct(g.sequence_delimiters.0) {
            Value::Sequence(self.parse_items(lx, g.sequence_delimiters, depth + 1, &t)?)
        } else if t.is_punct(g.set_delimiters.0) {
            Value::Set(self.parse_items(lx, g.set_delimiters, depth + 1, &t)?)
        } else if matches!(t.kind, TokenKind::Word | TokenKind::QuotedString) {
            self.decoder.decode_simple_value(&t)?
        } else {
            return Err(ParseError::new(
                t.pos,
                "a simple value, sequence, or set",
                format!("\"{}\"", t.text),
            )
            .into());
        };

        self.skip_wsc(lx)?;
        match lx.next_token()? {
            Some(u) if u.kind == TokenKind::Units => self.attach_units(value, &u),
            Some(other) => {
                lx.push_back(other);
                Ok(value)
            }
            None => Ok(value),
        }
    }

    fn attach_units(&self, value: Value, units_tok: &Token) -> Result<Value, LoadError> {
        let g = self.grammar();
        let (open, close) = g.units_delimiters;
        let text = &units_tok.text;
        if !text.ends_with(close) || text.len() < 2 {
            return Err(ParseError::new(
                units_tok.pos,
                format!("\"{}\" ending a units expression", close),
                "end of input",
            )
            .into());
        }
        let inner = text[open.len_utf8()..text.len() - close.len_utf8()]
            .trim_matches(|c| g.is_whitespace(c));
        if inner.contains(open) || inner.contains(close) {
            return Err(ParseError::new(
                units_tok.pos,
                "units characters",
                format!("a units delimiter inside \"{}\"", inner),
            )
            .into());
        }
        if matches!(g.dialect, Dialect::Odl | Dialect::Pds3)
            && !matches!(value, Value::Integer(_) | Value::Based(_) | Value::Real(_))
        {
            return Err(ParseError::new(
                units_tok.pos,
                "a units expression following a numeric value",
                format!("one following {}", value),
            )
            .into());
        }
        Ok(self.decoder.decode_quantity(value, inner)?)
    }

    fn parse_items(
        &self,
        lx: &mut Lexer,
        (_, close): (char, char),
        depth: usize,
        open_tok: &Token,
    ) -> Result<Vec<Value>, LoadError> {
        let mut items = Vec::new();
        self.skip_wsc(lx)?;
        match lx.next_token()? {
            None => {
                return Err(
                    ParseError::end_of_input(open_tok.pos, format!("\"{}\"", close)).into()
                )
            }
            Some(t) if t.is_punct(close) => return Ok(items),
            Some(t) => lx.push_back(t),
        }
        loop {
            items.push(self.parse_value(lx, depth)?);
            self.skip_wsc(lx)?;
            match lx.next_token()? {
                None => {
                    return Err(
                        ParseError::end_of_input(open_tok.pos, format!("\"{}\"", close)).into()
                    )
                }
                Some(t) if t.is_punct(close) => return Ok(items),
                Some(t) if t.is_punct(',') => self.skip_wsc(lx)?,
                Some(t) => {
                    return Err(ParseError::new(
                        t.pos,
                        format!("\",\" or \"{}\"", close),
                        format!("\"{}\"", t.text),
                    )
                    .into())
                }
            }
        }
    }

    /// `<WSC>* '=' <WSC-before-value handled by callers>`
    fn expect_equals(&self, lx: &mut Lexer, context: &Token) -> Result<Token, LoadError> {
        self.skip_wsc(lx)?;
        match lx.next_token()? {
            Some(t) if t.is_punct('=') => Ok(t),
            Some(t) => {
                let err = ParseError::new(t.pos, "\"=\"", format!("\"{}\"", t.text));
                lx.push_back(t);
                Err(err.into())
            }
            None => Err(ParseError::end_of_input(context.pos, "\"=\"").into()),
        }
    }

    /// Consumes comments; the next real token stays in the stream.
    fn skip_wsc(&self, lx: &mut Lexer) -> Result<(), LoadError> {
        loop {
            match lx.next_token()? {
                Some(t) if t.is_wsc() => continue,
                Some(t) => {
                    lx.push_back(t);
                    return Ok(());
                }
                None => return Ok(()),
            }
        }
    }

    /// `<WSC>* [';']`
    fn parse_statement_delimiter(&self, lx: &mut Lexer) -> Result<(), LoadError> {
        self.skip_wsc(lx)?;
        match lx.next_token()? {
            Some(t) if t.is_delimiter(self.grammar()) => Ok(()),
            Some(t) => {
                lx.push_back(t);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Quantity;

    fn parse(dialect: Dialect, text: &str) -> Result<Label, LoadError> {
        Parser::new(dialect).parse(text)
    }

    fn omni(text: &str) -> Label {
        parse(Dialect::Omni, text).unwrap()
    }

    // ==================== Module tests ====================

    #[test]
    fn test_simple_module() {
        let l = omni("foo = bar\nitems = (1, 2, 3)\nEND\n");
        assert_eq!(l.len(), 2);
        assert_eq!(l.get("foo"), Some(&Value::Symbol("bar".into())));
        assert_eq!(
            l.get("items"),
            Some(&Value::Sequence(vec![1i64.into(), 2i64.into(), 3i64.into()]))
        );
    }

    #[test]
    fn test_module_without_end() {
        let l = omni("a = b c = d");
        assert_eq!(l.len(), 2);
        assert_eq!(l.get("c"), Some(&Value::Symbol("d".into())));
    }

    #[test]
    fn test_statement_delimiters() {
        let l = parse(Dialect::Pvl, "a = b; c = d; END;").unwrap();
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn test_duplicate_keys_preserved() {
        let l = omni("k = 1\nk = 2\nEND");
        let all: Vec<_> = l.get_all("k").collect();
        assert_eq!(all, vec![&Value::Integer(1), &Value::Integer(2)]);
    }

    #[test]
    fn test_stops_at_end_statement() {
        // Anything after END must never be lexed, even if it is garbage.
        let l = omni("a = 1\nEND\n\u{FFFD}\u{FFFD}\u{FFFD} {{{ ===");
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn test_bare_word_is_error() {
        let err = parse(Dialect::Omni, "blob").unwrap_err();
        match err {
            LoadError::Parse(e) => assert!(e.expected.contains("=")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_reserved_keyword_not_a_name() {
        assert!(parse(Dialect::Pvl, "END_GROUP = foo").is_err());
    }

    // ==================== Aggregation tests ====================

    #[test]
    fn test_group_block() {
        let l = omni("GROUP = name bob = uncle END_GROUP END");
        match l.get("name") {
            Some(Value::Group(body)) => {
                assert_eq!(body.get("bob"), Some(&Value::Symbol("uncle".into())))
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_blocks() {
        let l = omni("GROUP = g OBJECT = o name = bob END_OBJECT END_GROUP END");
        let g = l.get("g").unwrap().as_label().unwrap();
        let o = g.get("o").unwrap().as_label().unwrap();
        assert_eq!(o.get("name"), Some(&Value::Symbol("bob".into())));
        assert!(matches!(g.get("o"), Some(Value::Object(_))));
    }

    #[test]
    fn test_block_with_named_end() {
        let l = omni("GROUP = name bob = uncle END_GROUP = name next = token END");
        assert!(l.contains_key("name"));
        assert_eq!(l.get("next"), Some(&Value::Symbol("token".into())));
    }

    #[test]
    fn test_block_end_name_mismatch() {
        let err = parse(Dialect::Omni, "BEGIN_OBJECT = foo END_OBJECT = bar").unwrap_err();
        match err {
            LoadError::Parse(e) => assert!(e.expected.contains("foo")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_block_end_kind_mismatch() {
        let err = parse(Dialect::Omni, "GROUP = name bob = uncle END_OBJECT").unwrap_err();
        match err {
            LoadError::Parse(e) => assert!(e.expected.contains("END_GROUP")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_block() {
        assert!(parse(Dialect::Omni, "GROUP = g a = 1").is_err());
        assert!(parse(Dialect::Omni, "GROUP = g a = 1 END").is_err());
    }

    #[test]
    fn test_begin_aggregation_comments_around_equals() {
        let l = omni("BEGIN_GROUP /*c1*/ = /*c2*/ name /*c3*/ x = 1 END_GROUP END");
        assert!(matches!(l.get("name"), Some(Value::Group(_))));
    }

    #[test]
    fn test_block_name_must_be_name() {
        assert!(parse(Dialect::Omni, "GROUP = 5 END_GROUP").is_err());
        assert!(parse(Dialect::Omni, "GROUP equals name").is_err());
    }

    #[test]
    fn test_isis_rejects_begin_object_form() {
        assert!(parse(Dialect::Isis, "BEGIN_OBJECT = foo END_OBJECT END").is_err());
        assert!(parse(Dialect::Isis, "Object = foo End_Object END").is_ok());
    }

    // ==================== Value tests ====================

    #[test]
    fn test_scalar_values() {
        let l = omni(concat!(
            "int = -79\n",
            "real = 1.5\n",
            "truth = TRUE\n",
            "nothing = NULL\n",
            "date = 2001-01-01\n",
            "based = 2#0101#\n",
            "quoted = \"Quoted\"\n",
            "END"
        ));
        assert_eq!(l.get("int"), Some(&Value::Integer(-79)));
        assert_eq!(l.get("real"), Some(&Value::Real(1.5)));
        assert_eq!(l.get("truth"), Some(&Value::Boolean(true)));
        assert_eq!(l.get("nothing"), Some(&Value::Null));
        assert!(matches!(l.get("date"), Some(Value::Date(_))));
        assert_eq!(l.get("based").unwrap().as_int(), Some(5));
        assert_eq!(l.get("quoted"), Some(&Value::String("Quoted".into())));
    }

    #[test]
    fn test_nested_sequence() {
        let l = omni("seq = ( a, (x, y), c )\nEND");
        match l.get("seq") {
            Some(Value::Sequence(items)) => {
                assert_eq!(items.len(), 3);
                assert!(matches!(items[1], Value::Sequence(_)));
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_set_and_nested_set() {
        let l = omni("s = { a, {x, y}, c }\nEND");
        match l.get("s") {
            Some(Value::Set(items)) => {
                assert_eq!(items.len(), 3);
                assert!(matches!(items[1], Value::Set(_)));
            }
            other => panic!("expected set, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_collections() {
        let l = omni("a = ()\nb = {}\nEND");
        assert_eq!(l.get("a"), Some(&Value::Sequence(vec![])));
        assert_eq!(l.get("b"), Some(&Value::Set(vec![])));
    }

    #[test]
    fn test_sequence_with_comments() {
        let l = omni("x = ( a, /* random */b, c )\nEND");
        match l.get("x") {
            Some(Value::Sequence(items)) => assert_eq!(items.len(), 3),
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_sequence_missing_comma() {
        assert!(parse(Dialect::Omni, "x = (a b)\nEND").is_err());
    }

    // ==================== Quantity tests ====================

    #[test]
    fn test_quantity() {
        let l = omni("length = 42 <m/s>\nEND");
        assert_eq!(
            l.get("length"),
            Some(&Value::Quantity(
                Quantity::new(Value::Integer(42), "m/s").unwrap()
            ))
        );
    }

    #[test]
    fn test_quantity_whitespace_in_units() {
        let l = omni("x = 5 < m >\nEND");
        let q = l.get("x").unwrap().as_quantity().unwrap();
        assert_eq!(q.units, "m");
    }

    #[test]
    fn test_quantity_on_sequence_elements() {
        let l = omni("x = (1 <m>, 2 <m>)\nEND");
        match l.get("x") {
            Some(Value::Sequence(items)) => {
                assert!(items.iter().all(|v| v.as_quantity().is_some()))
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_odl_units_only_on_numbers() {
        assert!(parse(Dialect::Odl, "x = 5 <m>\nEND").is_ok());
        assert!(parse(Dialect::Odl, "x = foo <m>\nEND").is_err());
        // PVL allows units on anything.
        assert!(parse(Dialect::Pvl, "x = foo <m>\nEND").is_ok());
    }

    // ==================== Empty-value recovery tests ====================

    #[test]
    fn test_empty_value_before_next_assignment() {
        let l = omni("A =\nB = 1\nEND");
        assert_eq!(l.get("A"), Some(&Value::EmptyAtLine(1)));
        assert_eq!(l.get("B"), Some(&Value::Integer(1)));
        match l.get("A") {
            Some(Value::EmptyAtLine(line)) => assert_eq!(*line, 1),
            other => panic!("expected empty value, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_value_before_end() {
        let l = omni("A =\nEnd");
        assert_eq!(l.get("A"), Some(&Value::EmptyAtLine(1)));
    }

    #[test]
    fn test_empty_value_at_eof() {
        let l = omni("blob =");
        assert_eq!(l.get("blob"), Some(&Value::EmptyAtLine(1)));
    }

    #[test]
    fn test_empty_value_chain_in_block() {
        let l = omni("GROUP = name robert = bob = uncle END_GROUP END");
        let body = l.get("name").unwrap().as_label().unwrap();
        assert_eq!(body.get("robert"), Some(&Value::EmptyAtLine(1)));
        assert_eq!(body.get("bob"), Some(&Value::Symbol("uncle".into())));
    }

    #[test]
    fn test_strict_rejects_empty_value() {
        let err = parse(Dialect::Pds3, "A =\nEnd").unwrap_err();
        match err {
            LoadError::Parse(e) => {
                assert_eq!(e.pos.line, 1);
                assert!(e.expected.contains("value"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_override() {
        let p = Parser::new(Dialect::Omni).permissive(false);
        assert!(p.parse("A =\nEnd").is_err());
        let p = Parser::new(Dialect::Pvl).permissive(true);
        assert_eq!(
            p.parse("A =\nEnd").unwrap().get("A"),
            Some(&Value::EmptyAtLine(1))
        );
    }

    // ==================== Comment handling tests ====================

    #[test]
    fn test_comments_everywhere() {
        let l = omni(concat!(
            "\n/* comment on line */\n",
            "# here is a line comment\n",
            "/* here is a multi-\nline comment */\n",
            "foo = bar /* comment at end of line */\n",
            "weird/* in the */=/*middle*/comments\n",
            "baz = bang # end line comment\n",
            "End\n"
        ));
        assert_eq!(l.get("foo"), Some(&Value::Symbol("bar".into())));
        assert_eq!(l.get("weird"), Some(&Value::Symbol("comments".into())));
        assert_eq!(l.get("baz"), Some(&Value::Symbol("bang".into())));
    }

    #[test]
    fn test_hash_comment_fails_in_strict_pvl() {
        let err = parse(Dialect::Pvl, "# comment\nK = V\nEND").unwrap_err();
        assert!(matches!(err, LoadError::Lex(_)));
    }

    // ==================== Dash continuation tests ====================

    #[test]
    fn test_dash_continuation_omni() {
        let l = omni("foo = /path/with-\n     continuation\nEND");
        assert_eq!(
            l.get("foo"),
            Some(&Value::Symbol("/path/withcontinuation".into()))
        );
    }

    #[test]
    fn test_no_dash_continuation_in_strict_pvl() {
        // Strict PVL keeps the dash: "bar-" is the value and the stray
        // "baz" fails to start a new statement.
        assert!(parse(Dialect::Pvl, "foo = bar-\n     baz\nEND").is_err());
    }

    // ==================== Depth limit tests ====================

    #[test]
    fn test_depth_limit_sequences() {
        let mut text = String::from("x = ");
        text.push_str(&"(".repeat(300));
        text.push('1');
        text.push_str(&")".repeat(300));
        text.push_str("\nEND");
        assert!(parse(Dialect::Omni, &text).is_err());
    }

    #[test]
    fn test_depth_limit_blocks() {
        let mut text = String::new();
        for i in 0..300 {
            text.push_str(&format!("OBJECT = o{}\n", i));
        }
        assert!(parse(Dialect::Omni, &text).is_err());
    }
}
