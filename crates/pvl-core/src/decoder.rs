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

//! The decoder: converts individual tokens to typed scalar values under a
//! grammar's rules.
//!
//! The decode cascade for an unquoted word is: `NULL`, boolean, decimal
//! number, based integer, date/time, and finally symbol.  Two factory
//! hooks let callers substitute their own types: a quantity factory
//! (invoked for every `value <units>` construct) and a real factory
//! (invoked with the raw text of every real-number literal).

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{DecodeError, QuantityError};
use crate::grammar::{BasedSign, Dialect, Grammar};
use crate::token::{SourcePos, Token, TokenKind};
use crate::value::{BasedInteger, PvlDateTime, PvlTime, Quantity, Value};

/// Builds a value from a `value <units>` construct.
pub type QuantityFactory =
    Arc<dyn Fn(Value, &str) -> Result<Value, QuantityError> + Send + Sync>;

/// Builds a value from the raw text of a real-number literal.  Returning
/// `None` falls back to the built-in `f64` conversion.
pub type RealFactory = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Decodes tokens to [`Value`]s under one grammar.
pub struct Decoder {
    grammar: Grammar,
    quantity_factory: Option<QuantityFactory>,
    real_factory: Option<RealFactory>,
}

impl Decoder {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            quantity_factory: None,
            real_factory: None,
        }
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(dialect.grammar())
    }

    pub fn with_quantity_factory(mut self, factory: QuantityFactory) -> Self {
        self.quantity_factory = Some(factory);
        self
    }

    pub fn with_real_factory(mut self, factory: RealFactory) -> Self {
        self.real_factory = Some(factory);
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Decodes a word or quoted-string token to a scalar value.
    pub fn decode_simple_value(&self, token: &Token) -> Result<Value, DecodeError> {
        match token.kind {
            TokenKind::QuotedString => self
                .decode_quoted_string(&token.text, token.pos)
                .map(Value::String),
            TokenKind::Word => self.decode_word(token),
            _ => Err(DecodeError::new(token.pos, &token.text, "simple value")),
        }
    }

    fn decode_word(&self, token: &Token) -> Result<Value, DecodeError> {
        let text = &token.text;
        let g = &self.grammar;

        if g.is_none_keyword(text) {
            return Ok(Value::Null);
        }
        if g.is_true_keyword(text) {
            return Ok(Value::Boolean(true));
        }
        if g.is_false_keyword(text) {
            return Ok(Value::Boolean(false));
        }
        if is_integer_str(text) || is_float_str(text) || is_exponent_str(text) {
            return self.decode_decimal(text, token.pos);
        }
        if based_syntax(text, g).is_some() {
            return self.decode_non_decimal(text, token.pos);
        }
        if datetime_syntax(text).is_some() {
            return self.decode_datetime(text, token.pos);
        }
        self.decode_symbol(token)
    }

    /// Decodes a decimal literal: integer first, real as the fallback.
    ///
    /// Integer overflow is an error for the strict dialects; the
    /// permissive dialects fall back to a real.
    pub fn decode_decimal(&self, text: &str, pos: SourcePos) -> Result<Value, DecodeError> {
        if is_integer_str(text) {
            match text.parse::<i64>() {
                Ok(n) => return Ok(Value::Integer(n)),
                Err(_) if self.grammar.dialect.is_permissive() => {}
                Err(_) => {
                    return Err(DecodeError::new(pos, text, "integer")
                        .with_detail("value does not fit in 64 bits"))
                }
            }
        } else if !is_float_str(text) && !is_exponent_str(text) {
            return Err(DecodeError::new(pos, text, "decimal number"));
        }
        if let Some(factory) = &self.real_factory {
            if let Some(v) = factory(text) {
                return Ok(v);
            }
        }
        text.parse::<f64>()
            .map(Value::Real)
            .map_err(|_| DecodeError::new(pos, text, "real number"))
    }

    /// Decodes a based integer literal, `radix#digits#`.
    pub fn decode_non_decimal(&self, text: &str, pos: SourcePos) -> Result<Value, DecodeError> {
        let (sign, radix, digits) = based_syntax(text, &self.grammar).ok_or_else(|| {
            DecodeError::new(pos, text, "based integer")
                .with_detail("malformed literal or radix not allowed")
        })?;
        let magnitude = i64::from_str_radix(digits, radix).map_err(|_| {
            DecodeError::new(pos, text, "based integer")
                .with_detail(format!("digits invalid for radix {}", radix))
        })?;
        Ok(Value::Based(BasedInteger::new(
            sign * magnitude,
            radix,
            digits,
        )))
    }

    /// Decodes a date, a time, or a date-time.
    pub fn decode_datetime(&self, text: &str, pos: SourcePos) -> Result<Value, DecodeError> {
        let g = &self.grammar;
        let parts = datetime_syntax(text)
            .ok_or_else(|| DecodeError::new(pos, text, "date/time"))?;

        if let Some(t) = &parts.time {
            if t.second == 60 && !g.allow_leap_second {
                return Err(DecodeError::new(pos, text, "time")
                    .with_detail("60 seconds not allowed in this dialect"));
            }
        }

        let offset = match parts.time.as_ref().and_then(|t| t.offset) {
            Some(seconds) => {
                if g.dialect == Dialect::Pds3 && seconds != 0 {
                    return Err(DecodeError::new(pos, text, "time")
                        .with_detail("PDS labels should only have UTC times"));
                }
                Some(seconds)
            }
            None if parts.time.is_some() && g.default_timezone_utc => Some(0),
            None => None,
        };

        match (parts.date, parts.time) {
            (Some(date), None) => Ok(Value::Date(date)),
            (None, Some(t)) => {
                let time = PvlTime::from_hms_micro(t.hour, t.minute, t.second, t.micro, offset)
                    .ok_or_else(|| DecodeError::new(pos, text, "time"))?;
                Ok(Value::Time(time))
            }
            (Some(date), Some(t)) => {
                let time = PvlTime::from_hms_micro(t.hour, t.minute, t.second, t.micro, None)
                    .ok_or_else(|| DecodeError::new(pos, text, "date/time"))?;
                Ok(Value::DateTime(PvlDateTime::new(
                    date.and_time(time.time),
                    offset,
                )))
            }
            (None, None) => Err(DecodeError::new(pos, text, "date/time")),
        }
    }

    /// Strips the quotes from a quoted-string token and resolves its
    /// escapes.
    pub fn decode_quoted_string(&self, raw: &str, pos: SourcePos) -> Result<String, DecodeError> {
        let chars: Vec<char> = raw.chars().collect();
        if chars.len() < 2 || !self.grammar.is_quote(chars[0]) {
            return Err(DecodeError::new(pos, raw, "quoted string"));
        }
        let quote = chars[0];
        let inner = &chars[1..chars.len() - 1];

        let mut out = String::with_capacity(inner.len());
        let mut i = 0;
        while i < inner.len() {
            let c = inner[i];
            if c == '\\' && self.grammar.backslash_escape {
                let Some(&e) = inner.get(i + 1) else {
                    return Err(DecodeError::new(pos, raw, "quoted string")
                        .with_detail("dangling backslash"));
                };
                match e {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'f' => out.push('\x0c'),
                    'v' => out.push('\x0b'),
                    '\\' => out.push('\\'),
                    '\'' => out.push('\''),
                    '"' => out.push('"'),
                    // The permissive dialects keep an unknown escape as
                    // literal text; the strict ones reject it.
                    other if self.grammar.dialect.is_permissive() => {
                        out.push('\\');
                        out.push(other);
                    }
                    other => {
                        return Err(DecodeError::new(pos, raw, "quoted string")
                            .with_detail(format!("invalid \\escape: {:?}", other)))
                    }
                }
                i += 2;
            } else if c == quote
                && self.grammar.doubled_quote_escape
                && inner.get(i + 1) == Some(&quote)
            {
                out.push(quote);
                i += 2;
            } else {
                out.push(c);
                i += 1;
            }
        }
        Ok(out)
    }

    fn decode_symbol(&self, token: &Token) -> Result<Value, DecodeError> {
        if !token.is_unquoted_string(&self.grammar) {
            return Err(DecodeError::new(token.pos, &token.text, "simple value"));
        }
        if matches!(self.grammar.dialect, Dialect::Odl | Dialect::Pds3)
            && !is_odl_identifier(&token.text)
        {
            return Err(DecodeError::new(token.pos, &token.text, "symbol")
                .with_detail("not an ODL identifier"));
        }
        Ok(Value::Symbol(token.text.clone()))
    }

    /// Pairs a value with a units expression, through the quantity factory
    /// when one was supplied.
    pub fn decode_quantity(&self, value: Value, units: &str) -> Result<Value, QuantityError> {
        match &self.quantity_factory {
            Some(factory) => factory(value, units),
            None => Ok(Value::Quantity(Quantity::new(value, units)?)),
        }
    }
}

/// `[+-]?digits`
fn is_integer_str(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `[+-]?` digits on at least one side of a decimal point.
fn is_float_str(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let Some((whole, frac)) = s.split_once('.') else {
        return false;
    };
    if whole.is_empty() && frac.is_empty() {
        return false;
    }
    whole.bytes().all(|b| b.is_ascii_digit()) && frac.bytes().all(|b| b.is_ascii_digit())
}

/// An integer or float mantissa with an integer exponent, e.g. `1.2E-3`.
fn is_exponent_str(s: &str) -> bool {
    let Some(e_at) = s.find(['e', 'E']) else {
        return false;
    };
    let (mantissa, exponent) = (&s[..e_at], &s[e_at + 1..]);
    (is_integer_str(mantissa) || is_float_str(mantissa)) && is_integer_str(exponent)
}

/// Matches `text` against the grammar's based-integer rule, returning the
/// overall sign, the radix, and the raw digit string.
fn based_syntax<'t>(text: &'t str, grammar: &Grammar) -> Option<(i64, u32, &'t str)> {
    let outer_explicit = text.starts_with(['+', '-']);
    let (outer_sign, rest) = split_sign(text);
    if outer_explicit && grammar.based_sign == BasedSign::AfterRadix {
        return None;
    }
    let (radix_str, rest) = rest.split_once('#')?;
    if radix_str.is_empty() || !radix_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let radix: u32 = radix_str.parse().ok()?;
    if !grammar.radix_allowed(radix) {
        return None;
    }
    let inner_explicit = rest.starts_with(['+', '-']);
    let (inner_sign, rest) = split_sign(rest);
    if inner_explicit && grammar.based_sign == BasedSign::BeforeRadix {
        return None;
    }
    let digits = rest.strip_suffix('#')?;
    if digits.is_empty() {
        return None;
    }
    if !digits
        .bytes()
        .all(|b| (b as char).to_digit(16).is_some_and(|d| d < radix))
    {
        return None;
    }
    Some((outer_sign * inner_sign, radix, digits))
}

fn split_sign(s: &str) -> (i64, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (-1, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (1, rest)
    } else {
        (1, s)
    }
}

struct TimeParts {
    hour: u32,
    minute: u32,
    second: u32,
    micro: u32,
    offset: Option<i32>,
}

struct DateTimeParts {
    date: Option<NaiveDate>,
    time: Option<TimeParts>,
}

/// Syntactic (dialect-independent) date/time recognition.
///
/// Dates are `YYYY-MM-DD` or day-of-year `YYYY-DDD`, optionally suffixed
/// `Z`; times are `HH:MM[:SS[.f]]` with an optional `Z` or `±HH[:MM]`
/// offset; a date and a time join with `T`.
fn datetime_syntax(text: &str) -> Option<DateTimeParts> {
    if let Some((date_str, time_str)) = text.split_once(['T', 't']) {
        let date = parse_date(date_str)?;
        let time = parse_time(time_str)?;
        return Some(DateTimeParts {
            date: Some(date),
            time: Some(time),
        });
    }
    if let Some(date) = parse_date(text.strip_suffix(['Z', 'z']).unwrap_or(text)) {
        return Some(DateTimeParts {
            date: Some(date),
            time: None,
        });
    }
    if let Some(time) = parse_time(text) {
        return Some(DateTimeParts {
            date: None,
            time: Some(time),
        });
    }
    None
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let fields: Vec<&str> = s.split('-').collect();
    match fields.as_slice() {
        [y, m, d] if y.len() == 4 && m.len() == 2 && d.len() == 2 => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
        }
        [y, doy] if y.len() == 4 && doy.len() == 3 => {
            NaiveDate::from_yo_opt(y.parse().ok()?, doy.parse().ok()?)
        }
        _ => None,
    }
}

fn parse_time(s: &str) -> Option<TimeParts> {
    let (clock, offset) = split_time_offset(s);
    let fields: Vec<&str> = clock.split(':').collect();
    let (hour_str, minute_str, second_str) = match fields.as_slice() {
        [h, m] => (*h, *m, None),
        [h, m, s] => (*h, *m, Some(*s)),
        _ => return None,
    };
    if hour_str.len() != 2 || minute_str.len() != 2 {
        return None;
    }
    let hour: u32 = all_digits(hour_str)?;
    let minute: u32 = all_digits(minute_str)?;
    if hour > 23 || minute > 59 {
        return None;
    }
    let (second, micro) = match second_str {
        None => (0, 0),
        Some(sec) => {
            let (whole, frac) = match sec.split_once('.') {
                Some((w, f)) => (w, Some(f)),
                None => (sec, None),
            };
            if whole.len() != 2 {
                return None;
            }
            let second: u32 = all_digits(whole)?;
            if second > 60 {
                return None;
            }
            let micro = match frac {
                None => 0,
                Some(f) if !f.is_empty() => {
                    let padded = format!("{:0<6}", f);
                    all_digits(&padded[..6])?
                }
                Some(_) => return None,
            };
            (second, micro)
        }
    };
    Some(TimeParts {
        hour,
        minute,
        second,
        micro,
        offset,
    })
}

/// Splits a trailing `Z` or `±HH[:MM]` offset from a clock string.
fn split_time_offset(s: &str) -> (&str, Option<i32>) {
    if let Some(clock) = s.strip_suffix(['Z', 'z']) {
        return (clock, Some(0));
    }
    if let Some(at) = s.rfind(['+', '-']) {
        // A sign inside the first two characters is not an offset.
        if at >= 2 {
            let (clock, tz) = (&s[..at], &s[at..]);
            if let Some(seconds) = parse_offset(tz) {
                return (clock, Some(seconds));
            }
        }
    }
    (s, None)
}

fn parse_offset(tz: &str) -> Option<i32> {
    let sign = if tz.starts_with('-') { -1 } else { 1 };
    let rest = &tz[1..];
    let (h_str, m_str) = match rest.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (rest, None),
    };
    if h_str.is_empty() || h_str.len() > 2 {
        return None;
    }
    let hours: i32 = all_digits(h_str).map(|h: u32| h as i32)?;
    if hours > 23 {
        return None;
    }
    let minutes: i32 = match m_str {
        None => 0,
        Some(m) if m.len() == 2 => all_digits(m).map(|m: u32| m as i32)?,
        Some(_) => return None,
    };
    if minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

fn all_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Letters, digits, and underscores, starting with a letter, ASCII only.
pub fn is_odl_identifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.is_empty() || !bytes[0].is_ascii_alphabetic() {
        return false;
    }
    bytes
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}

/// True if *text* is any numeric literal of *grammar*.
pub(crate) fn looks_numeric(text: &str, grammar: &Grammar) -> bool {
    is_integer_str(text)
        || is_float_str(text)
        || is_exponent_str(text)
        || based_syntax(text, grammar).is_some()
}

/// True if *text* is syntactically a date, time, or date-time.
pub(crate) fn looks_datetime(text: &str, _grammar: &Grammar) -> bool {
    datetime_syntax(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn word(s: &str) -> Token {
        Token::new(TokenKind::Word, s, SourcePos::start())
    }

    fn quoted(s: &str) -> Token {
        Token::new(TokenKind::QuotedString, s, SourcePos::start())
    }

    fn omni() -> Decoder {
        Decoder::for_dialect(Dialect::Omni)
    }

    // ==================== Number scanner tests ====================

    #[test]
    fn test_is_integer_str() {
        assert!(is_integer_str("0"));
        assert!(is_integer_str("-79"));
        assert!(is_integer_str("+80"));
        assert!(!is_integer_str(""));
        assert!(!is_integer_str("-"));
        assert!(!is_integer_str("1.5"));
        assert!(!is_integer_str("1a"));
    }

    #[test]
    fn test_is_float_str() {
        assert!(is_float_str("1.5"));
        assert!(is_float_str(".5"));
        assert!(is_float_str("5."));
        assert!(is_float_str("-0.25"));
        assert!(!is_float_str("."));
        assert!(!is_float_str("15"));
        assert!(!is_float_str("1.5.2"));
    }

    #[test]
    fn test_is_exponent_str() {
        assert!(is_exponent_str("1E10"));
        assert!(is_exponent_str("1.2e-3"));
        assert!(is_exponent_str("-1E+10"));
        assert!(!is_exponent_str("E10"));
        assert!(!is_exponent_str("1E"));
        assert!(!is_exponent_str("1E1.5"));
    }

    // ==================== Decimal tests ====================

    #[test]
    fn test_decode_integers_and_reals() {
        let d = omni();
        assert_eq!(d.decode_simple_value(&word("-79")).unwrap(), Value::Integer(-79));
        assert_eq!(d.decode_simple_value(&word("+80")).unwrap(), Value::Integer(80));
        assert_eq!(d.decode_simple_value(&word("1.5")).unwrap(), Value::Real(1.5));
        assert_eq!(d.decode_simple_value(&word("1E2")).unwrap(), Value::Real(100.0));
    }

    #[test]
    fn test_integer_overflow_omni_becomes_real() {
        let d = omni();
        let v = d.decode_simple_value(&word("99999999999999999999")).unwrap();
        assert!(matches!(v, Value::Real(_)));
    }

    #[test]
    fn test_integer_overflow_strict_errors() {
        let d = Decoder::for_dialect(Dialect::Pds3);
        let err = d
            .decode_decimal("99999999999999999999", SourcePos::start())
            .unwrap_err();
        assert!(err.detail.unwrap().contains("64 bits"));
    }

    #[test]
    fn test_real_factory() {
        let d = omni().with_real_factory(Arc::new(|raw| {
            Some(Value::String(format!("real:{}", raw)))
        }));
        let v = d.decode_decimal("1.25", SourcePos::start()).unwrap();
        assert_eq!(v, Value::String("real:1.25".into()));
    }

    // ==================== Based integer tests ====================

    #[test]
    fn test_based_pvl_forms() {
        let d = Decoder::for_dialect(Dialect::Pvl);
        assert_eq!(
            d.decode_simple_value(&word("2#0101#")).unwrap().as_int(),
            Some(5)
        );
        assert_eq!(
            d.decode_simple_value(&word("-16#9F#")).unwrap().as_int(),
            Some(-159)
        );
        assert_eq!(
            d.decode_simple_value(&word("8#0107#")).unwrap().as_int(),
            Some(71)
        );
    }

    #[test]
    fn test_based_keeps_digits() {
        let d = omni();
        let v = d.decode_simple_value(&word("2#0101#")).unwrap();
        match v {
            Value::Based(b) => {
                assert_eq!(b.digits, "0101");
                assert_eq!(b.radix, 2);
                assert_eq!(b.value, 5);
            }
            other => panic!("expected based integer, got {:?}", other),
        }
    }

    #[test]
    fn test_based_odl_sign_placement() {
        let d = Decoder::for_dialect(Dialect::Odl);
        assert_eq!(
            d.decode_simple_value(&word("16#-9F#")).unwrap().as_int(),
            Some(-159)
        );
        // ODL puts the sign after the radix, not before.
        assert!(d.decode_non_decimal("-16#9F#", SourcePos::start()).is_err());
    }

    #[test]
    fn test_based_omni_accepts_both_signs() {
        let d = omni();
        assert_eq!(d.decode_non_decimal("16#-9F#", SourcePos::start()).unwrap().as_int(), Some(-159));
        assert_eq!(d.decode_non_decimal("-16#9F#", SourcePos::start()).unwrap().as_int(), Some(-159));
        assert_eq!(d.decode_non_decimal("+3#12#", SourcePos::start()).unwrap().as_int(), Some(5));
    }

    #[test]
    fn test_based_radix_range() {
        let pvl = Decoder::for_dialect(Dialect::Pvl);
        assert!(pvl.decode_non_decimal("3#12#", SourcePos::start()).is_err());
        let omni = omni();
        assert!(omni.decode_non_decimal("3#12#", SourcePos::start()).is_ok());
        assert!(omni.decode_non_decimal("17#1#", SourcePos::start()).is_err());
    }

    #[test]
    fn test_based_digit_validation() {
        let d = omni();
        let err = d.decode_non_decimal("2#0121#", SourcePos::start()).unwrap_err();
        assert!(err.detail.unwrap().contains("radix 2"));
    }

    // ==================== Date/time tests ====================

    #[test]
    fn test_decode_date() {
        let d = omni();
        assert_eq!(
            d.decode_simple_value(&word("2001-01-01")).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2001, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_decode_doy_date() {
        let d = omni();
        assert_eq!(
            d.decode_simple_value(&word("2001-027")).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2001, 1, 27).unwrap())
        );
    }

    #[test]
    fn test_decode_time_naive_and_utc() {
        let d = omni();
        match d.decode_simple_value(&word("01:02")).unwrap() {
            Value::Time(t) => {
                assert_eq!((t.hour(), t.minute(), t.second()), (1, 2, 0));
                assert_eq!(t.offset, None);
            }
            other => panic!("expected time, got {:?}", other),
        }
        match d.decode_simple_value(&word("23:45:12.5Z")).unwrap() {
            Value::Time(t) => {
                assert_eq!(t.microsecond(), 500_000);
                assert!(t.is_utc());
            }
            other => panic!("expected time, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_time_offset() {
        let d = omni();
        match d.decode_simple_value(&word("01:12:22+07:00")).unwrap() {
            Value::Time(t) => assert_eq!(t.offset, Some(7 * 3600)),
            other => panic!("expected time, got {:?}", other),
        }
        match d.decode_simple_value(&word("01:12:22-07")).unwrap() {
            Value::Time(t) => assert_eq!(t.offset, Some(-7 * 3600)),
            other => panic!("expected time, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_datetime() {
        let d = omni();
        match d.decode_simple_value(&word("2001-01-01T02:03:04Z")).unwrap() {
            Value::DateTime(dt) => {
                assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
                assert!(dt.is_utc());
            }
            other => panic!("expected datetime, got {:?}", other),
        }
    }

    #[test]
    fn test_leap_second_by_dialect() {
        let omni = omni();
        match omni.decode_simple_value(&word("23:59:60.5")).unwrap() {
            Value::Time(t) => {
                assert_eq!(t.second(), 60);
                assert!(t.is_leap_second());
            }
            other => panic!("expected time, got {:?}", other),
        }
        let odl = Decoder::for_dialect(Dialect::Odl);
        let err = odl
            .decode_datetime("23:59:60", SourcePos::start())
            .unwrap_err();
        assert!(err.detail.unwrap().contains("60 seconds"));
    }

    #[test]
    fn test_pds3_assumes_utc() {
        let d = Decoder::for_dialect(Dialect::Pds3);
        match d.decode_datetime("01:02:03", SourcePos::start()).unwrap() {
            Value::Time(t) => assert!(t.is_utc()),
            other => panic!("expected time, got {:?}", other),
        }
    }

    #[test]
    fn test_pds3_rejects_offsets() {
        let d = Decoder::for_dialect(Dialect::Pds3);
        let err = d
            .decode_datetime("01:12:22+07:00", SourcePos::start())
            .unwrap_err();
        assert!(err.detail.unwrap().contains("UTC"));
    }

    #[test]
    fn test_odl_keeps_local_times() {
        let d = Decoder::for_dialect(Dialect::Odl);
        match d.decode_datetime("01:02:03", SourcePos::start()).unwrap() {
            Value::Time(t) => assert_eq!(t.offset, None),
            other => panic!("expected time, got {:?}", other),
        }
    }

    #[test]
    fn test_not_a_datetime() {
        assert!(datetime_syntax("2001-13-01").is_none());
        assert!(datetime_syntax("25:00").is_none());
        assert!(datetime_syntax("01:61").is_none());
        assert!(datetime_syntax("banana").is_none());
        assert!(datetime_syntax("2001-367").is_none());
    }

    // ==================== Boolean and null tests ====================

    #[test]
    fn test_booleans_and_null() {
        let d = omni();
        assert_eq!(d.decode_simple_value(&word("TRUE")).unwrap(), Value::Boolean(true));
        assert_eq!(d.decode_simple_value(&word("false")).unwrap(), Value::Boolean(false));
        assert_eq!(d.decode_simple_value(&word("Null")).unwrap(), Value::Null);
    }

    // ==================== String tests ====================

    #[test]
    fn test_decode_quoted_plain() {
        let d = omni();
        assert_eq!(
            d.decode_simple_value(&quoted("\"Quoted\"")).unwrap(),
            Value::String("Quoted".into())
        );
    }

    #[test]
    fn test_decode_doubled_quotes() {
        let d = Decoder::for_dialect(Dialect::Pvl);
        assert_eq!(
            d.decode_quoted_string(r#""say ""hi""""#, SourcePos::start())
                .unwrap(),
            r#"say "hi""#
        );
    }

    #[test]
    fn test_decode_backslash_escapes() {
        let d = Decoder::for_dialect(Dialect::Odl);
        assert_eq!(
            d.decode_quoted_string(r#""a\tb\nc""#, SourcePos::start()).unwrap(),
            "a\tb\nc"
        );
        assert!(d
            .decode_quoted_string(r#""bad \x""#, SourcePos::start())
            .is_err());
    }

    #[test]
    fn test_permissive_keeps_unknown_escape() {
        let d = omni();
        assert_eq!(
            d.decode_quoted_string(r#""a\zb""#, SourcePos::start()).unwrap(),
            r"a\zb"
        );
    }

    #[test]
    fn test_pvl_backslash_is_literal() {
        let d = Decoder::for_dialect(Dialect::Pvl);
        assert_eq!(
            d.decode_quoted_string(r#""a\tb""#, SourcePos::start()).unwrap(),
            r"a\tb"
        );
    }

    // ==================== Symbol tests ====================

    #[test]
    fn test_symbols() {
        let d = omni();
        assert_eq!(
            d.decode_simple_value(&word("Unquoted")).unwrap(),
            Value::Symbol("Unquoted".into())
        );
        assert_eq!(
            d.decode_simple_value(&word("/path/to/file.cub")).unwrap(),
            Value::Symbol("/path/to/file.cub".into())
        );
    }

    #[test]
    fn test_odl_identifier_rule() {
        let d = Decoder::for_dialect(Dialect::Odl);
        assert!(d.decode_simple_value(&word("VALID_ID2")).is_ok());
        let err = d.decode_simple_value(&word("/path/to/x")).unwrap_err();
        assert!(err.detail.unwrap().contains("identifier"));
    }

    #[test]
    fn test_is_odl_identifier() {
        assert!(is_odl_identifier("Abc_123"));
        assert!(!is_odl_identifier("1abc"));
        assert!(!is_odl_identifier(""));
        assert!(!is_odl_identifier("has-dash"));
        assert!(!is_odl_identifier("héllo"));
    }

    // ==================== Quantity tests ====================

    #[test]
    fn test_decode_quantity_default() {
        let d = omni();
        let v = d.decode_quantity(Value::Integer(9), "planets").unwrap();
        let q = v.as_quantity().unwrap();
        assert_eq!(*q.value, Value::Integer(9));
        assert_eq!(q.units, "planets");
    }

    #[test]
    fn test_decode_quantity_factory() {
        let d = omni().with_quantity_factory(Arc::new(|v, units| {
            Ok(Value::Sequence(vec![v, Value::Symbol(units.to_string())]))
        }));
        let v = d.decode_quantity(Value::Integer(5), "m").unwrap();
        assert_eq!(
            v,
            Value::Sequence(vec![Value::Integer(5), Value::Symbol("m".into())])
        );
    }
}
