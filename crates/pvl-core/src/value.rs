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

//! Scalar and aggregate value types for PVL labels.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::QuantityError;
use crate::label::Label;

/// A based (non-decimal) integer literal, e.g. `2#0101#` or `16#-9F#`.
///
/// The raw digit string is preserved so the literal can be written back in
/// its original base.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasedInteger {
    /// The decoded value, sign included.
    pub value: i64,
    /// The radix, 2 through 16.
    pub radix: u32,
    /// The digit string as it appeared, without signs or `#`.
    pub digits: String,
}

impl BasedInteger {
    pub fn new(value: i64, radix: u32, digits: impl Into<String>) -> Self {
        Self {
            value,
            radix,
            digits: digits.into(),
        }
    }
}

impl fmt::Display for BasedInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.value < 0 { "-" } else { "" };
        write!(f, "{}{}#{}#", sign, self.radix, self.digits)
    }
}

/// A time of day with an optional UTC offset.
///
/// The offset is stored in seconds east of UTC; `None` means a "local"
/// (naive) time, which ODL permits.  Leap seconds use chrono's convention
/// of a nanosecond field at or above 1,000,000,000.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PvlTime {
    pub time: NaiveTime,
    /// Seconds east of UTC; `None` for a naive time.
    pub offset: Option<i32>,
}

impl PvlTime {
    pub fn new(time: NaiveTime, offset: Option<i32>) -> Self {
        Self { time, offset }
    }

    /// Builds a time from components; `second` may be 60 (a leap second).
    pub fn from_hms_micro(
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
        offset: Option<i32>,
    ) -> Option<Self> {
        let time = if second == 60 {
            NaiveTime::from_hms_nano_opt(
                hour,
                minute,
                59,
                1_000_000_000 + microsecond * 1_000,
            )?
        } else {
            NaiveTime::from_hms_micro_opt(hour, minute, second, microsecond)?
        };
        Some(Self::new(time, offset))
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// The seconds component, 0 through 60.
    pub fn second(&self) -> u32 {
        if self.is_leap_second() {
            60
        } else {
            self.time.second()
        }
    }

    pub fn microsecond(&self) -> u32 {
        let nanos = self.time.nanosecond();
        if nanos >= 1_000_000_000 {
            (nanos - 1_000_000_000) / 1_000
        } else {
            nanos / 1_000
        }
    }

    pub fn is_leap_second(&self) -> bool {
        self.time.nanosecond() >= 1_000_000_000
    }

    /// True when the offset is exactly UTC.
    pub fn is_utc(&self) -> bool {
        self.offset == Some(0)
    }
}

impl fmt::Display for PvlTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )?;
        if self.microsecond() != 0 {
            write!(f, ".{:06}", self.microsecond())?;
        }
        if let Some(seconds) = self.offset {
            write!(f, "{}", format_offset(seconds))?;
        }
        Ok(())
    }
}

/// A calendar date and time of day with an optional UTC offset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PvlDateTime {
    pub datetime: NaiveDateTime,
    /// Seconds east of UTC; `None` for a naive date/time.
    pub offset: Option<i32>,
}

impl PvlDateTime {
    pub fn new(datetime: NaiveDateTime, offset: Option<i32>) -> Self {
        Self { datetime, offset }
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    /// The time-of-day portion, carrying this value's offset.
    pub fn time(&self) -> PvlTime {
        PvlTime::new(self.datetime.time(), self.offset)
    }

    pub fn is_utc(&self) -> bool {
        self.offset == Some(0)
    }
}

impl fmt::Display for PvlDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date().format("%Y-%m-%d"), self.time())
    }
}

/// Formats an offset as `Z`, `+HH`, or `+HH:MM`.
pub(crate) fn format_offset(seconds: i32) -> String {
    if seconds == 0 {
        return "Z".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    let (h, m) = (abs / 3600, (abs % 3600) / 60);
    if m == 0 {
        format!("{}{:02}", sign, h)
    } else {
        format!("{}{:02}:{:02}", sign, h, m)
    }
}

/// A value paired with a units expression, e.g. `42 <m/s>`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity {
    pub value: Box<Value>,
    pub units: String,
}

impl Quantity {
    /// Creates a quantity; the units string must be non-empty.
    pub fn new(value: Value, units: impl Into<String>) -> Result<Self, QuantityError> {
        let units = units.into();
        if units.is_empty() {
            return Err(QuantityError("a units string may not be empty".into()));
        }
        Ok(Self {
            value: Box::new(value),
            units,
        })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.value, self.units)
    }
}

/// A value in a PVL label.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Integer(i64),
    Based(BasedInteger),
    Real(f64),
    /// A quoted text string.
    String(String),
    /// An unquoted identifier or literal.
    Symbol(String),
    Boolean(bool),
    /// The `NULL` keyword; distinct from [`Value::EmptyAtLine`].
    Null,
    Date(NaiveDate),
    Time(PvlTime),
    DateTime(PvlDateTime),
    /// An unordered collection; kept in source order in memory.
    Set(Vec<Value>),
    Sequence(Vec<Value>),
    Quantity(Quantity),
    /// A parameter declared with `=` but no value; carries the line the
    /// `=` appeared on.  Behaves as an empty string.
    EmptyAtLine(usize),
    Group(Label),
    Object(Label),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_aggregation(&self) -> bool {
        matches!(self, Self::Group(_) | Self::Object(_))
    }

    pub fn is_empty_value(&self) -> bool {
        matches!(self, Self::EmptyAtLine(_))
    }

    /// String content of a `String` or `Symbol` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Based(b) => Some(b.value),
            _ => None,
        }
    }

    /// Real content; integers convert.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(x) => Some(*x),
            Self::Integer(n) => Some(*n as f64),
            Self::Based(b) => Some(b.value as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The contained label of a `Group` or `Object`.
    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Self::Group(l) | Self::Object(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_label_mut(&mut self) -> Option<&mut Label> {
        match self {
            Self::Group(l) | Self::Object(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&[Value]> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Self::Quantity(q) => Some(q),
            _ => None,
        }
    }
}

/// Multiset equality: every element of *a* occurs in *b* as often as in
/// *a*, and the lengths match.
fn set_eq(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|x| {
        let in_a = a.iter().filter(|y| *y == x).count();
        let in_b = b.iter().filter(|y| *y == x).count();
        in_a == in_b
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a == b,
            (Based(a), Based(b)) => a == b,
            (Real(a), Real(b)) => a == b,
            // The source language of most labels does not distinguish a
            // quoted string from an unquoted symbol; neither does equality.
            (String(a) | Symbol(a), String(b) | Symbol(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (Null, Null) => true,
            (Date(a), Date(b)) => a == b,
            (Time(a), Time(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (Set(a), Set(b)) => set_eq(a, b),
            (Sequence(a), Sequence(b)) => a == b,
            (Quantity(a), Quantity(b)) => a == b,
            // An empty value is an empty string with a line number attached.
            (EmptyAtLine(_), EmptyAtLine(_)) => true,
            (EmptyAtLine(_), String(s) | Symbol(s))
            | (String(s) | Symbol(s), EmptyAtLine(_)) => s.is_empty(),
            (Group(a), Group(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Based(b) => write!(f, "{}", b),
            Self::Real(x) => write!(f, "{:?}", x),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Symbol(s) => write!(f, "{}", s),
            Self::Boolean(true) => write!(f, "TRUE"),
            Self::Boolean(false) => write!(f, "FALSE"),
            Self::Null => write!(f, "NULL"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "{}", t),
            Self::DateTime(dt) => write!(f, "{}", dt),
            Self::Set(items) => {
                write!(f, "{{")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "}}")
            }
            Self::Sequence(items) => {
                write!(f, "(")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
            Self::Quantity(q) => write!(f, "{}", q),
            Self::EmptyAtLine(_) => Ok(()),
            Self::Group(l) => write!(f, "Group({} items)", l.len()),
            Self::Object(l) => write!(f, "Object({} items)", l.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Real(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Symbol(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Symbol(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== BasedInteger tests ====================

    #[test]
    fn test_based_display() {
        assert_eq!(format!("{}", BasedInteger::new(5, 2, "0101")), "2#0101#");
        assert_eq!(format!("{}", BasedInteger::new(-159, 16, "9F")), "-16#9F#");
    }

    // ==================== PvlTime tests ====================

    #[test]
    fn test_time_components() {
        let t = PvlTime::from_hms_micro(13, 14, 15, 123_000, Some(0)).unwrap();
        assert_eq!(t.hour(), 13);
        assert_eq!(t.minute(), 14);
        assert_eq!(t.second(), 15);
        assert_eq!(t.microsecond(), 123_000);
        assert!(t.is_utc());
        assert!(!t.is_leap_second());
    }

    #[test]
    fn test_time_leap_second() {
        let t = PvlTime::from_hms_micro(23, 59, 60, 500_000, None).unwrap();
        assert_eq!(t.second(), 60);
        assert_eq!(t.microsecond(), 500_000);
        assert!(t.is_leap_second());
        assert!(!t.is_utc());
    }

    #[test]
    fn test_time_rejects_impossible() {
        assert!(PvlTime::from_hms_micro(24, 0, 0, 0, None).is_none());
        assert!(PvlTime::from_hms_micro(0, 61, 0, 0, None).is_none());
    }

    #[test]
    fn test_time_display() {
        let t = PvlTime::from_hms_micro(1, 2, 0, 0, Some(0)).unwrap();
        assert_eq!(format!("{}", t), "01:02:00Z");
        let t = PvlTime::from_hms_micro(13, 14, 15, 0, None).unwrap();
        assert_eq!(format!("{}", t), "13:14:15");
        let t = PvlTime::from_hms_micro(13, 14, 15, 0, Some(2 * 3600)).unwrap();
        assert_eq!(format!("{}", t), "13:14:15+02");
        let t = PvlTime::from_hms_micro(1, 12, 22, 0, Some(7 * 3600)).unwrap();
        assert_eq!(format!("{}", t), "01:12:22+07");
    }

    // ==================== PvlDateTime tests ====================

    #[test]
    fn test_datetime_display() {
        let dt = PvlDateTime::new(
            NaiveDate::from_ymd_opt(2001, 1, 1)
                .unwrap()
                .and_hms_opt(2, 3, 4)
                .unwrap(),
            Some(0),
        );
        assert_eq!(format!("{}", dt), "2001-01-01T02:03:04Z");
        assert!(dt.is_utc());
        assert_eq!(dt.time().hour(), 2);
    }

    // ==================== format_offset tests ====================

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(0), "Z");
        assert_eq!(format_offset(2 * 3600), "+02");
        assert_eq!(format_offset(-7 * 3600), "-07");
        assert_eq!(format_offset(5 * 3600 + 30 * 60), "+05:30");
    }

    // ==================== Quantity tests ====================

    #[test]
    fn test_quantity_new() {
        let q = Quantity::new(Value::Integer(42), "m/s").unwrap();
        assert_eq!(q.units, "m/s");
        assert_eq!(*q.value, Value::Integer(42));
        assert_eq!(format!("{}", q), "42 <m/s>");
    }

    #[test]
    fn test_quantity_empty_units() {
        assert!(Quantity::new(Value::Integer(1), "").is_err());
    }

    // ==================== Value accessor tests ====================

    #[test]
    fn test_value_as_str() {
        assert_eq!(Value::String("a".into()).as_str(), Some("a"));
        assert_eq!(Value::Symbol("b".into()).as_str(), Some("b"));
        assert_eq!(Value::Integer(1).as_str(), None);
    }

    #[test]
    fn test_value_as_int_and_real() {
        assert_eq!(Value::Integer(5).as_int(), Some(5));
        assert_eq!(Value::Based(BasedInteger::new(5, 2, "101")).as_int(), Some(5));
        assert_eq!(Value::Real(2.5).as_int(), None);
        assert_eq!(Value::Integer(5).as_real(), Some(5.0));
        assert_eq!(Value::Real(2.5).as_real(), Some(2.5));
    }

    #[test]
    fn test_value_as_label() {
        let mut v = Value::Group(Label::new());
        assert!(v.as_label().is_some());
        assert!(v.as_label_mut().is_some());
        assert!(v.is_aggregation());
        assert!(Value::Null.as_label().is_none());
    }

    // ==================== Value equality tests ====================

    #[test]
    fn test_string_symbol_equality() {
        assert_eq!(Value::String("bar".into()), Value::Symbol("bar".into()));
        assert_ne!(Value::String("bar".into()), Value::Symbol("baz".into()));
    }

    #[test]
    fn test_empty_at_line_equality() {
        assert_eq!(Value::EmptyAtLine(1), Value::EmptyAtLine(9));
        assert_eq!(Value::EmptyAtLine(1), Value::String(String::new()));
        assert_ne!(Value::EmptyAtLine(1), Value::String("x".into()));
        assert_ne!(Value::EmptyAtLine(1), Value::Null);
    }

    #[test]
    fn test_set_equality_unordered() {
        let a = Value::Set(vec![1i64.into(), 2i64.into(), 2i64.into()]);
        let b = Value::Set(vec![2i64.into(), 2i64.into(), 1i64.into()]);
        let c = Value::Set(vec![1i64.into(), 1i64.into(), 2i64.into()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_sequence_equality_ordered() {
        let a = Value::Sequence(vec![1i64.into(), 2i64.into()]);
        let b = Value::Sequence(vec![2i64.into(), 1i64.into()]);
        assert_ne!(a, b);
    }

    // ==================== Value display tests ====================

    #[test]
    fn test_value_display() {
        assert_eq!(format!("{}", Value::Integer(42)), "42");
        assert_eq!(format!("{}", Value::Real(15.0)), "15.0");
        assert_eq!(format!("{}", Value::Boolean(true)), "TRUE");
        assert_eq!(format!("{}", Value::Null), "NULL");
        assert_eq!(
            format!("{}", Value::Sequence(vec![1i64.into(), 2i64.into()])),
            "(1, 2)"
        );
        assert_eq!(format!("{}", Value::EmptyAtLine(3)), "");
    }
}
