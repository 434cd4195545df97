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

//! The label writer.
//!
//! Serializes a [`Label`] to PVL text under a [`WriteConfig`].  Assignments
//! in a block align their `=` signs on the longest key, long lines wrap
//! after the `= ` column, and every dialect rule is enforced: a violation
//! is an [`EncodeError`] naming the parameter and the rule, never a
//! silently transformed value.

use std::collections::HashSet;

use pvl_core::decoder::is_odl_identifier;
use pvl_core::grammar::BasedSign;
use pvl_core::token::{SourcePos, Token, TokenKind};
use pvl_core::{Dialect, Grammar, Label, PvlTime, Value};

use crate::config::WriteConfig;
use crate::EncodeError;

const INITIAL_OUTPUT_CAPACITY: usize = 4096;

/// Writes label trees to PVL text under one formatting profile.
pub struct Writer {
    config: WriteConfig,
    grammar: Grammar,
    output: String,
}

impl Writer {
    pub fn new(config: WriteConfig) -> Self {
        let grammar = config.grammar();
        Self {
            config,
            grammar,
            output: String::with_capacity(INITIAL_OUTPUT_CAPACITY),
        }
    }

    /// Serializes *label*, returning the finished text.
    pub fn write_label(&mut self, label: &Label) -> Result<String, EncodeError> {
        let converted;
        let label = if self.config.dialect == Dialect::Pds3 {
            match self.pds3_prepare(label)? {
                Some(patched) => {
                    converted = patched;
                    &converted
                }
                None => label,
            }
        } else {
            label
        };

        self.write_block_body(label, 0, "")?;

        self.output.push_str("END");
        if self.config.end_delimiter {
            self.output.push(self.grammar.delimiter);
        }
        if self.config.end_newline {
            self.output.push_str(&self.config.newline);
        }
        if self.config.trailing_blank {
            self.output.push_str(&self.config.newline);
        }

        if let Some(c) = self.output.chars().find(|&c| !self.grammar.char_allowed(c)) {
            return Err(self.err(
                "(label)",
                format!("character {:?} is outside the {} character set", c, self.config.dialect),
            ));
        }

        let mut out = std::mem::take(&mut self.output);
        if self.config.tab_replace > 0 {
            out = out.replace('\t', &" ".repeat(self.config.tab_replace));
        }
        Ok(out)
    }

    /// PDS requires a label with GROUPs to also carry an OBJECT.  With the
    /// conversion opt-in the offending GROUP is rewritten; otherwise this
    /// is an error.  Returns a patched clone when a rewrite happened.
    fn pds3_prepare(&self, label: &Label) -> Result<Option<Label>, EncodeError> {
        let groups = label
            .values()
            .filter(|v| matches!(v, Value::Group(_)))
            .count();
        let objects = label
            .values()
            .filter(|v| matches!(v, Value::Object(_)))
            .count();
        if groups == 0 || objects > 0 {
            return Ok(None);
        }
        if !self.config.convert_group_to_object {
            return Err(self.err(
                "(label)",
                "a PDS label with GROUP elements must contain at least one OBJECT",
            ));
        }
        let mut patched = label.clone();
        let target = patched
            .iter()
            .position(|(_, v)| matches!(v, Value::Group(body) if !is_pds_group(body)))
            .or_else(|| {
                patched
                    .iter()
                    .position(|(_, v)| matches!(v, Value::Group(_)))
            });
        if let Some(i) = target {
            for (n, v) in patched.values_mut().enumerate() {
                if n == i {
                    if let Value::Group(body) = v {
                        *v = Value::Object(std::mem::take(body));
                    }
                }
            }
        }
        Ok(Some(patched))
    }

    fn write_block_body(
        &mut self,
        label: &Label,
        level: usize,
        path: &str,
    ) -> Result<(), EncodeError> {
        // Align the equals signs of the block's assignments on its longest
        // key; aggregations do not participate.
        let key_len = label
            .iter()
            .filter(|(_, v)| !v.is_aggregation())
            .map(|(k, _)| k.chars().count())
            .max()
            .unwrap_or(0);
        for (key, value) in label.iter() {
            if value.is_aggregation() {
                self.write_aggregation(key, value, level, path)?;
            } else {
                self.write_assignment(key, value, level, key_len, path)?;
            }
        }
        Ok(())
    }

    fn write_aggregation(
        &mut self,
        key: &str,
        value: &Value,
        level: usize,
        path: &str,
    ) -> Result<(), EncodeError> {
        let child_path = join_path(path, key);
        self.check_parameter_name(key, &child_path)?;

        let (body, mut is_group) = match value {
            Value::Group(body) => (body, true),
            Value::Object(body) => (body, false),
            _ => unreachable!("write_aggregation called on a scalar"),
        };
        if self.config.dialect == Dialect::Pds3 && is_group && !is_pds_group(body) {
            if self.config.convert_group_to_object {
                is_group = false;
            } else {
                return Err(self.err(
                    &child_path,
                    "not a valid PDS GROUP (no nesting, no repeated keys, \
                     no integer-valued pointers)",
                ));
            }
        }

        let (begin_kw, end_kw) = if is_group {
            self.grammar.group_pref_keywords
        } else {
            self.grammar.object_pref_keywords
        };

        let mut begin = format!("{} = {}", begin_kw, key);
        if self.config.end_delimiter {
            begin.push(self.grammar.delimiter);
        }
        let line = self.format_line(&begin, level);
        self.push_line(&line);

        self.write_block_body(body, level + 1, &child_path)?;

        let mut end = if self.config.aggregation_end {
            format!("{} = {}", end_kw, key)
        } else {
            end_kw.to_string()
        };
        if self.config.end_delimiter {
            end.push(self.grammar.delimiter);
        }
        let line = self.format_line(&end, level);
        self.push_line(&line);
        Ok(())
    }

    fn write_assignment(
        &mut self,
        key: &str,
        value: &Value,
        level: usize,
        key_len: usize,
        path: &str,
    ) -> Result<(), EncodeError> {
        let child_path = join_path(path, key);
        self.check_parameter_name(key, &child_path)?;

        let display_key = if self.config.uppercase_params {
            key.to_ascii_uppercase()
        } else {
            key.to_string()
        };
        let head = format!("{:<width$} = ", display_key, width = key_len);
        let encoded = self.encode_value(value, &child_path)?;

        let line = if encoded.starts_with(['"', '\'']) {
            // Quoted text keeps its own line breaks; wrap nothing.
            let mut line = self.format_line(&head, level);
            line.push_str(&encoded);
            if self.config.end_delimiter {
                line.push(self.grammar.delimiter);
            }
            line
        } else {
            let mut s = head;
            s.push_str(&encoded);
            if self.config.end_delimiter {
                s.push(self.grammar.delimiter);
            }
            self.format_line(&s, level)
        };
        self.push_line(&line);
        Ok(())
    }

    fn push_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push_str(&self.config.newline);
    }

    /// Indents *s* by *level*; when the line would overflow the width, the
    /// text after `=` wraps with continuation lines indented to the value
    /// column.
    fn format_line(&self, s: &str, level: usize) -> String {
        let prefix = " ".repeat(level * self.config.indent);
        let total = prefix.len() + s.chars().count() + self.config.newline.len();
        if total <= self.config.width || !s.contains('=') {
            return format!("{}{}", prefix, s);
        }
        let (before, after) = s.split_once('=').unwrap_or((s, ""));
        let head = format!("{}{} = ", prefix, before.trim());
        let hang = " ".repeat(head.chars().count());
        let width = self.config.width.saturating_sub(self.config.newline.len());

        let mut lines = Vec::new();
        let mut current = head.clone();
        let mut first_word = true;
        for word in split_outside_quotes(after.trim_start()) {
            if first_word {
                current.push_str(word);
                first_word = false;
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = format!("{}{}", hang, word);
            }
        }
        lines.push(current);
        lines.join(&self.config.newline)
    }

    // ==================== Value encoding ====================

    fn encode_value(&self, value: &Value, path: &str) -> Result<String, EncodeError> {
        match value {
            Value::Integer(n) => Ok(n.to_string()),
            Value::Based(b) => Ok(self.encode_based(b)),
            Value::Real(x) => {
                if !x.is_finite() {
                    return Err(self.err(path, "real values must be finite"));
                }
                Ok(format!("{:?}", x))
            }
            Value::String(s) => self.quote_string(s, path),
            Value::Symbol(s) => self.encode_symbol(s, path),
            Value::Boolean(true) => Ok(self.grammar.true_keyword.to_string()),
            Value::Boolean(false) => Ok(self.grammar.false_keyword.to_string()),
            Value::Null => Ok(self.grammar.none_keyword.to_string()),
            Value::Date(d) => Ok(d.format("%Y-%m-%d").to_string()),
            Value::Time(t) => self.encode_time(t, path),
            Value::DateTime(dt) => {
                let time = self.encode_time(&dt.time(), path)?;
                Ok(format!("{}T{}", dt.date().format("%Y-%m-%d"), time))
            }
            Value::Sequence(items) => self.encode_sequence(items, path),
            Value::Set(items) => self.encode_set(items, path),
            Value::Quantity(q) => {
                if self.strict_odl() && q.value.as_real().is_none() {
                    return Err(self.err(
                        path,
                        "units expressions are only allowed after numeric values",
                    ));
                }
                let value = self.encode_value(&q.value, path)?;
                let units = self.encode_units(&q.units, path)?;
                Ok(format!("{} {}", value, units))
            }
            Value::EmptyAtLine(_) => self.quote_string("", path),
            Value::Group(_) | Value::Object(_) => {
                Err(self.err(path, "an aggregation cannot appear as a value"))
            }
        }
    }

    fn encode_based(&self, b: &pvl_core::BasedInteger) -> String {
        let sign = if b.value < 0 { "-" } else { "" };
        match self.grammar.based_sign {
            BasedSign::BeforeRadix | BasedSign::Either => {
                format!("{}{}#{}#", sign, b.radix, b.digits)
            }
            BasedSign::AfterRadix => format!("{}#{}{}#", b.radix, sign, b.digits),
        }
    }

    fn encode_time(&self, t: &PvlTime, path: &str) -> Result<String, EncodeError> {
        if self.strict_odl() && t.second() == 60 {
            return Err(self.err(path, "60 seconds not allowed in this dialect"));
        }
        let mut s = format!("{:02}:{:02}", t.hour(), t.minute());
        let micro = t.microsecond();
        if micro != 0 {
            if self.config.dialect == Dialect::Pds3 {
                if micro % 1000 != 0 {
                    return Err(self.err(
                        path,
                        "PDS times have at most millisecond precision",
                    ));
                }
                s.push_str(&format!(":{:02}.{:03}", t.second(), micro / 1000));
            } else {
                s.push_str(&format!(":{:02}.{:06}", t.second(), micro));
            }
        } else if t.second() != 0 {
            s.push_str(&format!(":{:02}", t.second()));
        }

        match self.config.dialect {
            Dialect::Pds3 => match t.offset {
                Some(seconds) if seconds != 0 => {
                    return Err(self.err(path, "PDS labels should only have UTC times"))
                }
                // A naive time counts as UTC under the PDS assumption.
                _ => {
                    if self.config.time_trailing_z {
                        s.push('Z');
                    }
                }
            },
            Dialect::Odl => match t.offset {
                Some(0) => s.push('Z'),
                Some(seconds) => {
                    if seconds % 60 != 0 {
                        return Err(self.err(
                            path,
                            "ODL timezone offsets cannot carry seconds",
                        ));
                    }
                    s.push_str(&offset_suffix(seconds));
                }
                None => {}
            },
            _ => {
                if let Some(seconds) = t.offset {
                    s.push_str(&offset_suffix(seconds));
                }
            }
        }
        Ok(s)
    }

    fn encode_sequence(&self, items: &[Value], path: &str) -> Result<String, EncodeError> {
        if self.strict_odl() {
            if items.is_empty() {
                return Err(self.err(path, "ODL does not allow empty sequences"));
            }
            for item in items {
                match item {
                    Value::Sequence(inner) => {
                        for i in inner {
                            if matches!(i, Value::Sequence(_)) {
                                return Err(self.err(
                                    path,
                                    "ODL sequences are at most two-dimensional",
                                ));
                            }
                            if !is_odl_scalar(i) {
                                return Err(self
                                    .err(path, "ODL sequences may only hold scalar values"));
                            }
                        }
                    }
                    other if !is_odl_scalar(other) => {
                        return Err(
                            self.err(path, "ODL sequences may only hold scalar values")
                        )
                    }
                    _ => {}
                }
            }
        }
        let encoded = self.encode_items(items, path)?;
        Ok(format!("({})", encoded))
    }

    fn encode_set(&self, items: &[Value], path: &str) -> Result<String, EncodeError> {
        if self.config.dialect == Dialect::Pds3 {
            for item in items {
                let ok = match item {
                    Value::Integer(_) | Value::Based(_) => true,
                    Value::String(s) | Value::Symbol(s) => is_odl_symbol_string(s),
                    _ => false,
                };
                if !ok {
                    return Err(
                        self.err(path, "the PDS only allows integers and symbols in sets")
                    );
                }
            }
        } else if self.strict_odl() && !items.iter().all(is_odl_scalar) {
            return Err(self.err(path, "ODL sets may only hold scalar values"));
        }
        let encoded = self.encode_items(items, path)?;
        Ok(format!("{{{}}}", encoded))
    }

    fn encode_items(&self, items: &[Value], path: &str) -> Result<String, EncodeError> {
        let parts: Result<Vec<String>, EncodeError> = items
            .iter()
            .map(|v| self.encode_value(v, path))
            .collect();
        Ok(parts?.join(", "))
    }

    fn encode_units(&self, units: &str, path: &str) -> Result<String, EncodeError> {
        if self.strict_odl() && !odl_units_allowed(units) {
            return Err(self.err(
                path,
                format!("\"{}\" is not a valid ODL units expression", units),
            ));
        }
        let (open, close) = self.grammar.units_delimiters;
        Ok(format!("{}{}{}", open, units, close))
    }

    fn encode_symbol(&self, s: &str, path: &str) -> Result<String, EncodeError> {
        if self.strict_odl() {
            if is_encoder_identifier(s) {
                return Ok(s.to_string());
            }
            return self.quote_string(s, path);
        }
        if self.needs_quotes(s) {
            self.quote_string(s, path)
        } else {
            Ok(s.to_string())
        }
    }

    /// Whether an unquoted rendering of *s* would read back as something
    /// other than this symbol.
    fn needs_quotes(&self, s: &str) -> bool {
        if s.is_empty() {
            return true;
        }
        let probe = Token::new(TokenKind::Word, s, SourcePos::start());
        !probe.is_parameter_name(&self.grammar)
            || self.grammar.is_true_keyword(s)
            || self.grammar.is_false_keyword(s)
            || self.grammar.is_none_keyword(s)
    }

    fn quote_string(&self, s: &str, path: &str) -> Result<String, EncodeError> {
        if self.strict_odl() {
            if self.config.symbol_single_quote && is_odl_symbol_string(s) {
                return Ok(format!("'{}'", s));
            }
            // Text strings escape backslashes and double quotes.
            let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
            return Ok(format!("\"{}\"", escaped));
        }
        // Dialects that read backslash escapes need literal backslashes
        // protected.
        let s = if self.grammar.backslash_escape {
            std::borrow::Cow::Owned(s.replace('\\', "\\\\"))
        } else {
            std::borrow::Cow::Borrowed(s)
        };
        if !s.contains('"') {
            return Ok(format!("\"{}\"", s));
        }
        if !s.contains('\'') {
            return Ok(format!("'{}'", s));
        }
        if self.grammar.doubled_quote_escape {
            return Ok(format!("\"{}\"", s.replace('"', "\"\"")));
        }
        Err(self.err(path, "string contains both quote characters"))
    }

    fn check_parameter_name(&self, key: &str, path: &str) -> Result<(), EncodeError> {
        if self.strict_odl() {
            if key.chars().count() > 30 {
                return Err(self.err(
                    path,
                    "ODL keywords must be 30 characters or less in length",
                ));
            }
            let bare = key.strip_prefix('^').unwrap_or(key);
            if !is_assignment_name(bare) {
                return Err(self.err(path, "not a valid ODL identifier"));
            }
            return Ok(());
        }
        let probe = Token::new(TokenKind::Word, key, SourcePos::start());
        if !probe.is_parameter_name(&self.grammar) {
            return Err(self.err(path, "not a valid parameter name"));
        }
        Ok(())
    }

    fn strict_odl(&self) -> bool {
        matches!(self.config.dialect, Dialect::Odl | Dialect::Pds3)
    }

    fn err(&self, path: &str, rule: impl Into<String>) -> EncodeError {
        EncodeError {
            key_path: path.to_string(),
            rule: rule.into(),
            dialect: self.config.dialect,
        }
    }
}

/// Splits on spaces that are not inside a quoted span, so wrapping never
/// breaks a quoted string apart.
fn split_outside_quotes(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b' ' => {
                if i > start {
                    parts.push(&text[start..i]);
                }
                start = i + 1;
            }
            None => {}
        }
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", path, key)
    }
}

fn offset_suffix(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    let (h, m) = (abs / 3600, (abs % 3600) / 60);
    if m == 0 {
        format!("{}{:02}", sign, h)
    } else {
        format!("{}{:02}:{:02}", sign, h, m)
    }
}

/// An ODL `scalar_value`: numbers, date/times, strings, and numeric
/// quantities.
fn is_odl_scalar(value: &Value) -> bool {
    match value {
        Value::Integer(_)
        | Value::Based(_)
        | Value::Real(_)
        | Value::Boolean(_)
        | Value::String(_)
        | Value::Symbol(_)
        | Value::Date(_)
        | Value::Time(_)
        | Value::DateTime(_)
        | Value::EmptyAtLine(_) => true,
        Value::Quantity(q) => q.value.as_real().is_some(),
        _ => false,
    }
}

/// The encoder-side ODL identifier rule: letters, digits, and
/// underscores, starting with a letter and not ending with an underscore.
fn is_encoder_identifier(s: &str) -> bool {
    is_odl_identifier(s) && !s.ends_with('_')
}

/// `identifier` or `namespace:identifier`.
fn is_assignment_name(s: &str) -> bool {
    match s.split_once(':') {
        Some((ns, el)) => is_encoder_identifier(ns) && is_encoder_identifier(el),
        None => is_encoder_identifier(s),
    }
}

/// An ODL symbol string: printable ASCII with no apostrophes and no
/// format effectors.
fn is_odl_symbol_string(s: &str) -> bool {
    !s.is_empty()
        && !s.contains('\'')
        && s.chars().all(|c| c.is_ascii() && !c.is_ascii_control())
}

/// ODL units expressions allow identifiers combined with `*`, `/`, `(`,
/// `)`, `-`, white space, and integer `**` exponents.
fn odl_units_allowed(units: &str) -> bool {
    let stripped: String = units
        .chars()
        .filter(|c| !c.is_whitespace() && !"*/()-".contains(*c))
        .collect();
    if !is_odl_identifier(&stripped) {
        return false;
    }
    let bytes = units.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if &bytes[i..i + 2] == b"**" {
            let mut j = i + 2;
            if bytes.get(j) == Some(&b'-') {
                j += 1;
            }
            let digits = bytes[j..].iter().take_while(|b| b.is_ascii_digit()).count();
            if digits == 0 {
                return false;
            }
            i = j + digits;
        } else {
            i += 1;
        }
    }
    true
}

/// PDS GROUP restrictions: flat, no repeated keys, no integer-valued
/// pointer parameters.
fn is_pds_group(body: &Label) -> bool {
    if body.values().any(Value::is_aggregation) {
        return false;
    }
    for (key, value) in body.iter() {
        if key.starts_with('^') {
            let integer_pointer = match value {
                Value::Integer(_) | Value::Based(_) => true,
                Value::Quantity(q) => q.value.as_int().is_some(),
                _ => false,
            };
            if integer_pointer {
                return false;
            }
        }
    }
    let distinct: HashSet<&str> = body.keys().collect();
    distinct.len() == body.len()
}
