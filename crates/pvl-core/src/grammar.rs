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

//! Grammar descriptors for the PVL dialects.
//!
//! A [`Grammar`] is an immutable table of lexical and syntactic rules that
//! parameterizes the lexer, decoder, parser, and writer.  One record is
//! populated per dialect; the tables are never mutated after construction,
//! so a grammar may be shared freely across threads.

use std::fmt;

/// The PVL dialects understood by this crate.
///
/// `Pvl` is the permissive CCSDS-641.0-B-2 base language, `Odl` the PDS3
/// Object Description Language, `Pds3` the PDS3 label standard (ODL plus
/// archive restrictions), `Isis` the de-facto ISIS cube-label flavor, and
/// `Omni` a superset that reads anything the other four read.  `Omni` is a
/// reading dialect only; text should be written with one of the published
/// dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    Pvl,
    Odl,
    Pds3,
    Isis,
    Omni,
}

impl Dialect {
    /// Returns the grammar record for this dialect.
    pub fn grammar(self) -> Grammar {
        match self {
            Self::Pvl => Grammar::pvl(),
            Self::Odl => Grammar::odl(),
            Self::Pds3 => Grammar::pds3(),
            Self::Isis => Grammar::isis(),
            Self::Omni => Grammar::omni(),
        }
    }

    /// Dialects that recover from malformed labels instead of failing fast.
    pub fn is_permissive(self) -> bool {
        matches!(self, Self::Isis | Self::Omni)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pvl => write!(f, "PVL"),
            Self::Odl => write!(f, "ODL"),
            Self::Pds3 => write!(f, "PDS3"),
            Self::Isis => write!(f, "ISIS"),
            Self::Omni => write!(f, "Omni"),
        }
    }
}

/// Where the optional sign may appear in a based-integer literal.
///
/// PVL writes `[sign]radix#digits#`, ODL writes `radix#[sign]digits#`, and
/// Omni accepts both placements (even together).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasedSign {
    BeforeRadix,
    AfterRadix,
    Either,
}

/// Character repertoire check applied when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// Most of ISO 8859-1, minus control characters (the PVL character set).
    Latin1Subset,
    /// Plain ASCII (the ODL character set).
    Ascii,
}

const SPACING: &[char] = &[' ', '\t'];
const FORMAT_EFFECTORS: &[char] = &['\n', '\r', '\x0b', '\x0c'];
const WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0b', '\x0c'];

const RESERVED: &[char] = &[
    '&', '<', '>', '\'', '{', '}', ',', '[', ']', '=', '!', '#', '(', ')',
    '%', '+', '"', ';', '~', '|',
];

// ISIS writes unquoted plus signs, so `+` comes off the reserved list.
const RESERVED_NO_PLUS: &[char] = &[
    '&', '<', '>', '\'', '{', '}', ',', '[', ']', '=', '!', '#', '(', ')',
    '%', '"', ';', '~', '|',
];

// Omni additionally treats NUL as reserved, so that producers that misuse
// NUL as a separator still split into tokens.
const RESERVED_OMNI: &[char] = &[
    '&', '<', '>', '\'', '{', '}', ',', '[', ']', '=', '!', '#', '(', ')',
    '%', '"', ';', '~', '|', '\0',
];

const COMMENTS_C: &[(&str, &str)] = &[("/*", "*/")];
const COMMENTS_C_HASH: &[(&str, &str)] = &[("/*", "*/"), ("#", "\n")];

const GROUP_KEYWORDS_PVL: &[(&str, &str)] =
    &[("GROUP", "END_GROUP"), ("BEGIN_GROUP", "END_GROUP")];
const OBJECT_KEYWORDS_PVL: &[(&str, &str)] =
    &[("OBJECT", "END_OBJECT"), ("BEGIN_OBJECT", "END_OBJECT")];
const GROUP_KEYWORDS_ISIS: &[(&str, &str)] = &[("GROUP", "END_GROUP")];
const OBJECT_KEYWORDS_ISIS: &[(&str, &str)] = &[("OBJECT", "END_OBJECT")];

const RADICES_PVL: &[u32] = &[2, 8, 16];

/// An immutable description of one PVL dialect's lexical rules.
///
/// Keyword comparisons are always case-insensitive; the `*_pref_keywords`
/// fields carry the casing a writer should emit.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub dialect: Dialect,
    pub whitespace: &'static [char],
    pub format_effectors: &'static [char],
    pub reserved_characters: &'static [char],
    /// Statement-end delimiter.
    pub delimiter: char,
    /// Ordered open/close comment delimiter pairs.
    pub comments: &'static [(&'static str, &'static str)],
    pub quotes: &'static [char],
    pub none_keyword: &'static str,
    pub true_keyword: &'static str,
    pub false_keyword: &'static str,
    /// Begin/end keyword casing preferred when writing.
    pub group_pref_keywords: (&'static str, &'static str),
    pub object_pref_keywords: (&'static str, &'static str),
    /// Accepted begin -> end keyword pairs when reading.
    pub group_keywords: &'static [(&'static str, &'static str)],
    pub object_keywords: &'static [(&'static str, &'static str)],
    pub end_statements: &'static [&'static str],
    pub set_delimiters: (char, char),
    pub sequence_delimiters: (char, char),
    pub units_delimiters: (char, char),
    /// Sign placement in based-integer literals.
    pub based_sign: BasedSign,
    /// `Some` restricts the radix to the listed values; `None` allows 2..=16.
    pub restricted_radices: Option<&'static [u32]>,
    /// Whether `:60` seconds (leap seconds) are legal in times.
    pub allow_leap_second: bool,
    /// Whether date/times without an explicit offset are assumed UTC.
    pub default_timezone_utc: bool,
    /// Whether a trailing `-` joins a line to the next (ISIS continuation).
    pub continuation_lines: bool,
    /// Whether a doubled quote escapes itself inside a quoted string.
    pub doubled_quote_escape: bool,
    /// Whether backslash escapes are recognized inside a quoted string.
    pub backslash_escape: bool,
    pub charset: Charset,
}

impl Grammar {
    /// The CCSDS-641.0-B-2 "Blue Book" grammar.
    pub fn pvl() -> Self {
        Self {
            dialect: Dialect::Pvl,
            whitespace: WHITESPACE,
            format_effectors: FORMAT_EFFECTORS,
            reserved_characters: RESERVED,
            delimiter: ';',
            comments: COMMENTS_C,
            quotes: &['"', '\''],
            none_keyword: "NULL",
            true_keyword: "TRUE",
            false_keyword: "FALSE",
            group_pref_keywords: ("BEGIN_GROUP", "END_GROUP"),
            object_pref_keywords: ("BEGIN_OBJECT", "END_OBJECT"),
            group_keywords: GROUP_KEYWORDS_PVL,
            object_keywords: OBJECT_KEYWORDS_PVL,
            end_statements: &["END"],
            set_delimiters: ('{', '}'),
            sequence_delimiters: ('(', ')'),
            units_delimiters: ('<', '>'),
            based_sign: BasedSign::BeforeRadix,
            restricted_radices: Some(RADICES_PVL),
            allow_leap_second: true,
            default_timezone_utc: false,
            continuation_lines: false,
            doubled_quote_escape: true,
            backslash_escape: false,
            charset: Charset::Latin1Subset,
        }
    }

    /// The PDS3 Object Description Language grammar (PDS3 Standards
    /// Reference, Chapter 12).
    pub fn odl() -> Self {
        Self {
            dialect: Dialect::Odl,
            group_pref_keywords: ("GROUP", "END_GROUP"),
            object_pref_keywords: ("OBJECT", "END_OBJECT"),
            based_sign: BasedSign::AfterRadix,
            restricted_radices: None,
            allow_leap_second: false,
            doubled_quote_escape: false,
            backslash_escape: true,
            charset: Charset::Ascii,
            ..Self::pvl()
        }
    }

    /// The PDS3 label grammar: ODL rules plus the UTC assumption.
    pub fn pds3() -> Self {
        Self {
            dialect: Dialect::Pds3,
            default_timezone_utc: true,
            ..Self::odl()
        }
    }

    /// The ISIS cube-label grammar.
    ///
    /// ISIS does not recognize the `BEGIN_*` keyword forms, writes
    /// CamelCase block keywords, allows unquoted `+`, uses `#` line
    /// comments, and joins lines with a trailing dash.
    pub fn isis() -> Self {
        Self {
            dialect: Dialect::Isis,
            reserved_characters: RESERVED_NO_PLUS,
            comments: COMMENTS_C_HASH,
            group_pref_keywords: ("Group", "End_Group"),
            object_pref_keywords: ("Object", "End_Object"),
            group_keywords: GROUP_KEYWORDS_ISIS,
            object_keywords: OBJECT_KEYWORDS_ISIS,
            continuation_lines: true,
            doubled_quote_escape: true,
            backslash_escape: true,
            ..Self::pvl()
        }
    }

    /// A broadly permissive reading grammar that accepts every construct
    /// the other grammars accept.
    pub fn omni() -> Self {
        Self {
            dialect: Dialect::Omni,
            reserved_characters: RESERVED_OMNI,
            comments: COMMENTS_C_HASH,
            based_sign: BasedSign::Either,
            restricted_radices: None,
            continuation_lines: true,
            doubled_quote_escape: true,
            backslash_escape: true,
            ..Self::pvl()
        }
    }

    pub fn is_whitespace(&self, c: char) -> bool {
        self.whitespace.contains(&c)
    }

    pub fn is_reserved(&self, c: char) -> bool {
        self.reserved_characters.contains(&c)
    }

    pub fn is_quote(&self, c: char) -> bool {
        self.quotes.contains(&c)
    }

    /// Whether this grammar recognizes `#`-to-end-of-line comments.
    pub fn has_hash_comments(&self) -> bool {
        self.comments.iter().any(|&(open, _)| open == "#")
    }

    pub fn radix_allowed(&self, radix: u32) -> bool {
        match self.restricted_radices {
            Some(list) => list.contains(&radix),
            None => (2..=16).contains(&radix),
        }
    }

    fn aggregation_pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.group_keywords
            .iter()
            .chain(self.object_keywords.iter())
            .copied()
    }

    /// Returns the end keyword paired with *begin*, if *begin* is a begin
    /// aggregation keyword of this grammar.
    pub fn aggregation_end_for(&self, begin: &str) -> Option<&'static str> {
        self.aggregation_pairs()
            .find(|(b, _)| b.eq_ignore_ascii_case(begin))
            .map(|(_, e)| e)
    }

    pub fn is_begin_group(&self, word: &str) -> bool {
        self.group_keywords
            .iter()
            .any(|(b, _)| b.eq_ignore_ascii_case(word))
    }

    pub fn is_begin_object(&self, word: &str) -> bool {
        self.object_keywords
            .iter()
            .any(|(b, _)| b.eq_ignore_ascii_case(word))
    }

    pub fn is_begin_aggregation(&self, word: &str) -> bool {
        self.is_begin_group(word) || self.is_begin_object(word)
    }

    pub fn is_aggregation_end(&self, word: &str) -> bool {
        self.aggregation_pairs()
            .any(|(_, e)| e.eq_ignore_ascii_case(word))
    }

    pub fn is_end_statement(&self, word: &str) -> bool {
        self.end_statements
            .iter()
            .any(|e| e.eq_ignore_ascii_case(word))
    }

    /// `END` plus every begin/end aggregation keyword.
    pub fn is_reserved_keyword(&self, word: &str) -> bool {
        self.is_end_statement(word)
            || self
                .aggregation_pairs()
                .any(|(b, e)| b.eq_ignore_ascii_case(word) || e.eq_ignore_ascii_case(word))
    }

    pub fn is_none_keyword(&self, word: &str) -> bool {
        self.none_keyword.eq_ignore_ascii_case(word)
    }

    pub fn is_true_keyword(&self, word: &str) -> bool {
        self.true_keyword.eq_ignore_ascii_case(word)
    }

    pub fn is_false_keyword(&self, word: &str) -> bool {
        self.false_keyword.eq_ignore_ascii_case(word)
    }

    /// Whether *c* belongs to this grammar's character repertoire.
    ///
    /// The vertical tab is shaded on page B-3 of the PVL specification by
    /// mistake; it is allowed here.
    pub fn char_allowed(&self, c: char) -> bool {
        match self.charset {
            Charset::Ascii => c.is_ascii(),
            Charset::Latin1Subset => {
                let o = c as u32;
                o <= 255
                    && !(o <= 8)
                    && !(14..=31).contains(&o)
                    && !(127..=159).contains(&o)
            }
        }
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::pvl()
    }
}
