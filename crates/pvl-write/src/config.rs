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

//! Formatting profiles for the writer.
//!
//! A [`WriteConfig`] pins down everything about the emitted text that the
//! dialect table leaves to the producer: indentation, line width, the
//! statement delimiter, keyword casing, and the PDS3-specific switches.

use pvl_core::{Dialect, Grammar};

/// Formatting configuration for one output dialect.
#[derive(Debug, Clone)]
pub struct WriteConfig {
    pub dialect: Dialect,
    /// Spaces per nesting level.
    pub indent: usize,
    /// Target line width in characters.
    pub width: usize,
    /// Line terminator.
    pub newline: String,
    /// Whether each statement ends with the `;` delimiter.
    pub end_delimiter: bool,
    /// Whether end aggregation statements repeat the block name
    /// (`END_GROUP = name`).
    pub aggregation_end: bool,
    /// Whether parameter names are uppercased (PDS3).
    pub uppercase_params: bool,
    /// Whether a newline follows the final `END`.
    pub end_newline: bool,
    /// Whether a blank line follows the final `END` (PDS3).
    pub trailing_blank: bool,
    /// Opt-in: rewrite GROUPs that violate the PDS3 group rules as
    /// OBJECTs instead of failing.
    pub convert_group_to_object: bool,
    /// Replace each horizontal tab with this many spaces; 0 keeps tabs.
    pub tab_replace: usize,
    /// Whether UTC times carry a trailing `Z` (PDS3).
    pub time_trailing_z: bool,
    /// Whether symbol strings quote with `'` rather than `"` (ODL/PDS3).
    pub symbol_single_quote: bool,
}

impl WriteConfig {
    /// CCSDS PVL output: `;` delimiters, `BEGIN_GROUP` keywords, no
    /// trailing newline.
    pub fn pvl() -> Self {
        Self {
            dialect: Dialect::Pvl,
            indent: 2,
            width: 80,
            newline: "\n".to_string(),
            end_delimiter: true,
            aggregation_end: true,
            uppercase_params: false,
            end_newline: false,
            trailing_blank: false,
            convert_group_to_object: false,
            tab_replace: 0,
            time_trailing_z: false,
            symbol_single_quote: false,
        }
    }

    /// ODL output: no delimiters, `GROUP`/`OBJECT` keywords, newline after
    /// `END`.
    pub fn odl() -> Self {
        Self {
            dialect: Dialect::Odl,
            end_delimiter: false,
            end_newline: true,
            symbol_single_quote: true,
            ..Self::pvl()
        }
    }

    /// PDS3 label output: ODL plus uppercase parameter names, UTC-only
    /// times with a trailing `Z`, tab replacement, and a blank line after
    /// `END`.
    pub fn pds3() -> Self {
        Self {
            dialect: Dialect::Pds3,
            uppercase_params: true,
            trailing_blank: true,
            tab_replace: 4,
            time_trailing_z: true,
            ..Self::odl()
        }
    }

    /// ISIS cube-label output: CamelCase `Object`/`Group` keywords and no
    /// delimiters.
    pub fn isis() -> Self {
        Self {
            dialect: Dialect::Isis,
            end_delimiter: false,
            ..Self::pvl()
        }
    }

    /// The profile matching *dialect*; `Omni` is a reading dialect and
    /// falls back to the PVL profile.
    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Pvl | Dialect::Omni => Self::pvl(),
            Dialect::Odl => Self::odl(),
            Dialect::Pds3 => Self::pds3(),
            Dialect::Isis => Self::isis(),
        }
    }

    pub fn grammar(&self) -> Grammar {
        self.dialect.grammar()
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    pub fn with_end_delimiter(mut self, on: bool) -> Self {
        self.end_delimiter = on;
        self
    }

    pub fn with_aggregation_end(mut self, on: bool) -> Self {
        self.aggregation_end = on;
        self
    }

    pub fn with_convert_group_to_object(mut self, on: bool) -> Self {
        self.convert_group_to_object = on;
        self
    }

    pub fn with_time_trailing_z(mut self, on: bool) -> Self {
        self.time_trailing_z = on;
        self
    }

    pub fn with_symbol_single_quote(mut self, on: bool) -> Self {
        self.symbol_single_quote = on;
        self
    }

    pub fn with_tab_replace(mut self, spaces: usize) -> Self {
        self.tab_replace = spaces;
        self
    }
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self::pvl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_match_dialect_table() {
        let pvl = WriteConfig::pvl();
        assert!(pvl.end_delimiter);
        assert!(!pvl.uppercase_params);
        assert!(!pvl.trailing_blank);

        let odl = WriteConfig::odl();
        assert!(!odl.end_delimiter);
        assert!(!odl.uppercase_params);
        assert!(odl.end_newline);

        let pds3 = WriteConfig::pds3();
        assert!(!pds3.end_delimiter);
        assert!(pds3.uppercase_params);
        assert!(pds3.trailing_blank);
        assert!(pds3.time_trailing_z);
        assert_eq!(pds3.tab_replace, 4);

        let isis = WriteConfig::isis();
        assert!(!isis.end_delimiter);
        assert!(!isis.uppercase_params);
    }

    #[test]
    fn test_block_keywords_come_from_grammar() {
        assert_eq!(
            WriteConfig::pvl().grammar().group_pref_keywords.0,
            "BEGIN_GROUP"
        );
        assert_eq!(WriteConfig::pds3().grammar().object_pref_keywords.0, "OBJECT");
        assert_eq!(WriteConfig::isis().grammar().object_pref_keywords.0, "Object");
    }

    #[test]
    fn test_for_dialect_omni_falls_back() {
        assert_eq!(WriteConfig::for_dialect(Dialect::Omni).dialect, Dialect::Pvl);
    }

    #[test]
    fn test_builder_setters() {
        let c = WriteConfig::pvl()
            .with_indent(4)
            .with_width(132)
            .with_newline("\r\n")
            .with_end_delimiter(false);
        assert_eq!(c.indent, 4);
        assert_eq!(c.width, 132);
        assert_eq!(c.newline, "\r\n");
        assert!(!c.end_delimiter);
    }
}
