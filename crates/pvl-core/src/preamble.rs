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

//! Extracting label text from byte buffers that may carry trailing binary
//! data.
//!
//! Products like ISIS cube files store a PVL label followed by raw image
//! bytes.  [`extract_text`] decodes the whole buffer as text when it can;
//! when it cannot, each non-ASCII byte becomes U+FFFD, a character no
//! grammar accepts, so the lexer stops cleanly once the parser has
//! consumed the top-level `END` statement.

/// The character encodings a label buffer may be decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8, with a byte-wise ASCII fallback on invalid input.
    #[default]
    Utf8,
    /// ISO 8859-1; every byte maps to the code point of the same value.
    Latin1,
}

/// Decodes *bytes* to label text under *encoding*.
///
/// UTF-8 input that fails to decode falls back to byte-wise ASCII with
/// each non-ASCII byte replaced by U+FFFD.  Latin-1 never fails.
pub fn extract_text(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Utf8 => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => ascii_with_replacement(bytes),
        },
        TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn ascii_with_replacement(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii() {
        let text = extract_text(b"a = 1\nEND\n", TextEncoding::Utf8);
        assert_eq!(text, "a = 1\nEND\n");
    }

    #[test]
    fn test_valid_utf8() {
        let text = extract_text("k = 'caf\u{e9}'\nEND".as_bytes(), TextEncoding::Utf8);
        assert!(text.contains('\u{e9}'));
    }

    #[test]
    fn test_binary_tail_replaced() {
        let mut bytes = b"a = 1\nEND\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, 0x00, 0x89]);
        let text = extract_text(&bytes, TextEncoding::Utf8);
        assert!(text.starts_with("a = 1\nEND\n"));
        assert!(text.contains('\u{FFFD}'));
        // ASCII NUL survives as itself.
        assert!(text.contains('\0'));
    }

    #[test]
    fn test_latin1_never_fails() {
        let bytes = [b'k', b' ', b'=', b' ', 0xe9, b'\n'];
        let text = extract_text(&bytes, TextEncoding::Latin1);
        assert_eq!(text, "k = \u{e9}\n");
    }

    #[test]
    fn test_parses_after_extraction() {
        use crate::grammar::Dialect;
        use crate::parser::Parser;

        let mut bytes = b"PRODUCT_ID = X17\nEND\n".to_vec();
        bytes.extend_from_slice(&[0x92, 0x00, 0xff, 0x31, 0x41]);
        let text = extract_text(&bytes, TextEncoding::Utf8);
        let label = Parser::new(Dialect::Omni).parse(&text).unwrap();
        assert_eq!(label.len(), 1);
        assert_eq!(label.get("PRODUCT_ID").unwrap().as_str(), Some("X17"));
    }
}
