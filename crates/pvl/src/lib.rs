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

//! # PVL — Parameter Value Language
//!
//! PVL is the attribute-label text format used by NASA's Planetary Data
//! System (PDS) and related planetary-science archives (ISIS cube labels,
//! ODL, CCSDS PVL).  This crate reads any of those dialects — including
//! the malformed labels legacy producers wrote — into an order-preserving
//! [`Label`] tree, and writes trees back out strictly conforming to a
//! chosen dialect.
//!
//! ## Quick start
//!
//! ```
//! let label = pvl::loads("
//!   foo = bar
//!   items = (1, 2, 3)
//!   END
//! ").unwrap();
//!
//! assert_eq!(label["foo"].as_str(), Some("bar"));
//!
//! let text = pvl::dumps(&label).unwrap();
//! assert!(text.starts_with("foo"));
//! ```
//!
//! Loading defaults to the permissive Omni dialect, which accepts
//! everything the published dialects accept plus common real-world
//! deviations.  Writing defaults to the PVL profile; pass a
//! [`WriteConfig`] for ODL, PDS3, or ISIS output:
//!
//! ```
//! use pvl::WriteConfig;
//!
//! let label = pvl::loads("emissivity = 0.94 <dimensionless>\nEND").unwrap();
//! let pds3 = pvl::dumps_with(&label, &WriteConfig::pds3()).unwrap();
//! assert!(pds3.starts_with("EMISSIVITY = 0.94"));
//! ```
//!
//! Files that mix a text label with trailing binary image data (ISIS
//! cubes, attached-label PDS products) load with [`load`]; the label is
//! extracted and the binary tail never touches the parser.

use std::fs;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

pub use pvl_core::{
    extract_text, BasedInteger, Decoder, DecodeError, Dialect, Grammar, KeyError, Label,
    LexError, LoadError, ParseError, Parser, PvlDateTime, PvlTime, Quantity, QuantityError,
    QuantityFactory, RealFactory, SourcePos, TextEncoding, Token, TokenKind, Value,
};
pub use pvl_write::{write_string, EncodeError, WriteConfig, Writer};

/// Lexer internals, for callers that want the raw token stream.
pub mod lex {
    pub use pvl_core::lexer::{strip_dash_continuations, Lexer};
    pub use pvl_core::token::{SourcePos, Token, TokenKind};
}

/// Any error this crate can produce.
#[derive(Debug, Error)]
pub enum PvlError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Quantity(#[from] QuantityError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LoadError> for PvlError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Lex(e) => Self::Lex(e),
            LoadError::Parse(e) => Self::Parse(e),
            LoadError::Decode(e) => Self::Decode(e),
            LoadError::Quantity(e) => Self::Quantity(e),
        }
    }
}

/// Options for the `load` family of functions.
///
/// ```
/// use pvl::{Dialect, ParseOptions};
///
/// let options = ParseOptions::new(Dialect::Pds3);
/// let err = pvl::loads_with("A =\nEND", &options).unwrap_err();
/// assert!(err.to_string().contains("value"));
/// ```
#[derive(Clone, Default)]
pub struct ParseOptions {
    /// The reading dialect; defaults to [`Dialect::Omni`].
    dialect: Option<Dialect>,
    /// Overrides the dialect's default recovery behavior.
    strict: Option<bool>,
    encoding: TextEncoding,
    quantity_factory: Option<QuantityFactory>,
    real_factory: Option<RealFactory>,
}

impl ParseOptions {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect: Some(dialect),
            ..Self::default()
        }
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// `true` turns empty-value recovery off even for Omni/ISIS; `false`
    /// turns it on for the published dialects.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Byte decoding for [`load`]/[`load_bytes`]; defaults to UTF-8 with
    /// an ASCII fallback.
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Every `value <units>` construct is built by *factory* instead of
    /// the default [`Quantity`].
    pub fn quantity_factory(mut self, factory: QuantityFactory) -> Self {
        self.quantity_factory = Some(factory);
        self
    }

    /// Every real-number literal is offered to *factory* before the
    /// default `f64` conversion.
    pub fn real_factory(mut self, factory: RealFactory) -> Self {
        self.real_factory = Some(factory);
        self
    }

    fn build_parser(&self) -> Parser {
        let dialect = self.dialect.unwrap_or(Dialect::Omni);
        let mut decoder = Decoder::for_dialect(dialect);
        if let Some(f) = &self.quantity_factory {
            decoder = decoder.with_quantity_factory(f.clone());
        }
        if let Some(f) = &self.real_factory {
            decoder = decoder.with_real_factory(f.clone());
        }
        let mut parser = Parser::with_decoder(decoder);
        if let Some(strict) = self.strict {
            parser = parser.permissive(!strict);
        }
        parser
    }
}

impl std::fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseOptions")
            .field("dialect", &self.dialect.unwrap_or(Dialect::Omni))
            .field("strict", &self.strict)
            .field("encoding", &self.encoding)
            .field("quantity_factory", &self.quantity_factory.is_some())
            .field("real_factory", &self.real_factory.is_some())
            .finish()
    }
}

/// Parses PVL text with the permissive Omni dialect.
pub fn loads(text: &str) -> Result<Label, PvlError> {
    loads_with(text, &ParseOptions::default())
}

/// Parses PVL text under *options*.
pub fn loads_with(text: &str, options: &ParseOptions) -> Result<Label, PvlError> {
    Ok(options.build_parser().parse(text)?)
}

/// Loads the label from the file at *path*.
///
/// The file may carry binary data after the label text (an ISIS cube, an
/// attached-label PDS product); everything after the top-level `END`
/// statement is ignored.
pub fn load(path: impl AsRef<Path>) -> Result<Label, PvlError> {
    load_with(path, &ParseOptions::default())
}

pub fn load_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Label, PvlError> {
    let bytes = fs::read(path)?;
    load_bytes_with(&bytes, options)
}

/// Loads the label from an open reader.
pub fn load_from(mut reader: impl Read) -> Result<Label, PvlError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    load_bytes(&bytes)
}

/// Loads the label from a byte buffer.
pub fn load_bytes(bytes: &[u8]) -> Result<Label, PvlError> {
    load_bytes_with(bytes, &ParseOptions::default())
}

pub fn load_bytes_with(bytes: &[u8], options: &ParseOptions) -> Result<Label, PvlError> {
    let text = extract_text(bytes, options.encoding);
    loads_with(&text, options)
}

/// Serializes *label* with the PVL profile.
pub fn dumps(label: &Label) -> Result<String, PvlError> {
    dumps_with(label, &WriteConfig::pvl())
}

/// Serializes *label* under *config*.
pub fn dumps_with(label: &Label, config: &WriteConfig) -> Result<String, PvlError> {
    Ok(write_string(label, config)?)
}

/// Serializes *label* into *sink*, returning the number of bytes written.
pub fn dump(
    label: &Label,
    sink: &mut impl std::io::Write,
    config: &WriteConfig,
) -> Result<usize, PvlError> {
    let text = write_string(label, config)?;
    sink.write_all(text.as_bytes())?;
    Ok(text.len())
}
