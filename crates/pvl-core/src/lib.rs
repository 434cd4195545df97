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

//! Core reading machinery for PVL (Parameter Value Language) text.
//!
//! PVL is the attribute-label format used by NASA's Planetary Data System
//! and related planetary-science archives.  This crate provides:
//!
//! - [`Grammar`]/[`Dialect`]: immutable rule tables for the PVL, ODL,
//!   PDS3, ISIS, and Omni dialects;
//! - [`lexer::Lexer`]: a restartable token stream;
//! - [`Decoder`]: token-to-scalar conversion with injectable quantity and
//!   real factories;
//! - [`Parser`]: the label-tree builder, with permissive recovery for
//!   real-world malformed labels;
//! - [`Label`]/[`Value`]: the order-preserving label tree;
//! - [`preamble`]: text extraction from files with trailing binary data.
//!
//! Writing label text lives in the companion `pvl-write` crate; the `pvl`
//! facade crate ties both together behind `load`/`dump` functions.

pub mod decoder;
pub mod error;
pub mod grammar;
pub mod label;
pub mod lexer;
pub mod parser;
pub mod preamble;
pub mod token;
pub mod value;

pub use decoder::{Decoder, QuantityFactory, RealFactory};
pub use error::{DecodeError, LexError, LoadError, ParseError, QuantityError};
pub use grammar::{Dialect, Grammar};
pub use label::{KeyError, Label};
pub use parser::Parser;
pub use preamble::{extract_text, TextEncoding};
pub use token::{SourcePos, Token, TokenKind};
pub use value::{BasedInteger, PvlDateTime, PvlTime, Quantity, Value};
