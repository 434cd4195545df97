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

//! Writing PVL label trees back to text.
//!
//! A [`WriteConfig`] carries the formatting profile of one output dialect
//! (PVL, ODL, PDS3, or ISIS) and a [`Writer`] serializes a
//! [`Label`](pvl_core::Label) under it.  The writer validates as it goes:
//! anything the requested dialect forbids is an [`EncodeError`] naming
//! the parameter and the violated rule.
//!
//! ```
//! use pvl_core::{Label, Value};
//! use pvl_write::{write_string, WriteConfig};
//!
//! let mut label = Label::new();
//! label.append("mission", Value::Symbol("Cassini".into()));
//! let text = write_string(&label, &WriteConfig::pvl()).unwrap();
//! assert_eq!(text, "mission = Cassini;\nEND;");
//! ```

mod config;
mod writer;

use pvl_core::{Dialect, Label};
use thiserror::Error;

pub use config::WriteConfig;
pub use writer::Writer;

/// A label that cannot be expressed in the requested dialect.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot encode \"{key_path}\" for {dialect}: {rule}")]
pub struct EncodeError {
    /// Slash-separated path of the offending parameter, or `(label)`.
    pub key_path: String,
    /// The dialect rule that was violated.
    pub rule: String,
    pub dialect: Dialect,
}

/// Serializes *label* under *config*.
pub fn write_string(label: &Label, config: &WriteConfig) -> Result<String, EncodeError> {
    Writer::new(config.clone()).write_label(label)
}
