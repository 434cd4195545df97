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

//! The `pvl-translate` operation: read any PVL text, write one dialect.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pvl::{PvlError, WriteConfig};

use crate::json::label_to_json;

/// Output formats of `pvl-translate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[value(name = "PVL")]
    Pvl,
    #[value(name = "ODL")]
    Odl,
    #[value(name = "PDS3")]
    Pds3,
    #[value(name = "ISIS")]
    Isis,
    #[value(name = "JSON")]
    Json,
}

/// Command line of `pvl-translate`.
///
/// Convert PVL text to a specific PVL dialect.  Reads a file with PVL
/// text (any of the kinds of files that pvl reads) or standard input,
/// and converts it to the requested dialect.
#[derive(Debug, Parser)]
#[command(name = "pvl-translate", version, about, long_about = None)]
pub struct TranslateCli {
    /// The format to write.
    #[arg(short = 'f', long = "output-format", value_name = "FORMAT")]
    pub output_format: OutputFormat,

    /// File containing PVL text to translate; standard input when absent.
    pub infile: Option<PathBuf>,

    /// File to write translated PVL to; standard output when absent.
    pub outfile: Option<PathBuf>,
}

impl TranslateCli {
    /// Parses command-line tokens, accepting the traditional single-dash
    /// `-of` spelling alongside `--output-format` and `-f`.
    ///
    /// clap has no multi-character short flags, so a literal `-of` token
    /// is rewritten before parsing.
    pub fn parse_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let normalized = args.into_iter().map(|arg| {
            let arg: OsString = arg.into();
            if arg == "-of" {
                OsString::from("--output-format")
            } else {
                arg
            }
        });
        Self::parse_from(normalized)
    }
}

/// Loads *bytes* with the permissive reader and renders them in *format*.
pub fn translate(bytes: &[u8], format: OutputFormat) -> Result<String, PvlError> {
    let label = pvl::load_bytes(bytes)?;
    let text = match format {
        OutputFormat::Pvl => pvl::dumps_with(&label, &WriteConfig::pvl())?,
        OutputFormat::Odl => pvl::dumps_with(&label, &WriteConfig::odl())?,
        OutputFormat::Pds3 => pvl::dumps_with(&label, &WriteConfig::pds3())?,
        OutputFormat::Isis => pvl::dumps_with(&label, &WriteConfig::isis())?,
        OutputFormat::Json => {
            let mut s = serde_json::to_string_pretty(&label_to_json(&label))
                .expect("label JSON is always serializable");
            s.push('\n');
            s
        }
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_to_each_dialect() {
        let src = b"foo = bar\nitems = (1, 2, 3)\nEND\n";
        assert!(translate(src, OutputFormat::Pvl).unwrap().contains("foo   = bar;"));
        assert!(translate(src, OutputFormat::Odl).unwrap().contains("foo   = bar"));
        assert!(translate(src, OutputFormat::Pds3).unwrap().contains("FOO   = bar"));
        assert!(translate(src, OutputFormat::Isis).unwrap().contains("foo   = bar"));
    }

    #[test]
    fn test_translate_to_json() {
        let src = b"foo = bar\nEND\n";
        let out = translate(src, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["foo"], serde_json::json!("bar"));
    }

    #[test]
    fn test_translate_error_propagates() {
        // A label that loads under Omni but cannot be a PDS3 label.
        let src = b"time = 01:12:22+07:00\nEND\n";
        assert!(translate(src, OutputFormat::Pds3).is_err());
        assert!(translate(src, OutputFormat::Pvl).is_ok());
    }

    // ==================== Command-line parsing tests ====================

    #[test]
    fn test_cli_accepts_single_dash_of() {
        let cli =
            TranslateCli::parse_from_args(["pvl-translate", "-of", "PDS3", "in.lbl", "out.lbl"]);
        assert_eq!(cli.output_format, OutputFormat::Pds3);
        assert_eq!(cli.infile.as_deref(), Some(std::path::Path::new("in.lbl")));
        assert_eq!(cli.outfile.as_deref(), Some(std::path::Path::new("out.lbl")));
    }

    #[test]
    fn test_cli_long_and_short_spellings() {
        let cli = TranslateCli::parse_from_args(["pvl-translate", "--output-format", "JSON"]);
        assert_eq!(cli.output_format, OutputFormat::Json);
        assert!(cli.infile.is_none());

        let cli = TranslateCli::parse_from_args(["pvl-translate", "-f", "ISIS", "cube.lbl"]);
        assert_eq!(cli.output_format, OutputFormat::Isis);
    }

    #[test]
    fn test_cli_format_names_match_surface() {
        for name in ["PVL", "ODL", "PDS3", "ISIS", "JSON"] {
            let cli = TranslateCli::parse_from_args(["pvl-translate", "-of", name]);
            let _ = cli.output_format;
        }
    }

    #[test]
    fn test_cli_rejects_missing_format() {
        let result = TranslateCli::try_parse_from(["pvl-translate", "in.lbl"]);
        assert!(result.is_err());
    }
}
