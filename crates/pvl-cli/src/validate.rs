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

//! The `pvl-validate` operation: try each dialect against some PVL text
//! and report which ones load it and which ones can write it back.

use std::path::PathBuf;

use clap::Parser;
use pvl::{Dialect, ParseOptions, WriteConfig};

/// Command line of `pvl-validate`.
///
/// Validate PVL text against every dialect.  Attempts to load the PVL
/// text in each file under each dialect, and, on success, to encode the
/// loaded label back out.  Some kinds of PVL text can be loaded, but
/// not encoded.
#[derive(Debug, Parser)]
#[command(name = "pvl-validate", version, about, long_about = None)]
pub struct ValidateCli {
    /// Print error messages (-v) or full error details (-vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Files containing PVL text to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// The dialects a file is tried against, in report order.
pub const FLAVORS: [&str; 5] = ["PDS3", "ODL", "PVL", "ISIS", "Omni"];

/// One dialect's verdict for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FlavorResult {
    pub flavor: &'static str,
    pub loads: bool,
    /// `None` when the text did not load, so encoding was never tried.
    pub encodes: Option<bool>,
    /// The load or encode error message, when there was one.
    pub error: Option<String>,
}

/// Tries *text* against every dialect: can it load, and can the loaded
/// tree be written back out under that dialect's profile?
pub fn check_all(bytes: &[u8]) -> Vec<FlavorResult> {
    FLAVORS.iter().map(|f| check_flavor(bytes, f)).collect()
}

fn check_flavor(bytes: &[u8], flavor: &'static str) -> FlavorResult {
    let (dialect, config) = match flavor {
        "PDS3" => (Dialect::Pds3, WriteConfig::pds3()),
        "ODL" => (Dialect::Odl, WriteConfig::odl()),
        "PVL" => (Dialect::Pvl, WriteConfig::pvl()),
        "ISIS" => (Dialect::Isis, WriteConfig::isis()),
        _ => (Dialect::Omni, WriteConfig::pvl()),
    };
    let options = ParseOptions::new(dialect);
    match pvl::load_bytes_with(bytes, &options) {
        Err(e) => FlavorResult {
            flavor,
            loads: false,
            encodes: None,
            error: Some(e.to_string()),
        },
        Ok(label) => match pvl::dumps_with(&label, &config) {
            Ok(_) => FlavorResult {
                flavor,
                loads: true,
                encodes: Some(true),
                error: None,
            },
            Err(e) => FlavorResult {
                flavor,
                loads: true,
                encodes: Some(false),
                error: Some(e.to_string()),
            },
        },
    }
}

fn loads_word(loads: bool) -> &'static str {
    if loads {
        "Loads"
    } else {
        "does NOT load"
    }
}

fn encodes_word(encodes: Option<bool>) -> &'static str {
    match encodes {
        Some(true) => "Encodes",
        Some(false) => "does NOT encode",
        None => "",
    }
}

fn build_line(cells: &[String], widths: &[usize], sep: &str) -> String {
    let mut out = Vec::with_capacity(cells.len());
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == 0 {
            out.push(format!("{:<width$}", cell, width = width));
        } else {
            out.push(format!("{:^width$}", cell, width = width));
        }
    }
    out.join(sep)
}

/// The one-file report: a row per dialect.
pub fn report_single(results: &[FlavorResult]) -> String {
    let col1 = FLAVORS.iter().map(|f| f.len()).max().unwrap_or(0);
    let col2 = "does NOT load".len();
    let col3 = "does NOT encode".len();
    results
        .iter()
        .map(|r| {
            build_line(
                &[
                    r.flavor.to_string(),
                    loads_word(r.loads).to_string(),
                    encodes_word(r.encodes).to_string(),
                ],
                &[col1, col2, col3],
                " | ",
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The many-file report: a table with one row per file and a column pair
/// per dialect.
pub fn report_many(reports: &[(String, Vec<FlavorResult>)]) -> String {
    let col1 = reports
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(4)
        .max("File".len());
    let col2 = "No L".len();
    let col3 = "No E".len();
    let flavor_w = col2 + col3 + 1;

    let mut widths = vec![col1];
    widths.extend(std::iter::repeat(flavor_w).take(FLAVORS.len()));

    let mut header = vec!["File".to_string()];
    header.extend(FLAVORS.iter().map(|f| f.to_string()));

    let rule: Vec<String> = widths.iter().map(|w| " ".repeat(*w)).collect();
    let rule_line = build_line(&rule, &widths, " | ")
        .replace('|', "+")
        .replace(' ', "-");

    let mut lines = vec![
        rule_line.clone(),
        build_line(&header, &widths, " | "),
        rule_line.clone(),
    ];
    for (name, results) in reports {
        let mut cells = vec![name.clone()];
        for r in results {
            let l = if r.loads { "L" } else { "No L" };
            let e = match r.encodes {
                Some(true) => "E",
                Some(false) => "No E",
                None => "",
            };
            cells.push(format!(
                "{:^col2$} {:^col3$}",
                l,
                e,
                col2 = col2,
                col3 = col3
            ));
        }
        lines.push(build_line(&cells, &widths, " | "));
    }
    lines.join("\n")
}

/// Error detail lines for `-v`/`-vv`.
pub fn error_details(name: &str, results: &[FlavorResult], verbosity: u8) -> Vec<String> {
    let mut lines = Vec::new();
    for r in results {
        if let Some(err) = &r.error {
            let what = if r.loads { "encode" } else { "load" };
            if verbosity >= 2 {
                lines.push(format!("{}: {} does not {}: {:#?}", name, r.flavor, what, err));
            } else {
                lines.push(format!("{}: {} does not {}: {}", name, r.flavor, what, err));
            }
        }
    }
    lines
}
