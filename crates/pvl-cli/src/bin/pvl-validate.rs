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

//! Tests and validates PVL text against each dialect.

use std::process::ExitCode;

use clap::Parser;
use pvl_cli::validate::{
    check_all, error_details, report_many, report_single, ValidateCli,
};

fn run(cli: &ValidateCli) -> Result<(), String> {
    let mut reports = Vec::new();
    for path in &cli.files {
        let bytes = std::fs::read(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        reports.push((path.display().to_string(), check_all(&bytes)));
    }

    if reports.len() == 1 {
        println!("{}", report_single(&reports[0].1));
    } else {
        println!("{}", report_many(&reports));
    }

    if cli.verbose > 0 {
        for (name, results) in &reports {
            for line in error_details(name, results, cli.verbose) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = ValidateCli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
