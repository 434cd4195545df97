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

//! Library behind the `pvl-translate` and `pvl-validate` binaries.
//!
//! - `pvl-translate` reads PVL text in any dialect and writes it out in a
//!   chosen dialect, or as JSON.
//! - `pvl-validate` reports, per dialect, whether each input file loads
//!   and whether the loaded tree can be written back out.

pub mod json;
pub mod translate;
pub mod validate;
