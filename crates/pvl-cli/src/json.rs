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

//! Converting label trees to JSON for `pvl-translate -of JSON`.
//!
//! Keys that occur once map to their value; repeated keys collapse into an
//! array holding every value in order.  Quantities become
//! `{"value": …, "units": …}` objects and date/times become ISO strings.

use pvl::{Label, Value};
use serde_json::{json, Map, Number};

/// Converts a label tree to a JSON value.
pub fn label_to_json(label: &Label) -> serde_json::Value {
    let mut map = Map::new();
    for (key, value) in label.iter() {
        let v = value_to_json(value);
        match map.get_mut(key) {
            None => {
                map.insert(key.to_string(), v);
            }
            Some(serde_json::Value::Array(items)) => items.push(v),
            Some(existing) => {
                let first = existing.take();
                *existing = serde_json::Value::Array(vec![first, v]);
            }
        }
    }
    serde_json::Value::Object(map)
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Integer(n) => json!(n),
        Value::Based(b) => json!(b.value),
        Value::Real(x) => Number::from_f64(*x)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| json!(x.to_string())),
        Value::String(s) | Value::Symbol(s) => json!(s),
        Value::Boolean(b) => json!(b),
        Value::Null => serde_json::Value::Null,
        Value::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
        Value::Time(t) => json!(t.to_string()),
        Value::DateTime(dt) => json!(dt.to_string()),
        Value::Set(items) | Value::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Quantity(q) => json!({
            "value": value_to_json(&q.value),
            "units": q.units,
        }),
        Value::EmptyAtLine(_) => json!(""),
        Value::Group(body) | Value::Object(body) => label_to_json(body),
    }
}
