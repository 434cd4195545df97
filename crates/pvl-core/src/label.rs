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

//! The label tree container.
//!
//! A [`Label`] is an order-preserving multi-map from parameter names to
//! [`Value`]s: keys may repeat, insertion order is observable, and lookup
//! by key returns the first match.  It is the type returned by the parser
//! for a whole label and for each `GROUP`/`OBJECT` block inside it.
//!
//! The representation is an ordered list of `(key, value)` pairs plus an
//! auxiliary `key -> positions` index kept in step with it.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use thiserror::Error;

use crate::value::Value;

/// Lookup of a key that is not present in the label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("key \"{0}\" not found")]
pub struct KeyError(pub String);

/// An order-preserving multi-map of parameter names to values.
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<(String, Value)>", into = "Vec<(String, Value)>")
)]
pub struct Label {
    entries: Vec<(String, Value)>,
    index: HashMap<String, Vec<usize>>,
}

impl From<Vec<(String, Value)>> for Label {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<Label> for Vec<(String, Value)> {
    fn from(label: Label) -> Self {
        label.entries
    }
}

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The first value stored under *key*.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let &i = self.index.get(key)?.first()?;
        Some(&self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let &i = self.index.get(key)?.first()?;
        Some(&mut self.entries[i].1)
    }

    /// Every value stored under *key*, in insertion order.
    pub fn get_all<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a Value> {
        let positions = self.index.get(key).cloned().unwrap_or_default();
        positions.into_iter().map(move |i| &self.entries[i].1)
    }

    /// The `(key, value)` pair at *position* in insertion order.
    pub fn get_index(&self, position: usize) -> Option<(&str, &Value)> {
        self.entries.get(position).map(|(k, v)| (k.as_str(), v))
    }

    /// The pairs in positions `range`, in insertion order.
    pub fn slice(&self, range: std::ops::Range<usize>) -> &[(String, Value)] {
        &self.entries[range]
    }

    /// Adds a pair at the end; never overwrites existing keys.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        self.index
            .entry(key.clone())
            .or_default()
            .push(self.entries.len());
        self.entries.push((key, value.into()));
    }

    /// Inserts a pair at *position*, shifting later pairs.
    pub fn insert(&mut self, position: usize, key: impl Into<String>, value: impl Into<Value>) {
        let position = position.min(self.entries.len());
        self.entries.insert(position, (key.into(), value.into()));
        self.rebuild_index();
    }

    /// Inserts pairs before the *instance*-th occurrence of *key*
    /// (0-based).
    pub fn insert_before<I>(&mut self, key: &str, pairs: I, instance: usize) -> Result<(), KeyError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let at = self.position_of(key, instance)?;
        self.splice_in(at, pairs);
        Ok(())
    }

    /// Inserts pairs after the *instance*-th occurrence of *key* (0-based).
    pub fn insert_after<I>(&mut self, key: &str, pairs: I, instance: usize) -> Result<(), KeyError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let at = self.position_of(key, instance)? + 1;
        self.splice_in(at, pairs);
        Ok(())
    }

    /// Replaces every value stored under *key* with clones of *value*.
    pub fn replace(&mut self, key: &str, value: Value) -> Result<(), KeyError> {
        let positions = self
            .index
            .get(key)
            .cloned()
            .ok_or_else(|| KeyError(key.to_string()))?;
        for i in positions {
            self.entries[i].1 = value.clone();
        }
        Ok(())
    }

    /// Removes and returns the first value stored under *key*.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let &i = self.index.get(key)?.first()?;
        let (_, value) = self.entries.remove(i);
        self.rebuild_index();
        Some(value)
    }

    /// Removes and returns every value stored under *key*.
    pub fn remove_all(&mut self, key: &str) -> Vec<Value> {
        if !self.contains_key(key) {
            return Vec::new();
        }
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for (k, v) in self.entries.drain(..) {
            if k == key {
                removed.push(v);
            } else {
                kept.push((k, v));
            }
        }
        self.entries = kept;
        self.rebuild_index();
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    fn position_of(&self, key: &str, instance: usize) -> Result<usize, KeyError> {
        self.index
            .get(key)
            .and_then(|positions| positions.get(instance))
            .copied()
            .ok_or_else(|| KeyError(key.to_string()))
    }

    fn splice_in<I>(&mut self, at: usize, pairs: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (n, pair) in pairs.into_iter().enumerate() {
            self.entries.insert(at + n, pair);
        }
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, (k, _)) in self.entries.iter().enumerate() {
            self.index.entry(k.clone()).or_default().push(i);
        }
    }
}

/// Structural, order-sensitive equality over the pairs.
impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
    }
}

impl Index<&str> for Label {
    type Output = Value;

    /// Panics when *key* is absent; use [`Label::get`] for a fallible
    /// lookup.
    fn index(&self, key: &str) -> &Value {
        self.get(key)
            .unwrap_or_else(|| panic!("key \"{}\" not found", key))
    }
}

impl Index<usize> for Label {
    type Output = (String, Value);

    fn index(&self, position: usize) -> &(String, Value) {
        &self.entries[position]
    }
}

impl FromIterator<(String, Value)> for Label {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut label = Self::new();
        for (k, v) in iter {
            label.append(k, v);
        }
        label
    }
}

impl Extend<(String, Value)> for Label {
    fn extend<I: IntoIterator<Item = (String, Value)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.append(k, v);
        }
    }
}

impl IntoIterator for Label {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Label {
    type Item = (&'a str, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.entries.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Label([")?;
        for (k, v) in self.iter() {
            writeln!(f, "  ({:?}, {})", k, v)?;
        }
        write!(f, "])")
    }
}
