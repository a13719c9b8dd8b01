// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Case-insensitive attribute and directory storage.
//!
//! Both maps normalize keys to lowercase for lookup while preserving the
//! first-inserted casing for iteration and results. Insertion order is kept;
//! equality ignores key order and key case but respects value order.

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Attribute map for one directory entry.
///
/// Keys are attribute names (case-insensitive, unique); values are ordered
/// lists of strings.
#[derive(Clone, Debug, Default)]
pub struct Attrs {
    inner: IndexMap<String, (String, Vec<String>)>,
}

impl Attrs {
    /// Create an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, values)` pairs; handy for fixtures.
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        pairs
            .iter()
            .map(|(name, values)| {
                (
                    name.to_string(),
                    values.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect()
    }

    /// Insert or replace an attribute's value list.
    ///
    /// An existing attribute keeps its original casing; only the values are
    /// replaced.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        let key = name.to_lowercase();
        match self.inner.get_mut(&key) {
            Some((_, existing)) => *existing = values,
            None => {
                self.inner.insert(key, (name, values));
            }
        }
    }

    /// Look up an attribute's values, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.inner
            .get(&name.to_lowercase())
            .map(|(_, values)| values.as_slice())
    }

    /// Mutable access to an attribute's value list.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.inner
            .get_mut(&name.to_lowercase())
            .map(|(_, values)| values)
    }

    /// Mutable access to an attribute's value list, inserting an empty list
    /// (with the given casing) when the attribute is absent.
    pub fn get_or_insert_mut(&mut self, name: &str) -> &mut Vec<String> {
        &mut self
            .inner
            .entry(name.to_lowercase())
            .or_insert_with(|| (name.to_string(), Vec::new()))
            .1
    }

    /// True if the attribute is present (even with an empty value list).
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&name.to_lowercase())
    }

    /// Remove an attribute, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.inner
            .shift_remove(&name.to_lowercase())
            .map(|(_, values)| values)
    }

    /// Iterate `(original name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner
            .values()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Attribute names in insertion order, original casing.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.values().map(|(name, _)| name.as_str())
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if no attributes are present.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl PartialEq for Attrs {
    fn eq(&self, other: &Self) -> bool {
        self.inner.len() == other.inner.len()
            && self.inner.iter().all(|(key, (_, values))| {
                other
                    .inner
                    .get(key)
                    .is_some_and(|(_, other_values)| values == other_values)
            })
    }
}

impl Eq for Attrs {}

impl<N: Into<String>> FromIterator<(N, Vec<String>)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (N, Vec<String>)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (name, values) in iter {
            attrs.insert(name, values);
        }
        attrs
    }
}

impl Serialize for Attrs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (name, values) in self.iter() {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Attrs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: IndexMap<String, Vec<String>> = Deserialize::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

/// In-memory directory: entry identifier -> attributes.
///
/// Owned by one simulated connection; deep-copied (cloned) at connection
/// construction so the seed content itself stays immutable.
#[derive(Clone, Debug, Default)]
pub struct Directory {
    inner: IndexMap<String, (String, Attrs)>,
}

impl Directory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. An existing entry keeps its original
    /// identifier casing.
    pub fn insert(&mut self, eid: impl Into<String>, attrs: Attrs) {
        let eid = eid.into();
        let key = eid.to_lowercase();
        match self.inner.get_mut(&key) {
            Some((_, existing)) => *existing = attrs,
            None => {
                self.inner.insert(key, (eid, attrs));
            }
        }
    }

    /// Look up an entry, case-insensitively.
    pub fn get(&self, eid: &str) -> Option<&Attrs> {
        self.inner.get(&eid.to_lowercase()).map(|(_, attrs)| attrs)
    }

    /// Mutable access to an entry's attributes.
    pub fn get_mut(&mut self, eid: &str) -> Option<&mut Attrs> {
        self.inner
            .get_mut(&eid.to_lowercase())
            .map(|(_, attrs)| attrs)
    }

    /// True if an entry exists for the identifier.
    pub fn contains(&self, eid: &str) -> bool {
        self.inner.contains_key(&eid.to_lowercase())
    }

    /// Remove an entry, preserving the order of the rest.
    pub fn remove(&mut self, eid: &str) -> Option<Attrs> {
        self.inner
            .shift_remove(&eid.to_lowercase())
            .map(|(_, attrs)| attrs)
    }

    /// Iterate `(original identifier, attributes)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attrs)> {
        self.inner
            .values()
            .map(|(eid, attrs)| (eid.as_str(), attrs))
    }

    /// Entry identifiers in insertion order, original casing.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.values().map(|(eid, _)| eid.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if the directory has no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl PartialEq for Directory {
    fn eq(&self, other: &Self) -> bool {
        self.inner.len() == other.inner.len()
            && self.inner.iter().all(|(key, (_, attrs))| {
                other
                    .inner
                    .get(key)
                    .is_some_and(|(_, other_attrs)| attrs == other_attrs)
            })
    }
}

impl Eq for Directory {}

impl<N: Into<String>> FromIterator<(N, Attrs)> for Directory {
    fn from_iter<I: IntoIterator<Item = (N, Attrs)>>(iter: I) -> Self {
        let mut directory = Self::new();
        for (eid, attrs) in iter {
            directory.insert(eid, attrs);
        }
        directory
    }
}

impl Serialize for Directory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (eid, attrs) in self.iter() {
            map.serialize_entry(eid, attrs)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Directory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: IndexMap<String, Attrs> = Deserialize::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
