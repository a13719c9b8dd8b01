// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Seed registry: preset outcomes keyed by call signature.

use crate::call::CallArgs;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Registry of `(operation, arguments) -> outcome` overrides.
///
/// Seeds for one operation are kept newest-first, so registering a second
/// seed with the same signature shadows the first. Seeds with non-matching
/// signatures coexist. Lookup requires an exact structural match of the
/// argument list.
pub struct SeedRegistry<O> {
    seeds: Mutex<HashMap<String, Vec<(CallArgs, O)>>>,
}

impl<O: Clone> SeedRegistry<O> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            seeds: Mutex::new(HashMap::new()),
        }
    }

    /// Register an outcome for a call signature.
    pub fn insert(&self, op: impl Into<String>, args: CallArgs, outcome: O) {
        let mut seeds = self.seeds.lock();
        seeds
            .entry(op.into())
            .or_default()
            .insert(0, (args, outcome));
    }

    /// Find the most recently registered outcome matching a signature.
    pub fn lookup(&self, op: &str, args: &CallArgs) -> Option<O> {
        let seeds = self.seeds.lock();
        seeds
            .get(op)?
            .iter()
            .find(|(seed_args, _)| seed_args == args)
            .map(|(_, outcome)| outcome.clone())
    }

    /// Total number of registered seeds, across all operations.
    pub fn len(&self) -> usize {
        self.seeds.lock().values().map(Vec::len).sum()
    }

    /// Check if no seeds are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all seeds for all operations.
    pub fn clear(&self) {
        self.seeds.lock().clear();
    }
}

impl<O: Clone> Default for SeedRegistry<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> std::fmt::Debug for SeedRegistry<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let seeds = self.seeds.lock();
        f.debug_struct("SeedRegistry")
            .field("ops", &seeds.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "seeds_tests.rs"]
mod tests;
