// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds shared across directory operations.

use thiserror::Error;

/// Failures surfaced by simulated directory operations.
///
/// `SeedRequired` is a control signal rather than a genuine fault: it means
/// the built-in simulation cannot satisfy the request and the caller should
/// register a seeded result for the rendered call signature. All other kinds
/// propagate directly and are never retried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("no such entry: {0:?}")]
    NoSuchEntry(String),

    #[error("undefined attribute type: {0:?}")]
    UndefinedAttributeType(String),

    #[error("invalid credentials for {0:?}")]
    InvalidCredentials(String),

    #[error("entry already exists: {0:?}")]
    AlreadyExists(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("invalid entry identifier syntax: {0:?}")]
    InvalidIdentifierSyntax(String),

    #[error("malformed filter: {0}")]
    MalformedFilter(String),

    #[error("seed required for {0}")]
    SeedRequired(String),

    #[error("seed for {op} does not fit the return type: {detail}")]
    BadSeed { op: String, detail: String },
}

impl DirectoryError {
    /// True for the "register a seed and retry" control signal.
    pub fn is_seed_required(&self) -> bool {
        matches!(self, Self::SeedRequired(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
