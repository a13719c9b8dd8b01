// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entry identifier parsing and validation.
//!
//! Entry identifiers are hierarchical, comma-separated `attr=value`
//! components with the most specific component first, compared
//! case-insensitively. The empty string is a valid identifier with zero
//! components.

use crate::error::DirectoryError;

/// Validate an entry identifier's syntax.
///
/// Every operation that takes an identifier-shaped argument validates it
/// before any other check, so malformed input always surfaces as
/// `InvalidIdentifierSyntax` rather than `NoSuchEntry`.
pub fn validate(eid: &str) -> Result<(), DirectoryError> {
    if eid.is_empty() {
        return Ok(());
    }

    for component in eid.split(',') {
        match component.split_once('=') {
            Some((attr, _)) if !attr.is_empty() => {}
            _ => return Err(DirectoryError::InvalidIdentifierSyntax(eid.to_string())),
        }
    }

    Ok(())
}

/// Split an identifier into its components, most specific first.
///
/// Preserves the original casing; callers that compare components are
/// expected to lowercase first (see [`explode_lower`]).
pub fn explode(eid: &str) -> Vec<&str> {
    if eid.is_empty() {
        Vec::new()
    } else {
        eid.split(',').collect()
    }
}

/// Split an identifier into lowercased components for comparison.
pub fn explode_lower(eid: &str) -> Vec<String> {
    explode(eid)
        .into_iter()
        .map(str::to_lowercase)
        .collect()
}

/// Split a single relative component into its attribute and value.
pub fn split_rdn(rdn: &str) -> Result<(&str, &str), DirectoryError> {
    match rdn.split_once('=') {
        Some((attr, value)) if !attr.is_empty() => Ok((attr, value)),
        _ => Err(DirectoryError::InvalidIdentifierSyntax(rdn.to_string())),
    }
}

/// The identifier one level above: everything after the first component.
pub fn parent(eid: &str) -> String {
    match eid.split_once(',') {
        Some((_, rest)) => rest.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "dn_tests.rs"]
mod tests;
