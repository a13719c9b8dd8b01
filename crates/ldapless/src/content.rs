// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Directory seed content loading from TOML or JSON fixtures.

use crate::store::Directory;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading seed content files.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read content file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load seed content from a TOML or JSON file.
///
/// Files with a `.json` extension parse as JSON; anything else parses as
/// TOML. Both formats are a map from entry identifier to attribute map:
///
/// ```toml
/// ["cn=alice,ou=example,o=test"]
/// objectClass = ["top", "posixAccount"]
/// userPassword = ["alicepw"]
/// ```
pub fn load(path: &Path) -> Result<Directory, ContentError> {
    let content = std::fs::read_to_string(path)?;

    if path.extension().is_some_and(|e| e == "json") {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;
