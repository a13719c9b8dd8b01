// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

#[test]
fn test_seed_required_detection() {
    assert!(DirectoryError::SeedRequired("search(...)".to_string()).is_seed_required());
    assert!(!DirectoryError::NoSuchEntry("o=test".to_string()).is_seed_required());
}

#[test]
fn test_display_includes_context() {
    let err = DirectoryError::NoSuchEntry("cn=blah,o=test".to_string());
    assert_eq!(err.to_string(), r#"no such entry: "cn=blah,o=test""#);

    let err = DirectoryError::SeedRequired(r#"search("o=test")"#.to_string());
    assert!(err.to_string().contains("seed required for"));
    assert!(err.to_string().contains("search"));
}

#[test]
fn test_errors_compare_by_value() {
    assert_eq!(
        DirectoryError::AlreadyExists("o=test".to_string()),
        DirectoryError::AlreadyExists("o=test".to_string())
    );
    assert_ne!(
        DirectoryError::AlreadyExists("o=test".to_string()),
        DirectoryError::NoSuchEntry("o=test".to_string())
    );
}
