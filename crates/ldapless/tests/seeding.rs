// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Call recording and seeding behavior through the public operations.

mod common;

use common::{connection, ALICE};
use ldapless::capture::CallArgs;
use ldapless::connection::ops;
use ldapless::{Attrs, DirectoryError, Scope, SearchEntry};
use serde_json::json;

fn compare_args(eid: &str, attr: &str, value: &str) -> CallArgs {
    CallArgs::new().with(&eid).with(&attr).with(&value)
}

fn search_args(base: &str, scope: Scope, filterstr: &str) -> CallArgs {
    CallArgs::new()
        .with(&base)
        .with(&scope)
        .with(&filterstr)
        .with(&Option::<Vec<String>>::None)
        .with(&false)
}

#[test]
fn seeded_result_is_returned_for_the_exact_signature() {
    let mut conn = connection();
    conn.seed_value(ops::COMPARE, compare_args(ALICE, "cn", "alice"), &0)
        .unwrap();

    assert_eq!(conn.compare(ALICE, "cn", "alice").unwrap(), 0);
}

#[test]
fn different_arguments_do_not_consume_the_seed() {
    let mut conn = connection();
    conn.seed_value(ops::COMPARE, compare_args(ALICE, "cn", "alice"), &0)
        .unwrap();

    // Another signature falls through to the simulation...
    assert_eq!(conn.compare(ALICE, "uid", "alice").unwrap(), 1);
    // ...and the seed still answers its own signature afterwards.
    assert_eq!(conn.compare(ALICE, "cn", "alice").unwrap(), 0);
}

#[test]
fn newest_seed_wins_for_the_same_signature() {
    let mut conn = connection();
    let args = || compare_args(ALICE, "cn", "alice");
    conn.seed_value(ops::COMPARE, args(), &0).unwrap();
    conn.seed_value(ops::COMPARE, args(), &1).unwrap();

    assert_eq!(conn.compare(ALICE, "cn", "alice").unwrap(), 1);
}

#[test]
fn seeded_error_values_are_raised() {
    let mut conn = connection();
    conn.seed_error(
        ops::BIND,
        CallArgs::new().with(&ALICE).with(&"alicepw"),
        DirectoryError::Protocol("server unavailable".to_string()),
    );

    assert_eq!(
        conn.bind(ALICE, "alicepw"),
        Err(DirectoryError::Protocol("server unavailable".to_string()))
    );
}

#[test]
fn seeded_values_come_back_as_independent_copies() {
    let mut conn = connection();
    let canned = vec![SearchEntry {
        eid: "cn=canned,o=test".to_string(),
        attrs: Attrs::from_pairs(&[("cn", &["canned"])]),
    }];
    conn.seed_value(ops::SEARCH, search_args("o=test", Scope::Subtree, "(cn=x)"), &canned)
        .unwrap();

    let mut first = conn
        .search("o=test", Scope::Subtree, "(cn=x)", None, false)
        .unwrap();
    first[0].eid = "cn=mutated,o=test".to_string();

    // Mutating a returned copy does not corrupt the stored seed.
    let second = conn
        .search("o=test", Scope::Subtree, "(cn=x)", None, false)
        .unwrap();
    assert_eq!(second, canned);
}

#[test]
fn seed_required_message_contains_operation_and_arguments() {
    let mut conn = connection();

    let err = conn
        .search("ou=example,o=test", Scope::OneLevel, "(invalid~=bogus)", None, false)
        .unwrap_err();

    let DirectoryError::SeedRequired(message) = err else {
        panic!("expected SeedRequired, got {:?}", err);
    };
    assert!(message.contains("search"));
    assert!(message.contains(r#""ou=example,o=test""#));
    assert!(message.contains(r#""(invalid~=bogus)""#));
    assert!(message.contains("one-level"));
}

#[test]
fn seeding_answers_an_unsupported_search() {
    let mut conn = connection();
    let canned = vec![SearchEntry {
        eid: ALICE.to_string(),
        attrs: Attrs::from_pairs(&[("cn", &["alice"])]),
    }];
    conn.seed_value(
        ops::SEARCH,
        search_args("ou=example,o=test", Scope::OneLevel, "(invalid~=bogus)"),
        &canned,
    )
    .unwrap();

    let result = conn
        .search("ou=example,o=test", Scope::OneLevel, "(invalid~=bogus)", None, false)
        .unwrap();

    assert_eq!(result, canned);
}

#[test]
fn failing_calls_are_still_recorded() {
    let mut conn = connection();

    let _ = conn.bind(ALICE, "wrong");
    let _ = conn.delete("cn=missing,o=test");
    conn.unbind().unwrap();

    assert_eq!(conn.ops_called(), vec!["bind", "delete", "unbind"]);
}

#[test]
fn call_log_records_arguments_in_order() {
    let mut conn = connection();

    conn.bind(ALICE, "alicepw").unwrap();
    conn.compare(ALICE, "cn", "alice").unwrap();

    let calls = conn.call_log().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].op, "bind");
    assert_eq!(calls[0].args.values(), &[json!(ALICE), json!("alicepw")]);
    assert_eq!(calls[1].op, "compare");
    assert_eq!(calls[1].seq, 1);
}

#[test]
fn reset_clears_the_log_and_the_seeds() {
    let mut conn = connection();
    conn.seed_value(ops::COMPARE, compare_args(ALICE, "cn", "alice"), &0)
        .unwrap();
    conn.bind(ALICE, "alicepw").unwrap();

    conn.reset();

    assert!(conn.call_log().is_empty());
    // The seed is gone; the simulation answers again.
    assert_eq!(conn.compare(ALICE, "cn", "alice").unwrap(), 1);
}
