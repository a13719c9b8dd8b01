// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use serde_json::json;

fn seed_content() -> Directory {
    let mut directory = Directory::new();
    directory.insert(
        "cn=alice,ou=example,o=test",
        Attrs::from_pairs(&[
            ("cn", &["alice"]),
            ("userPassword", &["alicepw"]),
            ("objectClass", &["top", "posixAccount"]),
        ]),
    );
    directory.insert(
        "ou=example,o=test",
        Attrs::from_pairs(&[("objectClass", &["organizationalUnit"])]),
    );
    directory
}

fn connection() -> Connection {
    Connection::new(&seed_content())
}

#[test]
fn test_construction_deep_copies_seed_content() {
    let content = seed_content();
    let mut conn = Connection::new(&content);

    conn.delete("cn=alice,ou=example,o=test").unwrap();

    assert!(content.contains("cn=alice,ou=example,o=test"));
    assert!(!conn.directory().contains("cn=alice,ou=example,o=test"));
}

#[test]
fn test_options_set_and_get_verbatim() {
    let mut conn = connection();

    conn.set_option("tls_demand", json!(true)).unwrap();

    assert_eq!(conn.get_option("tls_demand").unwrap(), Some(json!(true)));
    assert_eq!(conn.get_option("unset").unwrap(), None);
}

#[test]
fn test_tls_latch_is_one_way() {
    let mut conn = connection();
    assert!(!conn.tls_enabled());

    conn.start_tls().unwrap();
    assert!(conn.tls_enabled());

    // No operation disables it again.
    conn.unbind().unwrap();
    assert!(conn.tls_enabled());
}

#[test]
fn test_every_call_is_recorded_even_on_failure() {
    let mut conn = connection();

    conn.bind("cn=alice,ou=example,o=test", "alicepw").unwrap();
    let _ = conn.delete("cn=missing,o=test");

    assert_eq!(conn.ops_called(), vec!["bind", "delete"]);
    let calls = conn.call_log().calls();
    assert_eq!(calls[1].args.values()[0], json!("cn=missing,o=test"));
}

#[test]
fn test_seeded_value_shadows_simulation() {
    let mut conn = connection();
    let args = CallArgs::new()
        .with(&"cn=alice,ou=example,o=test")
        .with(&"objectClass")
        .with(&"top");
    conn.seed_value(ops::COMPARE, args, &0).unwrap();

    // The exact signature returns the seed instead of the simulated 1.
    assert_eq!(
        conn.compare("cn=alice,ou=example,o=test", "objectClass", "top")
            .unwrap(),
        0
    );
    // A different signature falls through to the simulation.
    assert_eq!(
        conn.compare("cn=alice,ou=example,o=test", "cn", "alice")
            .unwrap(),
        1
    );
}

#[test]
fn test_seeded_error_is_raised() {
    let mut conn = connection();
    let args = CallArgs::new().with(&"cn=alice,ou=example,o=test");
    conn.seed_error(
        ops::DELETE,
        args,
        DirectoryError::Protocol("seeded failure".to_string()),
    );

    assert_eq!(
        conn.delete("cn=alice,ou=example,o=test"),
        Err(DirectoryError::Protocol("seeded failure".to_string()))
    );
    // The seeded failure preempted the simulation: the entry is untouched.
    assert!(conn.directory().contains("cn=alice,ou=example,o=test"));
}

#[test]
fn test_seed_with_wrong_shape_fails() {
    let mut conn = connection();
    let args = CallArgs::new()
        .with(&"cn=alice,ou=example,o=test")
        .with(&"cn")
        .with(&"alice");
    conn.seed_value(ops::COMPARE, args, &"not a number").unwrap();

    assert!(matches!(
        conn.compare("cn=alice,ou=example,o=test", "cn", "alice"),
        Err(DirectoryError::BadSeed { .. })
    ));
}

#[test]
fn test_reset_clears_log_and_seeds() {
    let mut conn = connection();
    conn.seed_value(ops::COMPARE, CallArgs::new().with(&"x").with(&"y").with(&"z"), &1)
        .unwrap();
    conn.unbind().unwrap();

    conn.reset();

    assert!(conn.call_log().is_empty());
    assert_eq!(
        conn.compare("cn=alice,ou=example,o=test", "cn", "alice")
            .unwrap(),
        1
    );
}

#[test]
fn test_async_search_result_fetched_once() {
    let mut conn = connection();

    let msgid = conn
        .search_async(
            "ou=example,o=test",
            Scope::Subtree,
            "(objectClass=*)",
            None,
            false,
        )
        .unwrap();

    let result = conn.fetch_result(msgid, None).unwrap();
    assert_eq!(result.unwrap().len(), 2);

    // Repeat and unknown handles both yield None.
    assert_eq!(conn.fetch_result(msgid, None).unwrap(), None);
    assert_eq!(conn.fetch_result(MsgId(99), Some(5)).unwrap(), None);
}

#[test]
fn test_async_handles_are_sequential() {
    let mut conn = connection();

    let first = conn
        .search_async("o=test", Scope::Subtree, "(objectClass=*)", None, false)
        .unwrap();
    let second = conn
        .search_async("o=test", Scope::Subtree, "(cn=alice)", None, false)
        .unwrap();

    assert_eq!(first, MsgId(0));
    assert_eq!(second, MsgId(1));
    assert_eq!(conn.fetch_result(second, None).unwrap().unwrap().len(), 1);
}

#[test]
fn test_invalid_identifier_rejected_before_lookup() {
    let mut conn = connection();

    assert_eq!(
        conn.delete("not a valid identifier"),
        Err(DirectoryError::InvalidIdentifierSyntax(
            "not a valid identifier".to_string()
        ))
    );
    assert_eq!(
        conn.compare("also invalid", "cn", "alice"),
        Err(DirectoryError::InvalidIdentifierSyntax(
            "also invalid".to_string()
        ))
    );
}

#[test]
fn test_initialize_records_only() {
    let mut conn = connection();

    conn.initialize("ldap://localhost").unwrap();

    assert_eq!(conn.ops_called(), vec!["initialize"]);
    assert_eq!(conn.directory().len(), 2);
}

#[test]
fn test_seed_required_message_names_call_signature() {
    let mut conn = connection();

    let err = conn
        .search(
            "ou=example,o=test",
            Scope::OneLevel,
            "(invalid~=bogus)",
            None,
            false,
        )
        .unwrap_err();

    let DirectoryError::SeedRequired(message) = err else {
        panic!("expected SeedRequired, got {:?}", err);
    };
    assert!(message.starts_with("search("));
    assert!(message.contains("ou=example,o=test"));
    assert!(message.contains("(invalid~=bogus)"));
}

#[test]
fn test_seeding_an_unsupported_search() {
    let mut conn = connection();
    let args = CallArgs::new()
        .with(&"ou=example,o=test")
        .with(&Scope::OneLevel)
        .with(&"(invalid~=bogus)")
        .with(&Option::<Vec<String>>::None)
        .with(&false);
    let canned = vec![SearchEntry {
        eid: "cn=alice,ou=example,o=test".to_string(),
        attrs: Attrs::from_pairs(&[("cn", &["alice"])]),
    }];
    conn.seed_value(ops::SEARCH, args, &canned).unwrap();

    let result = conn
        .search(
            "ou=example,o=test",
            Scope::OneLevel,
            "(invalid~=bogus)",
            None,
            false,
        )
        .unwrap();

    assert_eq!(result, canned);
}
