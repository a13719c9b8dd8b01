// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared fixture directory for the simulator integration tests.

#![allow(dead_code)]

use ldapless::{Attrs, Connection, Directory};

pub const MANAGER: &str = "cn=Manager,ou=example,o=test";
pub const ALICE: &str = "cn=alice,ou=example,o=test";
pub const BOB: &str = "cn=bob,ou=other,o=test";
pub const THEO: &str = "cn=theo,ou=example,o=test";
pub const JOHN: &str = "cn=john,ou=example,o=test";

/// Build the sample population used across the integration tests.
///
/// theo's passwords are stored hashed; the values are generated here rather
/// than hard-coded so the fixture never depends on a precomputed digest.
pub fn sample_directory() -> Directory {
    let mut directory = Directory::new();
    directory.insert(
        MANAGER,
        Attrs::from_pairs(&[
            ("userPassword", &["ldaptest"]),
            ("objectClass", &["top", "posixAccount", "inetOrgPerson"]),
        ]),
    );
    directory.insert(
        ALICE,
        Attrs::from_pairs(&[
            ("cn", &["alice"]),
            ("uid", &["alice"]),
            ("userPassword", &["alicepw"]),
            ("objectClass", &["top", "posixAccount"]),
        ]),
    );
    directory.insert(
        BOB,
        Attrs::from_pairs(&[
            ("userPassword", &["bobpw", "bobpw2"]),
            ("objectClass", &["top"]),
        ]),
    );

    let theo_passwords = vec![
        ldapless::password::ssha256_hash("theopw", b"salt-one"),
        ldapless::password::ssha256_hash("theopw2", b"salt-two"),
    ];
    let mut theo = Attrs::new();
    theo.insert("userPassword", theo_passwords);
    theo.insert(
        "objectClass",
        vec!["top".to_string(), "posixAccount".to_string()],
    );
    directory.insert(THEO, theo);

    directory.insert(JOHN, Attrs::from_pairs(&[("objectClass", &["top"])]));
    directory
}

/// A fresh connection over the sample population.
pub fn connection() -> Connection {
    Connection::new(&sample_directory())
}

/// The entry identifiers of a search result, in result order.
pub fn eids(result: &[ldapless::SearchEntry]) -> Vec<&str> {
    result.iter().map(|entry| entry.eid.as_str()).collect()
}
