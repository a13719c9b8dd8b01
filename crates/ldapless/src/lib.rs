// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Directory Server Simulator
//!
//! A test crate that simulates an LDAP-style directory client for
//! integration testing. Provides a controllable test double that answers
//! the same operations as a real directory connection (bind, search,
//! compare, add, modify, rename, delete) against an in-memory directory,
//! enabling deterministic tests without a live server.
//!
//! Every operation is recorded and can be seeded with a preset return value
//! or failure for an exact argument signature. Requests the built-in
//! simulation cannot answer (unsupported filter operators, wildcards inside
//! values) fail with [`DirectoryError::SeedRequired`], whose message renders
//! the full call signature so the test knows exactly what to seed.
//!
//! ```
//! use ldapless::{Attrs, Directory, MockDirectory, Scope};
//!
//! let mut seed = Directory::new();
//! seed.insert(
//!     "cn=alice,ou=example,o=test",
//!     Attrs::from_pairs(&[("userPassword", &["alicepw"])]),
//! );
//!
//! let mut mock = MockDirectory::with_content(seed);
//! mock.install("app::directory")?;
//!
//! let conn = mock.connect("ldap://localhost")?;
//! conn.bind("cn=alice,ou=example,o=test", "alicepw")?;
//! let hits = conn.search(
//!     "ou=example,o=test",
//!     Scope::Subtree,
//!     "(userPassword=*)",
//!     None,
//!     false,
//! )?;
//! assert_eq!(hits.len(), 1);
//!
//! mock.uninstall("app::directory")?;
//! # Ok::<(), ldapless::RegistryError>(())
//! ```

pub mod connection;
pub mod content;
pub mod dn;
pub mod error;
pub mod filter;
pub mod password;
pub mod registry;
pub mod store;

pub use connection::{
    result_codes, Connection, ModOp, ModSpec, MsgId, OpResult, Scope, SearchEntry, SearchResult,
    SeedOutcome, DEFAULT_FILTER,
};
pub use content::ContentError;
pub use error::DirectoryError;
pub use registry::{MockDirectory, RegistryError, DEFAULT_URI};
pub use store::{Attrs, Directory};

/// Re-exported capture types from the ldapless-capture crate.
pub mod capture {
    pub use ldapless_capture::{CallArgs, CallLog, RecordedCall, SeedRegistry};
}
