// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-way password hash verification for `userPassword` values.
//!
//! Stored values may carry an RFC 2307-style `{SCHEME}` prefix. Supported
//! schemes are `{SHA256}` (base64 of the digest) and `{SSHA256}` (base64 of
//! the digest of password+salt, followed by the salt). Values in unknown
//! schemes, or with undecodable payloads, verify false so callers skip them
//! and try the next stored value.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

const SHA256_PREFIX: &str = "{SHA256}";
const SSHA256_PREFIX: &str = "{SSHA256}";

/// Digest length of SHA-256 in bytes.
const DIGEST_LEN: usize = 32;

/// True if the stored value carries a `{SCHEME}` prefix.
pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with('{') && stored.contains('}')
}

/// Verify a candidate password against a hashed stored value.
///
/// Returns false for plain-text values, unknown schemes, and undecodable
/// payloads; hashed verification never errors.
pub fn verify(candidate: &str, stored: &str) -> bool {
    if let Some(payload) = stored.strip_prefix(SSHA256_PREFIX) {
        verify_salted(candidate, payload)
    } else if let Some(payload) = stored.strip_prefix(SHA256_PREFIX) {
        verify_plain_digest(candidate, payload)
    } else {
        false
    }
}

fn verify_plain_digest(candidate: &str, payload: &str) -> bool {
    let Ok(expected) = STANDARD.decode(payload) else {
        return false;
    };

    Sha256::digest(candidate.as_bytes()).as_slice() == expected.as_slice()
}

fn verify_salted(candidate: &str, payload: &str) -> bool {
    let Ok(decoded) = STANDARD.decode(payload) else {
        return false;
    };
    if decoded.len() <= DIGEST_LEN {
        return false;
    }

    let (expected, salt) = decoded.split_at(DIGEST_LEN);
    let mut hasher = Sha256::new();
    hasher.update(candidate.as_bytes());
    hasher.update(salt);

    hasher.finalize().as_slice() == expected
}

/// Produce a `{SHA256}` value for fixtures.
pub fn sha256_hash(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    format!("{}{}", SHA256_PREFIX, STANDARD.encode(digest))
}

/// Produce a `{SSHA256}` value for fixtures.
pub fn ssha256_hash(password: &str, salt: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);

    let mut payload = hasher.finalize().to_vec();
    payload.extend_from_slice(salt);
    format!("{}{}", SSHA256_PREFIX, STANDARD.encode(payload))
}

#[cfg(test)]
#[path = "password_tests.rs"]
mod tests;
