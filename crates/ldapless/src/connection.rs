// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated directory connection.
//!
//! [`Connection`] exposes the directory operations of a real client against
//! an in-memory [`Directory`]. Every operation flows through a generic
//! invoke-and-record helper: the call is appended to the connection's
//! [`CallLog`], the [`SeedRegistry`] is checked for a preset outcome matching
//! the exact argument signature, and only then does the built-in simulation
//! run. Seeded values are returned as independent copies; simulated results
//! are returned verbatim.

use crate::dn;
use crate::error::DirectoryError;
use crate::filter::{self, FilterError};
use crate::password;
use crate::store::{Attrs, Directory};
use ldapless_capture::{CallArgs, CallLog, SeedRegistry};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The attribute consulted by `bind` and hash-aware `compare`.
const USER_PASSWORD: &str = "userPassword";

/// The protocol's "match everything" filter, used by callers that want the
/// conventional search default.
pub const DEFAULT_FILTER: &str = "(objectClass=*)";

/// Numeric result codes mirrored from the wire protocol.
///
/// These are opaque sentinels expected by callers written against the real
/// client and are reproduced exactly.
pub mod result_codes {
    /// Successful bind
    pub const BIND: u16 = 97;
    /// Successful modify
    pub const MODIFY: u16 = 103;
    /// Successful add
    pub const ADD: u16 = 105;
    /// Successful delete
    pub const DELETE: u16 = 107;
    /// Successful rename
    pub const RENAME: u16 = 109;
}

/// Operation names as recorded in the call log and used for seeding.
pub mod ops {
    pub const INITIALIZE: &str = "initialize";
    pub const GET_OPTION: &str = "get_option";
    pub const SET_OPTION: &str = "set_option";
    pub const BIND: &str = "bind";
    pub const START_TLS: &str = "start_tls";
    pub const COMPARE: &str = "compare";
    pub const SEARCH: &str = "search";
    pub const SEARCH_ASYNC: &str = "search_async";
    pub const FETCH_RESULT: &str = "fetch_result";
    pub const MODIFY: &str = "modify";
    pub const ADD: &str = "add";
    pub const RENAME: &str = "rename";
    pub const DELETE: &str = "delete";
    pub const UNBIND: &str = "unbind";
}

/// Search breadth relative to the base identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Exactly the base entry.
    Base,
    /// Entries exactly one component below the base.
    OneLevel,
    /// The base entry and all descendants.
    Subtree,
}

/// Modification kind within a `modify` request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModOp {
    Add,
    Delete,
    Replace,
}

/// One attribute modification in a `modify` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModSpec {
    pub op: ModOp,
    pub attr: String,
    /// `None` and `Some(vec![])` are equivalent: "no values given".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl ModSpec {
    /// General constructor; the sugar below covers the common shapes.
    pub fn new(op: ModOp, attr: impl Into<String>, values: Option<Vec<String>>) -> Self {
        Self {
            op,
            attr: attr.into(),
            values,
        }
    }

    /// ADD the given values.
    pub fn add(attr: impl Into<String>, values: &[&str]) -> Self {
        Self::new(ModOp::Add, attr, Some(owned(values)))
    }

    /// DELETE only the given values.
    pub fn delete(attr: impl Into<String>, values: &[&str]) -> Self {
        Self::new(ModOp::Delete, attr, Some(owned(values)))
    }

    /// DELETE with no values: the attribute is removed entirely.
    pub fn delete_all(attr: impl Into<String>) -> Self {
        Self::new(ModOp::Delete, attr, None)
    }

    /// REPLACE the value list.
    pub fn replace(attr: impl Into<String>, values: &[&str]) -> Self {
        Self::new(ModOp::Replace, attr, Some(owned(values)))
    }

    /// REPLACE with no values: the attribute is removed entirely.
    pub fn replace_none(attr: impl Into<String>) -> Self {
        Self::new(ModOp::Replace, attr, None)
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Successful result of a write operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpResult {
    /// Protocol result code (see [`result_codes`]).
    pub code: u16,
    /// Protocol message list; always empty in the simulation.
    pub messages: Vec<String>,
    /// Only populated by `add`: calls recorded so far, including the add.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_count: Option<u64>,
}

impl OpResult {
    fn with_code(code: u16) -> Self {
        Self {
            code,
            messages: Vec::new(),
            call_count: None,
        }
    }

    /// The result of a successful bind: code 97.
    pub fn bind() -> Self {
        Self::with_code(result_codes::BIND)
    }

    /// The result of a successful modify: code 103.
    pub fn modify() -> Self {
        Self::with_code(result_codes::MODIFY)
    }

    /// The result of a successful add: code 105 plus the call count.
    pub fn add(call_count: u64) -> Self {
        Self {
            call_count: Some(call_count),
            ..Self::with_code(result_codes::ADD)
        }
    }

    /// The result of a successful delete: code 107.
    pub fn delete() -> Self {
        Self::with_code(result_codes::DELETE)
    }

    /// The result of a successful rename: code 109.
    pub fn rename() -> Self {
        Self::with_code(result_codes::RENAME)
    }
}

/// One entry in a search result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub eid: String,
    pub attrs: Attrs,
}

/// Ordered search result set.
pub type SearchResult = Vec<SearchEntry>;

/// Correlation handle for an asynchronous search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MsgId(pub usize);

/// Preset outcome for a seeded call signature.
#[derive(Clone, Debug)]
pub enum SeedOutcome {
    /// A canned return value, stored as JSON and deserialized into the
    /// operation's return type on retrieval.
    Value(Value),
    /// A canned failure.
    Fail(DirectoryError),
}

/// Simulated client connection.
///
/// Holds the per-connection directory (deep-copied from seed content at
/// construction), bind state, the TLS latch, verbatim options, pending
/// asynchronous results, and the call log / seed registry.
#[derive(Debug)]
pub struct Connection {
    directory: Directory,
    async_results: Vec<Option<SearchResult>>,
    options: HashMap<String, Value>,
    tls_enabled: bool,
    bound_as: Option<String>,
    log: CallLog,
    seeds: SeedRegistry<SeedOutcome>,
}

impl Connection {
    /// Create a connection over a deep copy of the given seed content.
    pub fn new(content: &Directory) -> Self {
        Self {
            directory: content.clone(),
            async_results: Vec::new(),
            options: HashMap::new(),
            tls_enabled: false,
            bound_as: None,
            log: CallLog::new(),
            seeds: SeedRegistry::new(),
        }
    }

    // ------------------------------------------------------------------
    // Recording and seeding
    // ------------------------------------------------------------------

    /// Invoke-and-record helper every operation goes through.
    fn recorded<T, F>(&mut self, op: &str, args: CallArgs, fallback: F) -> Result<T, DirectoryError>
    where
        T: DeserializeOwned,
        F: FnOnce(&mut Self) -> Result<T, DirectoryError>,
    {
        self.log.record(op, args.clone());

        if let Some(outcome) = self.seeds.lookup(op, &args) {
            return match outcome {
                SeedOutcome::Value(value) => {
                    serde_json::from_value(value).map_err(|e| DirectoryError::BadSeed {
                        op: op.to_string(),
                        detail: e.to_string(),
                    })
                }
                SeedOutcome::Fail(error) => Err(error),
            };
        }

        match fallback(self) {
            Err(DirectoryError::SeedRequired(detail)) => Err(DirectoryError::SeedRequired(
                format!("{}({}): {}", op, args, detail),
            )),
            result => result,
        }
    }

    /// Register a canned return value for an exact call signature.
    ///
    /// The value is serialized immediately, so later mutation of the
    /// original cannot affect the seed, and every retrieval deserializes a
    /// fresh copy.
    pub fn seed_value<T: Serialize>(
        &self,
        op: &str,
        args: CallArgs,
        value: &T,
    ) -> Result<(), DirectoryError> {
        let value = serde_json::to_value(value).map_err(|e| DirectoryError::BadSeed {
            op: op.to_string(),
            detail: e.to_string(),
        })?;
        self.seeds.insert(op, args, SeedOutcome::Value(value));
        Ok(())
    }

    /// Register a canned failure for an exact call signature.
    pub fn seed_error(&self, op: &str, args: CallArgs, error: DirectoryError) {
        self.seeds.insert(op, args, SeedOutcome::Fail(error));
    }

    /// Clear the call log and all seeds.
    pub fn reset(&mut self) {
        self.log.clear();
        self.seeds.clear();
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Identity of the last successful bind, if still bound.
    pub fn bound_as(&self) -> Option<&str> {
        self.bound_as.as_deref()
    }

    /// True once `start_tls` has been called; there is no way back.
    pub fn tls_enabled(&self) -> bool {
        self.tls_enabled
    }

    /// The connection's directory.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Mutable access to the directory, for test arrangement.
    pub fn directory_mut(&mut self) -> &mut Directory {
        &mut self.directory
    }

    /// The connection's call log.
    pub fn call_log(&self) -> &CallLog {
        &self.log
    }

    /// Names of the operations called so far, in order.
    pub fn ops_called(&self) -> Vec<String> {
        self.log.ops()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Recording-only operation invoked by the registry's `connect`.
    pub fn initialize(&mut self, uri: &str) -> Result<(), DirectoryError> {
        let args = CallArgs::new().with(&uri);
        self.recorded(ops::INITIALIZE, args, |_| Ok(()))
    }

    /// Retrieve an option previously stored with [`set_option`](Self::set_option).
    pub fn get_option(&mut self, option: &str) -> Result<Option<Value>, DirectoryError> {
        let args = CallArgs::new().with(&option);
        self.recorded(ops::GET_OPTION, args, |conn| {
            Ok(conn.options.get(option).cloned())
        })
    }

    /// Store an option value verbatim.
    pub fn set_option(&mut self, option: &str, value: Value) -> Result<(), DirectoryError> {
        let args = CallArgs::new().with(&option).with(&value);
        self.recorded(ops::SET_OPTION, args, |conn| {
            conn.options.insert(option.to_string(), value.clone());
            Ok(())
        })
    }

    /// Authenticate against the directory.
    ///
    /// Empty identity and empty credential succeed unconditionally (anonymous
    /// bind) without touching the store. Otherwise the credential must match
    /// one of the `userPassword` values on the identified entry, either
    /// exactly or through a supported password hash scheme.
    pub fn bind(&mut self, who: &str, cred: &str) -> Result<OpResult, DirectoryError> {
        let args = CallArgs::new().with(&who).with(&cred);
        self.recorded(ops::BIND, args, |conn| conn.bind_impl(who, cred))
    }

    /// Enable the TLS latch.
    pub fn start_tls(&mut self) -> Result<(), DirectoryError> {
        self.recorded(ops::START_TLS, CallArgs::new(), |conn| {
            conn.tls_enabled = true;
            Ok(())
        })
    }

    /// Test whether an attribute on an entry contains a value: 1 if present,
    /// 0 if not.
    pub fn compare(&mut self, eid: &str, attr: &str, value: &str) -> Result<i32, DirectoryError> {
        let args = CallArgs::new().with(&eid).with(&attr).with(&value);
        self.recorded(ops::COMPARE, args, |conn| conn.compare_impl(eid, attr, value))
    }

    /// Search the directory.
    pub fn search(
        &mut self,
        base: &str,
        scope: Scope,
        filterstr: &str,
        attrlist: Option<&[&str]>,
        attrsonly: bool,
    ) -> Result<SearchResult, DirectoryError> {
        let args = CallArgs::new()
            .with(&base)
            .with(&scope)
            .with(&filterstr)
            .with(&attrlist)
            .with(&attrsonly);
        self.recorded(ops::SEARCH, args, |conn| {
            conn.search_impl(base, scope, filterstr, attrlist, attrsonly)
        })
    }

    /// Search, deferring retrieval: the result is computed eagerly, stored,
    /// and fetched once via [`fetch_result`](Self::fetch_result).
    pub fn search_async(
        &mut self,
        base: &str,
        scope: Scope,
        filterstr: &str,
        attrlist: Option<&[&str]>,
        attrsonly: bool,
    ) -> Result<MsgId, DirectoryError> {
        let args = CallArgs::new()
            .with(&base)
            .with(&scope)
            .with(&filterstr)
            .with(&attrlist)
            .with(&attrsonly);
        self.recorded(ops::SEARCH_ASYNC, args, |conn| {
            let result = conn.search_impl(base, scope, filterstr, attrlist, attrsonly)?;
            conn.async_results.push(Some(result));
            Ok(MsgId(conn.async_results.len() - 1))
        })
    }

    /// Retrieve a stored asynchronous result, invalidating the handle.
    ///
    /// Returns `None` for an unknown handle or one already fetched. The
    /// `timeout` is accepted for interface fidelity and ignored.
    pub fn fetch_result(
        &mut self,
        msgid: MsgId,
        timeout: Option<u64>,
    ) -> Result<Option<SearchResult>, DirectoryError> {
        let args = CallArgs::new().with(&msgid).with(&timeout);
        self.recorded(ops::FETCH_RESULT, args, |conn| {
            Ok(conn.async_results.get_mut(msgid.0).and_then(Option::take))
        })
    }

    /// Apply attribute modifications to an entry, in order, without
    /// rollback: a failing modification leaves the earlier ones applied.
    pub fn modify(&mut self, eid: &str, mods: &[ModSpec]) -> Result<OpResult, DirectoryError> {
        let args = CallArgs::new().with(&eid).with(&mods);
        self.recorded(ops::MODIFY, args, |conn| conn.modify_impl(eid, mods))
    }

    /// Insert a new entry.
    pub fn add(&mut self, eid: &str, attrs: &Attrs) -> Result<OpResult, DirectoryError> {
        let args = CallArgs::new().with(&eid).with(&attrs);
        self.recorded(ops::ADD, args, |conn| conn.add_impl(eid, attrs))
    }

    /// Move an entry to a new identifier built from `new_rdn` and either
    /// `new_parent` or the entry's current parent.
    pub fn rename(
        &mut self,
        eid: &str,
        new_rdn: &str,
        new_parent: Option<&str>,
    ) -> Result<OpResult, DirectoryError> {
        let args = CallArgs::new().with(&eid).with(&new_rdn).with(&new_parent);
        self.recorded(ops::RENAME, args, |conn| {
            conn.rename_impl(eid, new_rdn, new_parent)
        })
    }

    /// Remove an entry.
    pub fn delete(&mut self, eid: &str) -> Result<OpResult, DirectoryError> {
        let args = CallArgs::new().with(&eid);
        self.recorded(ops::DELETE, args, |conn| conn.delete_impl(eid))
    }

    /// Clear the bound identity. Idempotent.
    pub fn unbind(&mut self) -> Result<(), DirectoryError> {
        self.recorded(ops::UNBIND, CallArgs::new(), |conn| {
            conn.bound_as = None;
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Simulated implementations
    // ------------------------------------------------------------------

    fn bind_impl(&mut self, who: &str, cred: &str) -> Result<OpResult, DirectoryError> {
        let success = if who.is_empty() && cred.is_empty() {
            true
        } else {
            match self.compare_impl(who, USER_PASSWORD, cred) {
                Ok(outcome) => outcome == 1,
                // An entry without a password attribute cannot authenticate.
                Err(DirectoryError::UndefinedAttributeType(_)) => false,
                Err(error) => return Err(error),
            }
        };

        if success {
            self.bound_as = Some(who.to_string());
            Ok(OpResult::bind())
        } else {
            Err(DirectoryError::InvalidCredentials(who.to_string()))
        }
    }

    fn compare_impl(&self, eid: &str, attr: &str, value: &str) -> Result<i32, DirectoryError> {
        dn::validate(eid)?;

        let entry = self
            .directory
            .get(eid)
            .ok_or_else(|| DirectoryError::NoSuchEntry(eid.to_string()))?;
        let values = entry
            .get(attr)
            .ok_or_else(|| DirectoryError::UndefinedAttributeType(attr.to_string()))?;

        if attr.eq_ignore_ascii_case(USER_PASSWORD) {
            for stored in values {
                if password::is_hashed(stored) && password::verify(value, stored) {
                    return Ok(1);
                }
            }
        }

        Ok(if values.iter().any(|v| v == value) { 1 } else { 0 })
    }

    fn search_impl(
        &self,
        base: &str,
        scope: Scope,
        filterstr: &str,
        attrlist: Option<&[&str]>,
        attrsonly: bool,
    ) -> Result<SearchResult, DirectoryError> {
        dn::validate(base)?;

        if scope == Scope::Base && !self.directory.contains(base) {
            return Err(DirectoryError::NoSuchEntry(base.to_string()));
        }

        // An unsupported construct is not a hard failure: it surfaces as
        // SeedRequired so the caller can register a literal result instead.
        let expr = filter::parse(filterstr).map_err(|e| match e {
            FilterError::Malformed(detail) => DirectoryError::MalformedFilter(detail),
            FilterError::Unsupported(detail) => DirectoryError::SeedRequired(detail),
        })?;

        let base_parts = dn::explode_lower(base);
        let mut results = Vec::new();

        for (eid, attrs) in self.directory.iter() {
            let parts = dn::explode_lower(eid);
            let in_scope = match scope {
                Scope::Base => parts == base_parts,
                Scope::OneLevel => {
                    parts.len() == base_parts.len() + 1 && parts[1..] == base_parts[..]
                }
                Scope::Subtree => {
                    parts.len() >= base_parts.len()
                        && parts[parts.len() - base_parts.len()..] == base_parts[..]
                }
            };

            if !in_scope || !expr.matches(attrs) {
                continue;
            }

            let mut projected = match attrlist {
                Some(names) => attrs
                    .iter()
                    .filter(|(name, _)| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
                    .map(|(name, values)| (name.to_string(), values.to_vec()))
                    .collect::<Attrs>(),
                None => attrs.clone(),
            };
            if attrsonly {
                projected = projected
                    .keys()
                    .map(|name| (name.to_string(), Vec::new()))
                    .collect();
            }

            results.push(SearchEntry {
                eid: eid.to_string(),
                attrs: projected,
            });
        }

        Ok(results)
    }

    fn modify_impl(&mut self, eid: &str, mods: &[ModSpec]) -> Result<OpResult, DirectoryError> {
        dn::validate(eid)?;

        if !self.directory.contains(eid) {
            return Err(DirectoryError::NoSuchEntry(eid.to_string()));
        }

        for m in mods {
            let entry = self
                .directory
                .get_mut(eid)
                .ok_or_else(|| DirectoryError::NoSuchEntry(eid.to_string()))?;
            if !entry.contains(&m.attr) {
                return Err(DirectoryError::UndefinedAttributeType(m.attr.clone()));
            }

            let values = m.values.clone().unwrap_or_default();
            match m.op {
                ModOp::Add => {
                    if values.is_empty() {
                        return Err(DirectoryError::Protocol(format!(
                            "add modification of {:?} requires at least one value",
                            m.attr
                        )));
                    }
                    if let Some(existing) = entry.get_mut(&m.attr) {
                        for value in values {
                            if !existing.contains(&value) {
                                existing.push(value);
                            }
                        }
                    }
                }
                ModOp::Delete => {
                    if values.is_empty() {
                        entry.remove(&m.attr);
                    } else if let Some(existing) = entry.get_mut(&m.attr) {
                        existing.retain(|v| !values.contains(v));
                    }
                }
                ModOp::Replace => {
                    if values.is_empty() {
                        entry.remove(&m.attr);
                    } else {
                        entry.insert(m.attr.clone(), values);
                    }
                }
            }
        }

        Ok(OpResult::modify())
    }

    fn add_impl(&mut self, eid: &str, attrs: &Attrs) -> Result<OpResult, DirectoryError> {
        dn::validate(eid)?;

        if self.directory.contains(eid) {
            return Err(DirectoryError::AlreadyExists(eid.to_string()));
        }

        self.directory.insert(eid, attrs.clone());
        Ok(OpResult::add(self.log.len()))
    }

    fn rename_impl(
        &mut self,
        eid: &str,
        new_rdn: &str,
        new_parent: Option<&str>,
    ) -> Result<OpResult, DirectoryError> {
        dn::validate(eid)?;
        dn::validate(new_rdn)?;
        if let Some(parent) = new_parent {
            dn::validate(parent)?;
        }

        let mut entry = self
            .directory
            .remove(eid)
            .ok_or_else(|| DirectoryError::NoSuchEntry(eid.to_string()))?;

        let superior = match new_parent {
            Some(parent) => parent.to_string(),
            None => dn::parent(eid),
        };
        let new_eid = format!("{},{}", new_rdn, superior);

        let old_rdn = eid.split(',').next().unwrap_or(eid);
        let (old_attr, old_value) = dn::split_rdn(old_rdn)?;
        let (new_attr, new_value) = dn::split_rdn(new_rdn)?;

        // Append the new RDN value to its attribute.
        let values = entry.get_or_insert_mut(new_attr);
        if !values.iter().any(|v| v == new_value) {
            values.push(new_value.to_string());
        }

        // Remove the old RDN value; the attribute goes away entirely when it
        // held only that value and differs from the new attribute.
        let same_attr = old_attr.eq_ignore_ascii_case(new_attr);
        let drop_old_attr = entry
            .get(old_attr)
            .is_some_and(|values| !(same_attr || values.len() > 1));
        if drop_old_attr {
            entry.remove(old_attr);
        } else if let Some(values) = entry.get_mut(old_attr) {
            values.retain(|v| v != old_value);
        }

        self.directory.insert(new_eid, entry);
        Ok(OpResult::rename())
    }

    fn delete_impl(&mut self, eid: &str) -> Result<OpResult, DirectoryError> {
        dn::validate(eid)?;

        match self.directory.remove(eid) {
            Some(_) => Ok(OpResult::delete()),
            None => Err(DirectoryError::NoSuchEntry(eid.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
