// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection registry and interception lifecycle.
//!
//! [`MockDirectory`] is the top-level fixture: it holds seed content per
//! connection URI, hands out lazily created [`Connection`]s while active,
//! and balances named interception points. When the last point is
//! uninstalled the whole connection table is discarded, so each activation
//! cycle starts from pristine seed content.
//!
//! The registry does not patch anything itself; the collaborator under test
//! is expected to take [`connect`](MockDirectory::connect) as an injected
//! factory, and the install/uninstall pair only tracks where such a factory
//! has been wired in.

use crate::connection::Connection;
use crate::error::DirectoryError;
use crate::store::Directory;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::HashSet;
use thiserror::Error;

/// Reserved content key used for URIs without their own seed content.
pub const DEFAULT_URI: &str = "__default__";

/// Errors from registry lifecycle management.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0:?} is already installed")]
    AlreadyInstalled(String),

    #[error("{0:?} is not installed")]
    NotInstalled(String),

    #[error("registry is inactive; install an interception point first")]
    Inactive,

    #[error("no default directory content configured for {0:?}")]
    NoDefaultContent(String),

    #[error(transparent)]
    Op(#[from] DirectoryError),
}

/// Top-level fixture managing seed content and simulated connections.
#[derive(Debug, Default)]
pub struct MockDirectory {
    contents: IndexMap<String, Directory>,
    connections: Option<IndexMap<String, Connection>>,
    installed: HashSet<String>,
}

impl MockDirectory {
    /// Create a registry with no seed content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with default seed content for all URIs.
    pub fn with_content(content: Directory) -> Self {
        let mut registry = Self::new();
        registry.set_content(DEFAULT_URI, content);
        registry
    }

    /// Configure seed content for a specific URI (or [`DEFAULT_URI`]).
    ///
    /// Content changes do not affect connections already created in the
    /// current activation cycle.
    pub fn set_content(&mut self, uri: impl Into<String>, content: Directory) {
        self.contents.insert(uri.into(), content);
    }

    /// Install an interception point by name.
    ///
    /// The first install activates the registry, creating an empty
    /// connection table.
    pub fn install(&mut self, point: &str) -> Result<(), RegistryError> {
        if !self.installed.insert(point.to_string()) {
            return Err(RegistryError::AlreadyInstalled(point.to_string()));
        }

        if self.connections.is_none() {
            self.connections = Some(IndexMap::new());
        }

        Ok(())
    }

    /// Uninstall a previously installed interception point.
    ///
    /// Removing the last point discards every connection; a later reinstall
    /// recreates fresh connections from seed content.
    pub fn uninstall(&mut self, point: &str) -> Result<(), RegistryError> {
        if !self.installed.remove(point) {
            return Err(RegistryError::NotInstalled(point.to_string()));
        }

        if self.installed.is_empty() {
            self.connections = None;
        }

        Ok(())
    }

    /// Uninstall everything, unconditionally.
    pub fn uninstall_all(&mut self) {
        self.installed.clear();
        self.connections = None;
    }

    /// True if the named point is currently installed.
    pub fn is_installed(&self, point: &str) -> bool {
        self.installed.contains(point)
    }

    /// True between the first install and the last uninstall.
    pub fn is_active(&self) -> bool {
        self.connections.is_some()
    }

    /// Look up (or lazily create) the connection for a URI.
    ///
    /// A URI without its own seed content falls back to the default; with no
    /// default configured either, this fails with `NoDefaultContent`.
    pub fn get_mut(&mut self, uri: &str) -> Result<&mut Connection, RegistryError> {
        let Some(connections) = self.connections.as_mut() else {
            return Err(RegistryError::Inactive);
        };

        match connections.entry(uri.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(slot) => {
                let content = self
                    .contents
                    .get(uri)
                    .or_else(|| self.contents.get(DEFAULT_URI))
                    .ok_or_else(|| RegistryError::NoDefaultContent(uri.to_string()))?;
                Ok(slot.insert(Connection::new(content)))
            }
        }
    }

    /// [`get_mut`](Self::get_mut) plus an `initialize` call recorded on the
    /// connection, the way a factory hand-off would.
    pub fn connect(&mut self, uri: &str) -> Result<&mut Connection, RegistryError> {
        let connection = self.get_mut(uri)?;
        connection.initialize(uri)?;
        Ok(connection)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
