// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recorded call data types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Ordered argument list captured for one operation invocation.
///
/// Arguments are stored as JSON values, which gives structural equality for
/// seed matching, cheap deep copies, and a readable rendering for
/// diagnostics. Two signatures match only if every argument compares equal;
/// equivalent-but-differently-shaped argument lists do not.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs(Vec<Value>);

impl CallArgs {
    /// Create an empty argument list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an argument, converting any serializable value.
    ///
    /// Values that fail to serialize (e.g. maps with non-string keys) are
    /// captured as `null` rather than aborting the recording.
    pub fn push<T: Serialize>(&mut self, value: &T) {
        self.0
            .push(serde_json::to_value(value).unwrap_or(Value::Null));
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with<T: Serialize>(mut self, value: &T) -> Self {
        self.push(value);
        self
    }

    /// The captured argument values, in call order.
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Number of captured arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no arguments were captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for CallArgs {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for CallArgs {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for CallArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for value in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// One recorded operation invocation.
///
/// Appended to the [`CallLog`](crate::CallLog) before the operation runs, so
/// failing calls are recorded too.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedCall {
    /// Sequence number, starting at 0 per log.
    pub seq: u64,

    /// Operation name.
    pub op: String,

    /// Captured arguments.
    pub args: CallArgs,
}

impl RecordedCall {
    /// Render the call as `op(arg1, arg2, ...)` with JSON-literal arguments.
    pub fn signature(&self) -> String {
        format!("{}({})", self.op, self.args)
    }
}

impl fmt::Display for RecordedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.op, self.args)
    }
}

#[cfg(test)]
#[path = "call_tests.rs"]
mod tests;
