// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Call log implementation.

use crate::call::{CallArgs, RecordedCall};
use parking_lot::Mutex;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

/// Ordered log of operations invoked on a simulated client.
///
/// Every call is recorded before it executes, so the log also contains calls
/// that later failed. Recording takes `&self`; the log is internally locked.
pub struct CallLog {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl CallLog {
    /// Create a new in-memory call log.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
        }
    }

    /// Create a call log that also mirrors each record to a file (JSONL).
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
        })
    }

    /// Record one invocation. Returns the log length including this call.
    pub fn record(&self, op: impl Into<String>, args: CallArgs) -> u64 {
        let mut calls = self.calls.lock();
        let call = RecordedCall {
            seq: calls.len() as u64,
            op: op.into(),
            args,
        };

        calls.push(call.clone());
        let count = calls.len() as u64;
        drop(calls);

        if let Some(ref writer) = self.file_writer {
            use std::io::Write;
            let mut w = writer.lock();
            if let Ok(json) = serde_json::to_string(&call) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }

        count
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Get the recorded operation names, without arguments.
    pub fn ops(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.op.clone()).collect()
    }

    /// Get the last N recorded calls.
    pub fn last(&self, n: usize) -> Vec<RecordedCall> {
        let all = self.calls.lock();
        all.iter().rev().take(n).rev().cloned().collect()
    }

    /// Count calls matching a predicate.
    pub fn count<F: Fn(&RecordedCall) -> bool>(&self, pred: F) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    /// Find calls by operation name.
    pub fn find_by_op(&self, op: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }

    /// Get the total number of recorded calls.
    pub fn len(&self) -> u64 {
        self.calls.lock().len() as u64
    }

    /// Check if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Clear all recorded calls. Sequence numbers restart at 0.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Default for CallLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallLog")
            .field("len", &self.calls.lock().len())
            .field("file_writer", &self.file_writer.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
