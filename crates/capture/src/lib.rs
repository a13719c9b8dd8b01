// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Call recording and return-value seeding for test doubles.
//!
//! This crate provides the generic half of a simulated client: an ordered
//! [`CallLog`] of every operation invoked on an instance, and a
//! [`SeedRegistry`] of caller-registered `(operation, arguments) -> outcome`
//! overrides. Arguments are captured as JSON values so call signatures can
//! be compared structurally and rendered for diagnostics.

mod call;
mod log;
mod seeds;

pub use call::{CallArgs, RecordedCall};
pub use log::CallLog;
pub use seeds::SeedRegistry;
