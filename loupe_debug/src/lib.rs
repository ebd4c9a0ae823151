// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON export for loupe session diagnostics.
//!
//! This crate provides [`TraceSink`](loupe_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event
//!   output.
//! - [`json::JsonLinesSink`] — one JSON object per event, for offline
//!   inspection and tooling.

pub mod json;
pub mod pretty;
