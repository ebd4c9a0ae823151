// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).
//! Timestamps are printed in milliseconds.

use std::io::Write;

use loupe_core::trace::{CloseEvent, FrameEvent, ShowEvent, TraceSink};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn fmt_rect(r: kurbo::Rect) -> String {
    format!("({}, {}) {}x{}", r.x0, r.y0, r.width(), r.height())
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_show(&mut self, e: &ShowEvent) {
        let _ = writeln!(
            self.writer,
            "[show] ctx={} {} focus={} layer={}",
            e.context.0,
            if e.created { "created" } else { "moved" },
            fmt_rect(e.focus),
            fmt_rect(e.layer_bounds),
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] t={:.1}ms layer={}{}",
            e.now.nanos() as f64 / 1e6,
            fmt_rect(e.layer_bounds),
            if e.settling { " (settling)" } else { "" },
        );
    }

    fn on_close(&mut self, e: &CloseEvent) {
        let _ = writeln!(self.writer, "[close] ctx={}", e.context.0);
    }
}
