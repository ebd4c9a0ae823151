// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace output.
//!
//! [`JsonLinesSink`] implements [`TraceSink`] and writes one JSON object
//! per event to a [`Write`](std::io::Write) destination. Rectangles are
//! encoded as `[x0, y0, x1, y1]` arrays.

use std::io::Write;

use serde_json::json;

use loupe_core::trace::{CloseEvent, FrameEvent, ShowEvent, TraceSink};

/// Writes one JSON object per trace event.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink").finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn rect_array(r: kurbo::Rect) -> serde_json::Value {
    json!([r.x0, r.y0, r.x1, r.y1])
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_show(&mut self, e: &ShowEvent) {
        let _ = writeln!(
            self.writer,
            "{}",
            json!({
                "event": "show",
                "context": e.context.0,
                "created": e.created,
                "focus": rect_array(e.focus),
                "layer": rect_array(e.layer_bounds),
            })
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        let _ = writeln!(
            self.writer,
            "{}",
            json!({
                "event": "frame",
                "now_ns": e.now.nanos(),
                "layer": rect_array(e.layer_bounds),
                "settling": e.settling,
            })
        );
    }

    fn on_close(&mut self, e: &CloseEvent) {
        let _ = writeln!(
            self.writer,
            "{}",
            json!({
                "event": "close",
                "context": e.context.0,
            })
        );
    }
}
