// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for magnifier sessions.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! session-driving code calls at each step. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! Emission is wired at the embedder's frame-loop level (see
//! `loupe_harness`'s session driver), not inside the session itself.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use kurbo::Rect;

use crate::host::ContextId;
use crate::time::Timestamp;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a session shows or moves the magnifier.
#[derive(Clone, Copy, Debug)]
pub struct ShowEvent {
    /// Context the magnifier is bound to.
    pub context: ContextId,
    /// Focus rect, in surface coordinates.
    pub focus: Rect,
    /// Layer bounds the overlay is at or gliding toward.
    pub layer_bounds: Rect,
    /// Whether this show created the overlay (as opposed to moving it).
    pub created: bool,
}

/// Emitted when a frame tick advances the overlay toward its target.
#[derive(Clone, Copy, Debug)]
pub struct FrameEvent {
    /// Time of the tick.
    pub now: Timestamp,
    /// Layer bounds after this tick.
    pub layer_bounds: Rect,
    /// Whether the overlay is still gliding after this tick.
    pub settling: bool,
}

/// Emitted when the magnifier is closed.
#[derive(Clone, Copy, Debug)]
pub struct CloseEvent {
    /// Context the magnifier was bound to.
    pub context: ContextId,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from session-driving code.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when the magnifier is shown or moved.
    fn on_show(&mut self, e: &ShowEvent) {
        _ = e;
    }

    /// Called when a frame tick advances the overlay.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called when the magnifier is closed.
    fn on_close(&mut self, e: &CloseEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`ShowEvent`].
    #[inline]
    pub fn show(&mut self, e: &ShowEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_show(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CloseEvent`].
    #[inline]
    pub fn close(&mut self, e: &CloseEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_close(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
