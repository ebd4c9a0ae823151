// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable fakes and a scripted frame driver for magnifier sessions.
//!
//! The pieces mirror what a real embedder provides around
//! [`MagnifierSession`]: a presenter that applies scene changes
//! ([`MirrorPresenter`], which records them instead of drawing), an
//! overlay host ([`FakeHost`]), and a frame loop with a compositor clock
//! ([`SessionDriver`], which steps a fixed ~60 Hz clock). Tests and demos
//! drive the whole pipeline through the driver and assert on the mirror.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use core::fmt;
use core::time::Duration;

use kurbo::{Rect, Size, Vec2};

use loupe_core::backend::Presenter;
use loupe_core::host::{ContextId, HostSurface, OverlayHost};
use loupe_core::scene::{Backdrop, Fill, SceneChanges, SceneStore};
use loupe_core::session::{FocusBound, MagnifierSession};
use loupe_core::time::Timestamp;
use loupe_core::trace::{CloseEvent, FrameEvent, NoopSink, ShowEvent, TraceSink, Tracer};

/// Frame interval of the scripted clock (~60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_nanos(16_666_667);

// ---------------------------------------------------------------------------
// MirrorPresenter
// ---------------------------------------------------------------------------

/// Mirror of one scene node, as last applied by [`MirrorPresenter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MirrorNode {
    /// Surface-absolute bounds.
    pub bounds: Rect,
    /// Fill of the node.
    pub fill: Fill,
    /// Corner radius of the node.
    pub corner_radius: f64,
    /// Backdrop magnification, if any.
    pub backdrop: Option<Backdrop>,
    /// Whether the node has a registered painter.
    pub has_painter: bool,
}

impl MirrorNode {
    fn read(scene: &SceneStore, idx: u32) -> Self {
        Self {
            bounds: scene.absolute_bounds_at(idx),
            fill: scene.fill_at(idx),
            corner_radius: scene.corner_radius_at(idx),
            backdrop: scene.backdrop_at(idx),
            has_painter: scene.has_painter_at(idx),
        }
    }
}

/// A [`Presenter`] that mirrors the scene into a plain map for
/// assertions.
///
/// Applies the same incremental updates a platform presenter would, so a
/// test that passes against the mirror exercises the exact change stream
/// a native tree would see.
#[derive(Debug, Default)]
pub struct MirrorPresenter {
    nodes: BTreeMap<u32, MirrorNode>,
    applies: u64,
}

impl MirrorPresenter {
    /// Creates an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of mirrored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the mirror is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the mirrored node at raw slot `idx`, if present.
    #[must_use]
    pub fn node(&self, idx: u32) -> Option<&MirrorNode> {
        self.nodes.get(&idx)
    }

    /// Returns how many times [`apply`](Presenter::apply) has run.
    #[must_use]
    pub fn applies(&self) -> u64 {
        self.applies
    }
}

impl Presenter for MirrorPresenter {
    fn apply(&mut self, scene: &SceneStore, changes: &SceneChanges) {
        // 1. Removals
        for idx in &changes.removed {
            self.nodes.remove(idx);
        }

        // 2. Additions (full snapshot)
        for &idx in &changes.added {
            self.nodes.insert(idx, MirrorNode::read(scene, idx));
        }

        // 3. Incremental property updates
        for &idx in &changes.bounds {
            if let Some(node) = self.nodes.get_mut(&idx) {
                node.bounds = scene.absolute_bounds_at(idx);
            }
        }
        for &idx in &changes.appearance {
            if let Some(node) = self.nodes.get_mut(&idx) {
                node.fill = scene.fill_at(idx);
                node.corner_radius = scene.corner_radius_at(idx);
                node.has_painter = scene.has_painter_at(idx);
            }
        }
        for &idx in &changes.backdrops {
            if let Some(node) = self.nodes.get_mut(&idx) {
                node.backdrop = scene.backdrop_at(idx);
            }
        }

        self.applies += 1;
    }
}

// ---------------------------------------------------------------------------
// FakeHost
// ---------------------------------------------------------------------------

/// An [`OverlayHost`] over a single surface node, with optional
/// per-context translation offsets.
#[derive(Debug)]
pub struct FakeHost {
    surface: HostSurface,
    offsets: BTreeMap<u64, Vec2>,
}

impl FakeHost {
    /// Creates a host resolving every context to `surface`.
    #[must_use]
    pub fn new(surface: HostSurface) -> Self {
        Self {
            surface,
            offsets: BTreeMap::new(),
        }
    }

    /// Sets the translation from `context`'s coordinate space to the
    /// surface's.
    pub fn set_offset(&mut self, context: ContextId, offset: Vec2) {
        self.offsets.insert(context.0, offset);
    }
}

impl OverlayHost for FakeHost {
    fn overlay_surface(&self, _context: ContextId) -> HostSurface {
        self.surface
    }

    fn rect_in_surface(&self, context: ContextId, rect: Rect) -> Rect {
        rect + self.offsets.get(&context.0).copied().unwrap_or(Vec2::ZERO)
    }
}

// ---------------------------------------------------------------------------
// SessionDriver
// ---------------------------------------------------------------------------

/// Owns a scene, host, presenter, and magnifier session, and runs them
/// exactly as an embedder's frame loop would.
///
/// Each operation (show, frame, close) runs the full pipeline: session
/// mutation → [`SceneStore::evaluate_into`] → [`Presenter::apply`] →
/// trace emission.
pub struct SessionDriver<P: Presenter, S: TraceSink = NoopSink> {
    scene: SceneStore,
    host: FakeHost,
    session: MagnifierSession,
    presenter: P,
    sink: S,
    now: Timestamp,
    changes: SceneChanges,
}

impl<P: Presenter, S: TraceSink> fmt::Debug for SessionDriver<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionDriver")
            .field("now", &self.now)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<P: Presenter> SessionDriver<P, NoopSink> {
    /// Creates a driver with a fresh scene whose surface has the given
    /// size, discarding trace events.
    #[must_use]
    pub fn new(surface_size: Size, presenter: P) -> Self {
        Self::with_sink(surface_size, presenter, NoopSink)
    }
}

impl<P: Presenter, S: TraceSink> SessionDriver<P, S> {
    /// Like [`new`](SessionDriver::new), but emitting trace events to
    /// `sink`.
    #[must_use]
    pub fn with_sink(surface_size: Size, presenter: P, sink: S) -> Self {
        let mut scene = SceneStore::new();
        let surface = scene.create_node();
        scene.set_bounds(surface, surface_size.to_rect());
        let mut driver = Self {
            scene,
            host: FakeHost::new(HostSurface {
                node: surface,
                size: surface_size,
            }),
            session: MagnifierSession::default(),
            presenter,
            sink,
            now: Timestamp::ZERO,
            changes: SceneChanges::default(),
        };
        // Surface creation is a frame of its own.
        driver.flush();
        driver
    }

    /// Shows or moves the magnifier, then evaluates and presents.
    pub fn show(&mut self, context: ContextId, bound: FocusBound) {
        let created = !self.session.is_running();
        self.session.show(&mut self.scene, &self.host, context, bound);
        self.flush();

        let event = ShowEvent {
            context,
            focus: self.host.rect_in_surface(context, bound.rect()).expand(),
            layer_bounds: self.session.target_bounds().unwrap_or_default(),
            created,
        };
        Tracer::new(&mut self.sink).show(&event);
    }

    /// Advances the clock one frame, ticks the session, evaluates, and
    /// presents.
    pub fn frame(&mut self) {
        self.now = self.now + FRAME_INTERVAL;
        self.session.tick(&mut self.scene, self.now);
        self.flush();

        if let Some(overlay) = self.session.overlay() {
            let event = FrameEvent {
                now: self.now,
                layer_bounds: self.scene.absolute_bounds(overlay.magnifier),
                settling: self.session.is_settling(),
            };
            Tracer::new(&mut self.sink).frame(&event);
        }
    }

    /// Runs `n` consecutive frames.
    pub fn frames(&mut self, n: u32) {
        for _ in 0..n {
            self.frame();
        }
    }

    /// Closes the magnifier, then evaluates and presents.
    pub fn close(&mut self) {
        let context = self.session.context();
        self.session.close(&mut self.scene);
        self.flush();

        if let Some(context) = context {
            Tracer::new(&mut self.sink).close(&CloseEvent { context });
        }
    }

    /// Sets the coordinate offset for a context on the fake host.
    pub fn set_context_offset(&mut self, context: ContextId, offset: Vec2) {
        self.host.set_offset(context, offset);
    }

    /// Returns the driven session.
    #[must_use]
    pub fn session(&self) -> &MagnifierSession {
        &self.session
    }

    /// Returns the scene store.
    #[must_use]
    pub fn scene(&self) -> &SceneStore {
        &self.scene
    }

    /// Returns the presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Returns the trace sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the current clock value.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.now
    }

    fn flush(&mut self) {
        self.scene.evaluate_into(&mut self.changes);
        self.presenter.apply(&self.scene, &self.changes);
    }
}
