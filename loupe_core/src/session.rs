// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Magnifier session lifecycle.
//!
//! [`MagnifierSession`] is the stateful owner of the magnifier overlay:
//! Idle until the first [`show`](MagnifierSession::show), then Active and
//! bound to a single source context until [`close`](MagnifierSession::close).
//! The first show snaps the overlay into place; subsequent shows glide it
//! toward the new placement over a fixed, linear transition that any newer
//! show preempts.
//!
//! The session is constructed once by the owning subsystem (e.g. the
//! touch-event dispatcher) and passed wherever it is needed; there is no
//! global instance. It is single-threaded by design: every operation runs
//! to completion on the thread that owns the scene store.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Rect};

use crate::animate::{BoundsAnimator, Curve, Retarget};
use crate::color::{Color, DefaultTheme, Theme};
use crate::geometry::{
    self, CORNER_RADIUS, TRANSITION_DURATION, ZOOM_LAYER_SIZE, ZOOM_SCALE,
};
use crate::host::{ContextId, OverlayHost};
use crate::paint::BorderPainter;
use crate::scene::{Backdrop, Fill, NodeId, SceneStore};
use crate::time::Timestamp;

/// A caret or selection edge: two endpoints in the source context's
/// coordinate space, supplied fresh on every show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusBound {
    /// One endpoint of the caret or selection edge.
    pub start: Point,
    /// The other endpoint.
    pub end: Point,
}

impl FocusBound {
    /// Creates a focus bound from two endpoints.
    #[inline]
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns the bounding box of the two endpoints.
    #[inline]
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}

/// The overlay's scene nodes, created together and dismantled as one
/// unit.
///
/// Bundling the handles removes any destruction-order hazard: nothing can
/// tear down the painted border separately from the node that owns its
/// painter.
#[derive(Clone, Copy, Debug)]
pub struct OverlayNodes {
    /// Container for the whole overlay; its bounds are the animated layer
    /// bounds.
    pub magnifier: NodeId,
    /// Child showing the magnified backdrop, at a fixed offset inside the
    /// magnifier node.
    pub zoom: NodeId,
    /// Child spanning the full overlay, custom-painted with the border
    /// and shadow.
    pub border: NodeId,
}

impl OverlayNodes {
    /// Creates the overlay bundle under `surface` and configures the
    /// fixed-size children.
    fn build(scene: &mut SceneStore, surface: NodeId, theme: &dyn Theme) -> Self {
        let margins = geometry::magnifier_margins();
        let layer = ZOOM_LAYER_SIZE.to_rect() + margins;

        let magnifier = scene.create_node();
        let zoom = scene.create_node();
        let border = scene.create_node();
        scene.add_child(surface, magnifier);
        scene.add_child(magnifier, zoom);
        scene.add_child(magnifier, border);

        scene.set_bounds(
            zoom,
            Rect::from_origin_size(Point::new(margins.x0, margins.y0), ZOOM_LAYER_SIZE),
        );
        // The zoom node is a transparent solid the backdrop samples through.
        scene.set_fill(zoom, Fill::Solid(Color::TRANSPARENT));
        scene.set_corner_radius(zoom, CORNER_RADIUS);

        scene.set_bounds(border, layer.with_origin(Point::ZERO));
        scene.set_painter(border, Some(Box::new(BorderPainter::new(theme))));

        Self {
            magnifier,
            zoom,
            border,
        }
    }

    /// Destroys all three nodes, dropping the border painter with them.
    fn dismantle(self, scene: &mut SceneStore) {
        scene.remove_from_parent(self.zoom);
        scene.destroy_node(self.zoom);
        scene.remove_from_parent(self.border);
        scene.destroy_node(self.border);
        scene.remove_from_parent(self.magnifier);
        scene.destroy_node(self.magnifier);
    }
}

struct ActiveOverlay {
    context: ContextId,
    nodes: OverlayNodes,
    animator: BoundsAnimator,
}

/// Shows, moves, and hides the touch-selection magnifier.
pub struct MagnifierSession {
    theme: Box<dyn Theme>,
    active: Option<ActiveOverlay>,
}

impl fmt::Debug for MagnifierSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MagnifierSession")
            .field("context", &self.context())
            .finish_non_exhaustive()
    }
}

impl Default for MagnifierSession {
    fn default() -> Self {
        Self::new(Box::new(DefaultTheme))
    }
}

impl MagnifierSession {
    /// Creates an idle session that colors its border from `theme`.
    #[must_use]
    pub fn new(theme: Box<dyn Theme>) -> Self {
        Self {
            theme,
            active: None,
        }
    }

    /// Shows the magnifier for `bound`, or moves it if already showing.
    ///
    /// The first call builds the overlay and places it immediately — no
    /// glide from a stale position. Subsequent calls retarget the overlay
    /// with the fixed [`TRANSITION_DURATION`] linear glide, preempting any
    /// transition still in flight. The backdrop sampling offset is applied
    /// immediately in both cases so the zoomed content always matches the
    /// region under the new placement.
    ///
    /// # Panics
    ///
    /// Panics if the session is already showing a magnifier for a
    /// different context. Close the session before rebinding it.
    pub fn show(
        &mut self,
        scene: &mut SceneStore,
        host: &dyn OverlayHost,
        context: ContextId,
        bound: FocusBound,
    ) {
        let surface = host.overlay_surface(context);
        let focus = host.rect_in_surface(context, bound.rect()).expand();
        let layout = geometry::overlay_layout(surface.size, focus);
        let backdrop = Some(Backdrop {
            zoom: ZOOM_SCALE,
            offset: layout.backdrop_offset,
        });

        match &mut self.active {
            None => {
                let nodes = OverlayNodes::build(scene, surface.node, self.theme.as_ref());
                scene.set_bounds(nodes.magnifier, layout.layer_bounds);
                scene.set_backdrop(nodes.zoom, backdrop);
                self.active = Some(ActiveOverlay {
                    context,
                    nodes,
                    animator: BoundsAnimator::new(layout.layer_bounds),
                });
            }
            Some(active) => {
                assert!(
                    active.context == context,
                    "magnifier already bound to a different context"
                );
                scene.set_backdrop(active.nodes.zoom, backdrop);
                active.animator.retarget(
                    layout.layer_bounds,
                    Retarget::Animate {
                        duration: TRANSITION_DURATION,
                        curve: Curve::Linear,
                    },
                );
            }
        }
    }

    /// Advances any in-flight glide to `now`, writing the interpolated
    /// bounds to the scene.
    ///
    /// Call once per frame from the embedder's compositor clock. A no-op
    /// while the session is idle or settled.
    pub fn tick(&mut self, scene: &mut SceneStore, now: Timestamp) {
        if let Some(active) = &mut self.active {
            if let Some(bounds) = active.animator.tick(now) {
                scene.set_bounds(active.nodes.magnifier, bounds);
            }
        }
    }

    /// Hides the magnifier and releases its scene nodes.
    ///
    /// Any in-flight transition is abandoned; no further callbacks fire.
    /// Idempotent: closing an idle session is a no-op.
    pub fn close(&mut self, scene: &mut SceneStore) {
        if let Some(active) = self.active.take() {
            active.nodes.dismantle(scene);
        }
    }

    /// Returns whether a magnifier is currently showing.
    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the context the magnifier is bound to, if active.
    #[inline]
    #[must_use]
    pub fn context(&self) -> Option<ContextId> {
        self.active.as_ref().map(|a| a.context)
    }

    /// Returns the overlay node bundle, if active.
    #[inline]
    #[must_use]
    pub fn overlay(&self) -> Option<&OverlayNodes> {
        self.active.as_ref().map(|a| &a.nodes)
    }

    /// Returns the layer bounds the overlay is at or gliding toward, if
    /// active.
    #[inline]
    #[must_use]
    pub fn target_bounds(&self) -> Option<Rect> {
        self.active.as_ref().map(|a| a.animator.target())
    }

    /// Returns whether a glide is pending or in flight.
    #[inline]
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.animator.is_settling())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Size, Vec2};

    use crate::geometry::overlay_layout;
    use crate::host::HostSurface;

    use super::*;

    struct TestHost {
        surface: HostSurface,
        offset: Vec2,
    }

    impl OverlayHost for TestHost {
        fn overlay_surface(&self, _context: ContextId) -> HostSurface {
            self.surface
        }

        fn rect_in_surface(&self, _context: ContextId, rect: Rect) -> Rect {
            rect + self.offset
        }
    }

    fn setup() -> (SceneStore, TestHost) {
        let mut scene = SceneStore::new();
        let surface = scene.create_node();
        let size = Size::new(1000.0, 800.0);
        scene.set_bounds(surface, size.to_rect());
        (
            scene,
            TestHost {
                surface: HostSurface {
                    node: surface,
                    size,
                },
                offset: Vec2::ZERO,
            },
        )
    }

    fn caret_at(x: f64, y: f64) -> FocusBound {
        FocusBound::new(Point::new(x, y), Point::new(x + 2.0, y + 20.0))
    }

    #[test]
    fn focus_bound_rect_normalizes_endpoints() {
        let bound = FocusBound::new(Point::new(10.0, 30.0), Point::new(4.0, 6.0));
        assert_eq!(bound.rect(), Rect::new(4.0, 6.0, 10.0, 30.0));
    }

    #[test]
    fn first_show_snaps_into_place() {
        let (mut scene, host) = setup();
        let mut session = MagnifierSession::default();
        assert!(!session.is_running());

        session.show(&mut scene, &host, ContextId(1), caret_at(500.0, 400.0));

        assert!(session.is_running());
        assert_eq!(session.context(), Some(ContextId(1)));
        assert!(!session.is_settling(), "creation must not animate in");

        let overlay = session.overlay().copied().unwrap();
        let expected = overlay_layout(Size::new(1000.0, 800.0), Rect::new(500.0, 400.0, 502.0, 420.0));
        assert_eq!(scene.bounds(overlay.magnifier), expected.layer_bounds);
        assert_eq!(
            scene.backdrop(overlay.zoom).unwrap().offset,
            expected.backdrop_offset
        );
        assert_eq!(scene.backdrop(overlay.zoom).unwrap().zoom, ZOOM_SCALE);
        assert!(scene.has_painter(overlay.border));
        assert_eq!(scene.corner_radius(overlay.zoom), CORNER_RADIUS);
        assert_eq!(scene.fill(overlay.zoom), Fill::Solid(Color::TRANSPARENT));
    }

    #[test]
    fn overlay_nodes_are_parented_under_the_surface() {
        let (mut scene, host) = setup();
        let mut session = MagnifierSession::default();
        session.show(&mut scene, &host, ContextId(1), caret_at(500.0, 400.0));

        let overlay = session.overlay().copied().unwrap();
        assert_eq!(scene.parent(overlay.magnifier), Some(host.surface.node));
        assert_eq!(scene.parent(overlay.zoom), Some(overlay.magnifier));
        assert_eq!(scene.parent(overlay.border), Some(overlay.magnifier));
    }

    #[test]
    fn second_show_glides_instead_of_snapping() {
        let (mut scene, host) = setup();
        let mut session = MagnifierSession::default();
        session.show(&mut scene, &host, ContextId(1), caret_at(500.0, 400.0));
        let first_bounds = scene.bounds(session.overlay().unwrap().magnifier);

        session.show(&mut scene, &host, ContextId(1), caret_at(600.0, 400.0));

        // The move is animated: the scene holds the old bounds until ticks
        // arrive, while the target reflects the new layout.
        let overlay = session.overlay().copied().unwrap();
        assert_eq!(scene.bounds(overlay.magnifier), first_bounds);
        assert!(session.is_settling());
        let expected = overlay_layout(Size::new(1000.0, 800.0), Rect::new(600.0, 400.0, 602.0, 420.0));
        assert_eq!(session.target_bounds(), Some(expected.layer_bounds));
        // The backdrop offset is not animated.
        assert_eq!(
            scene.backdrop(overlay.zoom).unwrap().offset,
            expected.backdrop_offset
        );
    }

    #[test]
    fn ticks_drive_the_glide_to_its_target() {
        let (mut scene, host) = setup();
        let mut session = MagnifierSession::default();
        session.show(&mut scene, &host, ContextId(1), caret_at(500.0, 400.0));
        session.show(&mut scene, &host, ContextId(1), caret_at(600.0, 400.0));
        let target = session.target_bounds().unwrap();

        session.tick(&mut scene, Timestamp(0));
        session.tick(&mut scene, Timestamp(25_000_000));
        let overlay = session.overlay().copied().unwrap();
        let midway = scene.bounds(overlay.magnifier);
        assert_ne!(midway, target, "halfway through the glide");

        session.tick(&mut scene, Timestamp(50_000_000));
        assert_eq!(scene.bounds(overlay.magnifier), target);
        assert!(!session.is_settling());
    }

    #[test]
    fn identical_show_still_schedules_a_transition() {
        let (mut scene, host) = setup();
        let mut session = MagnifierSession::default();
        let bound = caret_at(500.0, 400.0);
        session.show(&mut scene, &host, ContextId(1), bound);
        let bounds = scene.bounds(session.overlay().unwrap().magnifier);
        let offset = scene
            .backdrop(session.overlay().unwrap().zoom)
            .unwrap()
            .offset;

        session.show(&mut scene, &host, ContextId(1), bound);

        // Deterministic layout, but the move is still animated.
        assert_eq!(session.target_bounds(), Some(bounds));
        assert_eq!(
            scene
                .backdrop(session.overlay().unwrap().zoom)
                .unwrap()
                .offset,
            offset
        );
        assert!(session.is_settling());
    }

    #[test]
    fn close_releases_all_overlay_nodes() {
        let (mut scene, host) = setup();
        let mut session = MagnifierSession::default();
        session.show(&mut scene, &host, ContextId(1), caret_at(500.0, 400.0));
        let overlay = session.overlay().copied().unwrap();

        session.close(&mut scene);

        assert!(!session.is_running());
        assert_eq!(session.context(), None);
        assert!(!scene.is_alive(overlay.magnifier));
        assert!(!scene.is_alive(overlay.zoom));
        assert!(!scene.is_alive(overlay.border));
    }

    #[test]
    fn close_is_idempotent() {
        let (mut scene, _host) = setup();
        let mut session = MagnifierSession::default();
        session.close(&mut scene);
        assert!(!session.is_running());
        session.close(&mut scene);
        assert!(!session.is_running());
    }

    #[test]
    fn reopening_after_close_snaps_again() {
        let (mut scene, host) = setup();
        let mut session = MagnifierSession::default();
        session.show(&mut scene, &host, ContextId(1), caret_at(500.0, 400.0));
        session.close(&mut scene);

        session.show(&mut scene, &host, ContextId(2), caret_at(100.0, 100.0));
        assert_eq!(session.context(), Some(ContextId(2)));
        assert!(!session.is_settling());
    }

    #[test]
    #[should_panic(expected = "different context")]
    fn rebinding_to_another_context_panics() {
        let (mut scene, host) = setup();
        let mut session = MagnifierSession::default();
        session.show(&mut scene, &host, ContextId(1), caret_at(500.0, 400.0));
        session.show(&mut scene, &host, ContextId(2), caret_at(500.0, 400.0));
    }

    #[test]
    fn focus_bound_is_mapped_into_surface_coordinates() {
        let (mut scene, mut host) = setup();
        host.offset = Vec2::new(40.0, 60.0);
        let mut session = MagnifierSession::default();
        session.show(&mut scene, &host, ContextId(1), caret_at(500.0, 400.0));

        let expected = overlay_layout(
            Size::new(1000.0, 800.0),
            Rect::new(540.0, 460.0, 542.0, 480.0),
        );
        let overlay = session.overlay().copied().unwrap();
        assert_eq!(scene.bounds(overlay.magnifier), expected.layer_bounds);
    }

    #[test]
    fn tick_while_idle_is_a_no_op() {
        let (mut scene, _host) = setup();
        let mut session = MagnifierSession::default();
        session.tick(&mut scene, Timestamp(123));
        assert!(!session.is_running());
    }
}
