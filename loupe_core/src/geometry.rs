// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Magnifier overlay placement math.
//!
//! Pure functions mapping a focus (caret or selection-edge) rectangle and
//! the hosting surface's size to the overlay's on-screen layout:
//!
//! - [`magnified_region`] — which rectangle of surface content gets
//!   visually zoomed into the overlay.
//! - [`overlay_layout`] — where the overlay layer sits (lifted above the
//!   focus rect, outset for its shadow, fitted into the surface) and the
//!   offset the backdrop sampler needs so the zoomed content lines up
//!   with the region it was sampled from.
//!
//! Everything here is stateless and deterministic: identical inputs yield
//! bit-identical outputs. Degenerate inputs (zero-area surface or focus)
//! produce well-defined results because every divisor is a fixed design
//! constant.

use core::time::Duration;

use kurbo::{Insets, Point, Rect, Size, Vec2};

use crate::shadow;

/// Size of the zoomed content area of the overlay, in design units.
pub const ZOOM_LAYER_SIZE: Size = Size::new(100.0, 40.0);

/// Magnification applied to the sampled content.
pub const ZOOM_SCALE: f64 = 1.25;

/// Vertical gap between the overlay's bottom edge and the top of the
/// focus rect (negative: the overlay sits above the focus).
pub const VERTICAL_OFFSET: f64 = -8.0;

/// Corner radius of the zoomed content area and its border.
pub const CORNER_RADIUS: f64 = 20.0;

/// Stroke width of the painted border.
pub const BORDER_THICKNESS: f64 = 1.0;

/// Elevation of the drop shadow around the overlay.
pub const SHADOW_ELEVATION: f64 = 3.0;

/// How long a move of an already-visible magnifier glides.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(50);

/// Computed placement of the magnifier overlay within its host surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayLayout {
    /// Where the overlay layer (zoom content plus shadow margins) sits,
    /// in surface coordinates.
    pub layer_bounds: Rect,
    /// Translation the backdrop sampler applies so the magnified content
    /// visually lines up with the region it samples.
    pub backdrop_offset: Vec2,
}

/// Returns the shadow margins around the magnifier's zoom content.
#[must_use]
pub fn magnifier_margins() -> Insets {
    shadow::shadow_margins(&shadow::elevation_shadows(SHADOW_ELEVATION))
}

/// Computes the rectangle of surface content that the overlay magnifies.
///
/// A rect of the zoom content's unmagnified size (design size divided by
/// [`ZOOM_SCALE`]) is centered on `focus_center` and fitted into
/// `container`; the fitted rect is then re-scaled about its own center by
/// [`ZOOM_SCALE`]. Working at the unmagnified scale first means the
/// *magnified* output respects the container while still sampling a
/// scale-appropriate source region. The result is the enclosing
/// integer-pixel rectangle.
#[must_use]
pub fn magnified_region(container: Rect, focus_center: Point) -> Rect {
    let unscaled = Size::new(
        ZOOM_LAYER_SIZE.width / ZOOM_SCALE,
        ZOOM_LAYER_SIZE.height / ZOOM_SCALE,
    );
    let fitted = fit_inside(Rect::from_center_size(focus_center, unscaled), container);
    Rect::from_center_size(fitted.center(), fitted.size() * ZOOM_SCALE).expand()
}

/// Computes the overlay layer bounds and backdrop offset for a focus rect.
///
/// The layer starts as the magnified region, is lifted so its bottom edge
/// clears the focus rect by [`VERTICAL_OFFSET`], outset by the shadow
/// margins, and fitted back into the surface. The backdrop offset is the
/// vector from the magnified region's center to the fixed center of the
/// zoom content area within the fitted layer.
#[must_use]
pub fn overlay_layout(container: Size, focus: Rect) -> OverlayLayout {
    let container = container.to_rect();
    let region = magnified_region(container, focus.center());

    let lift = VERTICAL_OFFSET - region.height() / 2.0 - focus.height() / 2.0;
    let margins = magnifier_margins();
    let layer = (region + Vec2::new(0.0, lift)) + margins;
    let layer_bounds = fit_inside(layer, container);

    let zoom_center = layer_bounds.origin()
        + Vec2::new(
            margins.x0 + ZOOM_LAYER_SIZE.width / 2.0,
            margins.y0 + ZOOM_LAYER_SIZE.height / 2.0,
        );
    OverlayLayout {
        layer_bounds,
        backdrop_offset: zoom_center - region.center(),
    }
}

/// Translates `rect` by the smallest amount that places it inside
/// `bounds`, preserving its size.
///
/// Along any axis where `rect` is larger than `bounds`, the rect is
/// centered on that axis instead of being pinned to an edge.
#[must_use]
pub fn fit_inside(rect: Rect, bounds: Rect) -> Rect {
    let (x0, x1) = fit_span(rect.x0, rect.x1, bounds.x0, bounds.x1);
    let (y0, y1) = fit_span(rect.y0, rect.y1, bounds.y0, bounds.y1);
    Rect::new(x0, y0, x1, y1)
}

fn fit_span(min: f64, max: f64, lo: f64, hi: f64) -> (f64, f64) {
    let len = max - min;
    if len > hi - lo {
        // Too large to contain: center rather than picking an edge.
        let mid = (lo + hi) / 2.0;
        (mid - len / 2.0, mid + len / 2.0)
    } else if min < lo {
        (lo, lo + len)
    } else if max > hi {
        (hi - len, hi)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(outer: Rect, inner: Rect) -> bool {
        inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
    }

    #[test]
    fn fit_span_translates_minimally() {
        assert_eq!(fit_span(-5.0, 15.0, 0.0, 100.0), (0.0, 20.0));
        assert_eq!(fit_span(90.0, 110.0, 0.0, 100.0), (80.0, 100.0));
        assert_eq!(fit_span(40.0, 60.0, 0.0, 100.0), (40.0, 60.0));
    }

    #[test]
    fn fit_span_centers_oversized() {
        // A 200-long span in a 100-long container centers at 50.
        assert_eq!(fit_span(500.0, 700.0, 0.0, 100.0), (-50.0, 150.0));
    }

    #[test]
    fn region_centers_on_focus_when_unconstrained() {
        let container = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let region = magnified_region(container, Point::new(501.0, 410.0));
        assert_eq!(region, Rect::new(451.0, 390.0, 551.0, 430.0));
        assert_eq!(region.center(), Point::new(501.0, 410.0));
    }

    #[test]
    fn region_aspect_ratio_matches_design() {
        let container = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let region = magnified_region(container, Point::new(501.0, 410.0));
        let ratio = region.width() / region.height();
        assert!(
            (ratio - 2.5).abs() < 1e-9,
            "expected design ratio 100/40, got {ratio}"
        );
    }

    #[test]
    fn region_rounds_outward_to_enclosing_pixels() {
        let container = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let region = magnified_region(container, Point::new(500.3, 410.7));
        assert_eq!(region, region.expand(), "coordinates should be integral");
        // The enclosing rect must cover the exact 100x40 rect at the focus.
        assert!(contains(
            region,
            Rect::from_center_size(Point::new(500.3, 410.7), ZOOM_LAYER_SIZE)
        ));
    }

    #[test]
    fn region_near_edge_is_pulled_inside() {
        let container = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let region = magnified_region(container, Point::new(10.0, 10.0));
        // The unscaled 80x32 working rect is clamped to (0, 0)-(80, 32), so
        // the region re-centers on (40, 16) before re-scaling.
        assert_eq!(region.center(), Point::new(40.0, 16.0));
        assert_eq!(region.size(), ZOOM_LAYER_SIZE);
    }

    // A thin caret near screen center: the canonical placement.
    #[test]
    fn layout_for_centered_caret() {
        let focus = Rect::new(500.0, 400.0, 502.0, 420.0);
        let layout = overlay_layout(Size::new(1000.0, 800.0), focus);

        // Lift: -8 - 40/2 - 20/2 = -38, then outset by margins (6, 3, 6, 9).
        assert_eq!(layout.layer_bounds, Rect::new(445.0, 349.0, 557.0, 401.0));
        assert_eq!(layout.backdrop_offset, Vec2::new(0.0, -38.0));
    }

    // A point caret in a container smaller than the magnifier itself.
    #[test]
    fn layout_in_tiny_container_centers() {
        let layout = overlay_layout(Size::new(50.0, 50.0), Rect::new(25.0, 25.0, 25.0, 25.0));

        let container = Rect::new(0.0, 0.0, 50.0, 50.0);
        let region = magnified_region(container, Point::new(25.0, 25.0));
        // Wider than the container on both axes at the unscaled stage:
        // centered, not edge-aligned.
        assert_eq!(region, Rect::new(-25.0, 5.0, 75.0, 45.0));

        // The layer is oversized on both axes, so it is centered too.
        assert_eq!(layout.layer_bounds, Rect::new(-31.0, -1.0, 81.0, 51.0));
        assert_eq!(
            layout.layer_bounds.center(),
            Point::new(25.0, 25.0),
            "oversized layer centers on the container"
        );
        assert_eq!(layout.backdrop_offset, Vec2::new(0.0, -3.0));
    }

    #[test]
    fn layer_is_contained_when_container_is_large_enough() {
        let container = Size::new(600.0, 400.0);
        let container_rect = container.to_rect();
        for x in [0.0, 1.0, 299.5, 598.0, 600.0] {
            for y in [0.0, 0.5, 200.0, 399.0, 400.0] {
                let focus = Rect::from_center_size(Point::new(x, y), Size::new(2.0, 24.0));
                let layout = overlay_layout(container, focus);
                assert!(
                    contains(container_rect, layout.layer_bounds),
                    "layer {:?} escapes container for focus at ({x}, {y})",
                    layout.layer_bounds
                );
            }
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let focus = Rect::new(123.25, 77.5, 123.75, 99.5);
        let a = overlay_layout(Size::new(640.0, 480.0), focus);
        let b = overlay_layout(Size::new(640.0, 480.0), focus);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_sized_container_still_produces_a_layout() {
        let layout = overlay_layout(Size::ZERO, Rect::ZERO);
        // Everything centers on the origin; nothing divides by the input.
        assert_eq!(layout.layer_bounds.center().x, 0.0);
        assert!(layout.layer_bounds.width() > 0.0);
    }

    #[test]
    fn overlay_sits_above_the_focus_rect() {
        let focus = Rect::new(300.0, 500.0, 302.0, 520.0);
        let layout = overlay_layout(Size::new(1000.0, 800.0), focus);
        // Bottom of the layer (minus the bottom shadow margin) clears the
        // focus top by the fixed vertical gap.
        let margins = magnifier_margins();
        assert_eq!(layout.layer_bounds.y1 - margins.y1, focus.y0 + VERTICAL_OFFSET);
    }

    #[test]
    fn clamping_at_top_edge_shifts_backdrop_offset() {
        // Focus near the top: the layer cannot be lifted fully above it.
        let focus = Rect::new(500.0, 10.0, 502.0, 30.0);
        let layout = overlay_layout(Size::new(1000.0, 800.0), focus);
        assert_eq!(layout.layer_bounds.y0, 0.0, "layer pinned to the top edge");
        // The backdrop offset absorbs the clamp so sampling stays aligned.
        let region = magnified_region(
            Rect::new(0.0, 0.0, 1000.0, 800.0),
            Point::new(501.0, 20.0),
        );
        let margins = magnifier_margins();
        let zoom_center_y = layout.layer_bounds.y0 + margins.y0 + ZOOM_LAYER_SIZE.height / 2.0;
        assert_eq!(layout.backdrop_offset.y, zoom_center_y - region.center().y);
    }
}
