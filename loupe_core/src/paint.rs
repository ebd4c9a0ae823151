// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting seams: the canvas capability, paint delegates, and the
//! magnifier's border painter.
//!
//! Custom-drawn content is modeled as a capability interface rather than
//! an inheritance hierarchy: a node carries a boxed [`PaintDelegate`],
//! and the presenter hands it a [`Canvas`] when the node needs repainting
//! (via [`SceneStore::paint_node`](crate::scene::SceneStore::paint_node)).
//! Implementations are swappable — a test double that records draw calls
//! works the same as a GPU-backed canvas.

use kurbo::Rect;

use crate::color::{Color, Theme};
use crate::geometry::{BORDER_THICKNESS, CORNER_RADIUS, SHADOW_ELEVATION};
use crate::shadow::{ShadowValue, elevation_shadows, shadow_margins};

/// Minimal draw surface the overlay needs.
///
/// Backends implement this over their native drawing API; tests implement
/// it by recording calls.
pub trait Canvas {
    /// Strokes a rounded rectangle outline.
    fn stroke_rounded_rect(&mut self, rect: Rect, corner_radius: f64, thickness: f64, color: Color);

    /// Draws the given shadow set behind a rounded rectangle.
    fn draw_shadow(&mut self, rect: Rect, corner_radius: f64, shadows: &[ShadowValue]);
}

/// Custom-drawn content for a scene node.
pub trait PaintDelegate {
    /// Paints the node into `canvas`. `bounds` are the node's absolute
    /// bounds on the host surface.
    fn paint(&mut self, canvas: &mut dyn Canvas, bounds: Rect);
}

/// Paints the magnifier's drop shadow and rounded border.
///
/// The node this painter is registered on spans the full overlay layer
/// (zoom content plus shadow margins); the shadow and border are drawn
/// around the zoom content rect inside it.
#[derive(Debug)]
pub struct BorderPainter {
    border_color: Color,
    shadows: [ShadowValue; 2],
}

impl BorderPainter {
    /// Creates a painter using the theme's current border color.
    #[must_use]
    pub fn new(theme: &dyn Theme) -> Self {
        Self {
            border_color: theme.border_color(),
            shadows: elevation_shadows(SHADOW_ELEVATION),
        }
    }
}

impl PaintDelegate for BorderPainter {
    fn paint(&mut self, canvas: &mut dyn Canvas, bounds: Rect) {
        let content = bounds - shadow_margins(&self.shadows);
        canvas.draw_shadow(content, CORNER_RADIUS, &self.shadows);
        canvas.stroke_rounded_rect(content, CORNER_RADIUS, BORDER_THICKNESS, self.border_color);
    }
}
