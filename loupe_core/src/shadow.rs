// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elevation shadow presets and the margins they add around a layer.
//!
//! Shadows follow the material two-shadow model: a *key* shadow cast
//! downward by the primary light source and an *ambient* shadow spread
//! evenly around the shape. Both are derived from a single elevation
//! value. [`shadow_margins`] converts a shadow set into the per-edge
//! outsets a layer needs so the blur is not clipped.

use kurbo::{Insets, Vec2};

use crate::color::Color;

/// A single drop shadow: offset, blur radius, and color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowValue {
    /// Offset of the shadow from the shape casting it.
    pub offset: Vec2,
    /// Blur radius, measured across the full falloff (half extends beyond
    /// the shape on each side).
    pub blur: f64,
    /// Shadow color, usually translucent black.
    pub color: Color,
}

const KEY_SHADOW_COLOR: Color = Color::from_rgba8(0, 0, 0, 76);
const AMBIENT_SHADOW_COLOR: Color = Color::from_rgba8(0, 0, 0, 38);

/// Returns the key and ambient shadows for the given elevation.
///
/// The key shadow is offset downward by the elevation with a blur of four
/// times the elevation; the ambient shadow is centered with a blur of
/// twice the elevation.
#[must_use]
pub fn elevation_shadows(elevation: f64) -> [ShadowValue; 2] {
    [
        ShadowValue {
            offset: Vec2::new(0.0, elevation),
            blur: 4.0 * elevation,
            color: KEY_SHADOW_COLOR,
        },
        ShadowValue {
            offset: Vec2::ZERO,
            blur: 2.0 * elevation,
            color: AMBIENT_SHADOW_COLOR,
        },
    ]
}

/// Returns the per-edge outsets needed to contain every shadow in the set.
///
/// Each shadow reaches `blur / 2` beyond the shape, shifted by its offset;
/// the result is the maximum reach per edge across all shadows, floored at
/// zero.
#[must_use]
pub fn shadow_margins(shadows: &[ShadowValue]) -> Insets {
    let mut m = Insets::ZERO;
    for s in shadows {
        let half = s.blur / 2.0;
        m.x0 = m.x0.max(half - s.offset.x);
        m.y0 = m.y0.max(half - s.offset.y);
        m.x1 = m.x1.max(half + s.offset.x);
        m.y1 = m.y1.max(half + s.offset.y);
    }
    m
}
