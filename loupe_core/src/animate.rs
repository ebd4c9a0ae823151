// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick-driven bounds transitions.
//!
//! [`BoundsAnimator`] animates a rectangle property (the overlay layer's
//! bounds) toward retargetable goals. It holds no clock of its own: the
//! embedder's compositor drives it by calling
//! [`tick`](BoundsAnimator::tick) once per frame, and the transition
//! anchors its start time to the first tick that observes it. Retargeting
//! while a transition is in flight replaces it immediately — the most
//! recent target wins, there is no queueing.

use core::time::Duration;

use kurbo::Rect;

use crate::time::Timestamp;

/// Interpolation curve for a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Curve {
    /// Constant-velocity interpolation.
    #[default]
    Linear,
    /// Quadratic ease-out: fast start, decelerating arrival.
    EaseOut,
}

impl Curve {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    #[inline]
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseOut => t * (2.0 - t),
        }
    }
}

/// How a new target replaces the animator's current goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retarget {
    /// Jump to the target now, cancelling any transition in flight.
    Immediate,
    /// Glide to the target from the current value, immediately replacing
    /// any transition in flight.
    Animate {
        /// Length of the glide.
        duration: Duration,
        /// Interpolation curve of the glide.
        curve: Curve,
    },
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    from: Rect,
    to: Rect,
    duration: Duration,
    curve: Curve,
    /// Anchored by the first tick that observes the transition.
    started: Option<Timestamp>,
}

/// Animates a rectangle toward retargetable goals, driven by frame ticks.
#[derive(Clone, Copy, Debug)]
pub struct BoundsAnimator {
    value: Rect,
    transition: Option<Transition>,
}

impl BoundsAnimator {
    /// Creates an animator already settled at `initial`.
    #[must_use]
    pub const fn new(initial: Rect) -> Self {
        Self {
            value: initial,
            transition: None,
        }
    }

    /// Returns the most recently applied value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> Rect {
        self.value
    }

    /// Returns the value the animator is heading toward (the current value
    /// if it is settled).
    #[inline]
    #[must_use]
    pub fn target(&self) -> Rect {
        match &self.transition {
            Some(t) => t.to,
            None => self.value,
        }
    }

    /// Returns whether a transition is pending or in flight.
    #[inline]
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        self.transition.is_some()
    }

    /// Points the animator at a new target.
    ///
    /// With [`Retarget::Animate`], the glide always starts from the
    /// current value — even if the target equals it, the transition is
    /// still scheduled (moves are never special-cased as no-ops).
    pub fn retarget(&mut self, to: Rect, policy: Retarget) {
        match policy {
            Retarget::Immediate => {
                self.value = to;
                self.transition = None;
            }
            Retarget::Animate { duration, curve } => {
                self.transition = Some(Transition {
                    from: self.value,
                    to,
                    duration,
                    curve,
                    started: None,
                });
            }
        }
    }

    /// Drops any pending transition, leaving the current value in place.
    pub fn cancel(&mut self) {
        self.transition = None;
    }

    /// Advances the animation to `now`.
    ///
    /// Returns the value to apply this frame while a transition settles,
    /// or `None` when the animator is idle. The frame on which the target
    /// is reached returns it one final time and clears the transition.
    pub fn tick(&mut self, now: Timestamp) -> Option<Rect> {
        let t = self.transition.as_mut()?;
        let started = *t.started.get_or_insert(now);
        let progress = if t.duration.is_zero() {
            1.0
        } else {
            (now.saturating_since(started).as_secs_f64() / t.duration.as_secs_f64()).min(1.0)
        };

        if progress >= 1.0 {
            self.value = t.to;
            self.transition = None;
        } else {
            self.value = lerp_rect(t.from, t.to, t.curve.apply(progress));
        }
        Some(self.value)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_rect(from: Rect, to: Rect, t: f64) -> Rect {
    Rect::new(
        lerp(from.x0, to.x0, t),
        lerp(from.y0, to.y0, t),
        lerp(from.x1, to.x1, t),
        lerp(from.y1, to.y1, t),
    )
}
