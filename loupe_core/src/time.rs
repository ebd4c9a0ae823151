// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic timestamps for the animation clock.
//!
//! [`Timestamp`] is a point in time expressed as nanoseconds since an
//! arbitrary epoch. The embedder's compositor clock supplies timestamps to
//! [`MagnifierSession::tick`](crate::session::MagnifierSession::tick);
//! only differences between them are ever interpreted, as
//! [`core::time::Duration`] values.

use core::fmt;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A point in time, in nanoseconds since an arbitrary epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The epoch itself.
    pub const ZERO: Self = Self(0);

    /// Returns the raw nanosecond value.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns the duration since an earlier timestamp, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_since(self, earlier: Self) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "nanosecond timestamps stay far below u64::MAX for any realistic uptime"
    )]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.as_nanos() as u64)
    }
}

impl Sub for Timestamp {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration::from_nanos(self.0 - rhs.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ns)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_duration() {
        let t = Timestamp(1_000);
        assert_eq!(t + Duration::from_nanos(500), Timestamp(1_500));
    }

    #[test]
    fn difference_is_duration() {
        assert_eq!(
            Timestamp(2_000) - Timestamp(500),
            Duration::from_nanos(1_500)
        );
    }

    #[test]
    fn saturating_since_clamps_to_zero() {
        assert_eq!(
            Timestamp(100).saturating_since(Timestamp(500)),
            Duration::ZERO
        );
        assert_eq!(
            Timestamp(500).saturating_since(Timestamp(100)),
            Duration::from_nanos(400)
        );
    }
}
