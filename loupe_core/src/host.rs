// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-side collaborators: source contexts and overlay surfaces.
//!
//! The magnifier is shown *for* a source context (a text field, a
//! document view) and *on* a host surface (the window-level container
//! that parents overlay nodes). The embedding toolkit owns both; the
//! session reaches them only through [`OverlayHost`].

use core::fmt;

use kurbo::{Rect, Size};

use crate::scene::NodeId;

/// Identifies a source context (e.g. a text field or document view).
///
/// The embedder assigns these; the session compares them by identity and
/// never interprets the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(pub u64);

impl fmt::Debug for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextId({})", self.0)
    }
}

/// The scene node that parents magnifier overlays, and its current size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostSurface {
    /// Node under which overlay nodes are created.
    pub node: NodeId,
    /// Current size of the surface; its bounds originate at (0, 0) in its
    /// own coordinate space.
    pub size: Size,
}

/// Resolves source contexts to overlay surfaces and maps coordinates
/// between them.
///
/// Implemented by the embedding toolkit; queried once per
/// [`show`](crate::session::MagnifierSession::show) so surface size and
/// coordinate mappings are always current.
pub trait OverlayHost {
    /// Returns the surface that hosts magnifier overlays for `context`.
    fn overlay_surface(&self, context: ContextId) -> HostSurface;

    /// Re-expresses a rectangle from `context`'s coordinate space into the
    /// overlay surface's coordinate space.
    fn rect_in_surface(&self, context: ContextId, rect: Rect) -> Rect;
}
