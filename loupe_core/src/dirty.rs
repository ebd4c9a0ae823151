// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The scene store uses multi-channel dirty tracking (via
//! [`understory_dirty`]) so presenters only touch what changed. Each
//! channel represents an independent category of change:
//!
//! - **Propagating** — [`BOUNDS`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) with dependency edges
//!   from child to parent: absolute bounds are inherited, so moving a node
//!   marks its whole subtree.
//!
//! - **Local-only** — [`APPEARANCE`] (fill, corner radius, painter) and
//!   [`BACKDROP`] (zoom factor, sampling offset) are marked with the
//!   default policy; only the modified node appears in the drain output.
//!
//! - **Structural** — [`TOPOLOGY`] is marked on add/remove child and
//!   create/destroy node, and triggers a traversal-order rebuild during
//!   evaluation.
//!
//! Callers never query dirty state directly: each
//! [`SceneStore::evaluate`](crate::scene::SceneStore::evaluate) call
//! drains all channels and surfaces the results as
//! [`SceneChanges`](crate::scene::SceneChanges), which presenters
//! [consume](crate::backend::Presenter::apply).

use understory_dirty::Channel;

/// Local bounds changed — absolute bounds must be recomputed for the node
/// and its descendants.
pub const BOUNDS: Channel = Channel::new(0);

/// Fill, corner radius, or painter changed — no propagation needed.
pub const APPEARANCE: Channel = Channel::new(1);

/// Backdrop zoom or sampling offset changed — no propagation needed.
pub const BACKDROP: Channel = Channel::new(2);

/// Tree topology changed — triggers traversal order rebuild.
pub const TOPOLOGY: Channel = Channel::new(3);
