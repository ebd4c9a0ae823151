// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay scene tree data model.
//!
//! A *node* is an element of the overlay scene that a presenter mirrors
//! into a native tree. Each node has:
//!
//! - An identity ([`NodeId`]) — a generational handle that becomes stale
//!   when the node is destroyed, preventing use-after-free bugs at the
//!   API level.
//! - Topology — parent, first-child, and sibling links forming an ordered
//!   tree.
//! - **Local properties** set by the caller:
//!   [`bounds`](SceneStore::set_bounds) (parent-relative),
//!   [`fill`](SceneStore::set_fill),
//!   [`corner_radius`](SceneStore::set_corner_radius),
//!   [`backdrop`](SceneStore::set_backdrop), and an optional
//!   [painter](SceneStore::set_painter) for custom-drawn content.
//! - **Computed properties** produced by
//!   [`evaluate`](SceneStore::evaluate): `absolute_bounds` (local bounds
//!   translated by the ancestor chain).
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles
//! for cache-friendly traversal.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)). BOUNDS propagates to descendants, since
//! absolute bounds are inherited; APPEARANCE and BACKDROP are local-only;
//! TOPOLOGY marks structural changes that trigger a traversal-order
//! rebuild.

mod evaluate;
mod id;
mod store;
mod traverse;

pub use evaluate::SceneChanges;
pub use id::{INVALID, NodeId};
pub use store::{Backdrop, Fill, SceneStore};
pub use traverse::Children;
