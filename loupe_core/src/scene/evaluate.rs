// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **BOUNDS** — Drain dirty indices, recompute each node's
//!    `absolute_bounds` as its local bounds translated by the parent's
//!    absolute origin.
//! 2. **APPEARANCE** / **BACKDROP** — Drain dirty indices (no
//!    recomputation; presenters read the current values directly from the
//!    store).
//! 3. **TOPOLOGY** — Drain and discard (the traversal order was already
//!    rebuilt at the start of evaluation if needed).
//!
//! [`SceneChanges`] uses raw slot indices (`u32`) rather than
//! [`NodeId`](super::NodeId) handles so that presenters can index directly
//! into the store's SoA arrays via the `*_at()` accessors (e.g.
//! [`absolute_bounds_at`](SceneStore::absolute_bounds_at)) without paying
//! for generation checks on every access.

use alloc::vec::Vec;

use crate::dirty;

use super::id::INVALID;
use super::store::SceneStore;

/// The set of changes produced by a single [`SceneStore::evaluate`] call.
///
/// Each field contains the raw slot indices of nodes that changed in the
/// corresponding category. Presenters use these to apply incremental
/// updates.
#[derive(Clone, Debug, Default)]
pub struct SceneChanges {
    /// Nodes whose absolute bounds were recomputed.
    pub bounds: Vec<u32>,
    /// Nodes whose fill, corner radius, or painter changed.
    pub appearance: Vec<u32>,
    /// Nodes whose backdrop magnification changed.
    pub backdrops: Vec<u32>,
    /// Nodes added since the last evaluate.
    pub added: Vec<u32>,
    /// Nodes removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed (traversal order was rebuilt).
    pub topology_changed: bool,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.bounds.clear();
        self.appearance.clear();
        self.backdrops.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }
}

impl SceneStore {
    /// Evaluates the scene, recomputing dirty properties and returning the
    /// set of changes.
    ///
    /// This rebuilds the traversal order if topology changed, then drains
    /// each dirty channel, recomputing absolute bounds in
    /// parent-before-child order.
    pub fn evaluate(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided
    /// buffer to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();

        // Rebuild traversal order if needed.
        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        // Drain BOUNDS channel — collect dirty indices, then recompute.
        let dirty_bounds: Vec<u32> = self
            .dirty
            .drain(dirty::BOUNDS)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_bounds {
            let parent_idx = self.parent[idx as usize];
            let local = self.bounds[idx as usize];
            self.absolute_bounds[idx as usize] = if parent_idx != INVALID {
                local + self.absolute_bounds[parent_idx as usize].origin().to_vec2()
            } else {
                local
            };
        }
        changes.bounds = dirty_bounds;

        // Drain APPEARANCE channel — no recomputation, just collect.
        changes.appearance = self
            .dirty
            .drain(dirty::APPEARANCE)
            .deterministic()
            .run()
            .collect();

        // Drain BACKDROP channel.
        changes.backdrops = self
            .dirty
            .drain(dirty::BACKDROP)
            .deterministic()
            .run()
            .collect();

        // Drain TOPOLOGY channel (just consume, changes are structural).
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Returns the current traversal order (depth-first pre-order).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called at
    /// least once.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// Rebuilds the depth-first pre-order traversal of all live nodes.
    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        // Start from roots.
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dfs_collect(idx);
            }
        }
    }

    /// Depth-first pre-order collection starting from `idx`.
    fn dfs_collect(&mut self, idx: u32) {
        self.traversal_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }
}
