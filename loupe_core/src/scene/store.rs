// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and property
//! management.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::color::Color;
use crate::dirty;
use crate::paint::{Canvas, PaintDelegate};

use super::id::{INVALID, NodeId};
use super::traverse::Children;

/// How a node fills its own bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Fill {
    /// The node paints nothing itself (container or custom-painted node).
    #[default]
    NotDrawn,
    /// The node fills its bounds with a solid color.
    Solid(Color),
}

/// Backdrop magnification: the node shows the content beneath it, zoomed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Backdrop {
    /// Magnification factor applied to the sampled content.
    pub zoom: f64,
    /// Translation applied when sampling, so the zoomed content lines up
    /// with the region it was sampled from.
    pub offset: Vec2,
}

/// Struct-of-arrays storage for all scene nodes.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node
/// occupies a slot in parallel arrays. Destroyed nodes are recycled via a
/// free list, and generation counters prevent stale handle access.
pub struct SceneStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) bounds: Vec<Rect>,
    pub(crate) fill: Vec<Fill>,
    pub(crate) corner_radius: Vec<f64>,
    pub(crate) backdrop: Vec<Option<Backdrop>>,
    pub(crate) painter: Vec<Option<Box<dyn PaintDelegate>>>,

    // -- Computed properties (written by evaluate) --
    pub(crate) absolute_bounds: Vec<Rect>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl fmt::Debug for SceneStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneStore")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// Creates an empty scene store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            bounds: Vec::new(),
            fill: Vec::new(),
            corner_radius: Vec::new(),
            backdrop: Vec::new(),
            painter: Vec::new(),
            absolute_bounds: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new node and returns its handle.
    ///
    /// The node starts with zero bounds, [`Fill::NotDrawn`], no corner
    /// radius, no backdrop, no painter, and no parent.
    pub fn create_node(&mut self) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.bounds[idx as usize] = Rect::ZERO;
            self.fill[idx as usize] = Fill::NotDrawn;
            self.corner_radius[idx as usize] = 0.0;
            self.backdrop[idx as usize] = None;
            self.painter[idx as usize] = None;
            self.absolute_bounds[idx as usize] = Rect::ZERO;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.bounds.push(Rect::ZERO);
            self.fill.push(Fill::NotDrawn);
            self.corner_radius.push(0.0);
            self.backdrop.push(None);
            self.painter.push(None);
            self.absolute_bounds.push(Rect::ZERO);
            self.generation.push(0);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.dirty.mark(idx, dirty::BOUNDS);

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node, freeing its slot for reuse. Drops any registered
    /// painter with it.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (remove them first) or if the
    /// handle is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );

        // Remove from parent's child list if attached.
        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        self.painter[idx as usize] = None;

        // Remove dirty tracking dependencies.
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// Children added later render on top, so the magnifier overlay is
    /// appended to stay above its siblings. Marks the child's subtree so
    /// absolute bounds are recomputed under the new ancestry.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a
    /// parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        // Absolute bounds are inherited: child depends on parent.
        let _ = self.dirty.add_dependency(c, p, dirty::BOUNDS);

        self.mark_subtree_bounds_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes `child` from its current parent.
    ///
    /// Marks the child's subtree so absolute bounds are recomputed after
    /// detaching from the old ancestry.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "node has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);

        self.dirty.remove_dependency(c, p, dirty::BOUNDS);

        self.mark_subtree_bounds_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(NodeId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the local (parent-relative) bounds of a node.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.bounds[id.idx as usize]
    }

    /// Returns the fill of a node.
    #[must_use]
    pub fn fill(&self, id: NodeId) -> Fill {
        self.validate(id);
        self.fill[id.idx as usize]
    }

    /// Returns the corner radius of a node.
    #[must_use]
    pub fn corner_radius(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.corner_radius[id.idx as usize]
    }

    /// Returns the backdrop magnification of a node, if any.
    #[must_use]
    pub fn backdrop(&self, id: NodeId) -> Option<Backdrop> {
        self.validate(id);
        self.backdrop[id.idx as usize]
    }

    /// Returns whether the node has a registered painter.
    #[must_use]
    pub fn has_painter(&self, id: NodeId) -> bool {
        self.validate(id);
        self.painter[id.idx as usize].is_some()
    }

    /// Returns the computed surface-absolute bounds of a node.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn absolute_bounds(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.absolute_bounds[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the local (parent-relative) bounds of a node.
    ///
    /// Marks the BOUNDS channel dirty with eager propagation to
    /// descendants.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        self.validate(id);
        self.bounds[id.idx as usize] = bounds;
        self.dirty.mark_with(id.idx, dirty::BOUNDS, &EagerPolicy);
    }

    /// Sets the fill of a node.
    pub fn set_fill(&mut self, id: NodeId, fill: Fill) {
        self.validate(id);
        self.fill[id.idx as usize] = fill;
        self.dirty.mark(id.idx, dirty::APPEARANCE);
    }

    /// Sets the corner radius of a node.
    pub fn set_corner_radius(&mut self, id: NodeId, radius: f64) {
        self.validate(id);
        self.corner_radius[id.idx as usize] = radius;
        self.dirty.mark(id.idx, dirty::APPEARANCE);
    }

    /// Sets the backdrop magnification of a node.
    pub fn set_backdrop(&mut self, id: NodeId, backdrop: Option<Backdrop>) {
        self.validate(id);
        self.backdrop[id.idx as usize] = backdrop;
        self.dirty.mark(id.idx, dirty::BACKDROP);
    }

    /// Registers (or clears) the custom painter for a node.
    pub fn set_painter(&mut self, id: NodeId, painter: Option<Box<dyn PaintDelegate>>) {
        self.validate(id);
        self.painter[id.idx as usize] = painter;
        self.dirty.mark(id.idx, dirty::APPEARANCE);
    }

    /// Invokes the node's registered painter, if any, with the node's
    /// absolute bounds.
    ///
    /// Presenters call this for nodes whose appearance changed.
    pub fn paint_node(&mut self, id: NodeId, canvas: &mut dyn Canvas) {
        self.validate(id);
        let bounds = self.absolute_bounds[id.idx as usize];
        if let Some(painter) = self.painter[id.idx as usize].as_mut() {
            painter.paint(canvas, bounds);
        }
    }

    // -- Raw-index accessors for presenters --
    //
    // These accept raw slot indices (as found in `SceneChanges`) rather
    // than `NodeId` handles, skipping generation validation. Only use with
    // indices that came from `SceneChanges` or `traversal_order()`.

    /// Returns the computed absolute bounds at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn absolute_bounds_at(&self, idx: u32) -> Rect {
        self.check_slot(idx);
        self.absolute_bounds[idx as usize]
    }

    /// Returns the fill at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn fill_at(&self, idx: u32) -> Fill {
        self.check_slot(idx);
        self.fill[idx as usize]
    }

    /// Returns the corner radius at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn corner_radius_at(&self, idx: u32) -> f64 {
        self.check_slot(idx);
        self.corner_radius[idx as usize]
    }

    /// Returns the backdrop at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn backdrop_at(&self, idx: u32) -> Option<Backdrop> {
        self.check_slot(idx);
        self.backdrop[idx as usize]
    }

    /// Returns whether the node at raw slot `idx` has a painter.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn has_painter_at(&self, idx: u32) -> bool {
        self.check_slot(idx);
        self.painter[idx as usize].is_some()
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn check_slot(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    /// Removes `idx` from its parent's child list without touching dirty
    /// state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Marks the subtree rooted at `idx` dirty for absolute bounds.
    fn mark_subtree_bounds_dirty(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::BOUNDS, &EagerPolicy);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut scene = SceneStore::new();
        let id = scene.create_node();
        assert!(scene.is_alive(id));
        scene.destroy_node(id);
        assert!(!scene.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut scene = SceneStore::new();
        let id1 = scene.create_node();
        scene.destroy_node(id1);
        let id2 = scene.create_node();
        // id2 reuses the same slot but has a different generation.
        assert!(!scene.is_alive(id1));
        assert!(scene.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    fn add_child_and_query() {
        let mut scene = SceneStore::new();
        let parent = scene.create_node();
        let child1 = scene.create_node();
        let child2 = scene.create_node();

        scene.add_child(parent, child1);
        scene.add_child(parent, child2);

        assert_eq!(scene.parent(child1), Some(parent));
        assert_eq!(scene.parent(child2), Some(parent));

        let kids: Vec<_> = scene.children(parent).collect();
        assert_eq!(kids, [child1, child2]);
    }

    #[test]
    fn remove_from_parent_works() {
        let mut scene = SceneStore::new();
        let parent = scene.create_node();
        let child = scene.create_node();

        scene.add_child(parent, child);
        scene.remove_from_parent(child);
        assert_eq!(scene.parent(child), None);
        assert!(scene.children(parent).next().is_none());
    }

    #[test]
    fn recycled_slot_resets_properties() {
        let mut scene = SceneStore::new();
        let id = scene.create_node();
        scene.set_bounds(id, Rect::new(1.0, 2.0, 3.0, 4.0));
        scene.set_corner_radius(id, 5.0);
        scene.set_backdrop(
            id,
            Some(Backdrop {
                zoom: 2.0,
                offset: Vec2::new(1.0, 1.0),
            }),
        );
        scene.destroy_node(id);

        let id2 = scene.create_node();
        assert_eq!(scene.bounds(id2), Rect::ZERO);
        assert_eq!(scene.corner_radius(id2), 0.0);
        assert_eq!(scene.backdrop(id2), None);
        assert_eq!(scene.fill(id2), Fill::NotDrawn);
        assert!(!scene.has_painter(id2));
    }

    #[test]
    #[should_panic(expected = "cannot destroy node with children")]
    fn destroy_with_children_panics() {
        let mut scene = SceneStore::new();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.add_child(parent, child);
        scene.destroy_node(parent);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_get() {
        let mut scene = SceneStore::new();
        let id = scene.create_node();
        scene.destroy_node(id);
        let _ = scene.bounds(id);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_set() {
        let mut scene = SceneStore::new();
        let id = scene.create_node();
        scene.destroy_node(id);
        scene.set_bounds(id, Rect::ZERO);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_parenting_panics() {
        let mut scene = SceneStore::new();
        let a = scene.create_node();
        let b = scene.create_node();
        let child = scene.create_node();
        scene.add_child(a, child);
        scene.add_child(b, child);
    }

    #[test]
    fn set_backdrop_round_trips() {
        let mut scene = SceneStore::new();
        let id = scene.create_node();
        let backdrop = Backdrop {
            zoom: 1.25,
            offset: Vec2::new(0.0, -38.0),
        };
        scene.set_backdrop(id, Some(backdrop));
        assert_eq!(scene.backdrop(id), Some(backdrop));
    }

    #[test]
    fn paint_node_uses_absolute_bounds() {
        use alloc::rc::Rc;
        use core::cell::RefCell;

        struct RecordingPainter {
            painted: Rc<RefCell<Vec<Rect>>>,
        }
        impl PaintDelegate for RecordingPainter {
            fn paint(&mut self, _canvas: &mut dyn Canvas, bounds: Rect) {
                self.painted.borrow_mut().push(bounds);
            }
        }
        struct NullCanvas;
        impl Canvas for NullCanvas {
            fn stroke_rounded_rect(
                &mut self,
                _rect: Rect,
                _corner_radius: f64,
                _thickness: f64,
                _color: Color,
            ) {
            }
            fn draw_shadow(
                &mut self,
                _rect: Rect,
                _corner_radius: f64,
                _shadows: &[crate::shadow::ShadowValue],
            ) {
            }
        }

        let painted = Rc::new(RefCell::new(Vec::new()));
        let mut scene = SceneStore::new();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.add_child(parent, child);
        scene.set_bounds(parent, Rect::new(100.0, 50.0, 300.0, 150.0));
        scene.set_bounds(child, Rect::new(10.0, 10.0, 20.0, 20.0));
        scene.set_painter(
            child,
            Some(Box::new(RecordingPainter {
                painted: Rc::clone(&painted),
            })),
        );
        let _ = scene.evaluate();

        scene.paint_node(child, &mut NullCanvas);
        assert_eq!(&*painted.borrow(), &[Rect::new(110.0, 60.0, 120.0, 70.0)]);

        // No painter: a quiet no-op.
        scene.paint_node(parent, &mut NullCanvas);
        assert_eq!(painted.borrow().len(), 1);
    }

    #[test]
    fn destroying_a_node_drops_its_painter() {
        struct NullPainter;
        impl PaintDelegate for NullPainter {
            fn paint(&mut self, _canvas: &mut dyn Canvas, _bounds: Rect) {}
        }

        let mut scene = SceneStore::new();
        let id = scene.create_node();
        scene.set_painter(id, Some(Box::new(NullPainter)));
        assert!(scene.has_painter(id));
        scene.destroy_node(id);

        let id2 = scene.create_node();
        assert!(!scene.has_painter(id2));
    }
}
