// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, NodeId};
use super::store::SceneStore;

/// An iterator over the direct children of a node.
///
/// Created by [`SceneStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    scene: &'a SceneStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(scene: &'a SceneStore, first: u32) -> Self {
        Self {
            scene,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.scene.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.scene.generation[idx as usize],
        })
    }
}
