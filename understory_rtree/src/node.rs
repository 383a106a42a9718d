// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-allocated nodes and their entries.
//!
//! Nodes own their children through [`Entry::Internal`] indices; the `parent` field
//! is a plain, non-owning back-reference used to walk upward after a mutation.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::types::{Aabb2D, union_aabb};

/// Opaque record identifier stored in leaf entries.
pub type RecordId = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

/// A slot in a node: a record in a leaf, or a subtree in an internal node.
///
/// The box always tightly covers its referent.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Entry<T> {
    Leaf { bbox: Aabb2D<T>, record: RecordId },
    Internal { bbox: Aabb2D<T>, child: NodeIdx },
}

impl<T: Copy> Entry<T> {
    pub(crate) fn bbox(&self) -> Aabb2D<T> {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => *bbox,
        }
    }

    pub(crate) fn set_bbox(&mut self, new: Aabb2D<T>) {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => *bbox = new,
        }
    }

    pub(crate) fn child(&self) -> Option<NodeIdx> {
        match self {
            Self::Internal { child, .. } => Some(*child),
            Self::Leaf { .. } => None,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) entries: Vec<Entry<T>>,
    pub(crate) leaf: bool,
    pub(crate) parent: Option<NodeIdx>,
}

impl<T: Copy + PartialOrd> Node<T> {
    /// Union of all entry boxes, or `None` for an empty node.
    pub(crate) fn bbox(&self) -> Option<Aabb2D<T>> {
        let mut it = self.entries.iter();
        let first = it.next()?.bbox();
        Some(it.fold(first, |acc, e| union_aabb(acc, e.bbox())))
    }

    /// Position of the entry pointing at `child`.
    pub(crate) fn position_of(&self, child: NodeIdx) -> Option<usize> {
        self.entries.iter().position(|e| e.child() == Some(child))
    }
}

/// Node storage with slot reuse.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<NodeIdx>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeIdx {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx.get()] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            NodeIdx::new(self.nodes.len() - 1)
        }
    }

    /// Drop a node and make its slot available. Children are not released.
    pub(crate) fn release(&mut self, idx: NodeIdx) -> Node<T> {
        let node = self.nodes[idx.get()]
            .take()
            .unwrap_or_else(|| panic!("double release of node {idx:?}"));
        self.free.push(idx);
        node
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
    }

    /// Number of live nodes.
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }
}

impl<T> Index<NodeIdx> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, idx: NodeIdx) -> &Node<T> {
        match &self.nodes[idx.get()] {
            Some(node) => node,
            None => panic!("access to released node {idx:?}"),
        }
    }
}

impl<T> IndexMut<NodeIdx> for Arena<T> {
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Node<T> {
        match &mut self.nodes[idx.get()] {
            Some(node) => node,
            None => panic!("access to released node {idx:?}"),
        }
    }
}
