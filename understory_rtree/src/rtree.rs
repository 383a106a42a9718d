// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`RTree`] type, insertion, and structural accessors.

use alloc::vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::config::Params;
use crate::node::{Arena, Entry, Node, NodeIdx, RecordId};
use crate::split::quadratic_split;
use crate::types::{Aabb2D, Scalar, area, cmp_acc, enlargement, union_aabb};

/// Dynamic R-tree over axis-aligned boxes tagged with [`RecordId`]s.
///
/// Nodes live in an internal arena. Each node holds between
/// [`Params::min_entries`] and [`Params::max_entries`] entries (the root may hold
/// fewer) and all leaves sit at the same depth.
///
/// Mutation takes `&mut self` and searches take `&self`, so searches may run
/// concurrently with each other but never with a mutation. Search visitors only see
/// record ids and cannot reach the tree they are called from.
#[derive(Clone)]
pub struct RTree<T: Scalar> {
    pub(crate) params: Params,
    pub(crate) root: Option<NodeIdx>,
    pub(crate) arena: Arena<T>,
    pub(crate) len: usize,
}

impl<T: Scalar> Default for RTree<T> {
    fn default() -> Self {
        Self::with_params(Params::default())
    }
}

impl<T: Scalar> RTree<T> {
    /// Create an empty tree with default [`Params`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with the given node capacity parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            root: None,
            arena: Arena::default(),
            len: 0,
        }
    }

    /// Node capacity parameters of this tree.
    pub fn params(&self) -> Params {
        self.params
    }

    /// Number of records stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels: 0 when empty, 1 when the root is a leaf.
    pub fn height(&self) -> usize {
        let mut levels = 0;
        let mut cur = self.root;
        while let Some(idx) = cur {
            levels += 1;
            cur = self.arena[idx].entries.first().and_then(Entry::child);
        }
        levels
    }

    /// Box covering every stored record, or `None` when empty.
    pub fn extent(&self) -> Option<Aabb2D<T>> {
        self.root.and_then(|r| self.arena[r].bbox())
    }

    /// Remove all records. Parameters are kept.
    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.len = 0;
    }

    /// Insert a record. Duplicate boxes and ids are stored as independent entries.
    pub fn insert(&mut self, bbox: Aabb2D<T>, record: RecordId) {
        self.insert_record(bbox, record);
        self.len += 1;
    }

    /// Place a leaf entry without touching the record count.
    pub(crate) fn insert_record(&mut self, bbox: Aabb2D<T>, record: RecordId) {
        let Some(root) = self.root else {
            let idx = self.arena.alloc(Node {
                entries: vec![Entry::Leaf { bbox, record }],
                leaf: true,
                parent: None,
            });
            self.root = Some(idx);
            return;
        };
        let leaf = self.choose_leaf(root, &bbox);
        self.arena[leaf].entries.push(Entry::Leaf { bbox, record });
        self.adjust_tree(leaf);
    }

    fn choose_leaf(&self, mut node: NodeIdx, bbox: &Aabb2D<T>) -> NodeIdx {
        loop {
            let n = &self.arena[node];
            if n.leaf {
                return node;
            }
            node = choose_subtree(&n.entries, bbox);
        }
    }

    /// Walk from `node` to the root, splitting overfull nodes and refreshing the
    /// covering boxes of every entry on the path.
    fn adjust_tree(&mut self, mut node: NodeIdx) {
        let mut sibling = self.split_if_overfull(node);
        while let Some(parent) = self.arena[node].parent {
            let pos = self.entry_position(parent, node);
            let bbox = self.covering(node);
            self.arena[parent].entries[pos].set_bbox(bbox);
            if let Some(s) = sibling {
                let bbox = self.covering(s);
                self.arena[parent]
                    .entries
                    .push(Entry::Internal { bbox, child: s });
            }
            sibling = self.split_if_overfull(parent);
            node = parent;
        }
        if let Some(s) = sibling {
            self.grow_root(node, s);
        }
    }

    /// Split `idx` in place if it holds more than `max_entries`. The original node
    /// keeps one half; the other half goes to a new node under the same parent,
    /// which is returned. The caller links it into the parent.
    fn split_if_overfull(&mut self, idx: NodeIdx) -> Option<NodeIdx> {
        if self.arena[idx].entries.len() <= self.params.max_entries() {
            return None;
        }
        let entries = core::mem::take(&mut self.arena[idx].entries);
        let (left, right) = quadratic_split(entries, self.params.min_entries());
        let (leaf, parent) = {
            let n = &mut self.arena[idx];
            n.entries = left;
            (n.leaf, n.parent)
        };
        let right_idx = self.arena.alloc(Node {
            entries: right,
            leaf,
            parent,
        });
        if !leaf {
            self.adopt_children(right_idx);
        }
        log::trace!(
            "split {} node into {} + {} entries",
            if leaf { "leaf" } else { "internal" },
            self.arena[idx].entries.len(),
            self.arena[right_idx].entries.len()
        );
        Some(right_idx)
    }

    fn grow_root(&mut self, left: NodeIdx, right: NodeIdx) {
        let entries = vec![
            Entry::Internal {
                bbox: self.covering(left),
                child: left,
            },
            Entry::Internal {
                bbox: self.covering(right),
                child: right,
            },
        ];
        let root = self.arena.alloc(Node {
            entries,
            leaf: false,
            parent: None,
        });
        self.arena[left].parent = Some(root);
        self.arena[right].parent = Some(root);
        self.root = Some(root);
        log::debug!("root split, height is now {}", self.height());
    }

    /// Point every child of internal node `idx` back at it.
    pub(crate) fn adopt_children(&mut self, idx: NodeIdx) {
        for i in 0..self.arena[idx].entries.len() {
            if let Some(child) = self.arena[idx].entries[i].child() {
                self.arena[child].parent = Some(idx);
            }
        }
    }

    /// Tight box over a non-empty node's entries.
    pub(crate) fn covering(&self, idx: NodeIdx) -> Aabb2D<T> {
        self.arena[idx]
            .bbox()
            .unwrap_or_else(|| panic!("non-root node {idx:?} has no entries"))
    }

    pub(crate) fn entry_position(&self, parent: NodeIdx, child: NodeIdx) -> usize {
        self.arena[parent]
            .position_of(child)
            .unwrap_or_else(|| panic!("node {child:?} is not linked from its parent {parent:?}"))
    }
}

/// The child needing the least enlargement to cover `bbox`; ties go to the child
/// with the smaller resulting area, then to the earliest.
fn choose_subtree<T: Scalar>(entries: &[Entry<T>], bbox: &Aabb2D<T>) -> NodeIdx {
    let mut best: Option<(T::Acc, T::Acc, NodeIdx)> = None;
    for e in entries {
        let Entry::Internal { bbox: cb, child } = e else {
            unreachable!("leaf entry in internal node")
        };
        let cost = enlargement(cb, bbox);
        let resulting = area(&union_aabb(*cb, *bbox));
        let better = best.as_ref().is_none_or(|(bc, ba, _)| {
            match cmp_acc(&cost, bc) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => resulting < *ba,
            }
        });
        if better {
            best = Some((cost, resulting, *child));
        }
    }
    match best {
        Some((_, _, child)) => child,
        None => panic!("internal node without entries"),
    }
}

impl<T: Scalar> Debug for RTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("max_entries", &self.params.max_entries())
            .field("min_entries", &self.params.min_entries())
            .field("len", &self.len)
            .field("height", &self.height())
            .field("arena_nodes", &self.arena.live())
            .finish_non_exhaustive()
    }
}

/// R-tree with i64 coordinates and [`WideInt`](crate::WideInt) metrics.
pub type RTreeI64 = RTree<i64>;

/// R-tree with f32 coordinates and f64 metrics.
pub type RTreeF32 = RTree<f32>;

/// R-tree with f64 coordinates and f64 metrics.
pub type RTreeF64 = RTree<f64>;
