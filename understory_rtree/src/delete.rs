// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deletion with condense-and-reinsert rebalancing.

use alloc::vec;
use alloc::vec::Vec;

use crate::node::{Entry, NodeIdx, RecordId};
use crate::rtree::RTree;
use crate::types::{Aabb2D, Scalar};

impl<T: Scalar> RTree<T> {
    /// Remove one record with id `record` whose stored box overlaps `bbox`.
    ///
    /// `bbox` only guides the search: any box that still overlaps the stored one
    /// locates it. Returns `false`, leaving the tree untouched, if no such record
    /// exists. When several entries match, exactly one of them is removed.
    ///
    /// Under-full nodes left behind are dissolved and their records reinserted, and
    /// a root left with a single child is replaced by that child.
    pub fn delete(&mut self, bbox: Aabb2D<T>, record: RecordId) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let Some((leaf, pos)) = self.find_leaf(root, &bbox, record) else {
            return false;
        };
        self.arena[leaf].entries.swap_remove(pos);
        self.len -= 1;
        self.condense_tree(leaf);
        self.shorten_root();
        true
    }

    /// Depth-first search for the first leaf entry matching `record` under boxes
    /// that overlap `bbox`.
    fn find_leaf(
        &self,
        root: NodeIdx,
        bbox: &Aabb2D<T>,
        record: RecordId,
    ) -> Option<(NodeIdx, usize)> {
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let n = &self.arena[idx];
            if n.leaf {
                let hit = n.entries.iter().position(|e| {
                    matches!(
                        e,
                        Entry::Leaf { bbox: eb, record: r } if *r == record && eb.overlaps(bbox)
                    )
                });
                if let Some(pos) = hit {
                    return Some((idx, pos));
                }
            } else {
                // Reversed so entries are explored in node order.
                for e in n.entries.iter().rev() {
                    if let Entry::Internal { bbox: eb, child } = e
                        && eb.overlaps(bbox)
                    {
                        stack.push(*child);
                    }
                }
            }
        }
        None
    }

    /// Walk from `leaf` to the root, detaching under-full nodes and tightening the
    /// boxes of the rest, then reinsert every record held below a detached node.
    fn condense_tree(&mut self, leaf: NodeIdx) {
        let min = self.params.min_entries();
        let mut eliminated: Vec<NodeIdx> = Vec::new();
        let mut current = leaf;
        while let Some(parent) = self.arena[current].parent {
            let pos = self.entry_position(parent, current);
            if self.arena[current].entries.len() < min {
                self.arena[parent].entries.swap_remove(pos);
                self.arena[current].parent = None;
                eliminated.push(current);
            } else {
                let bbox = self.covering(current);
                self.arena[parent].entries[pos].set_bbox(bbox);
            }
            current = parent;
        }

        if eliminated.is_empty() {
            return;
        }
        let dissolved = eliminated.len();
        let mut reinserted = 0_usize;
        // Internal nodes push their children back onto the stack, so every record
        // re-enters at the leaf level and no subtree is reattached wholesale.
        while let Some(idx) = eliminated.pop() {
            let node = self.arena.release(idx);
            for e in node.entries {
                match e {
                    Entry::Leaf { bbox, record } => {
                        self.insert_record(bbox, record);
                        reinserted += 1;
                    }
                    Entry::Internal { child, .. } => eliminated.push(child),
                }
            }
        }
        log::trace!("condense dissolved {dissolved} node(s), reinserted {reinserted} record(s)");
    }

    /// Promote the only child of an internal root, or drop an empty root.
    fn shorten_root(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let n = &self.arena[root];
        if n.entries.is_empty() {
            assert!(
                self.len == 0,
                "empty root with {} records outstanding",
                self.len
            );
            self.clear();
        } else if !n.leaf && n.entries.len() == 1 {
            let Some(child) = n.entries[0].child() else {
                unreachable!("leaf entry in internal root")
            };
            let _ = self.arena.release(root);
            self.arena[child].parent = None;
            self.root = Some(child);
            log::debug!("root shortened, height is now {}", self.height());
        }
    }
}
