// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural invariant checks.

use alloc::vec;

use crate::node::Entry;
use crate::rtree::RTree;
use crate::types::Scalar;

impl<T: Scalar> RTree<T> {
    /// Verify every structural invariant of the tree.
    ///
    /// Checks fill bounds, that each subtree entry's box equals the union of its
    /// child's entries, parent links, uniform leaf depth, the record count, and that
    /// no node is leaked.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violation found. A violation means the
    /// tree is corrupt.
    pub fn check_invariants(&self) {
        let Some(root) = self.root else {
            assert_eq!(self.len, 0, "empty tree reports {} records", self.len);
            assert_eq!(self.arena.live(), 0, "empty tree holds nodes");
            return;
        };
        let max = self.params.max_entries();
        let min = self.params.min_entries();
        assert!(self.arena[root].parent.is_none(), "root has a parent");

        let mut leaf_depth: Option<usize> = None;
        let mut records = 0_usize;
        let mut nodes = 0_usize;
        let mut stack = vec![(root, 1_usize)];
        while let Some((idx, depth)) = stack.pop() {
            nodes += 1;
            let n = &self.arena[idx];
            let count = n.entries.len();
            assert!(count <= max, "node {idx:?} has {count} > {max} entries");
            if idx == root {
                let floor = if n.leaf { 1 } else { 2 };
                assert!(count >= floor, "root {idx:?} has only {count} entries");
            } else {
                assert!(count >= min, "node {idx:?} has {count} < {min} entries");
            }
            if n.leaf {
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(d) => assert_eq!(d, depth, "leaf {idx:?} at depth {depth}, expected {d}"),
                }
            }
            for e in &n.entries {
                match *e {
                    Entry::Leaf { .. } => {
                        assert!(n.leaf, "record entry in internal node {idx:?}");
                        records += 1;
                    }
                    Entry::Internal { bbox, child } => {
                        assert!(!n.leaf, "subtree entry in leaf {idx:?}");
                        let c = &self.arena[child];
                        assert_eq!(
                            c.parent,
                            Some(idx),
                            "child {child:?} does not point back at {idx:?}"
                        );
                        assert_eq!(
                            c.bbox(),
                            Some(bbox),
                            "entry box for {child:?} does not match its contents"
                        );
                        stack.push((child, depth + 1));
                    }
                }
            }
        }
        assert_eq!(records, self.len, "record count mismatch");
        assert_eq!(nodes, self.arena.live(), "unreachable nodes in arena");
        assert_eq!(leaf_depth, Some(self.height()), "height disagrees with leaf depth");
    }
}
