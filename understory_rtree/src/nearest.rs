// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Best-first nearest-neighbour traversal.
//!
//! A single min-heap keyed by squared distance to the query holds both subtree
//! entries and record entries from every depth. A subtree is only expanded when it
//! reaches the front of the queue, and no record inside it can be closer than its
//! box, so records come out in non-decreasing distance order while far subtrees are
//! never opened.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::convert::Infallible;
use core::fmt::Debug;

use crate::error::{Halt, settle};
use crate::node::{Entry, NodeIdx, RecordId};
use crate::rtree::RTree;
use crate::types::{Aabb2D, Scalar, cmp_acc, distance_sq};

#[derive(Copy, Clone, Debug)]
enum Candidate {
    Internal(NodeIdx),
    Leaf(RecordId),
}

#[derive(Debug)]
struct Queued<A> {
    dist: A,
    seq: u64,
    item: Candidate,
}

// Reversed so `BinaryHeap` pops the nearest candidate first; among equal distances
// the earliest queued wins.
impl<A: PartialOrd> Ord for Queued<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_acc(&other.dist, &self.dist).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<A: PartialOrd> PartialOrd for Queued<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: PartialOrd> PartialEq for Queued<A> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<A: PartialOrd> Eq for Queued<A> {}

/// Iterator over records in non-decreasing distance from a query box.
///
/// Yields `(record, squared_distance)`. Created by [`RTree::nearest_iter`].
pub struct NearestIter<'a, T: Scalar> {
    tree: &'a RTree<T>,
    origin: Aabb2D<T>,
    queue: BinaryHeap<Queued<T::Acc>>,
    seq: u64,
}

impl<'a, T: Scalar> NearestIter<'a, T> {
    fn new(tree: &'a RTree<T>, origin: Aabb2D<T>) -> Self {
        let mut it = Self {
            tree,
            origin,
            queue: BinaryHeap::new(),
            seq: 0,
        };
        if let Some(root) = tree.root {
            it.expand(root);
        }
        it
    }

    fn expand(&mut self, idx: NodeIdx) {
        for e in &self.tree.arena[idx].entries {
            let item = match *e {
                Entry::Leaf { record, .. } => Candidate::Leaf(record),
                Entry::Internal { child, .. } => Candidate::Internal(child),
            };
            self.queue.push(Queued {
                dist: distance_sq(&self.origin, &e.bbox()),
                seq: self.seq,
                item,
            });
            self.seq += 1;
        }
    }
}

impl<T: Scalar> Iterator for NearestIter<'_, T> {
    type Item = (RecordId, T::Acc);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Queued { dist, item, .. }) = self.queue.pop() {
            match item {
                Candidate::Leaf(record) => return Some((record, dist)),
                Candidate::Internal(child) => self.expand(child),
            }
        }
        None
    }
}

impl<T: Scalar> Debug for NearestIter<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NearestIter")
            .field("origin", &self.origin)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> RTree<T> {
    /// Lazily iterate records in non-decreasing distance from `query`.
    pub fn nearest_iter(&self, query: Aabb2D<T>) -> NearestIter<'_, T> {
        NearestIter::new(self, query)
    }

    /// Call `visit` with every record in non-decreasing Euclidean distance from
    /// `query`, closest first. Records overlapping `query` are at distance zero.
    ///
    /// Returning [`Halt::Stop`] from `visit` ends the search with `Ok(())`, so
    /// stopping after `k` calls has visited exactly the `k` nearest records.
    /// Returning [`Halt::Abort`] ends it with that error.
    pub fn nearest_search<E, F>(&self, query: Aabb2D<T>, mut visit: F) -> Result<(), E>
    where
        F: FnMut(RecordId) -> Result<(), Halt<E>>,
    {
        for (record, _) in self.nearest_iter(query) {
            if let Err(halt) = visit(record) {
                return settle(halt);
            }
        }
        Ok(())
    }

    /// The (up to) `k` records nearest to `query`, closest first.
    pub fn nearest(&self, query: Aabb2D<T>, k: usize) -> Vec<RecordId> {
        let mut out = Vec::with_capacity(k);
        if k == 0 {
            return out;
        }
        let Ok(()) = self.nearest_search::<Infallible, _>(query, |id| {
            out.push(id);
            if out.len() == k { Err(Halt::Stop) } else { Ok(()) }
        });
        out
    }
}
