// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range search.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use crate::error::{Halt, settle};
use crate::node::{Entry, RecordId};
use crate::rtree::RTree;
use crate::types::{Aabb2D, Scalar};

impl<T: Scalar> RTree<T> {
    /// Call `visit` with every record whose box overlaps `query` (touching counts).
    ///
    /// Subtrees whose box misses `query` are skipped. The visiting order is
    /// unspecified. Returning [`Halt::Stop`] from `visit` ends the search with
    /// `Ok(())`; returning [`Halt::Abort`] ends it with that error.
    pub fn search<E, F>(&self, query: Aabb2D<T>, mut visit: F) -> Result<(), E>
    where
        F: FnMut(RecordId) -> Result<(), Halt<E>>,
    {
        let Some(root) = self.root else {
            return Ok(());
        };
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            for e in &self.arena[idx].entries {
                if !e.bbox().overlaps(&query) {
                    continue;
                }
                match *e {
                    Entry::Leaf { record, .. } => {
                        if let Err(halt) = visit(record) {
                            return settle(halt);
                        }
                    }
                    Entry::Internal { child, .. } => stack.push(child),
                }
            }
        }
        Ok(())
    }

    /// Collect the records whose box overlaps `rect`.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> Vec<RecordId> {
        let mut out = Vec::new();
        let Ok(()) = self.search::<Infallible, _>(rect, |id| {
            out.push(id);
            Ok(())
        });
        out
    }

    /// Collect the records whose box contains the point.
    pub fn query_point(&self, x: T, y: T) -> Vec<RecordId> {
        self.query_rect(Aabb2D::point(x, y))
    }
}
