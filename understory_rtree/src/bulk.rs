// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! STR-like bulk loading.
//!
//! Each level is packed by sorting entries on centroid x, cutting them into
//! vertical slices, sorting each slice on centroid y, and cutting slices into nodes.
//! Node sizes are spread evenly across a level rather than filled greedily, so no
//! trailing node ends up under the fill floor.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::config::Params;
use crate::node::{Entry, Node, RecordId};
use crate::rtree::RTree;
use crate::types::{Aabb2D, Scalar};

impl<T: Scalar> RTree<T> {
    /// Build a packed tree from `(box, record)` pairs.
    ///
    /// The result satisfies the same invariants as an incrementally built tree and
    /// supports all the same operations afterwards.
    pub fn bulk_load(params: Params, items: &[(Aabb2D<T>, RecordId)]) -> Self {
        let mut tree = Self::with_params(params);
        if items.is_empty() {
            return tree;
        }
        let max = params.max_entries();
        let mut level: Vec<Entry<T>> = items
            .iter()
            .map(|&(bbox, record)| Entry::Leaf { bbox, record })
            .collect();
        let mut leaf = true;
        while level.len() > max {
            let mut parents = Vec::with_capacity(level.len().div_ceil(max));
            for entries in pack_level(level, max) {
                let idx = tree.arena.alloc(Node {
                    entries,
                    leaf,
                    parent: None,
                });
                if !leaf {
                    tree.adopt_children(idx);
                }
                parents.push(Entry::Internal {
                    bbox: tree.covering(idx),
                    child: idx,
                });
            }
            level = parents;
            leaf = false;
        }
        let root = tree.arena.alloc(Node {
            entries: level,
            leaf,
            parent: None,
        });
        if !leaf {
            tree.adopt_children(root);
        }
        tree.root = Some(root);
        tree.len = items.len();
        log::debug!(
            "bulk loaded {} records into {} nodes, height {}",
            tree.len,
            tree.arena.live(),
            tree.height()
        );
        tree
    }
}

fn centroid_x<T: Scalar>(e: &Entry<T>) -> T {
    let b = e.bbox();
    T::mid(b.min_x, b.max_x)
}

fn centroid_y<T: Scalar>(e: &Entry<T>) -> T {
    let b = e.bbox();
    T::mid(b.min_y, b.max_y)
}

/// Cut one level of entries into `ceil(n / max)` groups of near-equal size.
fn pack_level<T: Scalar>(mut entries: Vec<Entry<T>>, max: usize) -> Vec<Vec<Entry<T>>> {
    let n = entries.len();
    let groups = n.div_ceil(max);
    let mut slices = 1_usize;
    while slices * slices < groups {
        slices += 1;
    }
    let group_size = |g: usize| n / groups + usize::from(g < n % groups);

    entries.sort_by(|a, b| {
        centroid_x(a)
            .partial_cmp(&centroid_x(b))
            .unwrap_or(Ordering::Equal)
    });

    let mut out = Vec::with_capacity(groups);
    let mut g = 0;
    let mut start = 0;
    for s in 0..slices {
        let in_slice = groups / slices + usize::from(s < groups % slices);
        let slice_len: usize = (g..g + in_slice).map(group_size).sum();
        let slice = &mut entries[start..start + slice_len];
        slice.sort_by(|a, b| {
            centroid_y(a)
                .partial_cmp(&centroid_y(b))
                .unwrap_or(Ordering::Equal)
        });
        let mut off = 0;
        for gi in g..g + in_slice {
            let size = group_size(gi);
            out.push(slice[off..off + size].to_vec());
            off += size;
        }
        start += slice_len;
        g += in_slice;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtree::{RTreeF64, RTreeI64};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grid(n: i64) -> Vec<(Aabb2D<i64>, RecordId)> {
        let mut out = Vec::new();
        for y in 0..n {
            for x in 0..n {
                out.push((Aabb2D::new(x * 4, y * 4, x * 4 + 3, y * 4 + 3), out.len()));
            }
        }
        out
    }

    #[test]
    fn group_sizes_respect_the_floor() {
        for max in [3_usize, 4, 5, 8, 9, 16] {
            let min = Params::new(max).unwrap().min_entries();
            for n in max + 1..200 {
                let entries: Vec<Entry<i64>> = (0..n)
                    .map(|record| Entry::Leaf {
                        bbox: Aabb2D::point(0, 0),
                        record,
                    })
                    .collect();
                let packed = pack_level(entries, max);
                assert_eq!(packed.len(), n.div_ceil(max));
                assert_eq!(packed.iter().map(Vec::len).sum::<usize>(), n);
                for g in &packed {
                    assert!(
                        (min..=max).contains(&g.len()),
                        "n={n} max={max}: group of {}",
                        g.len()
                    );
                }
            }
        }
    }

    #[test]
    fn small_inputs() {
        let params = Params::new(4).unwrap();
        let empty = RTreeI64::bulk_load(params, &[]);
        assert!(empty.is_empty());
        assert_eq!(empty.height(), 0);

        let items = grid(2);
        let t = RTreeI64::bulk_load(params, &items);
        assert_eq!(t.height(), 1, "four records fit in the root leaf");
        t.check_invariants();

        let mut items = grid(2);
        items.push((Aabb2D::new(100, 100, 101, 101), 4));
        let t = RTreeI64::bulk_load(params, &items);
        assert_eq!(t.height(), 2);
        t.check_invariants();
    }

    #[test]
    fn packed_tree_answers_like_a_scan() {
        let items = grid(40);
        let t = RTreeI64::bulk_load(Params::new(6).unwrap(), &items);
        t.check_invariants();
        assert_eq!(t.len(), items.len());
        let q = Aabb2D::new(10, 10, 50, 30);
        let mut got = t.query_rect(q);
        got.sort_unstable();
        let want: Vec<_> = items
            .iter()
            .filter(|(b, _)| b.overlaps(&q))
            .map(|(_, id)| *id)
            .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn packed_tree_stays_valid_under_mutation() {
        let mut rng = StdRng::seed_from_u64(0xB01D);
        let items: Vec<_> = (0..700)
            .map(|id| {
                let b = Aabb2D::<f64>::from_xywh(
                    rng.random_range(0.0..500.0),
                    rng.random_range(0.0..500.0),
                    rng.random_range(0.0..5.0),
                    rng.random_range(0.0..5.0),
                );
                (b, id)
            })
            .collect();
        let mut t = RTreeF64::bulk_load(Params::default(), &items);
        t.check_invariants();
        for (b, id) in items.iter().step_by(3) {
            assert!(t.delete(*b, *id));
            t.check_invariants();
        }
        for id in 700..800 {
            t.insert(Aabb2D::point(f64::from(id % 50) * 10.0, 1.0), id as RecordId);
            t.check_invariants();
        }
        assert_eq!(t.len(), 700 - 700_usize.div_ceil(3) + 100);
        let mut at_origin = t.nearest(Aabb2D::point(0.0, 1.0), 2);
        at_origin.sort_unstable();
        assert_eq!(at_origin, [700, 750]);
    }
}
