// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic node split.
//!
//! Seeds are the two entries whose covering box wastes the most area. The rest are
//! assigned one at a time, most decisive entry first, to the group that needs the
//! least enlargement. Ties go to the group with the smaller resulting area, then to
//! the group with fewer entries. Once a group needs every remaining entry to reach
//! the fill floor it receives them all.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::node::Entry;
use crate::types::{Aabb2D, Scalar, area, cmp_acc, enlargement, union_aabb};

struct Group<T> {
    entries: Vec<Entry<T>>,
    bbox: Aabb2D<T>,
}

impl<T: Scalar> Group<T> {
    fn seeded(seed: Entry<T>, capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        let bbox = seed.bbox();
        entries.push(seed);
        Self { entries, bbox }
    }

    fn push(&mut self, e: Entry<T>) {
        self.bbox = union_aabb(self.bbox, e.bbox());
        self.entries.push(e);
    }

    fn absorb(&mut self, rest: &mut Vec<Entry<T>>) {
        for e in rest.drain(..) {
            self.push(e);
        }
    }
}

/// Partition an overfull node's entries into two groups of at least `min_entries`.
///
/// # Panics
///
/// Panics if there are fewer than `2 * min_entries` entries.
pub(crate) fn quadratic_split<T: Scalar>(
    mut entries: Vec<Entry<T>>,
    min_entries: usize,
) -> (Vec<Entry<T>>, Vec<Entry<T>>) {
    assert!(
        entries.len() >= 2 * min_entries && min_entries >= 1,
        "cannot split {} entries with a floor of {min_entries}",
        entries.len()
    );
    let capacity = entries.len() - min_entries;
    let (i, j) = pick_seeds(&entries);
    // j > i, so removing j first leaves i in place.
    let seed_b = entries.swap_remove(j);
    let seed_a = entries.swap_remove(i);
    let mut a = Group::seeded(seed_a, capacity);
    let mut b = Group::seeded(seed_b, capacity);

    while !entries.is_empty() {
        if a.entries.len() + entries.len() <= min_entries {
            a.absorb(&mut entries);
            break;
        }
        if b.entries.len() + entries.len() <= min_entries {
            b.absorb(&mut entries);
            break;
        }
        let k = pick_next(&entries, &a.bbox, &b.bbox);
        let e = entries.swap_remove(k);
        if prefer_first(&a, &b, &e.bbox()) {
            a.push(e);
        } else {
            b.push(e);
        }
    }
    (a.entries, b.entries)
}

/// Indices `(i, j)` with `i < j` of the pair whose union wastes the most area.
fn pick_seeds<T: Scalar>(entries: &[Entry<T>]) -> (usize, usize) {
    let mut best: Option<(T::Acc, usize, usize)> = None;
    for i in 0..entries.len() {
        let bi = entries[i].bbox();
        for (j, ej) in entries.iter().enumerate().skip(i + 1) {
            let bj = ej.bbox();
            let waste = area(&union_aabb(bi, bj)) - area(&bi) - area(&bj);
            if best.as_ref().is_none_or(|(w, _, _)| waste > *w) {
                best = Some((waste, i, j));
            }
        }
    }
    let (_, i, j) = best.unwrap_or_else(|| unreachable!("split requires at least two entries"));
    (i, j)
}

/// Index of the entry with the strongest preference for one group over the other.
fn pick_next<T: Scalar>(entries: &[Entry<T>], a: &Aabb2D<T>, b: &Aabb2D<T>) -> usize {
    let mut best_idx = 0_usize;
    let mut best_diff: Option<T::Acc> = None;
    for (i, e) in entries.iter().enumerate() {
        let bb = e.bbox();
        let da = enlargement(a, &bb);
        let db = enlargement(b, &bb);
        let diff = if da > db { da - db } else { db - da };
        if best_diff.is_none_or(|d| diff > d) {
            best_diff = Some(diff);
            best_idx = i;
        }
    }
    best_idx
}

fn prefer_first<T: Scalar>(a: &Group<T>, b: &Group<T>, bbox: &Aabb2D<T>) -> bool {
    let da = enlargement(&a.bbox, bbox);
    let db = enlargement(&b.bbox, bbox);
    match cmp_acc(&da, &db) {
        Ordering::Less => return true,
        Ordering::Greater => return false,
        Ordering::Equal => {}
    }
    let ra = area(&union_aabb(a.bbox, *bbox));
    let rb = area(&union_aabb(b.bbox, *bbox));
    match cmp_acc(&ra, &rb) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => a.entries.len() <= b.entries.len(),
    }
}
