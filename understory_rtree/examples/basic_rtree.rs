// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory R-tree: insert, search, nearest, and delete.

use understory_rtree::{Aabb2D, Halt, Params, RTreeF64};

fn main() {
    let params = Params::new(4).expect("valid capacity");
    let mut tree = RTreeF64::with_params(params);
    for i in 0..20_u32 {
        let x = f64::from(i % 5) * 10.0;
        let y = f64::from(i / 5) * 10.0;
        tree.insert(Aabb2D::<f64>::from_xywh(x, y, 4.0, 4.0), i as usize);
    }
    println!("{tree:?}");

    // Range search
    let hits = tree.query_rect(Aabb2D::new(8.0, 8.0, 22.0, 12.0));
    println!("hits in [8,8]-[22,12]: {hits:?}");

    // Nearest three to a point off the grid
    let near = tree.nearest(Aabb2D::point(47.0, -3.0), 3);
    println!("nearest to (47,-3): {near:?}");

    // Walk nearest-first with distances until one is farther than 15
    for (id, d2) in tree.nearest_iter(Aabb2D::point(25.0, 25.0)) {
        if d2 > 15.0 * 15.0 {
            break;
        }
        println!("  {id} at distance^2 {d2}");
    }

    // Reject ids above a limit from inside a visitor
    let res: Result<(), String> = tree.search(Aabb2D::new(0.0, 0.0, 50.0, 50.0), |id| {
        if id > 15 {
            return Err(Halt::Abort(format!("record {id} is out of range")));
        }
        Ok(())
    });
    println!("checked search: {res:?}");

    // Delete a record with a box that merely touches it
    let removed = tree.delete(Aabb2D::point(4.0, 4.0), 0);
    println!("removed 0: {removed}, len now {}", tree.len());
    tree.check_invariants();
}
