// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree::{Aabb2D, Params, RTreeF64};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::<f64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

fn to_rstar_rects(v: &[Aabb2D<f64>]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|r| Rectangle::from_corners([r.min_x, r.min_y], [r.max_x, r.max_y]))
        .collect()
}

fn bench_rtree_external_compare_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare_f64");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let aabb_query = Aabb2D::<f64>::from_xywh(100.0, 100.0, 400.0, 400.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("understory_build_query_n{}", n), |b| {
            b.iter(|| {
                let mut tree = RTreeF64::new();
                for (i, r) in rects.iter().copied().enumerate() {
                    tree.insert(r, i);
                }
                black_box(tree.query_rect(aabb_query).len());
            })
        });

        group.bench_function(format!("understory_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || {
                    let entries: Vec<_> = rects.iter().copied().zip(0..).collect();
                    entries
                },
                |entries| {
                    let tree = RTreeF64::bulk_load(Params::default(), &entries);
                    black_box(tree.query_rect(aabb_query).len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(
                        [aabb_query.min_x, aabb_query.min_y],
                        [aabb_query.max_x, aabb_query.max_y],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        let ours = RTreeF64::bulk_load(
            Params::default(),
            &rects.iter().copied().zip(0..).collect::<Vec<_>>(),
        );
        let theirs = RTree::bulk_load(to_rstar_rects(&rects));
        group.bench_function(format!("understory_nearest10_n{}", n), |b| {
            b.iter(|| black_box(ours.nearest(Aabb2D::point(333.0, 333.0), 10)))
        });
        group.bench_function(format!("rstar_nearest10_n{}", n), |b| {
            b.iter(|| {
                let hits: Vec<_> = theirs.nearest_neighbor_iter(&[333.0, 333.0]).take(10).collect();
                black_box(hits)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare_f64);
criterion_main!(benches);
