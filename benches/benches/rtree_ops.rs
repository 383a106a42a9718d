// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree::{Aabb2D, Params, RTreeF64, RTreeI64};

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

fn gen_grid_rects_i64(n: usize, cell: i64) -> Vec<Aabb2D<i64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as i64 * cell;
            let y0 = y as i64 * cell;
            out.push(Aabb2D::<i64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Aabb2D::<f64>::from_xywh(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

fn build(rects: &[Aabb2D<f64>], params: Params) -> RTreeF64 {
    let mut tree = RTreeF64::with_params(params);
    for (i, r) in rects.iter().copied().enumerate() {
        tree.insert(r, i);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &max in &[4usize, 8, 16] {
        let params = Params::new(max).unwrap();
        let rects = gen_grid_rects(64, 10.0);
        group.throughput(Throughput::Elements(rects.len() as u64));
        group.bench_function(format!("grid64_max{}", max), |b| {
            b.iter(|| black_box(build(&rects, params)))
        });

        let clustered = gen_clustered_rects(20, 200, 150.0);
        group.bench_function(format!("clustered4000_max{}", max), |b| {
            b.iter(|| black_box(build(&clustered, params)))
        });
    }
    group.finish();
}

fn bench_bulk_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_load");
    for &n in &[64usize, 128] {
        let entries: Vec<_> = gen_grid_rects(n, 10.0)
            .into_iter()
            .enumerate()
            .map(|(i, r)| (r, i))
            .collect();
        group.throughput(Throughput::Elements(entries.len() as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter(|| black_box(RTreeF64::bulk_load(Params::default(), &entries)))
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let rects = gen_grid_rects(128, 10.0);
    let tree = build(&rects, Params::default());
    let packed = RTreeF64::bulk_load(
        Params::default(),
        &rects.iter().copied().zip(0..).collect::<Vec<_>>(),
    );
    let q = Aabb2D::<f64>::from_xywh(300.0, 300.0, 200.0, 200.0);
    group.bench_function("rect_incremental", |b| {
        b.iter(|| black_box(tree.query_rect(black_box(q)).len()))
    });
    group.bench_function("rect_packed", |b| {
        b.iter(|| black_box(packed.query_rect(black_box(q)).len()))
    });
    group.bench_function("point", |b| {
        b.iter(|| black_box(tree.query_point(black_box(615.0), black_box(615.0)).len()))
    });

    let ints = gen_grid_rects_i64(128, 10);
    let mut itree = RTreeI64::new();
    for (i, r) in ints.iter().copied().enumerate() {
        itree.insert(r, i);
    }
    let iq = Aabb2D::<i64>::from_xywh(300, 300, 200, 200);
    group.bench_function("rect_i64", |b| {
        b.iter(|| black_box(itree.query_rect(black_box(iq)).len()))
    });
    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    let rects = gen_clustered_rects(40, 250, 200.0);
    let tree = build(&rects, Params::default());
    let origin = Aabb2D::point(1000.0, 1000.0);
    for &k in &[1usize, 10, 100] {
        group.bench_function(format!("k{}", k), |b| {
            b.iter(|| black_box(tree.nearest(black_box(origin), k)))
        });
    }
    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    let rects = gen_grid_rects(64, 10.0);
    group.throughput(Throughput::Elements(rects.len() as u64 / 2));
    group.bench_function("half_of_grid64", |b| {
        b.iter_batched(
            || build(&rects, Params::default()),
            |mut tree| {
                for (i, r) in rects.iter().enumerate().step_by(2) {
                    black_box(tree.delete(*r, i));
                }
                tree
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_bulk_load,
    bench_query,
    bench_nearest,
    bench_delete
);
criterion_main!(benches);
