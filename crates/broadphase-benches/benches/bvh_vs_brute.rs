// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use broadphase_geom::{brute_force_pairs, Aabb, Bvh, Vec2};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: [usize; 4] = [10, 50, 200, 1_000];

/// Boxes of 24..60 units scattered over a 1400x800 field.
fn scatter(n: usize, seed: u64) -> Vec<Aabb> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let c = Vec2::new(rng.gen_range(60.0..1340.0), rng.gen_range(60.0..740.0));
            let hx = rng.gen_range(12.0..30.0);
            let hy = rng.gen_range(12.0..30.0);
            Aabb::from_center_half_extents(c, hx, hy)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("bvh_build");
    for &n in &SIZES {
        let boxes = scatter(n, 0xB0B);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &boxes, |b, boxes| {
            b.iter_batched(
                Bvh::new,
                |mut bvh| {
                    bvh.build(criterion::black_box(boxes));
                    bvh
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_all_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("all_pairs");
    for &n in &SIZES {
        let boxes = scatter(n, 0xB0B);
        let mut bvh = Bvh::new();
        bvh.build(&boxes);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("bvh", n), &bvh, |b, bvh| {
            b.iter(|| criterion::black_box(bvh.find_all_pairs()));
        });
        group.bench_with_input(BenchmarkId::new("brute_force", n), &boxes, |b, boxes| {
            b.iter(|| criterion::black_box(brute_force_pairs(boxes)));
        });
    }
    group.finish();
}

fn bench_rebuild_and_pair(c: &mut Criterion) {
    // What one frame of the demo pays: rebuild from scratch, then self-query.
    let mut group = c.benchmark_group("rebuild_and_pair");
    for &n in &SIZES {
        let boxes = scatter(n, 0xB0B);
        let mut bvh = Bvh::new();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &boxes, |b, boxes| {
            b.iter(|| {
                bvh.build(boxes);
                criterion::black_box(bvh.find_all_pairs())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_all_pairs, bench_rebuild_and_pair);
criterion_main!(benches);
