// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use broadphase_sim::{BroadPhaseMode, Scene, SimConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_frame");
    for &n in &[30usize, 100, 200] {
        for mode in [BroadPhaseMode::Bvh, BroadPhaseMode::BruteForce] {
            let config = SimConfig {
                target_count: n,
                mode,
                seed: 7,
                ..SimConfig::default()
            };
            let Ok(mut scene) = Scene::new(config) else {
                continue;
            };
            let label = match mode {
                BroadPhaseMode::Bvh => "bvh",
                BroadPhaseMode::BruteForce => "brute_force",
            };
            group.throughput(Throughput::Elements(n as u64));
            group.bench_function(BenchmarkId::new(label, n), |b| {
                b.iter(|| criterion::black_box(scene.frame(1.0 / 60.0)));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
