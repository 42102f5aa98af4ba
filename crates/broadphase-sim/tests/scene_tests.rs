// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
//! End-to-end frame pipeline tests.

use std::collections::BTreeSet;

use broadphase_geom::{trace_candidates, Vec2};
use broadphase_sim::{BroadPhaseMode, Scene, SimConfig, SimError};

fn config(seed: u64, count: usize) -> SimConfig {
    SimConfig {
        seed,
        target_count: count,
        compare_brute_force: true,
        ..SimConfig::default()
    }
}

fn scene(seed: u64, count: usize) -> Scene {
    Scene::new(config(seed, count)).unwrap()
}

#[test]
fn bvh_never_disagrees_with_brute_force() {
    let mut scene = scene(11, 150);
    for _ in 0..120 {
        let report = scene.frame(1.0 / 60.0);
        assert!(!report.stats.mismatch, "frame {}", report.frame);
        assert_eq!(report.stats.brute_pairs, Some(report.stats.broad_pairs));
    }
}

#[test]
fn narrow_phase_partitions_candidates() {
    let mut scene = scene(4, 200);
    let report = scene.frame(0.0);
    let mut both: Vec<_> = report
        .collisions
        .iter()
        .chain(&report.false_positives)
        .copied()
        .collect();
    both.sort_unstable();
    assert_eq!(both, report.pairs);
    assert_eq!(
        report.stats.collisions + report.stats.false_positives,
        report.stats.narrow_tests
    );
}

#[test]
fn same_seed_same_frames() {
    let mut a = scene(77, 40);
    let mut b = scene(77, 40);
    for _ in 0..30 {
        assert_eq!(a.frame(0.02), b.frame(0.02));
    }
}

#[test]
fn brute_force_mode_reports_quadratic_tests() {
    let mut scene = Scene::new(SimConfig {
        mode: BroadPhaseMode::BruteForce,
        target_count: 20,
        ..SimConfig::default()
    })
    .unwrap();
    let report = scene.frame(0.016);
    assert_eq!(report.stats.bound_tests, 20 * 19 / 2);
    assert_eq!(report.stats.brute_pairs, None);
    assert_eq!(scene.toggle_mode(), BroadPhaseMode::Bvh);
}

#[test]
fn selection_produces_trace_matching_query() {
    let mut scene = scene(9, 60);
    scene.frame(0.016);
    assert_eq!(scene.select(Some(60)), Err(SimError::ShapeOutOfRange { index: 60, len: 60 }));
    assert!(scene.select(Some(5)).is_ok());
    let report = scene.frame(0.016);
    assert!(!report.query_steps.is_empty());

    let bvh = scene.bvh();
    let own = scene.aabbs()[5];
    let from_trace: BTreeSet<usize> = trace_candidates(&report.query_steps).into_iter().collect();
    let direct: BTreeSet<usize> = bvh.query(&own, Some(5)).into_iter().collect();
    assert_eq!(from_trace, direct);
    assert!(!from_trace.contains(&5));

    scene.set_trace_enabled(false);
    assert!(scene.frame(0.016).query_steps.is_empty());
}

#[test]
fn stepping_only_while_paused() {
    let mut scene = scene(2, 30);
    assert!(scene.select(Some(0)).is_ok());
    scene.frame(0.016);
    scene.step_forward();
    assert_eq!(scene.cursor().position(), None);

    scene.set_paused(true);
    scene.frame(0.016);
    scene.step_forward();
    scene.step_forward();
    assert_eq!(scene.cursor().position(), Some(1.min(scene.query_steps().len() - 1)));

    scene.set_paused(false);
    assert_eq!(scene.cursor().position(), None);
}

#[test]
fn paused_frames_do_not_move_shapes() {
    let mut scene = scene(5, 25);
    scene.frame(0.016);
    scene.set_paused(true);
    let before: Vec<Vec2> = scene.world().shapes().iter().map(|s| s.pos).collect();
    scene.frame(0.05);
    let after: Vec<Vec2> = scene.world().shapes().iter().map(|s| s.pos).collect();
    assert_eq!(before, after);
}

#[test]
fn build_replay_reveals_every_node() {
    let mut scene = scene(8, 10);
    scene.frame(0.016);
    scene.start_build_replay();
    assert!(scene.is_paused());
    let nodes = scene.bvh().len();
    for _ in 0..nodes {
        scene.step_forward();
    }
    assert!(!scene.replay().is_active());
    assert_eq!(scene.replay().revealed(), nodes);
}

#[test]
fn count_and_speed_controls_clamp() {
    let mut scene = scene(1, 30);
    scene.set_target_count(1);
    assert_eq!(scene.frame(0.016).stats.shapes, 5);
    assert!((scene.adjust_speed(10.0) - 3.0).abs() < f32::EPSILON);
    assert!(scene.adjust_speed(-10.0).abs() < f32::EPSILON);

    let idx = scene.spawn_at(Vec2::new(400.0, 400.0));
    assert_eq!(idx, 5);
    assert_eq!(scene.frame(0.016).stats.shapes, 6);
}

#[test]
fn shrinking_below_selection_clears_it() {
    let mut scene = scene(3, 10);
    scene.frame(0.016);
    assert!(scene.select(Some(9)).is_ok());
    scene.set_target_count(5);
    let report = scene.frame(0.016);
    assert_eq!(report.stats.shapes, 5);
    assert_eq!(scene.selected(), None);
    assert!(report.query_steps.is_empty());
}

#[test]
fn growing_after_shrinking_the_world_below_the_spawn_margin() {
    let mut scene = scene(6, 30);
    scene.frame(0.016);
    scene.world_mut().resize(100.0, 100.0);
    scene.set_target_count(40);
    let report = scene.frame(0.016);
    assert_eq!(report.stats.shapes, 40);
    assert!(!report.stats.mismatch);
}

#[test]
fn dragging_keeps_the_grab_offset() {
    let mut scene = scene(12, 5);
    scene.frame(0.016);
    scene.set_paused(true);
    let centre = scene.world().shapes()[2].pos;
    let grab = centre + Vec2::new(1.0, -1.0);
    assert_eq!(scene.select_at(grab), scene.world().shape_at(grab));
    let index = scene.dragged().unwrap();
    let before = scene.world().shapes()[index].pos;

    assert!(scene.drag_to(grab + Vec2::new(40.0, 25.0)));
    let after = scene.world().shapes()[index].pos;
    assert!((after.x - (before.x + 40.0)).abs() < 1e-4);
    assert!((after.y - (before.y + 25.0)).abs() < 1e-4);

    scene.release();
    assert_eq!(scene.dragged(), None);
    assert!(!scene.drag_to(Vec2::ZERO));
    assert_eq!(scene.select_at(Vec2::new(-500.0, -500.0)), None);
    assert_eq!(scene.dragged(), None);
}

#[test]
fn invalid_config_is_rejected() {
    let err = Scene::new(SimConfig {
        target_count: 0,
        ..SimConfig::default()
    });
    assert!(matches!(err, Err(SimError::InvalidConfig(_))));
}
