// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-frame collision pipeline: integrate, rebuild, broad phase, narrow phase.

use broadphase_geom::{brute_force_pairs, Aabb, Bvh, TraversalStep, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{BroadPhaseMode, SimConfig};
use crate::error::SimError;
use crate::narrow::shapes_intersect;
use crate::stepper::{BuildReplay, StepCursor};
use crate::world::World;

/// Counters describing one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Shapes in the world.
    pub shapes: usize,
    /// Nodes in the rebuilt BVH.
    pub bvh_nodes: usize,
    /// Deepest leaf of the BVH.
    pub max_depth: usize,
    /// Candidate pairs from the active broad phase.
    pub broad_pairs: usize,
    /// Bound tests the active broad phase performed.
    pub bound_tests: usize,
    /// Pairs from the comparison brute-force pass, when enabled.
    pub brute_pairs: Option<usize>,
    /// Exact tests run (one per candidate pair).
    pub narrow_tests: usize,
    /// Candidates that really intersect.
    pub collisions: usize,
    /// Candidates whose boxes overlap but whose shapes do not.
    pub false_positives: usize,
    /// Comparison pass disagreed with the active broad phase.
    pub mismatch: bool,
}

/// Everything a renderer needs from one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameReport {
    /// Frame counter, starting at 0.
    pub frame: u64,
    /// Summary counters.
    pub stats: FrameStats,
    /// Broad-phase candidates, canonical and ascending.
    pub pairs: Vec<(usize, usize)>,
    /// Candidates confirmed by the narrow phase.
    pub collisions: Vec<(usize, usize)>,
    /// Candidates rejected by the narrow phase.
    pub false_positives: Vec<(usize, usize)>,
    /// Traversal trace for the selected shape (empty when tracing is off).
    pub query_steps: Vec<TraversalStep>,
}

/// Shape held by the pointer, with the grab point's offset from its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    index: usize,
    offset: Vec2,
}

/// Owns the world, the BVH, and the interaction state of the demo.
///
/// Call [`Scene::frame`] once per displayed frame. Node ids and traces in the
/// returned report refer to the tree built during that call.
#[derive(Debug)]
pub struct Scene {
    config: SimConfig,
    world: World,
    bvh: Bvh,
    aabbs: Vec<Aabb>,
    rng: StdRng,
    selected: Option<usize>,
    dragged: Option<Drag>,
    paused: bool,
    trace_enabled: bool,
    query_steps: Vec<TraversalStep>,
    cursor: StepCursor,
    replay: BuildReplay,
    frame: u64,
}

impl Scene {
    /// Validates `config` and spawns the initial shapes from its seed.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut world = World::new(config.world_width, config.world_height);
        world.ensure_count(&mut rng, config.target_count);
        info!(
            shapes = world.len(),
            seed = config.seed,
            mode = ?config.mode,
            "scene created"
        );
        Ok(Self {
            config,
            world,
            bvh: Bvh::new(),
            aabbs: Vec::new(),
            rng,
            selected: None,
            dragged: None,
            paused: false,
            trace_enabled: true,
            query_steps: Vec::new(),
            cursor: StepCursor::new(),
            replay: BuildReplay::default(),
            frame: 0,
        })
    }

    /// Active settings.
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Shapes and their motion.
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access for input handling (dragging, removal).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Tree built by the most recent frame.
    pub const fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// Boxes fed to the most recent build, index-aligned with the shapes.
    pub fn aabbs(&self) -> &[Aabb] {
        &self.aabbs
    }

    /// Trace recorded by the most recent frame.
    pub fn query_steps(&self) -> &[TraversalStep] {
        &self.query_steps
    }

    /// Step-through position within [`Scene::query_steps`].
    pub const fn cursor(&self) -> &StepCursor {
        &self.cursor
    }

    /// Build replay state.
    pub const fn replay(&self) -> &BuildReplay {
        &self.replay
    }

    /// Selected shape, if any.
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selects a shape (or clears the selection) and restarts step-through.
    pub fn select(&mut self, index: Option<usize>) -> Result<(), SimError> {
        if let Some(i) = index {
            if i >= self.world.len() {
                return Err(SimError::ShapeOutOfRange {
                    index: i,
                    len: self.world.len(),
                });
            }
        }
        self.selected = index;
        self.cursor.reset();
        Ok(())
    }

    /// Selects whatever shape is under `p` and grabs it for dragging;
    /// clicking empty space clears both.
    pub fn select_at(&mut self, p: Vec2) -> Option<usize> {
        self.selected = self.world.shape_at(p);
        self.dragged = self.selected.map(|index| Drag {
            index,
            offset: self.world.shapes()[index].pos - p,
        });
        self.cursor.reset();
        self.selected
    }

    /// Moves the grabbed shape so the grab point follows `p`.
    ///
    /// Returns `false` when nothing is grabbed.
    pub fn drag_to(&mut self, p: Vec2) -> bool {
        let Some(drag) = self.dragged else {
            return false;
        };
        self.world.drag_to(drag.index, p + drag.offset).is_ok()
    }

    /// Lets go of the grabbed shape.
    pub fn release(&mut self) {
        self.dragged = None;
    }

    /// Index of the grabbed shape, if any.
    pub fn dragged(&self) -> Option<usize> {
        self.dragged.map(|d| d.index)
    }

    /// `true` while integration is suspended.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pauses or resumes; resuming leaves step-through mode.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if !paused {
            self.cursor.reset();
        }
    }

    /// Enables or disables recording the selected shape's traversal.
    pub fn set_trace_enabled(&mut self, enabled: bool) {
        self.trace_enabled = enabled;
    }

    /// Switches between BVH and brute force.
    pub fn toggle_mode(&mut self) -> BroadPhaseMode {
        self.config.mode = self.config.mode.toggled();
        self.config.mode
    }

    /// Enables or disables the brute-force comparison pass.
    pub fn set_compare(&mut self, compare: bool) {
        self.config.compare_brute_force = compare;
    }

    /// Requests a shape count; clamped to the allowed range.
    pub fn set_target_count(&mut self, count: usize) {
        self.config.target_count = SimConfig::clamp_count(count);
    }

    /// Nudges the speed multiplier by `delta`, clamped. Returns the new value.
    pub fn adjust_speed(&mut self, delta: f32) -> f32 {
        self.config.speed_mult = SimConfig::clamp_speed(self.config.speed_mult + delta);
        self.config.speed_mult
    }

    /// Spawns a random shape at `pos` and keeps it by raising the target count.
    pub fn spawn_at(&mut self, pos: Vec2) -> usize {
        let index = self.world.spawn_at(&mut self.rng, pos);
        self.config.target_count = self.world.len();
        index
    }

    /// Pauses and starts revealing the current tree node by node.
    pub fn start_build_replay(&mut self) {
        self.replay.start();
        self.paused = true;
    }

    /// Single-step while paused: advances the build replay if one is running,
    /// otherwise the traversal cursor of the selected shape.
    pub fn step_forward(&mut self) {
        if !self.paused {
            return;
        }
        if self.replay.is_active() {
            self.replay.advance(self.bvh.len());
        } else if self.selected.is_some() && !self.query_steps.is_empty() {
            self.cursor.advance(self.query_steps.len());
        }
    }

    /// Runs one frame with a wall-clock delta of `dt` seconds.
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        let dt = dt.clamp(0.0, self.config.max_frame_dt);

        self.world.ensure_count(&mut self.rng, self.config.target_count);
        if !self.paused {
            self.world.update(dt, self.config.speed_mult);
        }

        self.world.write_aabbs(&mut self.aabbs);
        self.bvh.build(&self.aabbs);
        let n = self.aabbs.len();

        let (pairs, bound_tests) = match self.config.mode {
            BroadPhaseMode::Bvh => {
                let (pairs, stats) = self.bvh.find_all_pairs_with_stats();
                (pairs, stats.node_tests)
            }
            BroadPhaseMode::BruteForce => {
                (brute_force_pairs(&self.aabbs), n * n.saturating_sub(1) / 2)
            }
        };

        let brute = self
            .config
            .compare_brute_force
            .then(|| brute_force_pairs(&self.aabbs));
        let mismatch = brute.as_ref().is_some_and(|b| *b != pairs);
        if mismatch {
            warn!(
                frame = self.frame,
                broad = pairs.len(),
                brute = brute.as_ref().map_or(0, Vec::len),
                "broad phase disagrees with brute force"
            );
        }

        let shapes = self.world.shapes();
        let (collisions, false_positives): (Vec<_>, Vec<_>) = pairs
            .iter()
            .copied()
            .partition(|&(i, j)| shapes_intersect(&shapes[i], &shapes[j]));

        if self.selected.is_some_and(|i| i >= n) {
            self.selected = None;
            self.cursor.reset();
        }
        if self.dragged.is_some_and(|d| d.index >= n) {
            self.dragged = None;
        }
        self.query_steps = match self.selected {
            Some(i) if self.trace_enabled => self.bvh.query_with_steps(&self.aabbs[i], Some(i)),
            _ => Vec::new(),
        };

        let stats = FrameStats {
            shapes: n,
            bvh_nodes: self.bvh.len(),
            max_depth: self.bvh.max_depth(),
            broad_pairs: pairs.len(),
            bound_tests,
            brute_pairs: brute.as_ref().map(Vec::len),
            narrow_tests: pairs.len(),
            collisions: collisions.len(),
            false_positives: false_positives.len(),
            mismatch,
        };
        debug!(
            frame = self.frame,
            shapes = stats.shapes,
            pairs = stats.broad_pairs,
            collisions = stats.collisions,
            false_positives = stats.false_positives,
            bound_tests = stats.bound_tests,
            "frame"
        );

        let report = FrameReport {
            frame: self.frame,
            stats,
            pairs,
            collisions,
            false_positives,
            query_steps: self.query_steps.clone(),
        };
        self.frame += 1;
        report
    }
}
