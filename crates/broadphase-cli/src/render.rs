// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Table rendering for CLI output.

use broadphase_geom::{Aabb, Bvh, NodeKind, TraversalAction, TraversalStep};
use broadphase_sim::{BroadPhaseMode, FrameStats};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;

/// Totals over a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub mode: BroadPhaseMode,
    pub shapes: usize,
    pub max_depth: usize,
    pub broad_pairs: usize,
    pub bound_tests: usize,
    pub naive_tests: usize,
    pub collisions: usize,
    pub false_positives: usize,
    pub mismatches: u64,
}

impl RunSummary {
    pub const fn new(mode: BroadPhaseMode) -> Self {
        Self {
            frames: 0,
            mode,
            shapes: 0,
            max_depth: 0,
            broad_pairs: 0,
            bound_tests: 0,
            naive_tests: 0,
            collisions: 0,
            false_positives: 0,
            mismatches: 0,
        }
    }

    pub fn record(&mut self, stats: &FrameStats) {
        self.frames += 1;
        self.shapes = stats.shapes;
        self.max_depth = self.max_depth.max(stats.max_depth);
        self.broad_pairs += stats.broad_pairs;
        self.bound_tests += stats.bound_tests;
        self.naive_tests += stats.shapes * stats.shapes.saturating_sub(1) / 2;
        self.collisions += stats.collisions;
        self.false_positives += stats.false_positives;
        if stats.mismatch {
            self.mismatches += 1;
        }
    }

    fn per_frame(&self, total: usize) -> String {
        if self.frames == 0 {
            return "0".into();
        }
        format!("{:.1}", total as f64 / self.frames as f64)
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn summary_table(summary: &RunSummary) -> Table {
    let mode = match summary.mode {
        BroadPhaseMode::Bvh => "bvh",
        BroadPhaseMode::BruteForce => "brute-force",
    };
    let mut table = new_table();
    table.set_header(vec!["metric", "value"]);
    table.add_row(vec![Cell::new("frames"), Cell::new(summary.frames)]);
    table.add_row(vec![Cell::new("mode"), Cell::new(mode)]);
    table.add_row(vec![Cell::new("shapes"), Cell::new(summary.shapes)]);
    table.add_row(vec![Cell::new("max depth"), Cell::new(summary.max_depth)]);
    table.add_row(vec![
        Cell::new("candidate pairs / frame"),
        Cell::new(summary.per_frame(summary.broad_pairs)),
    ]);
    table.add_row(vec![
        Cell::new("bound tests / frame"),
        Cell::new(summary.per_frame(summary.bound_tests)),
    ]);
    table.add_row(vec![
        Cell::new("naive tests / frame"),
        Cell::new(summary.per_frame(summary.naive_tests)),
    ]);
    table.add_row(vec![Cell::new("collisions"), Cell::new(summary.collisions)]);
    table.add_row(vec![
        Cell::new("false positives"),
        Cell::new(summary.false_positives),
    ]);
    table.add_row(vec![Cell::new("mismatches"), Cell::new(summary.mismatches)]);
    table
}

pub fn trace_table(steps: &[TraversalStep]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["step", "node", "action", "partner"]);
    for (i, step) in steps.iter().enumerate() {
        let (action, partner) = match step.action {
            TraversalAction::Visit => ("visit", String::new()),
            TraversalAction::Prune => ("prune", String::new()),
            TraversalAction::LeafTest { partner } => ("leaf test", partner.to_string()),
        };
        table.add_row(vec![
            Cell::new(i),
            Cell::new(step.node),
            Cell::new(action),
            Cell::new(partner),
        ]);
    }
    table
}

fn fmt_bounds(b: &Aabb) -> String {
    let (lo, hi) = (b.min(), b.max());
    format!("({:.1}, {:.1})..({:.1}, {:.1})", lo.x, lo.y, hi.x, hi.y)
}

pub fn tree_table(bvh: &Bvh) -> Table {
    let mut table = new_table();
    table.set_header(vec!["node", "depth", "size", "bounds", "contents"]);
    for (i, node) in bvh.nodes().iter().enumerate() {
        let contents = match node.kind {
            NodeKind::Leaf { shape } => format!("shape {shape}"),
            NodeKind::Internal { left, right } => format!("{left} {right}"),
        };
        table.add_row(vec![
            Cell::new(format!("#{i}")),
            Cell::new(node.depth),
            Cell::new(node.subtree_size),
            Cell::new(fmt_bounds(&node.bounds)),
            Cell::new(contents),
        ]);
    }
    table
}
