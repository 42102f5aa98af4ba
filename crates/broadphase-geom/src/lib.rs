// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives and broad-phase acceleration for the BroadPhase demo.

This crate provides:
- A small 2D vector type (`Vec2`).
- Axis-aligned bounding boxes (`Aabb`).
- A bounding-volume hierarchy (`Bvh`) rebuilt from scratch every frame, with
  an all-pairs self query, a single-box query, and an instrumented query that
  records each traversal decision (`TraversalStep`).
- An `O(n^2)` reference (`brute_force_pairs`) and a `BroadPhase` trait so the
  two strategies are interchangeable.

Design notes:
- Deterministic: no ambient RNG; pair outputs are canonical `(low, high)` and
  sorted ascending.
- Float32 throughout; overlap is inclusive on edges.
- The tree is an arena of nodes addressed by `NodeId`; ids are only valid
  until the next `build`/`clear`.
"]

/// Broad-phase structures: BVH, brute force, traversal traces.
pub mod broad;
/// Foundational geometric types.
pub mod types;

pub use broad::brute::{brute_force_pairs, BruteForce};
pub use broad::bvh::{Bvh, BvhNode, NodeId, NodeKind, PairQueryStats};
pub use broad::trace::{trace_candidates, TraceCounts, TraversalAction, TraversalStep};
pub use broad::BroadPhase;
pub use types::aabb::Aabb;
pub use types::vec2::Vec2;
