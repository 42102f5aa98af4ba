// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Broad-phase interfaces, the BVH, and the brute-force baseline.
//!
//! Determinism contract (applies to all implementations used here):
//! - Pair identity is canonicalized as `(min_index, max_index)`.
//! - The emitted pair list is strictly sorted lexicographically by that tuple.
//! - Overlap is inclusive on edges (touching AABBs are considered overlapping).
//!
//! Both strategies are rebuilt from a full AABB snapshot every frame; there is
//! no incremental insert/remove.

use crate::types::aabb::Aabb;

#[doc = "Exhaustive `O(n^2)` pairing used as oracle and fallback strategy."]
pub mod brute;
#[doc = "Median-split bounding-volume hierarchy."]
pub mod bvh;
#[doc = "Traversal records emitted by the instrumented query."]
pub mod trace;

/// Broad-phase interface: rebuild from a snapshot, then list candidate pairs.
///
/// Implementations must return pairs deterministically: the pair `(a, b)` is
/// canonicalized such that `a < b`, and the full list is sorted ascending by
/// `(a, b)`. Indices refer to positions in the slice given to `rebuild`.
pub trait BroadPhase {
    /// Replaces any previous state with the given per-shape boxes.
    fn rebuild(&mut self, aabbs: &[Aabb]);
    /// Returns a canonical, deterministically-ordered list of overlapping pairs.
    fn pairs(&self) -> Vec<(usize, usize)>;
}

/// Orders a pair as `(low, high)`.
pub(crate) fn canonical_pair(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
