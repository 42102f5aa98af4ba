// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::broad::BroadPhase;
use crate::types::aabb::Aabb;

/// Returns every pair `(i, j)` with `i < j` whose AABBs overlap, ascending.
///
/// This is the correctness oracle for [`crate::Bvh::find_all_pairs`]: for the
/// same input both must produce the same pair set.
pub fn brute_force_pairs(aabbs: &[Aabb]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for (i, a) in aabbs.iter().enumerate() {
        for (offset, b) in aabbs[i + 1..].iter().enumerate() {
            if a.overlaps(b) {
                out.push((i, i + 1 + offset)); // canonical since i < j
            }
        }
    }
    out
}

/// The `O(n^2)` all-pairs sweep packaged as a [`BroadPhase`] strategy.
///
/// Why this exists:
/// - Serves as a correctness baseline for the BVH (canonical pair identity and
///   ordering, inclusive edge overlap).
/// - Lets the demo switch strategies at runtime to compare cost.
///
/// Complexity notes:
/// - Any broad phase degenerates to `O(n^2)` when all proxies overlap (k≈n²).
///   The BVH only wins when the true overlap count `k` is small.
#[derive(Debug, Default, Clone)]
pub struct BruteForce {
    items: Vec<Aabb>,
}

impl BruteForce {
    /// Creates an empty strategy.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of boxes in the current snapshot.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when no boxes are held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl BroadPhase for BruteForce {
    fn rebuild(&mut self, aabbs: &[Aabb]) {
        self.items.clear();
        self.items.extend_from_slice(aabbs);
    }

    fn pairs(&self) -> Vec<(usize, usize)> {
        brute_force_pairs(&self.items)
    }
}
