// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Randomized checks: the BVH must agree with the brute-force oracle.

use std::collections::BTreeSet;

use broadphase_geom::{brute_force_pairs, trace_candidates, Aabb, Bvh, TraversalAction};
use proptest::prelude::*;

fn arb_aabb() -> impl Strategy<Value = Aabb> {
    (0.0f32..500.0, 0.0f32..300.0, 0.0f32..60.0, 0.0f32..60.0)
        .prop_map(|(x, y, w, h)| Aabb::from_coords(x, y, x + w, y + h))
}

proptest! {
    #[test]
    fn find_all_pairs_matches_brute_force(boxes in prop::collection::vec(arb_aabb(), 0..120)) {
        let mut bvh = Bvh::new();
        bvh.build(&boxes);
        prop_assert_eq!(bvh.find_all_pairs(), brute_force_pairs(&boxes));
    }

    #[test]
    fn query_matches_linear_scan(
        boxes in prop::collection::vec(arb_aabb(), 1..80),
        probe in arb_aabb(),
    ) {
        let mut bvh = Bvh::new();
        bvh.build(&boxes);
        let got: BTreeSet<usize> = bvh.query(&probe, None).into_iter().collect();
        let want: BTreeSet<usize> = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.overlaps(&probe))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn stepped_query_implies_same_candidates(
        boxes in prop::collection::vec(arb_aabb(), 1..80),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut bvh = Bvh::new();
        bvh.build(&boxes);
        let i = pick.index(boxes.len());
        let steps = bvh.query_with_steps(&boxes[i], Some(i));

        let from_trace = trace_candidates(&steps);
        let direct = bvh.query(&boxes[i], Some(i));
        // Both walks share one traversal, so even the order matches.
        prop_assert_eq!(&from_trace, &direct);
        prop_assert!(!direct.contains(&i));

        for step in &steps {
            let node = bvh.node(step.node);
            match step.action {
                TraversalAction::Prune => prop_assert!(!node.bounds.overlaps(&boxes[i])),
                TraversalAction::Visit => prop_assert!(!node.is_leaf()),
                TraversalAction::LeafTest { partner } => {
                    prop_assert!(node.is_leaf());
                    prop_assert_ne!(partner, i);
                }
            }
        }
    }

    #[test]
    fn subtree_size_invariant_holds(boxes in prop::collection::vec(arb_aabb(), 0..100)) {
        let mut bvh = Bvh::new();
        bvh.build(&boxes);
        for node in bvh.nodes() {
            match (node.left(), node.right()) {
                (Some(l), Some(r)) => prop_assert_eq!(
                    node.subtree_size,
                    bvh.node(l).subtree_size + bvh.node(r).subtree_size
                ),
                (None, None) => prop_assert_eq!(node.subtree_size, 1),
                _ => prop_assert!(false, "node with exactly one child"),
            }
        }
    }

    #[test]
    fn overlap_is_symmetric(a in arb_aabb(), b in arb_aabb()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }
}
