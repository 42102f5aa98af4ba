// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::broad::bvh::NodeId;

/// Decision taken at one node during an instrumented query.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "action", rename_all = "snake_case")
)]
pub enum TraversalAction {
    /// Internal node whose bounds overlap the query; both children are queued.
    Visit,
    /// Node whose bounds miss the query; its subtree is skipped.
    Prune,
    /// Overlapping leaf compared against the query shape.
    LeafTest {
        /// Shape index stored in the leaf.
        partner: usize,
    },
}

/// One record in the trail produced by [`crate::Bvh::query_with_steps`].
///
/// Steps are a pure trace artifact: they reference nodes of the tree that
/// produced them and are meaningless after the next rebuild.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraversalStep {
    /// Node the decision was made at.
    pub node: NodeId,
    /// What happened there.
    pub action: TraversalAction,
    /// Shape the query box belongs to, if any.
    pub query_shape: Option<usize>,
}

impl TraversalStep {
    /// Partner shape for `LeafTest` steps, `None` otherwise.
    pub const fn partner_shape(&self) -> Option<usize> {
        match self.action {
            TraversalAction::LeafTest { partner } => Some(partner),
            TraversalAction::Visit | TraversalAction::Prune => None,
        }
    }

    /// `true` for `Prune` steps.
    pub const fn is_prune(&self) -> bool {
        matches!(self.action, TraversalAction::Prune)
    }
}

/// Collects the candidate shapes implied by the `LeafTest` steps of a trace.
///
/// For a trace from `query_with_steps(box, Some(i))` this is the same set as
/// `query(box, Some(i))`, in traversal order.
pub fn trace_candidates(steps: &[TraversalStep]) -> Vec<usize> {
    steps.iter().filter_map(TraversalStep::partner_shape).collect()
}

/// Per-action tallies of a trace.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceCounts {
    /// Internal nodes entered.
    pub visits: usize,
    /// Subtrees skipped.
    pub prunes: usize,
    /// Leaves compared.
    pub leaf_tests: usize,
}

impl TraceCounts {
    /// Tallies the actions in `steps`.
    pub fn of(steps: &[TraversalStep]) -> Self {
        steps.iter().fold(Self::default(), |mut acc, step| {
            match step.action {
                TraversalAction::Visit => acc.visits += 1,
                TraversalAction::Prune => acc.prunes += 1,
                TraversalAction::LeafTest { .. } => acc.leaf_tests += 1,
            }
            acc
        })
    }
}
