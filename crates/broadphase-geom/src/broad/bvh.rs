// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;

use tracing::{debug, instrument};

use crate::broad::trace::{TraversalAction, TraversalStep};
use crate::broad::{canonical_pair, BroadPhase};
use crate::types::aabb::Aabb;

/// Handle to a node in a [`Bvh`] arena.
///
/// Ids are positions in [`Bvh::nodes`]. They are only meaningful for the tree
/// that produced them and only until its next `build`/`clear`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Leaf or internal node payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Wraps exactly one input shape.
    Leaf {
        /// Position of the shape in the slice passed to [`Bvh::build`].
        shape: usize,
    },
    /// Wraps exactly two children.
    Internal {
        /// Child holding the lower half along the split axis.
        left: NodeId,
        /// Child holding the upper half along the split axis.
        right: NodeId,
    },
}

/// One node of the hierarchy.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BvhNode {
    /// Covers every leaf in this node's subtree.
    pub bounds: Aabb,
    /// Leaf/internal payload.
    pub kind: NodeKind,
    /// Distance from the root (root = 0). Only used for display.
    pub depth: usize,
    /// Number of leaves under this node (1 for a leaf).
    pub subtree_size: usize,
}

impl BvhNode {
    /// `true` when the node wraps a shape.
    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Shape index for leaves.
    pub const fn shape_index(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Leaf { shape } => Some(shape),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Left child for internal nodes.
    pub const fn left(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Internal { left, .. } => Some(left),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Right child for internal nodes.
    pub const fn right(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Internal { right, .. } => Some(right),
            NodeKind::Leaf { .. } => None,
        }
    }
}

/// Cost counters for one all-pairs self query.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairQueryStats {
    /// Node-pair bound tests performed (including the ones that pruned).
    pub node_tests: usize,
    /// Overlapping pairs reported.
    pub pairs: usize,
}

/// Bounding-volume hierarchy over a per-frame AABB snapshot.
///
/// The tree is rebuilt from scratch by [`Bvh::build`]; there is no incremental
/// update. Nodes live in a flat arena in pre-order, so the root is always
/// node 0 and a parent precedes its children.
///
/// Construction policy: split along the longer side of the subset's bounds
/// (`width >= height` picks x), sort by centroid on that axis, and cut at the
/// median position. Leaf counts per side stay balanced even for skewed
/// distributions.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    max_depth: usize,
}

impl Bvh {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.max_depth = 0;
    }

    /// Rebuilds the tree from `aabbs`; index `i` becomes the leaf with `shape == i`.
    ///
    /// An empty slice leaves the tree empty.
    #[instrument(level = "trace", skip_all, fields(shapes = aabbs.len()))]
    pub fn build(&mut self, aabbs: &[Aabb]) {
        self.clear();
        if aabbs.is_empty() {
            return;
        }
        let mut indices: Vec<usize> = (0..aabbs.len()).collect();
        self.nodes.reserve(2 * aabbs.len() - 1);
        self.build_recursive(&mut indices, aabbs, 0);
        debug!(
            nodes = self.nodes.len(),
            max_depth = self.max_depth,
            "bvh rebuilt"
        );
    }

    fn build_recursive(&mut self, indices: &mut [usize], aabbs: &[Aabb], depth: usize) -> NodeId {
        self.max_depth = self.max_depth.max(depth);
        let id = NodeId(self.nodes.len());

        // `indices` is never empty: the root gets every shape and each split
        // hands at least one to either side.
        let bounds = indices[1..]
            .iter()
            .fold(aabbs[indices[0]], |acc, &i| acc.merged(&aabbs[i]));

        if let [shape] = *indices {
            self.nodes.push(BvhNode {
                bounds,
                kind: NodeKind::Leaf { shape },
                depth,
                subtree_size: 1,
            });
            return id;
        }

        // Reserve the parent slot first so ids stay in pre-order; the child
        // links are patched in once both subtrees exist.
        self.nodes.push(BvhNode {
            bounds,
            kind: NodeKind::Internal { left: id, right: id },
            depth,
            subtree_size: 0,
        });

        let split_x = bounds.width() >= bounds.height();
        indices.sort_by(|&a, &b| {
            let (ca, cb) = (aabbs[a].center(), aabbs[b].center());
            if split_x {
                ca.x.total_cmp(&cb.x)
            } else {
                ca.y.total_cmp(&cb.y)
            }
        });

        let mid = indices.len() / 2;
        let (lower, upper) = indices.split_at_mut(mid);
        let left = self.build_recursive(lower, aabbs, depth + 1);
        let right = self.build_recursive(upper, aabbs, depth + 1);

        let subtree_size = self.nodes[left.0].subtree_size + self.nodes[right.0].subtree_size;
        let node = &mut self.nodes[id.0];
        node.kind = NodeKind::Internal { left, right };
        node.subtree_size = subtree_size;
        id
    }

    /// Arena view, in pre-order.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Root id, or `None` for an empty tree.
    pub fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId(0))
    }

    /// Depth of the deepest leaf (0 for empty or single-leaf trees).
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no tree has been built.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node.
    ///
    /// `id` must come from this tree since its last rebuild; a stale id may
    /// panic or alias an unrelated node.
    pub fn node(&self, id: NodeId) -> &BvhNode {
        &self.nodes[id.0]
    }

    /// Fallible lookup for ids of uncertain provenance.
    pub fn get(&self, id: NodeId) -> Option<&BvhNode> {
        self.nodes.get(id.0)
    }

    /// Every overlapping leaf pair exactly once as `(low, high)`, ascending.
    pub fn find_all_pairs(&self) -> Vec<(usize, usize)> {
        self.find_all_pairs_with_stats().0
    }

    /// [`Bvh::find_all_pairs`] plus the number of bound tests it took.
    pub fn find_all_pairs_with_stats(&self) -> (Vec<(usize, usize)>, PairQueryStats) {
        let mut sink = PairSink::default();
        if let Some(root) = self.root() {
            self.self_query(root, root, &mut sink);
        }
        sink.pairs.sort_unstable();
        let stats = PairQueryStats {
            node_tests: sink.node_tests,
            pairs: sink.pairs.len(),
        };
        (sink.pairs, stats)
    }

    /// Dual-tree descent: enumerates leaf pairs between the subtrees at `a` and `b`.
    ///
    /// With `a == b` every unordered pair inside that subtree is produced once.
    fn self_query(&self, a: NodeId, b: NodeId, sink: &mut PairSink) {
        let na = self.node(a);
        let nb = self.node(b);
        sink.node_tests += 1;
        // Disjoint bounds rule out every pair below these two nodes.
        if !na.bounds.overlaps(&nb.bounds) {
            return;
        }

        match (na.kind, nb.kind) {
            (NodeKind::Leaf { shape: si }, NodeKind::Leaf { shape: sj }) => {
                if si != sj {
                    sink.pairs.push(canonical_pair(si, sj));
                }
            }
            (NodeKind::Internal { left, right }, NodeKind::Internal { .. }) if a == b => {
                self.self_query(left, left, sink);
                self.self_query(right, right, sink);
                self.self_query(left, right, sink);
            }
            (NodeKind::Leaf { .. }, NodeKind::Internal { left, right }) => {
                self.self_query(a, left, sink);
                self.self_query(a, right, sink);
            }
            (NodeKind::Internal { left, right }, NodeKind::Leaf { .. }) => {
                self.self_query(left, b, sink);
                self.self_query(right, b, sink);
            }
            (
                NodeKind::Internal { left: al, right: ar },
                NodeKind::Internal { left: bl, right: br },
            ) => {
                // Split the bigger subtree; the other side is carried unchanged.
                if na.subtree_size >= nb.subtree_size {
                    self.self_query(al, b, sink);
                    self.self_query(ar, b, sink);
                } else {
                    self.self_query(a, bl, sink);
                    self.self_query(a, br, sink);
                }
            }
        }
    }

    /// Shapes whose boxes overlap `query`, skipping `exclude`.
    ///
    /// Results come in traversal order; callers must not rely on it.
    pub fn query(&self, query: &Aabb, exclude: Option<usize>) -> Vec<usize> {
        let mut out = Vec::new();
        self.walk(query, |_, node, hit| {
            if let (true, Some(shape)) = (hit, node.shape_index()) {
                if Some(shape) != exclude {
                    out.push(shape);
                }
            }
        });
        out
    }

    /// Runs the [`Bvh::query`] traversal and records every decision.
    ///
    /// Emits `Prune` for each node missing `query`, `Visit` for each internal
    /// node entered, and `LeafTest` for each overlapping leaf other than
    /// `query_index`.
    pub fn query_with_steps(&self, query: &Aabb, query_index: Option<usize>) -> Vec<TraversalStep> {
        let mut steps = Vec::new();
        self.walk(query, |id, node, hit| {
            let action = match (hit, node.kind) {
                (false, _) => TraversalAction::Prune,
                (true, NodeKind::Internal { .. }) => TraversalAction::Visit,
                (true, NodeKind::Leaf { shape }) if Some(shape) == query_index => return,
                (true, NodeKind::Leaf { shape }) => TraversalAction::LeafTest { partner: shape },
            };
            steps.push(TraversalStep {
                node: id,
                action,
                query_shape: query_index,
            });
        });
        steps
    }

    /// Explicit-stack DFS shared by both single-box queries.
    ///
    /// `visit` sees every popped node with whether its bounds overlap `query`;
    /// only overlapping internal nodes have their children queued (right first,
    /// so the left subtree is explored first).
    fn walk<F>(&self, query: &Aabb, mut visit: F)
    where
        F: FnMut(NodeId, &BvhNode, bool),
    {
        let Some(root) = self.root() else {
            return;
        };
        let mut stack = Vec::with_capacity(2 * self.max_depth + 2);
        stack.push(root);
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            let hit = node.bounds.overlaps(query);
            visit(id, node, hit);
            if let (true, NodeKind::Internal { left, right }) = (hit, node.kind) {
                stack.push(right);
                stack.push(left);
            }
        }
    }
}

#[derive(Default)]
struct PairSink {
    pairs: Vec<(usize, usize)>,
    node_tests: usize,
}

impl BroadPhase for Bvh {
    fn rebuild(&mut self, aabbs: &[Aabb]) {
        self.build(aabbs);
    }

    fn pairs(&self) -> Vec<(usize, usize)> {
        self.find_all_pairs()
    }
}
