// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Step-through state for replaying a traversal trace or a BVH build.

/// Cursor over a sequence of recorded items, advanced one item per key press.
///
/// Starts before the first item. Advancing past the end stays on the last
/// item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepCursor {
    position: Option<usize>,
}

impl StepCursor {
    /// Creates a cursor before the first item.
    pub const fn new() -> Self {
        Self { position: None }
    }

    /// Moves to the next item of a sequence of length `len`.
    ///
    /// Returns the new position, or `None` when the sequence is empty.
    pub fn advance(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            self.position = None;
            return None;
        }
        let next = self.position.map_or(0, |p| (p + 1).min(len - 1));
        self.position = Some(next);
        self.position
    }

    /// Returns to the "nothing shown yet" state.
    pub fn reset(&mut self) {
        self.position = None;
    }

    /// Current position, if any step has been taken.
    pub const fn position(&self) -> Option<usize> {
        self.position
    }

    /// Item under the cursor.
    pub fn current<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        self.position.and_then(|p| items.get(p))
    }

    /// Items revealed so far (up to and including the current one).
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        match self.position {
            Some(p) => &items[..(p + 1).min(items.len())],
            None => &[],
        }
    }
}

/// Reveals the nodes of a freshly built BVH one at a time, in arena
/// (pre-order) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReplay {
    revealed: usize,
    active: bool,
}

impl BuildReplay {
    /// Starts a replay with nothing revealed.
    pub fn start(&mut self) {
        self.revealed = 0;
        self.active = true;
    }

    /// Reveals one more node of a tree with `node_count` nodes; the replay
    /// stops once every node is shown.
    pub fn advance(&mut self, node_count: usize) {
        if !self.active {
            return;
        }
        self.revealed += 1;
        if self.revealed >= node_count {
            self.revealed = node_count;
            self.active = false;
        }
    }

    /// `true` while the replay is running.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Number of arena nodes to draw.
    pub const fn revealed(&self) -> usize {
        self.revealed
    }
}
