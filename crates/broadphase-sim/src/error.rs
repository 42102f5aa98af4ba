// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for world and scene operations.

use thiserror::Error;

/// Errors emitted by the simulation layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A shape index did not name a live shape.
    #[error("shape index {index} out of range (world has {len} shapes)")]
    ShapeOutOfRange {
        /// Requested index.
        index: usize,
        /// Current shape count.
        len: usize,
    },
    /// A configuration value is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
