// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by the broad phase (vector, AABB).
//!
//! Determinism notes:
//! - Overlap semantics are inclusive on edges to avoid pair churn on contact
//!   boundaries.
//! - Arithmetic uses plain `f32` without fused multiply-add.

#[doc = "Axis-aligned bounding boxes (world space)."]
pub mod aabb;
#[doc = "Two-component float vectors."]
pub mod vec2;
