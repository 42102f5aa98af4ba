// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulation layer of the BroadPhase demo.
//!
//! A [`Scene`] owns a [`World`] of moving circles and polygons, rebuilds a
//! [`broadphase_geom::Bvh`] from their boxes every frame, runs the selected
//! broad phase, confirms candidates with a SAT narrow phase, and records the
//! traversal of the selected shape for step-through display.
//!
//! Randomness only enters through the seeded generator owned by the scene.

pub mod config;
pub mod error;
pub mod narrow;
pub mod scene;
pub mod shape;
pub mod spawn;
pub mod stepper;
pub mod world;

pub use config::{BroadPhaseMode, SimConfig};
pub use error::SimError;
pub use narrow::shapes_intersect;
pub use scene::{FrameReport, FrameStats, Scene};
pub use shape::{Geometry, Shape, ShapeKind};
pub use stepper::{BuildReplay, StepCursor};
pub use world::World;
