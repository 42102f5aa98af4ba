// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Random shape generation driven by a caller-supplied RNG.
//!
//! There is no ambient RNG: the scene owns a seeded generator and passes it
//! in, so a seed reproduces the same world.

use core::f32::consts::TAU;

use broadphase_geom::Vec2;
use rand::Rng;

use crate::shape::Shape;

/// Distance from the world edge inside which shapes are never spawned.
pub const SPAWN_MARGIN: f32 = 60.0;

/// Creates a random circle, triangle, or 4–7 sided polygon with a random
/// pastel colour and a speed of 30–120 units/s in a random direction.
///
/// The position is uniform inside `[SPAWN_MARGIN, extent - SPAWN_MARGIN]` on
/// each axis. An axis no longer than `2 * SPAWN_MARGIN` spawns at its centre.
pub fn random_shape<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32, id: u32) -> Shape {
    let pos = Vec2::new(spawn_coord(rng, width), spawn_coord(rng, height));
    random_shape_at(rng, pos, id)
}

fn spawn_coord<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    if extent > 2.0 * SPAWN_MARGIN {
        rng.gen_range(SPAWN_MARGIN..=extent - SPAWN_MARGIN)
    } else {
        extent * 0.5
    }
}

/// Like [`random_shape`] but at a fixed position.
pub fn random_shape_at<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, id: u32) -> Shape {
    let speed = rng.gen_range(30.0..=120.0f32);
    let heading = rng.gen_range(0.0..TAU);
    let vel = Vec2::new(speed * heading.cos(), speed * heading.sin());
    let color = [
        rng.gen_range(0.4..=0.9f32),
        rng.gen_range(0.4..=0.9f32),
        rng.gen_range(0.4..=0.9f32),
    ];

    match rng.gen_range(0..3u8) {
        0 => Shape::circle(id, pos, rng.gen_range(12.0..=30.0), vel, color),
        1 => Shape::triangle(id, pos, rng.gen_range(15.0..=30.0), vel, color),
        _ => {
            let sides = rng.gen_range(4..=7usize);
            Shape::regular_polygon(id, pos, rng.gen_range(15.0..=28.0), sides, vel, color)
        }
    }
}
