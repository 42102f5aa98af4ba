// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The set of moving shapes and their integration step.

use broadphase_geom::{Aabb, Vec2};
use rand::Rng;

use crate::error::SimError;
use crate::shape::Shape;
use crate::spawn::{random_shape, random_shape_at};

/// Gap kept between shapes and the world edge when bouncing.
pub const WALL_MARGIN: f32 = 5.0;
/// Angular speed of every shape (radians per second).
pub const SPIN_RATE: f32 = 0.5;

/// Shapes bouncing inside a `width × height` box with the origin at a corner.
#[derive(Debug, Clone)]
pub struct World {
    shapes: Vec<Shape>,
    next_id: u32,
    width: f32,
    height: f32,
}

impl World {
    /// Creates an empty world.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            shapes: Vec::new(),
            next_id: 0,
            width,
            height,
        }
    }

    /// Live shapes; index `i` is the shape index used by the broad phase.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of live shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// `true` when there are no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// World extent as `(width, height)`.
    pub const fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Changes the world extent (e.g. after a window resize). Any size is
    /// accepted; spawning falls back to the centre when a side is too small for
    /// the spawn margin.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Appends a shape, assigning it the next id. Returns its index.
    pub fn push(&mut self, mut shape: Shape) -> usize {
        shape.id = self.take_id();
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Advances every shape by `dt * speed_mult` seconds.
    ///
    /// Shapes move by their velocity, spin at [`SPIN_RATE`], and bounce off the
    /// walls: a shape whose bounds cross the margin is clamped back inside and
    /// its velocity component is pointed away from that wall.
    pub fn update(&mut self, dt: f32, speed_mult: f32) {
        let step = dt * speed_mult;
        let (lo_x, hi_x) = (WALL_MARGIN, self.width - WALL_MARGIN);
        let (lo_y, hi_y) = (WALL_MARGIN, self.height - WALL_MARGIN);

        for s in &mut self.shapes {
            s.pos += s.vel * step;
            s.rotation += SPIN_RATE * step;
            s.update_world_verts();

            let bounds = s.aabb();
            let half_w = bounds.width() * 0.5;
            let half_h = bounds.height() * 0.5;

            if s.pos.x - half_w < lo_x {
                s.pos.x = lo_x + half_w;
                s.vel.x = s.vel.x.abs();
            }
            if s.pos.x + half_w > hi_x {
                s.pos.x = hi_x - half_w;
                s.vel.x = -s.vel.x.abs();
            }
            if s.pos.y - half_h < lo_y {
                s.pos.y = lo_y + half_h;
                s.vel.y = s.vel.y.abs();
            }
            if s.pos.y + half_h > hi_y {
                s.pos.y = hi_y - half_h;
                s.vel.y = -s.vel.y.abs();
            }
            s.update_world_verts();
        }
    }

    /// Spawns a random shape centred at `pos`. Returns its index.
    pub fn spawn_at<R: Rng + ?Sized>(&mut self, rng: &mut R, pos: Vec2) -> usize {
        let id = self.take_id();
        self.shapes.push(random_shape_at(rng, pos, id));
        self.shapes.len() - 1
    }

    /// Removes and returns the shape at `index`; later indices shift down.
    pub fn remove(&mut self, index: usize) -> Result<Shape, SimError> {
        if index >= self.shapes.len() {
            return Err(SimError::ShapeOutOfRange {
                index,
                len: self.shapes.len(),
            });
        }
        Ok(self.shapes.remove(index))
    }

    /// Grows with random shapes or drops the newest until there are `target`.
    pub fn ensure_count<R: Rng + ?Sized>(&mut self, rng: &mut R, target: usize) {
        while self.shapes.len() < target {
            let id = self.take_id();
            self.shapes.push(random_shape(rng, self.width, self.height, id));
        }
        self.shapes.truncate(target);
    }

    /// Index of the first shape containing `p` (picking).
    pub fn shape_at(&self, p: Vec2) -> Option<usize> {
        self.shapes.iter().position(|s| s.contains_point(p))
    }

    /// Moves the shape at `index` so its centre is at `pos`.
    ///
    /// Pointer dragging goes through [`crate::Scene::drag_to`], which keeps the
    /// grab offset so the shape does not jump to the pointer.
    pub fn drag_to(&mut self, index: usize, pos: Vec2) -> Result<(), SimError> {
        let len = self.shapes.len();
        let shape = self
            .shapes
            .get_mut(index)
            .ok_or(SimError::ShapeOutOfRange { index, len })?;
        shape.pos = pos;
        shape.update_world_verts();
        Ok(())
    }

    /// One AABB per shape, index-aligned with [`World::shapes`].
    pub fn aabbs(&self) -> Vec<Aabb> {
        let mut out = Vec::with_capacity(self.shapes.len());
        self.write_aabbs(&mut out);
        out
    }

    /// Refills `out` with the current AABBs, reusing its allocation.
    pub fn write_aabbs(&self, out: &mut Vec<Aabb>) {
        out.clear();
        out.extend(self.shapes.iter().map(Shape::aabb));
    }
}
