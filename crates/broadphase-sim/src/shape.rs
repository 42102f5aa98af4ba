// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Moving 2D shapes: circles and regular polygons.

use core::f32::consts::{FRAC_PI_2, TAU};

use broadphase_geom::{Aabb, Vec2};
use serde::{Deserialize, Serialize};

/// Display category of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Disc.
    Circle,
    /// Three-vertex polygon.
    Triangle,
    /// Polygon with four or more vertices.
    Polygon,
}

/// Geometry of a shape relative to its position.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Disc of `radius` around the position.
    Circle {
        /// Radius in world units.
        radius: f32,
    },
    /// Convex polygon.
    Polygon {
        /// Vertices relative to the position, before rotation.
        local: Vec<Vec2>,
        /// Cached world-space vertices (rotation then translation).
        world: Vec<Vec2>,
    },
}

/// One simulated body.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Stable identifier assigned at spawn.
    pub id: u32,
    /// Centre position.
    pub pos: Vec2,
    /// Velocity in units per second.
    pub vel: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// RGB fill colour in `[0, 1]`.
    pub color: [f32; 3],
    /// Circle or polygon geometry.
    pub geometry: Geometry,
}

impl Shape {
    /// Creates a circle.
    pub fn circle(id: u32, pos: Vec2, radius: f32, vel: Vec2, color: [f32; 3]) -> Self {
        Self {
            id,
            pos,
            vel,
            rotation: 0.0,
            color,
            geometry: Geometry::Circle { radius },
        }
    }

    /// Creates an equilateral triangle with circumradius `size`.
    pub fn triangle(id: u32, pos: Vec2, size: f32, vel: Vec2, color: [f32; 3]) -> Self {
        Self::regular_polygon(id, pos, size, 3, vel, color)
    }

    /// Creates a regular polygon with `sides` vertices on a circle of radius
    /// `size`, the first vertex pointing down (angle −π/2).
    pub fn regular_polygon(
        id: u32,
        pos: Vec2,
        size: f32,
        sides: usize,
        vel: Vec2,
        color: [f32; 3],
    ) -> Self {
        let local: Vec<Vec2> = (0..sides)
            .map(|i| {
                let angle = i as f32 * TAU / sides as f32 - FRAC_PI_2;
                Vec2::new(size * angle.cos(), size * angle.sin())
            })
            .collect();
        let mut shape = Self {
            id,
            pos,
            vel,
            rotation: 0.0,
            color,
            geometry: Geometry::Polygon {
                world: Vec::with_capacity(local.len()),
                local,
            },
        };
        shape.update_world_verts();
        shape
    }

    /// Display category.
    pub fn kind(&self) -> ShapeKind {
        match &self.geometry {
            Geometry::Circle { .. } => ShapeKind::Circle,
            Geometry::Polygon { local, .. } if local.len() == 3 => ShapeKind::Triangle,
            Geometry::Polygon { .. } => ShapeKind::Polygon,
        }
    }

    /// Recomputes cached world vertices from position and rotation.
    pub fn update_world_verts(&mut self) {
        let (s, c) = self.rotation.sin_cos();
        let pos = self.pos;
        if let Geometry::Polygon { local, world } = &mut self.geometry {
            world.clear();
            world.extend(
                local
                    .iter()
                    .map(|v| Vec2::new(pos.x + v.x * c - v.y * s, pos.y + v.x * s + v.y * c)),
            );
        }
    }

    /// World-space vertices (empty for circles).
    pub fn world_verts(&self) -> &[Vec2] {
        match &self.geometry {
            Geometry::Circle { .. } => &[],
            Geometry::Polygon { world, .. } => world,
        }
    }

    /// Tight axis-aligned bounds of the shape in world space.
    pub fn aabb(&self) -> Aabb {
        match &self.geometry {
            Geometry::Circle { radius } => {
                Aabb::from_center_half_extents(self.pos, *radius, *radius)
            }
            Geometry::Polygon { world, .. } => {
                Aabb::from_points(world).unwrap_or_else(|| Aabb::new(self.pos, self.pos))
            }
        }
    }

    /// `true` if `p` is inside the shape (boundary included for circles).
    pub fn contains_point(&self, p: Vec2) -> bool {
        match &self.geometry {
            Geometry::Circle { radius } => (p - self.pos).length_squared() <= radius * radius,
            Geometry::Polygon { world, .. } => point_in_polygon(world, p),
        }
    }
}

/// Even-odd crossing test.
fn point_in_polygon(verts: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = verts.len().wrapping_sub(1);
    for (i, vi) in verts.iter().enumerate() {
        let vj = verts[j];
        if (vi.y > p.y) != (vj.y > p.y) && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
