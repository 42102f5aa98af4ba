// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Exact intersection tests (separating axis theorem) for broad-phase candidates.
//!
//! All interval checks are closed, so touching shapes intersect.

use broadphase_geom::Vec2;

use crate::shape::{Geometry, Shape};

/// Returns `true` if the two shapes intersect.
pub fn shapes_intersect(a: &Shape, b: &Shape) -> bool {
    match (&a.geometry, &b.geometry) {
        (Geometry::Circle { radius: ra }, Geometry::Circle { radius: rb }) => {
            let r = ra + rb;
            (a.pos - b.pos).length_squared() <= r * r
        }
        (Geometry::Circle { radius }, Geometry::Polygon { world, .. }) => {
            circle_vs_polygon(a.pos, *radius, world)
        }
        (Geometry::Polygon { world, .. }, Geometry::Circle { radius }) => {
            circle_vs_polygon(b.pos, *radius, world)
        }
        (Geometry::Polygon { world: va, .. }, Geometry::Polygon { world: vb, .. }) => {
            polygon_vs_polygon(va, vb)
        }
    }
}

#[derive(Clone, Copy)]
struct Interval {
    lo: f32,
    hi: f32,
}

impl Interval {
    fn overlaps(self, other: Self) -> bool {
        self.lo <= other.hi && other.lo <= self.hi
    }
}

fn project_circle(center: Vec2, radius: f32, axis: Vec2) -> Interval {
    let d = center.dot(axis);
    Interval {
        lo: d - radius,
        hi: d + radius,
    }
}

fn project_polygon(verts: &[Vec2], axis: Vec2) -> Interval {
    verts.iter().fold(
        Interval {
            lo: f32::INFINITY,
            hi: f32::NEG_INFINITY,
        },
        |acc, v| {
            let d = v.dot(axis);
            Interval {
                lo: acc.lo.min(d),
                hi: acc.hi.max(d),
            }
        },
    )
}

/// Unit normals of every polygon edge.
fn edge_normals(verts: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = verts.len();
    (0..n).map(move |i| (verts[(i + 1) % n] - verts[i]).perp().normalize())
}

fn polygon_vs_polygon(va: &[Vec2], vb: &[Vec2]) -> bool {
    edge_normals(va)
        .chain(edge_normals(vb))
        .all(|axis| project_polygon(va, axis).overlaps(project_polygon(vb, axis)))
}

fn circle_vs_polygon(center: Vec2, radius: f32, verts: &[Vec2]) -> bool {
    let Some(closest) = verts
        .iter()
        .copied()
        .min_by(|x, y| (*x - center).length_squared().total_cmp(&(*y - center).length_squared()))
    else {
        return false;
    };

    // Axis towards the nearest vertex covers the vertex-region case; edge
    // normals cover the rest.
    let vertex_axis = (closest - center).normalize();
    core::iter::once(vertex_axis)
        .chain(edge_normals(verts))
        .all(|axis| project_circle(center, radius, axis).overlaps(project_polygon(verts, axis)))
}
