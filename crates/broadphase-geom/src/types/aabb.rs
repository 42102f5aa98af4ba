// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::types::vec2::Vec2;

/// Axis-aligned bounding box in world coordinates.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Inverted boxes are a caller error; they are checked in debug builds only.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Aabb {
    /// Constructs an AABB from its minimum and maximum corners.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y, "invalid AABB: min > max");
        Self { min, max }
    }

    /// Constructs an AABB from raw corner coordinates.
    pub fn from_coords(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    /// Builds an AABB centered at `center` with half-extents `hx, hy`.
    pub fn from_center_half_extents(center: Vec2, hx: f32, hy: f32) -> Self {
        let he = Vec2::new(hx, hy);
        Self::new(center - he, center + he)
    }

    /// Builds the minimal AABB that contains all `points`, or `None` when empty.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    /// Returns the minimum corner.
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Returns the maximum corner.
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Extent along x.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Extent along y.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Width times height.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Returns `true` if this AABB overlaps another (inclusive on edges).
    pub fn overlaps(&self, other: &Self) -> bool {
        // Touching edges count so contacts do not flicker in and out of the pair set.
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns the smallest AABB containing both boxes.
    pub fn merged(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grows every side by `margin`.
    pub fn expanded(&self, margin: f32) -> Self {
        let delta = Vec2::new(margin, margin);
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }
}
