//! Shared 2D geometry helpers.
//!
//! Collision in the simulation is built from two primitives: axis-aligned
//! boxes for broad-phase overlap tests and exact segment intersection for
//! the swept projectile-vs-hull narrow phase.

use glam::Vec2;

/// Intersections closer to parallel than this are rejected.
const PARALLEL_EPS: f32 = 1e-6;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` with full extents `size`.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing both points.
    pub fn enclosing(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Grows the box by `amount` on every side.
    pub fn inflate(self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Overlap test. Boxes that merely touch along an edge count as
    /// overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Intersection point of segments `a1`-`a2` and `b1`-`b2`, if any.
///
/// Lines are intersected in homogeneous coordinates and the hit is then
/// checked against both segments' extents. Endpoint grazes count as hits;
/// near-parallel segments never intersect.
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let la = a1.extend(1.0).cross(a2.extend(1.0));
    let lb = b1.extend(1.0).cross(b2.extend(1.0));
    let p = la.cross(lb);
    if p.z.abs() < PARALLEL_EPS {
        return None;
    }
    let hit = Vec2::new(p.x / p.z, p.y / p.z);
    if outside_segment(hit, a1, a2) || outside_segment(hit, b1, b2) {
        return None;
    }
    Some(hit)
}

/// True when `p` lies on the line through `e1`-`e2` but beyond either end.
fn outside_segment(p: Vec2, e1: Vec2, e2: Vec2) -> bool {
    (e1 - p).dot(e2 - p) > 0.0
}
