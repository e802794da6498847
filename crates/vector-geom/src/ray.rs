//! Segment and ray intersection against [`Aabb`]s.
//!
//! Both shapes use the slab method. A [`Segment`] reports hits as a
//! parameter in `[0, 1]` along `start -> end`; a [`Ray`] reports the hit
//! distance from its origin, bounded by a maximum distance.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::Aabb;

/// Parametric slab test for `origin + dir * t` with `t` in `[t_min, t_max]`.
///
/// Returns the entry parameter, or `t_min` when the origin already lies
/// inside the box.
fn slab(origin: DVec3, dir: DVec3, bounds: &Aabb, t_min: f64, t_max: f64) -> Option<f64> {
    let mut near_t = t_min;
    let mut far_t = t_max;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let lo = bounds.min[axis];
        let hi = bounds.max[axis];

        if d.abs() < f64::EPSILON {
            // Parallel to this slab: must already be between the planes
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (lo - o) * inv;
        let mut t1 = (hi - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        near_t = near_t.max(t0);
        far_t = far_t.min(t1);
        if near_t > far_t {
            return None;
        }
    }

    Some(near_t)
}

/// A finite line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start point
    pub start: DVec3,
    /// End point
    pub end: DVec3,
}

impl Segment {
    /// Create a segment from `start` to `end`.
    #[must_use]
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Point at parameter `t` (0 = start, 1 = end).
    #[must_use]
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.start.lerp(self.end, t)
    }

    /// Extend the segment past its end by `amount` along its direction.
    ///
    /// A degenerate segment is returned unchanged.
    #[must_use]
    pub fn extended(&self, amount: f64) -> Self {
        let dir = (self.end - self.start).normalize_or_zero();
        Self {
            start: self.start,
            end: self.end + dir * amount,
        }
    }

    /// Intersect the segment with a box.
    ///
    /// Returns the parameter of the first point of contact, or `None` if the
    /// segment never touches the box.
    #[must_use]
    pub fn intersect(&self, bounds: &Aabb) -> Option<f64> {
        slab(self.start, self.end - self.start, bounds, 0.0, 1.0)
    }
}

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Origin of the ray
    pub origin: DVec3,
    /// Unit direction
    pub direction: DVec3,
}

impl Ray {
    /// Create a ray. The direction is normalized; a zero direction stays zero.
    #[must_use]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point `distance` units along the ray.
    #[must_use]
    pub fn point_at(&self, distance: f64) -> DVec3 {
        self.origin + self.direction * distance
    }

    /// Intersect the ray with a box, limited to `max_distance`.
    ///
    /// Returns the distance to the first point of contact.
    #[must_use]
    pub fn intersect(&self, bounds: &Aabb, max_distance: f64) -> Option<f64> {
        if self.direction == DVec3::ZERO {
            return bounds.contains(self.origin).then_some(0.0);
        }
        slab(self.origin, self.direction, bounds, 0.0, max_distance)
    }
}
