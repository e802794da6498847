//! # Vector Geometry
//!
//! Geometry primitives used by the Vector plugin core for line-of-sight work
//! in a unit-grid voxel world.
//!
//! - [`Aabb`]: axis-aligned bounding boxes with per-axis expansion
//! - [`Segment`] / [`Ray`]: slab intersection against boxes
//! - [`voxel`]: grid traversal for block ray tracing with hit-face reporting
//!
//! ## Quick Start
//!
//! ```
//! use glam::DVec3;
//! use vector_geom::{Aabb, Segment};
//!
//! // A 0.6 x 1.8 entity standing at (10, 64, 0)
//! let bounds = Aabb::from_feet(DVec3::new(10.0, 64.0, 0.0), 0.6, 1.8);
//!
//! // Looking straight at it from 10 blocks away
//! let sight = Segment::new(DVec3::new(0.0, 65.0, 0.0), DVec3::new(20.0, 65.0, 0.0));
//! assert!(sight.intersect(&bounds).is_some());
//!
//! // Doubling the box still hits, and a miss far above stays a miss
//! let above = Segment::new(DVec3::new(0.0, 80.0, 0.0), DVec3::new(20.0, 80.0, 0.0));
//! assert!(above.intersect(&bounds.scaled(2.0)).is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ray;
pub mod voxel;

pub use ray::{Ray, Segment};
pub use voxel::{BlockFace, BlockHit, BlockPos};

use glam::DVec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Aabb {
    /// Create bounds from min/max corners.
    ///
    /// Corners are reordered per axis, so callers may pass them in any order.
    #[must_use]
    pub fn from_min_max(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create the box of an entity standing at `feet`.
    ///
    /// The box is centered on `feet` in X and Z and extends `height` upwards.
    #[must_use]
    pub fn from_feet(feet: DVec3, width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Self {
            min: DVec3::new(feet.x - half, feet.y, feet.z - half),
            max: DVec3::new(feet.x + half, feet.y + height, feet.z + half),
        }
    }

    /// Get the center of the bounds.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the bounds.
    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Check if a point is inside the bounds.
    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Grow the box by `amount` on both sides of each axis.
    ///
    /// Negative components shrink the box; an axis never inverts, it
    /// collapses onto its center instead.
    #[must_use]
    pub fn expand(&self, amount: DVec3) -> Self {
        let min = self.min - amount;
        let max = self.max + amount;
        let center = self.center();
        Self {
            min: min.min(center),
            max: max.max(center),
        }
    }

    /// Scale the box about its center so each extent becomes `factor` times
    /// larger.
    ///
    /// Each side moves out by `(factor - 1) / 2` of the axis extent, which is
    /// how hit boxes are enlarged for entity picking.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        self.expand(self.size() * ((factor - 1.0) / 2.0))
    }

    /// Translate the box by `offset`.
    #[must_use]
    pub fn translate(&self, offset: DVec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::from_min_max(DVec3::ZERO, DVec3::ONE)
    }
}
