//! Ray-trace backends.
//!
//! Hosts before 1.13 only offer a segment-based block trace that stops on
//! any non-air block, and entity boxes are tested against the segment from
//! the eye to the aim point. Later hosts trace a direction with a maximum
//! distance and let passable blocks and fluids through.
//!
//! The backend is chosen once, when the plugin is enabled, from the host
//! version string:
//!
//! ```
//! use vector_core::raytrace::{HostVersion, RayBackend};
//!
//! assert_eq!(RayBackend::for_version("1.12.2-R0.1-SNAPSHOT"), RayBackend::Legacy);
//! assert_eq!(RayBackend::for_version("git-Paper-196 (MC: 1.15.2)"), RayBackend::Modern);
//! assert_eq!(HostVersion::parse("v1_15_R1"), Some(HostVersion::new(1, 15, 0)));
//! ```

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use vector_geom::voxel::traverse;
use vector_geom::{Aabb, BlockHit, Ray, Segment};

use crate::entity::WorldId;
use crate::world_view::{BlockKind, WorldView};

// =============================================================================
// RayTracer
// =============================================================================

/// Block and entity ray tracing against a host world.
pub trait RayTracer: fmt::Debug + Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// First block along `direction` from `eye` within `max_distance`.
    fn trace_block(
        &self,
        view: &dyn WorldView,
        world: WorldId,
        eye: DVec3,
        direction: DVec3,
        max_distance: f64,
    ) -> Option<BlockHit>;

    /// Distance from `eye` at which the sight line towards `end` enters
    /// `bounds`, or `None` on a miss.
    fn trace_entity(&self, bounds: &Aabb, eye: DVec3, end: DVec3, max_distance: f64) -> Option<f64>;
}

/// Segment-based tracing for hosts before 1.13.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyRayTracer;

impl RayTracer for LegacyRayTracer {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn trace_block(
        &self,
        view: &dyn WorldView,
        world: WorldId,
        eye: DVec3,
        direction: DVec3,
        max_distance: f64,
    ) -> Option<BlockHit> {
        let hit = traverse(eye, direction, max_distance, |pos| {
            matches!(view.block(world, pos), BlockKind::Solid | BlockKind::Passable)
        })?;
        // The segment trace reports block corners, which can lie past the end
        (hit.block.corner().distance(eye) <= max_distance).then_some(hit)
    }

    fn trace_entity(&self, bounds: &Aabb, eye: DVec3, end: DVec3, max_distance: f64) -> Option<f64> {
        let segment = Segment::new(eye, end);
        let t = segment.intersect(bounds)?;
        if bounds.center().distance(end) > max_distance {
            return None;
        }
        Some(t * segment.length())
    }
}

/// Direction-and-distance tracing for 1.13 and later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModernRayTracer;

impl RayTracer for ModernRayTracer {
    fn name(&self) -> &'static str {
        "modern"
    }

    fn trace_block(
        &self,
        view: &dyn WorldView,
        world: WorldId,
        eye: DVec3,
        direction: DVec3,
        max_distance: f64,
    ) -> Option<BlockHit> {
        traverse(eye, direction, max_distance, |pos| view.block(world, pos).is_solid())
    }

    fn trace_entity(&self, bounds: &Aabb, eye: DVec3, end: DVec3, max_distance: f64) -> Option<f64> {
        Ray::new(eye, end - eye).intersect(bounds, max_distance)
    }
}

// =============================================================================
// Backend selection
// =============================================================================

/// A parsed `major.minor.patch` host version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HostVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl HostVersion {
    /// First version with the direction-based trace API.
    pub const MODERN: Self = Self::new(1, 13, 0);

    /// Creates a version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parses the version formats hosts report.
    ///
    /// Accepts `1.15.2`, `1.12.2-R0.1-SNAPSHOT`, NMS package names such as
    /// `v1_15_R1`, and strings embedding `(MC: 1.15.2)`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(start) = raw.find("(MC:") {
            let inner = &raw[start + 4..];
            let inner = inner.split(')').next()?;
            return Self::parse(inner);
        }
        if let Some(nms) = raw.strip_prefix('v') {
            let mut parts = nms.split('_');
            let major = parts.next()?.parse().ok()?;
            let minor = parts.next()?.parse().ok()?;
            return Some(Self::new(major, minor, 0));
        }

        let numeric = raw.split('-').next()?;
        let mut parts = numeric.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let patch = match parts.next() {
            Some(patch) => patch.parse().ok()?,
            None => 0,
        };
        Some(Self::new(major, minor, patch))
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which [`RayTracer`] a host gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RayBackend {
    /// [`LegacyRayTracer`]
    Legacy,
    /// [`ModernRayTracer`]
    Modern,
}

impl RayBackend {
    /// Picks the backend for a host version string.
    ///
    /// Unparseable versions get the modern backend.
    #[must_use]
    pub fn for_version(raw: &str) -> Self {
        match HostVersion::parse(raw) {
            Some(version) if version < HostVersion::MODERN => Self::Legacy,
            Some(_) => Self::Modern,
            None => {
                warn!(version = raw, "unrecognized host version, using modern ray tracing");
                Self::Modern
            }
        }
    }

    /// Creates the tracer.
    #[must_use]
    pub fn tracer(self) -> Box<dyn RayTracer> {
        match self {
            Self::Legacy => Box::new(LegacyRayTracer),
            Self::Modern => Box::new(ModernRayTracer),
        }
    }
}
