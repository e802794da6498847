//! Unit-grid voxel traversal.
//!
//! [`traverse`] walks every grid cell pierced by a ray, in order, and stops at
//! the first cell accepted by a caller-supplied predicate. It follows the
//! Amanatides-Woo stepping scheme, so cost is linear in the number of cells
//! crossed.
//!
//! ```
//! use glam::DVec3;
//! use vector_geom::voxel::{traverse, BlockFace, BlockPos};
//!
//! // A wall of blocks at x = 5
//! let hit = traverse(DVec3::new(0.5, 0.5, 0.5), DVec3::X, 20.0, |pos| pos.x == 5).unwrap();
//!
//! assert_eq!(hit.block, BlockPos::new(5, 0, 0));
//! assert_eq!(hit.face, BlockFace::West);
//! assert_eq!(hit.block.relative(hit.face), BlockPos::new(4, 0, 0));
//! ```

use std::fmt;

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

/// Integer coordinates of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
    /// Z coordinate
    pub z: i32,
}

impl BlockPos {
    /// Create a block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell containing `point`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn containing(point: DVec3) -> Self {
        let floored = point.floor();
        Self::new(floored.x as i32, floored.y as i32, floored.z as i32)
    }

    /// The neighbouring cell across `face`.
    #[must_use]
    pub fn relative(self, face: BlockFace) -> Self {
        Self::from(IVec3::from(self) + face.normal())
    }

    /// Minimum corner of the cell.
    #[must_use]
    pub fn corner(self) -> DVec3 {
        DVec3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// Center of the cell.
    #[must_use]
    pub fn center(self) -> DVec3 {
        self.corner() + DVec3::splat(0.5)
    }
}

impl From<IVec3> for BlockPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<BlockPos> for IVec3 {
    fn from(pos: BlockPos) -> Self {
        IVec3::new(pos.x, pos.y, pos.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six faces of a cell, named by compass direction.
///
/// North is -Z, south is +Z, east is +X, west is -X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockFace {
    /// -Z
    North,
    /// +Z
    South,
    /// +X
    East,
    /// -X
    West,
    /// +Y
    Up,
    /// -Y
    Down,
}

impl BlockFace {
    /// Outward unit normal of the face.
    #[must_use]
    pub const fn normal(self) -> IVec3 {
        match self {
            Self::North => IVec3::new(0, 0, -1),
            Self::South => IVec3::new(0, 0, 1),
            Self::East => IVec3::new(1, 0, 0),
            Self::West => IVec3::new(-1, 0, 0),
            Self::Up => IVec3::new(0, 1, 0),
            Self::Down => IVec3::new(0, -1, 0),
        }
    }

    /// The face on the other side of the cell.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// The face a ray enters through when it steps `step` along `axis`.
    ///
    /// That face points back towards the ray origin.
    fn entered_through(axis: usize, step: i32) -> Self {
        match (axis, step > 0) {
            (0, true) => Self::West,
            (0, false) => Self::East,
            (1, true) => Self::Down,
            (1, false) => Self::Up,
            (_, true) => Self::North,
            (_, false) => Self::South,
        }
    }

    /// The face that looks back at a viewer travelling along `direction`.
    ///
    /// Picks the dominant axis of the direction.
    #[must_use]
    pub fn facing_against(direction: DVec3) -> Self {
        let abs = direction.abs();
        let axis = if abs.x >= abs.y && abs.x >= abs.z {
            0
        } else if abs.y >= abs.z {
            1
        } else {
            2
        };
        let step = if direction[axis] >= 0.0 { 1 } else { -1 };
        Self::entered_through(axis, step)
    }
}

/// Result of a block ray trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockHit {
    /// The cell that stopped the ray
    pub block: BlockPos,
    /// The face of `block` the ray entered through
    pub face: BlockFace,
    /// Point where the ray entered the cell
    pub point: DVec3,
    /// Distance from the ray origin to `point`
    pub distance: f64,
}

impl BlockHit {
    /// Center of the cell in front of the struck face.
    #[must_use]
    pub fn front_center(&self) -> DVec3 {
        self.block.relative(self.face).center()
    }
}

/// Walk the cells crossed by a ray until `is_hit` accepts one.
///
/// The cell containing `origin` is tested first. The walk stops once the
/// entry distance of the next cell exceeds `max_distance`. A zero direction
/// only tests the origin cell.
///
/// # Arguments
///
/// * `origin` - Ray origin
/// * `direction` - Ray direction (need not be normalized)
/// * `max_distance` - Maximum travel distance along the ray
/// * `is_hit` - Predicate deciding whether a cell stops the ray
pub fn traverse<F>(origin: DVec3, direction: DVec3, max_distance: f64, mut is_hit: F) -> Option<BlockHit>
where
    F: FnMut(BlockPos) -> bool,
{
    let dir = direction.normalize_or_zero();
    let mut cell = IVec3::from(BlockPos::containing(origin));

    if is_hit(BlockPos::from(cell)) {
        return Some(BlockHit {
            block: BlockPos::from(cell),
            face: BlockFace::facing_against(dir),
            point: origin,
            distance: 0.0,
        });
    }
    if dir == DVec3::ZERO || max_distance <= 0.0 {
        return None;
    }

    let mut step = [0i32; 3];
    let mut t_max = [f64::INFINITY; 3];
    let mut t_delta = [f64::INFINITY; 3];

    for axis in 0..3 {
        let d = dir[axis];
        let o = origin[axis];
        let c = f64::from(cell[axis]);
        if d > 0.0 {
            step[axis] = 1;
            t_max[axis] = (c + 1.0 - o) / d;
            t_delta[axis] = 1.0 / d;
        } else if d < 0.0 {
            step[axis] = -1;
            t_max[axis] = (c - o) / d;
            t_delta[axis] = -1.0 / d;
        }
    }

    loop {
        let axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
            0
        } else if t_max[1] <= t_max[2] {
            1
        } else {
            2
        };

        let distance = t_max[axis];
        if distance > max_distance {
            return None;
        }

        cell[axis] += step[axis];
        t_max[axis] += t_delta[axis];

        let block = BlockPos::from(cell);
        if is_hit(block) {
            return Some(BlockHit {
                block,
                face: BlockFace::entered_through(axis, step[axis]),
                point: origin + dir * distance,
                distance,
            });
        }
    }
}
