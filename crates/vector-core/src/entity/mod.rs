//! Entity snapshots as seen by the Vector core.
//!
//! This module provides the entity types the core reads from the host:
//! - [`EntityId`]: Unique identifier shared by players and every other entity
//! - [`WorldId`]: Identifier of the world (dimension) an entity lives in
//! - [`EntityKind`]: Coarse classification; players are entities too
//! - [`Entity`]: A copyable snapshot of one entity's state
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use vector_core::entity::{Entity, EntityId, EntityKind, WorldId};
//! use vector_core::entity::components::{Body, Transform};
//!
//! let player = Entity::new(
//!     EntityId::new(1),
//!     EntityKind::Player,
//!     WorldId::OVERWORLD,
//!     Transform::at(DVec3::new(0.0, 64.0, 0.0)),
//!     Body::PLAYER,
//! );
//!
//! assert!(player.is_player());
//! assert!((player.eye_position().y - 65.62).abs() < 1e-9);
//! ```

pub mod components;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

use vector_geom::Aabb;

pub use components::{Body, PhysicsState, Transform};

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. Players and non-player
/// entities share one id space, so a selection entry is a pair of
/// `EntityId`s.
///
/// # Ordering
///
/// Entity IDs are ordered by their numeric value, which is used to ensure
/// deterministic iteration order across all entities.
///
/// # Example
///
/// ```
/// use vector_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Identifier of a world (dimension) on the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldId(u32);

impl WorldId {
    /// The default world.
    pub const OVERWORLD: Self = Self(0);

    /// Creates a world id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world:{}", self.0)
    }
}

/// Coarse entity classification.
///
/// Only `Player` carries special meaning to the core: players own
/// selections, issue interactions and are never picked by themselves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A connected player
    Player,
    /// A living non-player entity (animals, monsters, villagers)
    Mob,
    /// A dropped item stack
    Item,
    /// Any other entity (minecarts, boats, falling blocks, projectiles)
    Object,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Mob => write!(f, "Mob"),
            Self::Item => write!(f, "Item"),
            Self::Object => write!(f, "Object"),
        }
    }
}

/// Snapshot of one entity.
///
/// Hosts hand these out by value; holding one never keeps the host entity
/// alive. An entity that has died or been removed but is still reported by
/// the host has `valid == false`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    world: WorldId,
    /// Position and view direction
    pub transform: Transform,
    /// Hit box dimensions and eye height
    pub body: Body,
    /// Current motion
    pub physics: PhysicsState,
    /// False once the host has removed or killed the entity
    pub valid: bool,
}

impl Entity {
    /// Creates a valid, motionless entity.
    #[must_use]
    pub fn new(id: EntityId, kind: EntityKind, world: WorldId, transform: Transform, body: Body) -> Self {
        Self {
            id,
            kind,
            world,
            transform,
            body,
            physics: PhysicsState::default(),
            valid: true,
        }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the world the entity lives in.
    #[must_use]
    pub const fn world(&self) -> WorldId {
        self.world
    }

    /// Places the entity's feet at `position` in `world`.
    pub fn relocate(&mut self, world: WorldId, position: DVec3) {
        self.world = world;
        self.transform.position = position;
    }

    /// Returns true for players.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    /// Returns the validity flag.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Feet position.
    #[must_use]
    pub fn location(&self) -> DVec3 {
        self.transform.position
    }

    /// Eye position: feet plus eye height.
    #[must_use]
    pub fn eye_position(&self) -> DVec3 {
        self.transform.position + DVec3::new(0.0, self.body.eye_height, 0.0)
    }

    /// Unit view direction.
    #[must_use]
    pub fn direction(&self) -> DVec3 {
        self.transform.direction.normalize_or_zero()
    }

    /// Current hit box.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_feet(self.transform.position, self.body.width, self.body.height)
    }
}
