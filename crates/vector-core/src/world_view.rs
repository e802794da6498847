//! Read-only access to host state.
//!
//! [`WorldView`] is everything the plugin core needs from the game server:
//! entity snapshots, block kinds for ray tracing, permission checks and the
//! server version. It provides no mutation; state changes flow back as
//! [`Output`](crate::output::Output)s.
//!
//! The in-memory [`World`](crate::world::World) implements this trait for
//! tests and the headless harness.

use serde::{Deserialize, Serialize};

use vector_geom::BlockPos;

use crate::entity::{Entity, EntityId, WorldId};
use crate::permission::Permission;

/// How a block interacts with ray traces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Empty space
    #[default]
    Air,
    /// A full collidable block
    Solid,
    /// Non-collidable but selectable (grass, flowers, torches)
    Passable,
    /// Water or lava
    Fluid,
}

impl BlockKind {
    /// Returns true for [`BlockKind::Solid`].
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Solid)
    }
}

/// Read-only view of the host world.
pub trait WorldView {
    /// Server version string, used to pick a ray-trace backend.
    fn host_version(&self) -> &str;

    /// Snapshot of one entity, or `None` if the host no longer knows it.
    fn entity(&self, id: EntityId) -> Option<Entity>;

    /// Every entity in `world`, ordered by id.
    fn entities_in(&self, world: WorldId) -> Vec<Entity>;

    /// The block at `pos`. Unloaded or unknown positions are air.
    fn block(&self, world: WorldId, pos: BlockPos) -> BlockKind;

    /// Whether `player` holds `permission`.
    fn has_permission(&self, player: EntityId, permission: Permission) -> bool;

    /// Snapshot of `id` if it exists and is still valid.
    fn valid_entity(&self, id: EntityId) -> Option<Entity> {
        self.entity(id).filter(Entity::is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_block_is_air() {
        assert_eq!(BlockKind::default(), BlockKind::Air);
        assert!(BlockKind::Solid.is_solid());
        assert!(!BlockKind::Passable.is_solid());
        assert!(!BlockKind::Fluid.is_solid());
    }
}
