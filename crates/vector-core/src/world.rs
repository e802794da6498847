//! In-memory host world.
//!
//! [`World`] stands in for the game server: it stores entity snapshots,
//! blocks and permission grants, implements [`WorldView`] for the plugin
//! core, and applies the [`Output`]s the core returns. It backs the unit
//! tests, the benchmark and the headless harness.
//!
//! Entity storage is a `BTreeMap` so iteration follows id order.
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use vector_core::output::{Command, Output};
//! use vector_core::world::World;
//! use vector_core::world_view::WorldView;
//!
//! let mut world = World::new("1.15.2");
//! let zombie = world.spawn_mob(DVec3::new(0.0, 64.0, 5.0));
//!
//! world.apply_outputs([Output::Command(Command::SetVelocity {
//!     target: zombie,
//!     velocity: DVec3::new(0.0, 0.0, -1.0),
//! })]);
//! world.step();
//!
//! assert_eq!(world.entity(zombie).unwrap().location(), DVec3::new(0.0, 64.0, 4.0));
//! assert_eq!(world.current_tick(), 1);
//! ```

use std::collections::{BTreeMap, HashMap};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use vector_geom::BlockPos;

use crate::command::CommandSender;
use crate::entity::components::{Body, Transform};
use crate::entity::{Entity, EntityId, EntityKind, WorldId};
use crate::output::{Chat, Command, Effect, Output, ParticleColor};
use crate::permission::{Permission, Permissions};
use crate::world_view::{BlockKind, WorldView};

/// A particle the world has displayed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    /// Tick the particle was spawned on
    pub tick: u64,
    /// World it was spawned in
    pub world: WorldId,
    /// Position
    pub position: DVec3,
    /// Colour
    pub color: ParticleColor,
}

/// In-memory game world.
#[derive(Debug, Clone)]
pub struct World {
    host_version: String,
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
    blocks: HashMap<(WorldId, BlockPos), BlockKind>,
    permissions: BTreeMap<EntityId, Permissions>,
    tick: u64,
    particles: Vec<ParticleRecord>,
    broadcasts: Vec<String>,
    messages: Vec<(CommandSender, String)>,
}

impl World {
    /// Creates an empty world reporting `host_version`.
    #[must_use]
    pub fn new(host_version: &str) -> Self {
        Self {
            host_version: host_version.to_string(),
            next_id: 1,
            entities: BTreeMap::new(),
            blocks: HashMap::new(),
            permissions: BTreeMap::new(),
            tick: 0,
            particles: Vec::new(),
            broadcasts: Vec::new(),
            messages: Vec::new(),
        }
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Spawns an entity and returns its id.
    ///
    /// # Arguments
    ///
    /// * `kind` - Entity kind
    /// * `world` - World to spawn in
    /// * `transform` - Feet position and view direction
    /// * `body` - Hit box dimensions
    pub fn spawn(&mut self, kind: EntityKind, world: WorldId, transform: Transform, body: Body) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities
            .insert(id, Entity::new(id, kind, world, transform, body));
        id
    }

    /// Spawns a player in the overworld holding every permission.
    pub fn spawn_player(&mut self, position: DVec3, direction: DVec3) -> EntityId {
        let id = self.spawn(
            EntityKind::Player,
            WorldId::OVERWORLD,
            Transform::at(position).looking(direction),
            Body::PLAYER,
        );
        self.permissions.insert(id, Permissions::all());
        id
    }

    /// Spawns a zombie-sized mob in the overworld.
    pub fn spawn_mob(&mut self, position: DVec3) -> EntityId {
        self.spawn(
            EntityKind::Mob,
            WorldId::OVERWORLD,
            Transform::at(position),
            Body::HUMANOID,
        )
    }

    /// Removes an entity, as when a player disconnects.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.permissions.remove(&id);
        self.entities.remove(&id)
    }

    /// Marks an entity invalid while keeping it visible to lookups, as a
    /// host does for an entity that died this tick.
    ///
    /// Returns false if the entity does not exist.
    pub fn invalidate(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.valid = false;
                true
            }
            None => false,
        }
    }

    /// Mutable access to an entity.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Points an entity's view at `target`.
    pub fn look_at(&mut self, id: EntityId, target: DVec3) {
        if let Some(entity) = self.entities.get_mut(&id) {
            let eye = entity.eye_position();
            entity.transform = entity.transform.looking(target - eye);
        }
    }

    /// Moves an entity's feet to `position`.
    pub fn teleport(&mut self, id: EntityId, position: DVec3) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.transform.position = position;
        }
    }

    /// Sends an entity to `position` in another world.
    pub fn change_world(&mut self, id: EntityId, world: WorldId, position: DVec3) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.relocate(world, position);
        }
    }

    /// Number of entities, valid or not.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // =========================================================================
    // Blocks and permissions
    // =========================================================================

    /// Sets the block at `pos`. Setting air removes the entry.
    pub fn set_block(&mut self, world: WorldId, pos: BlockPos, kind: BlockKind) {
        if kind == BlockKind::Air {
            self.blocks.remove(&(world, pos));
        } else {
            self.blocks.insert((world, pos), kind);
        }
    }

    /// Fills the inclusive box between two corners.
    pub fn fill(&mut self, world: WorldId, from: BlockPos, to: BlockPos, kind: BlockKind) {
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                for z in from.z.min(to.z)..=from.z.max(to.z) {
                    self.set_block(world, BlockPos::new(x, y, z), kind);
                }
            }
        }
    }

    /// Replaces a player's permission set.
    pub fn set_permissions(&mut self, player: EntityId, permissions: Permissions) {
        self.permissions.insert(player, permissions);
    }

    // =========================================================================
    // Outputs and time
    // =========================================================================

    /// Applies plugin outputs in order.
    ///
    /// Velocities on unknown entities are dropped. Particles and chat are
    /// recorded for inspection.
    pub fn apply_outputs<I>(&mut self, outputs: I)
    where
        I: IntoIterator<Item = Output>,
    {
        for output in outputs {
            match output {
                Output::Command(Command::SetVelocity { target, velocity }) => {
                    if let Some(entity) = self.entities.get_mut(&target) {
                        entity.physics.velocity = velocity;
                    }
                }
                Output::Effect(Effect::Particle { world, position, color }) => {
                    self.particles.push(ParticleRecord {
                        tick: self.tick,
                        world,
                        position,
                        color,
                    });
                }
                Output::Chat(Chat::Broadcast { text }) => self.broadcasts.push(text),
                Output::Chat(Chat::Message { recipient, text }) => self.messages.push((recipient, text)),
            }
        }
    }

    /// Advances one tick: every valid entity moves by its velocity.
    pub fn step(&mut self) {
        for entity in self.entities.values_mut().filter(|entity| entity.valid) {
            entity.transform.position += entity.physics.velocity;
        }
        self.tick += 1;
    }

    /// Ticks elapsed.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Particles displayed so far.
    #[must_use]
    pub fn particles(&self) -> &[ParticleRecord] {
        &self.particles
    }

    /// Broadcast messages so far.
    #[must_use]
    pub fn broadcasts(&self) -> &[String] {
        &self.broadcasts
    }

    /// Direct messages so far.
    #[must_use]
    pub fn messages(&self) -> &[(CommandSender, String)] {
        &self.messages
    }

    /// Messages received by `recipient`.
    #[must_use]
    pub fn messages_to(&self, recipient: CommandSender) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(to, _)| *to == recipient)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    /// Forgets recorded particles and chat.
    pub fn clear_records(&mut self) {
        self.particles.clear();
        self.broadcasts.clear();
        self.messages.clear();
    }
}

impl WorldView for World {
    fn host_version(&self) -> &str {
        &self.host_version
    }

    fn entity(&self, id: EntityId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    fn entities_in(&self, world: WorldId) -> Vec<Entity> {
        self.entities
            .values()
            .filter(|entity| entity.world() == world)
            .copied()
            .collect()
    }

    fn block(&self, world: WorldId, pos: BlockPos) -> BlockKind {
        self.blocks.get(&(world, pos)).copied().unwrap_or_default()
    }

    fn has_permission(&self, player: EntityId, permission: Permission) -> bool {
        self.permissions
            .get(&player)
            .is_some_and(|granted| granted.grants(permission))
    }
}
