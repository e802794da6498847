//! Test helpers: an enabled plugin wired to an in-memory world.

use glam::DVec3;
use tempfile::TempDir;

use crate::command::CommandSender;
use crate::entity::EntityId;
use crate::interaction::{Action, InteractEvent, InteractResponse};
use crate::item::ItemType;
use crate::plugin::VectorPlugin;
use crate::world::World;
use crate::world_view::WorldView;

/// Seed used for every test host.
pub const TEST_SEED: u64 = 0x5EED;

/// Height of a player's eyes when standing at y = 64.
pub const EYE_Y: f64 = 64.0 + 1.62;

// =============================================================================
// Test Host
// =============================================================================

/// An enabled plugin, its world and the directory holding its config.
pub struct TestHost {
    /// Keeps the config directory alive
    pub _dir: TempDir,
    /// The in-memory host world
    pub world: World,
    /// The plugin under test
    pub plugin: VectorPlugin,
}

impl TestHost {
    /// Creates and enables a plugin on a host reporting `version`.
    pub fn new(version: &str) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let world = World::new(version);
        let mut plugin = VectorPlugin::with_seed(dir.path(), TEST_SEED);
        plugin.on_enable(&world).expect("enable");
        Self {
            _dir: dir,
            world,
            plugin,
        }
    }

    /// Creates an enabled host on a modern server and switches Vector on.
    pub fn active() -> Self {
        let mut host = Self::new("git-Paper-100 (MC: 1.16.5)");
        host.console(&[]);
        host
    }

    /// Runs a command, applies its outputs and returns the texts sent to
    /// `sender` by it.
    pub fn command(&mut self, sender: CommandSender, args: &[&str]) -> Vec<String> {
        let before = self.world.messages().len();
        let outputs = self.plugin.on_command(&self.world, sender, args);
        self.world.apply_outputs(outputs);
        self.world.messages()[before..]
            .iter()
            .filter(|(recipient, _)| *recipient == sender)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Runs a command as the console.
    pub fn console(&mut self, args: &[&str]) -> Vec<String> {
        self.command(CommandSender::Console, args)
    }

    /// Sets a config key through the command surface and lets the next tick
    /// reload it.
    pub fn set(&mut self, key: &str, value: &str) {
        let replies = self.console(&["config", key, value]);
        assert_eq!(replies.len(), 1, "unexpected replies: {replies:?}");
        self.tick();
    }

    /// Clicks with the default vector item and applies the response.
    pub fn click(&mut self, player: EntityId, action: Action) -> InteractResponse {
        self.use_item(player, action, ItemType::default())
    }

    /// Clicks with `item` and applies the response.
    pub fn use_item(&mut self, player: EntityId, action: Action, item: ItemType) -> InteractResponse {
        let event = InteractEvent::new(player, action, item);
        let response = self.plugin.on_interact(&self.world, &event);
        self.world.apply_outputs(response.outputs.clone());
        response
    }

    /// Runs the plugin tick, applies its outputs and advances the world.
    pub fn tick(&mut self) {
        let outputs = self.plugin.on_tick(&self.world);
        self.world.apply_outputs(outputs);
        self.world.step();
    }

    /// Current velocity of `id`.
    pub fn velocity(&self, id: EntityId) -> DVec3 {
        self.world.entity(id).map(|e| e.physics.velocity).unwrap_or_default()
    }
}

// =============================================================================
// Scenario Setup
// =============================================================================

/// Spawns a player at (0, 64, 0) looking along +Z.
///
/// With no blocks around, the aim point is (0, [`EYE_Y`], visibility).
pub fn spawn_looking_north(world: &mut World) -> EntityId {
    world.spawn_player(DVec3::new(0.0, 64.0, 0.0), DVec3::Z)
}

/// Spawns a mob on the +Z axis with its feet at eye height.
///
/// Its offset to the aim point is then purely along Z.
pub fn spawn_in_sight(world: &mut World, z: f64) -> EntityId {
    world.spawn_mob(DVec3::new(0.0, EYE_Y, z))
}
