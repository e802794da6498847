//! The plugin context object.
//!
//! [`VectorPlugin`] owns all mutable plugin state: the current [`Config`],
//! the config file and its watcher, the [`SelectionTable`], the activation
//! toggle, the chosen ray-trace backend and the particle task. The host
//! calls its lifecycle and event methods from its main thread and applies
//! the returned [`Output`]s.
//!
//! # Lifecycle
//!
//! ```text
//! on_enable   write default config, choose backend, load config
//! on_tick     poll config; if active, prune selections and draw trails
//! on_interact if active, pick or pull
//! on_command  toggle, help, config
//! on_quit     release the player's selection
//! on_disable  deactivate and clear selections
//! ```
//!
//! # Example
//!
//! ```
//! use vector_core::command::CommandSender;
//! use vector_core::plugin::VectorPlugin;
//! use vector_core::world::World;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut world = World::new("1.15.2");
//! let mut plugin = VectorPlugin::with_seed(dir.path(), 7);
//!
//! plugin.on_enable(&world).unwrap();
//! let outputs = plugin.on_command(&world, CommandSender::Console, &[]);
//! world.apply_outputs(outputs);
//!
//! assert!(plugin.activation().is_active());
//! assert_eq!(world.broadcasts(), ["Vector On".to_string()]);
//! ```

use std::fmt;
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::activation::ActivationState;
use crate::command::{tab_complete, CommandSender, ConfigCommand, VectorCommand, HELP_TEXT};
use crate::config::{Config, ConfigFile, ConfigWatcher};
use crate::entity::EntityId;
use crate::error::{CommandError, ConfigError};
use crate::interaction::{InteractEvent, InteractResponse, Intent};
use crate::item::{ItemRegistry, StaticItemRegistry};
use crate::output::Output;
use crate::particles::ParticleTask;
use crate::permission::Permission;
use crate::picker::{pick_entity, Pick};
use crate::raytrace::{RayBackend, RayTracer};
use crate::selection::SelectionTable;
use crate::velocity::{apply_pull, PullOutcome};
use crate::world_view::WorldView;

/// All plugin state, owned by the host's plugin instance.
pub struct VectorPlugin {
    /// Values currently in effect.
    config: Config,
    /// Backing file and its modification poller.
    watcher: ConfigWatcher,
    /// Validates item names.
    registry: Box<dyn ItemRegistry>,
    /// Player to entity selections.
    selections: SelectionTable,
    /// On/off toggle.
    activation: ActivationState,
    /// Between `on_enable` and `on_disable`.
    enabled: bool,
    /// Chosen at enable time.
    backend: RayBackend,
    tracer: Box<dyn RayTracer>,
    particles: ParticleTask,
}

impl fmt::Debug for VectorPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorPlugin")
            .field("config", &self.config)
            .field("file", self.watcher.file())
            .field("selections", &self.selections)
            .field("activation", &self.activation)
            .field("enabled", &self.enabled)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl VectorPlugin {
    /// Creates the plugin with its config file in `data_dir`.
    ///
    /// Particle colours are seeded from the OS.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::with_particles(data_dir, ParticleTask::new())
    }

    /// Creates the plugin with a fixed particle colour seed.
    #[must_use]
    pub fn with_seed(data_dir: impl AsRef<Path>, seed: u64) -> Self {
        Self::with_particles(data_dir, ParticleTask::with_seed(seed))
    }

    fn with_particles(data_dir: impl AsRef<Path>, particles: ParticleTask) -> Self {
        let backend = RayBackend::Modern;
        Self {
            config: Config::default(),
            watcher: ConfigWatcher::new(ConfigFile::in_dir(data_dir)),
            registry: Box::new(StaticItemRegistry::default()),
            selections: SelectionTable::new(),
            activation: ActivationState::Inactive,
            enabled: false,
            backend,
            tracer: backend.tracer(),
            particles,
        }
    }

    /// Replaces the item registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Box<dyn ItemRegistry>) -> Self {
        self.registry = registry;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Values currently in effect.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The backing config file.
    #[must_use]
    pub fn config_file(&self) -> &ConfigFile {
        self.watcher.file()
    }

    /// Current selections.
    #[must_use]
    pub fn selections(&self) -> &SelectionTable {
        &self.selections
    }

    /// The on/off state.
    #[must_use]
    pub fn activation(&self) -> ActivationState {
        self.activation
    }

    /// Whether the host has enabled the plugin.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The ray-trace backend in use.
    #[must_use]
    pub fn backend(&self) -> RayBackend {
        self.backend
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Enables the plugin.
    ///
    /// Writes the default config file if missing, chooses the ray-trace
    /// backend from the host version and loads the config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the config file cannot be created or
    /// read. The plugin stays disabled in that case.
    pub fn on_enable(&mut self, view: &dyn WorldView) -> Result<(), ConfigError> {
        self.watcher.file().save_default()?;

        self.backend = RayBackend::for_version(view.host_version());
        self.tracer = self.backend.tracer();

        self.watcher.invalidate();
        if let Some(config) = self.watcher.poll(&self.config, self.registry.as_ref())? {
            self.config = config;
        }

        self.enabled = true;
        info!(
            version = view.host_version(),
            backend = self.tracer.name(),
            config = %self.config_file().path().display(),
            "vector enabled"
        );
        Ok(())
    }

    /// Disables the plugin: stops everything and forgets all selections.
    pub fn on_disable(&mut self) {
        self.enabled = false;
        self.activation = ActivationState::Inactive;
        self.selections.clear();
        info!("vector disabled");
    }

    /// Runs once per server tick.
    ///
    /// Polls the config file for the whole enabled lifetime. While active,
    /// also prunes stale selections and returns particle trails.
    pub fn on_tick(&mut self, view: &dyn WorldView) -> Vec<Output> {
        if !self.enabled {
            return Vec::new();
        }
        self.reload_config();

        if !self.activation.is_active() {
            return Vec::new();
        }
        self.particles
            .run(view, self.tracer.as_ref(), &mut self.selections, &self.config)
    }

    /// Handles an item-use event.
    ///
    /// Only events with the configured item from a player holding
    /// `command.vector.use` are handled, and those are cancelled. Right
    /// click pulls (or picks when nothing is selected) unless both-hands
    /// mode splits picking onto right click and pulling onto left click.
    pub fn on_interact(&mut self, view: &dyn WorldView, event: &InteractEvent) -> InteractResponse {
        if !self.enabled || !self.activation.is_active() {
            return InteractResponse::pass();
        }
        if event.item.as_ref() != Some(&self.config.vector_item) {
            return InteractResponse::pass();
        }
        if !view.has_permission(event.player, Permission::Use) {
            return InteractResponse::pass();
        }

        let mut outputs = Vec::new();
        match Intent::for_action(event.action, self.config.use_both_hands) {
            Intent::PullOrPick => match self.pull(view, event.player) {
                PullOutcome::NoSelection => {
                    self.pick(view, event.player);
                }
                applied => outputs.extend(applied.output()),
            },
            Intent::Pick => {
                self.pick(view, event.player);
            }
            Intent::Pull => outputs.extend(self.pull(view, event.player).output()),
            Intent::Ignore => {}
        }
        InteractResponse::cancel(outputs)
    }

    /// Releases the selection of a player who left.
    pub fn on_quit(&mut self, player: EntityId) {
        if let Some(entity) = self.selections.release(player) {
            debug!(player = %player, entity = %entity, "released selection on quit");
        }
    }

    /// Handles `/vector <args>`.
    ///
    /// Returns chat output: replies to `sender`, or a broadcast on toggle.
    /// Errors are reported to the sender; I/O failures are also logged.
    pub fn on_command(&mut self, view: &dyn WorldView, sender: CommandSender, args: &[&str]) -> Vec<Output> {
        match self.run_command(view, sender, args) {
            Ok(outputs) => outputs,
            Err(err) => {
                match &err {
                    CommandError::Config(config_err) if config_err.is_io() => {
                        error!(error = %config_err, "config command failed");
                    }
                    CommandError::Config(config_err) => {
                        warn!(sender = %sender, error = %config_err, "rejected config command");
                    }
                    _ => debug!(sender = %sender, error = %err, "rejected command"),
                }
                vec![Output::message(sender, err.to_string())]
            }
        }
    }

    /// Suggestions for a partially typed `/vector` command.
    #[must_use]
    pub fn on_tab_complete(&self, args: &[&str]) -> Vec<String> {
        tab_complete(args, self.registry.as_ref())
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Flips the activation state and returns the broadcast.
    pub fn toggle(&mut self) -> Output {
        self.activation = self.activation.toggled();
        info!(state = %self.activation, selections = self.selections.len(), "vector toggled");
        Output::broadcast(self.activation.announcement())
    }

    /// Pulls `player`'s selection towards the player's aim point.
    ///
    /// Returns [`PullOutcome::NoSelection`] if the player is gone or has no
    /// usable selection.
    pub fn pull(&mut self, view: &dyn WorldView, player: EntityId) -> PullOutcome {
        let Some(snapshot) = view.valid_entity(player) else {
            return PullOutcome::NoSelection;
        };
        apply_pull(view, self.tracer.as_ref(), &mut self.selections, &snapshot, &self.config)
    }

    /// Picks the entity `player` is looking at and selects it.
    ///
    /// A miss leaves any previous selection in place.
    pub fn pick(&mut self, view: &dyn WorldView, player: EntityId) -> Option<Pick> {
        let snapshot = view.valid_entity(player)?;
        let pick = pick_entity(view, self.tracer.as_ref(), &snapshot, &self.config)?;
        self.selections.select(player, pick.entity);
        Some(pick)
    }

    fn reload_config(&mut self) {
        match self.watcher.poll(&self.config, self.registry.as_ref()) {
            Ok(Some(config)) => self.config = config,
            Ok(None) => {}
            Err(err) => error!(error = %err, "config reload failed"),
        }
    }

    fn run_command(
        &mut self,
        view: &dyn WorldView,
        sender: CommandSender,
        args: &[&str],
    ) -> Result<Vec<Output>, CommandError> {
        if let Some(permission) = VectorCommand::required_permission(args) {
            if !sender.has_permission(view, permission) {
                return Err(CommandError::PermissionDenied(permission));
            }
        }

        match VectorCommand::parse(args)? {
            VectorCommand::Toggle => Ok(vec![self.toggle()]),
            VectorCommand::Help => Ok(vec![Output::message(sender, HELP_TEXT)]),
            VectorCommand::Config(ConfigCommand::Reset) => {
                self.config_file().reset()?;
                self.watcher.invalidate();
                info!(sender = %sender, "config reset");
                Ok(vec![Output::message(sender, "Config reset to defaults")])
            }
            VectorCommand::Config(ConfigCommand::Show(key)) => {
                let text = self.config_file().describe(key, &self.config)?;
                Ok(vec![Output::message(sender, text)])
            }
            VectorCommand::Config(ConfigCommand::Set { key, value }) => {
                let (_, rewritten) = self.config_file().set(key, &value, self.registry.as_ref())?;
                self.watcher.invalidate();
                info!(sender = %sender, key = %key, value = %value, "config updated");
                Ok(rewritten
                    .into_iter()
                    .map(|line| Output::message(sender, line))
                    .collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigKey;
    use crate::interaction::Action;
    use crate::item::ItemType;
    use crate::permission::Permissions;
    use crate::world::World;
    use glam::DVec3;
    use tempfile::TempDir;

    fn enabled(version: &str) -> (TempDir, World, VectorPlugin) {
        let dir = TempDir::new().unwrap();
        let world = World::new(version);
        let mut plugin = VectorPlugin::with_seed(dir.path(), 42);
        plugin.on_enable(&world).unwrap();
        (dir, world, plugin)
    }

    fn click(player: EntityId, action: Action) -> InteractEvent {
        InteractEvent::new(player, action, ItemType::new("BLAZE_ROD"))
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn enable_writes_default_and_picks_backend() {
            let (_dir, _, plugin) = enabled("1.12.2-R0.1-SNAPSHOT");
            assert!(plugin.is_enabled());
            assert!(plugin.config_file().path().exists());
            assert_eq!(plugin.backend(), RayBackend::Legacy);
            assert_eq!(plugin.config(), &Config::default());

            let (_dir, _, modern) = enabled("1.15.2");
            assert_eq!(modern.backend(), RayBackend::Modern);
        }

        #[test]
        fn disable_clears_selections() {
            let (_dir, mut world, mut plugin) = enabled("1.15.2");
            let player = world.spawn_player(DVec3::new(0.0, 64.0, 0.0), DVec3::Z);
            world.spawn_mob(DVec3::new(0.0, 64.0, 5.0));
            plugin.toggle();
            plugin.pick(&world, player).unwrap();

            plugin.on_disable();
            assert!(plugin.selections().is_empty());
            assert!(!plugin.activation().is_active());
            assert!(plugin.on_tick(&world).is_empty());
        }

        #[test]
        fn quit_releases_selection() {
            let (_dir, mut world, mut plugin) = enabled("1.15.2");
            let player = world.spawn_player(DVec3::new(0.0, 64.0, 0.0), DVec3::Z);
            world.spawn_mob(DVec3::new(0.0, 64.0, 5.0));
            plugin.pick(&world, player).unwrap();
            plugin.on_quit(player);
            assert!(plugin.selections().is_empty());
        }
    }

    mod interact_tests {
        use super::*;

        fn scene() -> (TempDir, World, VectorPlugin, EntityId, EntityId) {
            let (dir, mut world, mut plugin) = enabled("1.15.2");
            let player = world.spawn_player(DVec3::new(0.0, 64.0, 0.0), DVec3::Z);
            let mob = world.spawn_mob(DVec3::new(0.0, 64.0, 5.0));
            plugin.toggle();
            (dir, world, plugin, player, mob)
        }

        #[test]
        fn inactive_plugin_ignores_clicks() {
            let (_dir, world, mut plugin, player, _) = scene();
            plugin.toggle();
            let response = plugin.on_interact(&world, &click(player, Action::RightClickAir));
            assert!(!response.cancelled);
            assert!(plugin.selections().is_empty());
        }

        #[test]
        fn right_click_picks_then_pulls() {
            let (_dir, world, mut plugin, player, mob) = scene();

            let first = plugin.on_interact(&world, &click(player, Action::RightClickAir));
            assert!(first.cancelled);
            assert!(first.outputs.is_empty());
            assert_eq!(plugin.selections().get(player), Some(mob));

            let second = plugin.on_interact(&world, &click(player, Action::RightClickBlock));
            assert_eq!(second.outputs.len(), 1);
            assert!(second.outputs[0].as_command().is_some());
        }

        #[test]
        fn wrong_item_or_permission_passes() {
            let (_dir, mut world, mut plugin, player, _) = scene();
            let stick = InteractEvent::new(player, Action::RightClickAir, ItemType::new("STICK"));
            assert!(!plugin.on_interact(&world, &stick).cancelled);

            let empty_hand = InteractEvent {
                player,
                action: Action::RightClickAir,
                item: None,
            };
            assert!(!plugin.on_interact(&world, &empty_hand).cancelled);

            world.set_permissions(player, Permissions::TOGGLE);
            assert!(!plugin.on_interact(&world, &click(player, Action::RightClickAir)).cancelled);
        }

        #[test]
        fn left_click_without_both_hands_is_cancelled_but_inert() {
            let (_dir, world, mut plugin, player, _) = scene();
            let response = plugin.on_interact(&world, &click(player, Action::LeftClickAir));
            assert!(response.cancelled);
            assert!(response.outputs.is_empty());
            assert!(plugin.selections().is_empty());
        }

        #[test]
        fn both_hands_splits_pick_and_pull() {
            let (_dir, world, mut plugin, player, mob) = scene();
            let _ = plugin.on_command(
                &world,
                CommandSender::Console,
                &["config", "use-both-hands", "true"],
            );
            let _ = plugin.on_tick(&world);
            assert!(plugin.config().use_both_hands);

            // Left click with nothing selected does nothing
            let idle = plugin.on_interact(&world, &click(player, Action::LeftClickAir));
            assert!(idle.outputs.is_empty());

            let pick = plugin.on_interact(&world, &click(player, Action::RightClickAir));
            assert!(pick.outputs.is_empty());
            assert_eq!(plugin.selections().get(player), Some(mob));

            // Right click again re-picks instead of pulling
            let again = plugin.on_interact(&world, &click(player, Action::RightClickAir));
            assert!(again.outputs.is_empty());

            let pull = plugin.on_interact(&world, &click(player, Action::LeftClickBlock));
            assert_eq!(pull.outputs.len(), 1);
        }

        #[test]
        fn configured_item_is_honoured() {
            let (_dir, world, mut plugin, player, mob) = scene();
            let _ = plugin.on_command(&world, CommandSender::Console, &["config", "vector-item", "stick"]);
            let _ = plugin.on_tick(&world);

            assert!(!plugin.on_interact(&world, &click(player, Action::RightClickAir)).cancelled);
            let stick = InteractEvent::new(player, Action::RightClickAir, ItemType::new("stick"));
            assert!(plugin.on_interact(&world, &stick).cancelled);
            assert_eq!(plugin.selections().get(player), Some(mob));
        }
    }

    mod command_tests {
        use super::*;

        fn texts(outputs: &[Output]) -> Vec<String> {
            outputs
                .iter()
                .filter_map(Output::as_chat)
                .map(|chat| chat.text().to_string())
                .collect()
        }

        #[test]
        fn toggle_needs_permission() {
            let (_dir, mut world, mut plugin) = enabled("1.15.2");
            let player = world.spawn_player(DVec3::ZERO, DVec3::Z);
            world.set_permissions(player, Permissions::USE);

            let out = plugin.on_command(&world, CommandSender::Player(player), &[]);
            assert_eq!(texts(&out), vec!["Missing permission: command.vector.toggle"]);
            assert!(!plugin.activation().is_active());
        }

        #[test]
        fn help_needs_no_permission() {
            let (_dir, mut world, mut plugin) = enabled("1.15.2");
            let player = world.spawn_player(DVec3::ZERO, DVec3::Z);
            world.set_permissions(player, Permissions::empty());
            let out = plugin.on_command(&world, CommandSender::Player(player), &["help"]);
            assert_eq!(texts(&out), vec![HELP_TEXT]);
        }

        #[test]
        fn config_set_echoes_and_reloads() {
            let (_dir, world, mut plugin) = enabled("1.15.2");
            let out = plugin.on_command(&world, CommandSender::Console, &["config", "max-velocity-double", "10"]);
            assert_eq!(texts(&out), vec!["max-velocity-double: 10.0"]);

            let _ = plugin.on_tick(&world);
            assert_eq!(plugin.config().max_velocity, 10.0);
        }

        #[test]
        fn invalid_value_is_reported_and_file_kept() {
            let (_dir, world, mut plugin) = enabled("1.15.2");
            let before = plugin.config_file().read_text().unwrap();
            let out = plugin.on_command(&world, CommandSender::Console, &["config", "max-velocity-double", "-5"]);
            assert_eq!(
                texts(&out),
                vec!["Invalid value for max-velocity-double: '-5' (must not be negative)"]
            );
            assert_eq!(plugin.config_file().read_text().unwrap(), before);
        }

        #[test]
        fn show_describes_key() {
            let (_dir, world, mut plugin) = enabled("1.15.2");
            let out = plugin.on_command(&world, CommandSender::Console, &["config", "set-single-time"]);
            let text = &texts(&out)[0];
            assert!(text.starts_with("If true, the selection is released after a single pull."));
            assert!(text.ends_with("Current set-single-time: false"));
        }

        #[test]
        fn reset_restores_defaults() {
            let (_dir, world, mut plugin) = enabled("1.15.2");
            let _ = plugin.on_command(&world, CommandSender::Console, &["config", "visibility-length-double", "8"]);
            let _ = plugin.on_tick(&world);
            assert_eq!(plugin.config().visibility_length, 8.0);

            let out = plugin.on_command(&world, CommandSender::Console, &["config", "reset"]);
            assert_eq!(texts(&out), vec!["Config reset to defaults"]);
            let _ = plugin.on_tick(&world);
            assert_eq!(plugin.config(), &Config::default());
            assert_eq!(
                plugin.config_file().read_text().unwrap(),
                ConfigFile::default_text()
            );
        }

        #[test]
        fn unknown_key_and_args() {
            let (_dir, world, mut plugin) = enabled("1.15.2");
            let out = plugin.on_command(&world, CommandSender::Console, &["config", "speed", "3"]);
            assert_eq!(texts(&out), vec!["Unrecognized key: 'speed'"]);
            let out = plugin.on_command(&world, CommandSender::Console, &["fly"]);
            assert_eq!(texts(&out), vec!["Unrecognized args: 'fly'"]);
            let out = plugin.on_command(&world, CommandSender::Console, &["config"]);
            assert_eq!(texts(&out), vec!["Required: key, value"]);
        }

        #[test]
        fn replies_go_to_sender() {
            let (_dir, mut world, mut plugin) = enabled("1.15.2");
            let player = world.spawn_player(DVec3::ZERO, DVec3::Z);
            let out = plugin.on_command(&world, CommandSender::Player(player), &["help"]);
            world.apply_outputs(out);
            assert_eq!(world.messages_to(CommandSender::Player(player)), vec![HELP_TEXT]);
            assert!(world.messages_to(CommandSender::Console).is_empty());
        }

        #[test]
        fn tab_completion_uses_registry() {
            let (_dir, _, plugin) = enabled("1.15.2");
            let plugin = plugin.with_registry(Box::new(StaticItemRegistry::new(["WAND", "WALL"])));
            assert_eq!(plugin.on_tab_complete(&["config", "vector-item", "wa"]), vec!["WALL", "WAND"]);
            assert_eq!(
                plugin.on_tab_complete(&["config", "max"]),
                vec![ConfigKey::MaxVelocity.as_str()]
            );
        }
    }
}
