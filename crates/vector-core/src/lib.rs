//! # Vector Core
//!
//! Entity selection and pulling for the Vector game-server plugin.
//!
//! A player holding the configured item picks an entity by looking at it and
//! then pulls it towards the point they are aiming at. While active, a
//! particle trail joins every selected entity to its player's aim point.
//!
//! ## Architecture
//!
//! The host owns the world. The plugin sees it through the read-only
//! [`WorldView`] and answers every event with [`Output`]s that the host
//! applies afterwards.
//!
//! - **Aiming**: [`targeting`] finds the aim point, [`picker`] the entity
//!   under the crosshair, both through a version-dependent [`RayTracer`]
//! - **Pulling**: [`velocity`] turns the offset to the aim point into a
//!   capped velocity
//! - **Feedback**: [`particles`] draws the trails once per tick
//! - **Control**: [`command`] parses `/vector`; [`config`] keeps the
//!   hot-reloaded `config.yml`
//! - **State**: [`plugin::VectorPlugin`] owns everything mutable
//!
//! [`world::World`] is an in-memory host used by tests, benches and the
//! harness binary.
//!
//! ## Usage
//!
//! ```
//! use glam::DVec3;
//! use vector_core::command::CommandSender;
//! use vector_core::interaction::{Action, InteractEvent};
//! use vector_core::item::ItemType;
//! use vector_core::{VectorPlugin, World};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut world = World::new("1.16.5");
//! let player = world.spawn_player(DVec3::new(0.0, 64.0, 0.0), DVec3::Z);
//! let mob = world.spawn_mob(DVec3::new(0.0, 64.0, 6.0));
//!
//! let mut plugin = VectorPlugin::new(dir.path());
//! plugin.on_enable(&world).unwrap();
//! let _ = plugin.on_command(&world, CommandSender::Console, &[]);
//!
//! // First right click selects, the second one pulls
//! let click = InteractEvent::new(player, Action::RightClickAir, ItemType::new("BLAZE_ROD"));
//! plugin.on_interact(&world, &click);
//! assert_eq!(plugin.selections().get(player), Some(mob));
//!
//! let response = plugin.on_interact(&world, &click);
//! world.apply_outputs(response.outputs);
//! world.step();
//! assert!(world.get_mut(mob).unwrap().location().z > 6.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod activation;
pub mod command;
pub mod config;
pub mod entity;
pub mod error;
pub mod interaction;
pub mod item;
pub mod output;
pub mod particles;
pub mod permission;
pub mod picker;
pub mod plugin;
pub mod raytrace;
pub mod selection;
pub mod targeting;
pub mod velocity;
pub mod world;
pub mod world_view;

#[cfg(test)]
mod tests;

pub use activation::ActivationState;
pub use config::{Config, ConfigKey, ConfigValue};
pub use entity::{Entity, EntityId, EntityKind, WorldId};
pub use error::{CommandError, ConfigError};
pub use output::Output;
pub use plugin::VectorPlugin;
pub use raytrace::{RayBackend, RayTracer};
pub use selection::SelectionTable;
pub use world::World;
pub use world_view::WorldView;
