//! Runs the Vector plugin against an in-memory world and prints a summary.
//!
//! ```text
//! vector-harness [--version <host version>] [--ticks <n>] [--data-dir <dir>] [--json]
//! ```
//!
//! The scenario: a player faces a row of mobs behind a patch of tall grass,
//! switches Vector on, selects the nearest mob and keeps pulling it while
//! the particle task runs. Half way through, the player tightens the
//! velocity cap from the command line.

mod telemetry;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use glam::DVec3;
use serde::Serialize;
use tracing::info;
use vector_core::command::CommandSender;
use vector_core::interaction::{Action, InteractEvent};
use vector_core::item::ItemType;
use vector_core::world_view::{BlockKind, WorldView};
use vector_core::{EntityId, VectorPlugin, World, WorldId};
use vector_geom::BlockPos;

/// Parsed command line.
#[derive(Debug)]
struct Args {
    version: String,
    ticks: u32,
    data_dir: Option<PathBuf>,
    json: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            version: "git-Paper-100 (MC: 1.16.5)".to_string(),
            ticks: 40,
            data_dir: None,
            json: false,
        }
    }
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> Result<Self> {
        let mut args = Self::default();
        while let Some(flag) = raw.next() {
            match flag.as_str() {
                "--version" => args.version = raw.next().context("--version needs a value")?,
                "--ticks" => {
                    let value = raw.next().context("--ticks needs a value")?;
                    args.ticks = value.parse().with_context(|| format!("invalid tick count '{value}'"))?;
                }
                "--data-dir" => args.data_dir = Some(raw.next().context("--data-dir needs a value")?.into()),
                "--json" => args.json = true,
                other => bail!("unknown argument '{other}'"),
            }
        }
        Ok(args)
    }
}

/// What the run produced.
#[derive(Debug, Serialize)]
struct Summary {
    host_version: String,
    backend: String,
    ticks: u64,
    selected: Option<u64>,
    mob_start: [f64; 3],
    mob_end: [f64; 3],
    particles: usize,
    broadcasts: Vec<String>,
    replies: Vec<String>,
}

fn main() -> Result<()> {
    telemetry::init("info")?;
    let args = Args::parse(std::env::args().skip(1))?;

    // Keep the temporary directory alive for the whole run
    let temp = tempfile::tempdir().context("creating data directory")?;
    let data_dir = args.data_dir.clone().unwrap_or_else(|| temp.path().to_path_buf());

    let summary = run(&args, data_dir)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("backend:    {}", summary.backend);
        println!("selected:   {:?}", summary.selected);
        println!("mob moved:  {:?} -> {:?}", summary.mob_start, summary.mob_end);
        println!("particles:  {}", summary.particles);
        for line in summary.broadcasts.iter().chain(&summary.replies) {
            println!("chat:       {line}");
        }
    }
    Ok(())
}

fn run(args: &Args, data_dir: PathBuf) -> Result<Summary> {
    let mut world = World::new(&args.version);
    let player = world.spawn_player(DVec3::new(0.0, 64.0, 0.0), DVec3::Z);
    let mob = world.spawn_mob(DVec3::new(0.0, 64.0, 8.0));
    for z in [12.0, 16.0] {
        world.spawn_mob(DVec3::new(0.0, 64.0, z));
    }
    // Tall grass in front of the far mobs: only legacy hosts stop at it
    world.set_block(WorldId::OVERWORLD, BlockPos::new(0, 65, 10), BlockKind::Passable);

    let mut plugin = VectorPlugin::new(&data_dir);
    plugin
        .on_enable(&world)
        .with_context(|| format!("enabling with data directory {}", data_dir.display()))?;
    info!(backend = ?plugin.backend(), data_dir = %data_dir.display(), "harness started");

    let mut replies = Vec::new();
    let mut command = |plugin: &mut VectorPlugin, world: &mut World, args: &[&str]| {
        let outputs = plugin.on_command(&*world, CommandSender::Player(player), args);
        world.apply_outputs(outputs);
        let seen = replies.len();
        let texts = world.messages_to(CommandSender::Player(player));
        replies.extend(texts.into_iter().skip(seen).map(str::to_string));
    };

    command(&mut plugin, &mut world, &[]);
    let click = InteractEvent::new(player, Action::RightClickAir, ItemType::default());
    let mob_start = location(&world, mob)?;

    for tick in 0..args.ticks {
        if tick == args.ticks / 2 {
            command(&mut plugin, &mut world, &["config", "max-velocity-double", "0.5"]);
        }
        let response = plugin.on_interact(&world, &click);
        world.apply_outputs(response.outputs);
        let outputs = plugin.on_tick(&world);
        world.apply_outputs(outputs);
        world.step();
    }

    let summary = Summary {
        host_version: args.version.clone(),
        backend: format!("{:?}", plugin.backend()),
        ticks: world.current_tick(),
        selected: plugin.selections().get(player).map(EntityId::as_u64),
        mob_start,
        mob_end: location(&world, mob)?,
        particles: world.particles().len(),
        broadcasts: world.broadcasts().to_vec(),
        replies,
    };
    plugin.on_disable();
    Ok(summary)
}

fn location(world: &World, id: EntityId) -> Result<[f64; 3]> {
    let entity = world.entity(id).with_context(|| format!("entity {id} vanished"))?;
    Ok(entity.location().to_array())
}
