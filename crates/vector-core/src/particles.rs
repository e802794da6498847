//! Per-tick particle trails between selected entities and aim points.

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::Config;
use crate::entity::WorldId;
use crate::output::{Effect, Output, ParticleColor};
use crate::raytrace::RayTracer;
use crate::selection::SelectionTable;
use crate::targeting::compute_aim_point;
use crate::world_view::WorldView;

/// Distance between consecutive markers, in blocks.
pub const MARKER_SPACING: f64 = 0.2;

/// Markers per block of trail length.
pub const MARKERS_PER_BLOCK: f64 = 5.0;

/// Marker positions from `from` towards `to`.
///
/// Emits `floor(distance * 5)` markers, the first one step away from `from`
/// and each following one a further [`MARKER_SPACING`] along the line.
///
/// ```
/// use glam::DVec3;
/// use vector_core::particles::trail_points;
///
/// let points = trail_points(DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0));
/// assert_eq!(points.len(), 5);
/// assert!((points[0].x - 0.2).abs() < 1e-12);
/// ```
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn trail_points(from: DVec3, to: DVec3) -> Vec<DVec3> {
    let count = (from.distance(to) * MARKERS_PER_BLOCK) as usize;
    let step = (to - from).normalize_or_zero() * MARKER_SPACING;
    (1..=count).map(|i| from + step * i as f64).collect()
}

/// The tick task that renders selections.
///
/// Owns the colour RNG so output is reproducible for a given seed.
#[derive(Debug, Clone)]
pub struct ParticleTask {
    rng: ChaCha8Rng,
}

impl ParticleTask {
    /// Creates a task seeded from the OS.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Creates a task with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Runs one tick.
    ///
    /// Selections whose player or entity is missing or invalid, or whose
    /// player has left the entity's world, are removed. Every remaining pair
    /// gets a trail of randomly coloured particles from the entity towards
    /// the player's aim point.
    pub fn run(
        &mut self,
        view: &dyn WorldView,
        tracer: &dyn RayTracer,
        selections: &mut SelectionTable,
        config: &Config,
    ) -> Vec<Output> {
        selections.retain(|player, entity| {
            let keep = match (view.valid_entity(player), view.valid_entity(entity)) {
                (Some(player), Some(entity)) => player.world() == entity.world(),
                _ => false,
            };
            if !keep {
                debug!(player = %player, entity = %entity, "pruned selection");
            }
            keep
        });

        let mut outputs = Vec::new();
        for (player, entity) in selections.iter() {
            let (Some(player), Some(entity)) = (view.valid_entity(player), view.valid_entity(entity)) else {
                continue;
            };
            let aim = compute_aim_point(view, tracer, &player, config);
            self.emit_trail(entity.world(), entity.location(), aim, &mut outputs);
        }
        outputs
    }

    fn emit_trail(&mut self, world: WorldId, from: DVec3, to: DVec3, outputs: &mut Vec<Output>) {
        for position in trail_points(from, to) {
            outputs.push(Output::Effect(Effect::Particle {
                world,
                position,
                color: ParticleColor::random(&mut self.rng),
            }));
        }
    }
}

impl Default for ParticleTask {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use crate::raytrace::ModernRayTracer;
    use crate::world::World;

    #[test]
    fn count_truncates_distance_times_five() {
        assert_eq!(trail_points(DVec3::ZERO, DVec3::new(0.0, 0.0, 2.19)).len(), 10);
        assert_eq!(trail_points(DVec3::ZERO, DVec3::new(0.0, 0.0, 0.19)).len(), 0);
        assert!(trail_points(DVec3::ONE, DVec3::ONE).is_empty());
    }

    #[test]
    fn markers_are_evenly_spaced_towards_target() {
        let to = DVec3::new(3.0, 4.0, 0.0);
        let points = trail_points(DVec3::ZERO, to);
        assert_eq!(points.len(), 25);
        for pair in points.windows(2) {
            assert!((pair[0].distance(pair[1]) - MARKER_SPACING).abs() < 1e-9);
        }
        assert!(points.last().unwrap().distance(to) < MARKER_SPACING);
    }

    fn scene() -> (World, EntityId, EntityId, SelectionTable) {
        let mut world = World::new("1.15.2");
        let player = world.spawn_player(DVec3::new(0.0, 64.0, 0.0), DVec3::Z);
        let mob = world.spawn_mob(DVec3::new(0.0, 64.0, 10.0));
        let mut selections = SelectionTable::new();
        selections.select(player, mob);
        (world, player, mob, selections)
    }

    #[test]
    fn run_emits_trail_for_each_selection() {
        let (world, _, _, mut selections) = scene();
        let mut task = ParticleTask::with_seed(3);
        let outputs = task.run(&world, &ModernRayTracer, &mut selections, &Config::default());

        // Mob feet (0, 64, 10) to aim (0, 65.62, 20)
        let distance = DVec3::new(0.0, 64.0, 10.0).distance(DVec3::new(0.0, 65.62, 20.0));
        assert_eq!(outputs.len(), (distance * 5.0) as usize);
        assert!(outputs
            .iter()
            .all(|output| matches!(output, Output::Effect(Effect::Particle { world, .. }) if *world == WorldId::OVERWORLD)));
    }

    #[test]
    fn same_seed_same_colors() {
        let (world, _, _, selections) = scene();
        let mut a = ParticleTask::with_seed(11);
        let mut b = ParticleTask::with_seed(11);
        let config = Config::default();
        let out_a = a.run(&world, &ModernRayTracer, &mut selections.clone(), &config);
        let out_b = b.run(&world, &ModernRayTracer, &mut selections.clone(), &config);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn stale_pairs_are_pruned() {
        let (mut world, player, mob, mut selections) = scene();
        let other = world.spawn_player(DVec3::new(5.0, 64.0, 0.0), DVec3::Z);
        selections.select(other, mob);
        world.despawn(player);

        let mut task = ParticleTask::with_seed(0);
        let _ = task.run(&world, &ModernRayTracer, &mut selections, &Config::default());
        assert_eq!(selections.get(player), None);
        assert_eq!(selections.get(other), Some(mob));

        world.invalidate(mob);
        let outputs = task.run(&world, &ModernRayTracer, &mut selections, &Config::default());
        assert!(outputs.is_empty());
        assert!(selections.is_empty());
    }

    #[test]
    fn pairs_split_across_worlds_are_pruned() {
        let (mut world, player, mob, mut selections) = scene();
        world.change_world(player, WorldId::new(1), DVec3::new(0.0, 64.0, 8000.0));

        let mut task = ParticleTask::with_seed(0);
        let outputs = task.run(&world, &ModernRayTracer, &mut selections, &Config::default());
        assert!(outputs.is_empty());
        assert_eq!(selections.get(player), None);

        // Coming back does not restore the selection
        world.change_world(player, WorldId::OVERWORLD, DVec3::new(0.0, 64.0, 0.0));
        let outputs = task.run(&world, &ModernRayTracer, &mut selections, &Config::default());
        assert!(outputs.is_empty());
    }
}
