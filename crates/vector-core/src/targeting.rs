//! Aim point computation.

use glam::DVec3;

use crate::config::Config;
use crate::entity::Entity;
use crate::raytrace::RayTracer;
use crate::world_view::WorldView;

/// Where `player` is aiming.
///
/// Casts a ray from the eye along the view direction for
/// `visibility_length` blocks. On a block hit the result is the center of
/// the cell in front of the struck face; otherwise it is the point exactly
/// `visibility_length` along the view. The result is never farther than
/// `visibility_length` from the eye.
///
/// An eye inside a block the tracer stops at hits that block on the face
/// opposite the view, so the aim point is the cell behind the player. The
/// legacy backend does this inside grass and other passable blocks.
///
/// # Arguments
///
/// * `view` - Host world
/// * `tracer` - Backend used for the block trace
/// * `player` - Aiming player
/// * `config` - Supplies `visibility_length`
#[must_use]
pub fn compute_aim_point(view: &dyn WorldView, tracer: &dyn RayTracer, player: &Entity, config: &Config) -> DVec3 {
    let eye = player.eye_position();
    let direction = player.direction();
    let reach = config.visibility_length;

    match tracer.trace_block(view, player.world(), eye, direction, reach) {
        Some(hit) => {
            let front = hit.front_center();
            // A face center can sit up to half a cell past the hit point
            if front.distance(eye) > reach {
                eye + (front - eye).clamp_length_max(reach)
            } else {
                front
            }
        }
        None => eye + direction * reach,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::{Body, Transform};
    use crate::entity::{EntityKind, WorldId};
    use crate::raytrace::{LegacyRayTracer, ModernRayTracer};
    use crate::world::World;
    use crate::world_view::{BlockKind, WorldView};
    use proptest::prelude::*;
    use vector_geom::BlockPos;

    fn player_looking(world: &mut World, direction: DVec3) -> Entity {
        let id = world.spawn(
            EntityKind::Player,
            WorldId::OVERWORLD,
            Transform::at(DVec3::new(0.5, 64.0, 0.5)).looking(direction),
            Body::PLAYER,
        );
        world.entity(id).unwrap()
    }

    #[test]
    fn open_air_reaches_visibility_length() {
        let mut world = World::new("1.15.2");
        let player = player_looking(&mut world, DVec3::Z);
        let config = Config::default();

        let aim = compute_aim_point(&world, &ModernRayTracer, &player, &config);
        let expected = player.eye_position() + DVec3::Z * 20.0;
        assert!(aim.distance(expected) < 1e-9);
    }

    #[test]
    fn wall_gives_cell_in_front_of_face() {
        let mut world = World::new("1.15.2");
        world.set_block(WorldId::OVERWORLD, BlockPos::new(0, 65, 6), BlockKind::Solid);
        let player = player_looking(&mut world, DVec3::Z);

        let aim = compute_aim_point(&world, &ModernRayTracer, &player, &Config::default());
        assert_eq!(aim, DVec3::new(0.5, 65.5, 5.5));
    }

    #[test]
    fn legacy_stops_at_grass() {
        let mut world = World::new("1.12.2");
        world.set_block(WorldId::OVERWORLD, BlockPos::new(0, 65, 4), BlockKind::Passable);
        world.set_block(WorldId::OVERWORLD, BlockPos::new(0, 65, 9), BlockKind::Solid);
        let player = player_looking(&mut world, DVec3::Z);
        let config = Config::default();

        let legacy = compute_aim_point(&world, &LegacyRayTracer, &player, &config);
        let modern = compute_aim_point(&world, &ModernRayTracer, &player, &config);
        assert_eq!(legacy, DVec3::new(0.5, 65.5, 3.5));
        assert_eq!(modern, DVec3::new(0.5, 65.5, 8.5));
    }

    #[test]
    fn eye_inside_grass_aims_behind_on_legacy() {
        let mut world = World::new("1.12.2");
        world.set_block(WorldId::OVERWORLD, BlockPos::new(0, 65, 0), BlockKind::Passable);
        let player = player_looking(&mut world, DVec3::Z);
        let config = Config::default();

        let legacy = compute_aim_point(&world, &LegacyRayTracer, &player, &config);
        assert_eq!(legacy, DVec3::new(0.5, 65.5, -0.5));
        assert!(legacy.z < player.eye_position().z);

        let modern = compute_aim_point(&world, &ModernRayTracer, &player, &config);
        assert!(modern.distance(player.eye_position() + DVec3::Z * 20.0) < 1e-9);
    }

    proptest! {
        #[test]
        fn aim_point_never_exceeds_visibility(
            dx in -1.0f64..1.0,
            dy in -1.0f64..1.0,
            dz in -1.0f64..1.0,
            reach in 0.5f64..40.0,
            wall in 1i32..30,
        ) {
            let mut world = World::new("1.15.2");
            for x in -40..=40 {
                for y in 24..=104 {
                    world.set_block(WorldId::OVERWORLD, BlockPos::new(x, y, wall), BlockKind::Solid);
                }
            }
            let player = player_looking(&mut world, DVec3::new(dx, dy, dz));
            let config = Config { visibility_length: reach, ..Config::default() };

            for tracer in [&ModernRayTracer as &dyn RayTracer, &LegacyRayTracer] {
                let aim = compute_aim_point(&world, tracer, &player, &config);
                prop_assert!(aim.distance(player.eye_position()) <= reach + 1e-9);
            }
        }
    }
}
