//! Entity selection by line of sight.

use serde::{Deserialize, Serialize};
use tracing::debug;

use vector_geom::Segment;

use crate::config::Config;
use crate::entity::{Entity, EntityId};
use crate::raytrace::RayTracer;
use crate::targeting::compute_aim_point;
use crate::world_view::WorldView;

/// How far the sight line extends past the aim point, in blocks.
pub const PICK_TOLERANCE: f64 = 5.0;

/// An entity found by [`pick_entity`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// The picked entity
    pub entity: EntityId,
    /// Distance from the player's eye to the entity's feet
    pub distance: f64,
}

/// The sight line used for picking: eye to aim point, extended by
/// [`PICK_TOLERANCE`].
#[must_use]
pub fn sight_line(view: &dyn WorldView, tracer: &dyn RayTracer, player: &Entity, config: &Config) -> Segment {
    let aim = compute_aim_point(view, tracer, player, config);
    Segment::new(player.eye_position(), aim).extended(PICK_TOLERANCE)
}

/// Finds the entity `player` is looking at.
///
/// Every valid entity in the player's world other than the player is
/// tested: its hit box is scaled by `hitbox_expansion` and traced against
/// the [`sight_line`]. Of the entities hit, the one whose feet are closest
/// to the player's eye wins. On equal distance the lower id wins.
///
/// Returns `None` when nothing is hit.
#[must_use]
pub fn pick_entity(view: &dyn WorldView, tracer: &dyn RayTracer, player: &Entity, config: &Config) -> Option<Pick> {
    let eye = player.eye_position();
    let line = sight_line(view, tracer, player, config);
    let reach = line.length();

    let mut best: Option<Pick> = None;
    for candidate in view.entities_in(player.world()) {
        if candidate.id() == player.id() || !candidate.is_valid() {
            continue;
        }
        let bounds = candidate.bounding_box().scaled(config.hitbox_expansion);
        if tracer.trace_entity(&bounds, eye, line.end, reach).is_none() {
            continue;
        }

        let distance = eye.distance(candidate.location());
        if best.map_or(true, |pick| distance < pick.distance) {
            best = Some(Pick {
                entity: candidate.id(),
                distance,
            });
        }
    }

    if let Some(pick) = best {
        debug!(player = %player.id(), entity = %pick.entity, distance = pick.distance, "picked entity");
    }
    best
}
