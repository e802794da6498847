//! Pull velocity towards the aim point.
//!
//! The pull is proportional to the offset near the target and capped far
//! away:
//!
//! ```text
//! |d| <  max / modifier  ->  v = d * modifier
//! |d| >= max / modifier  ->  v = normalize(d) * max
//! ```
//!
//! Both branches agree at the crossover, so the speed is
//! `min(|d| * modifier, max)` everywhere.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::entity::{Entity, EntityId};
use crate::output::{Command, Output};
use crate::raytrace::RayTracer;
use crate::selection::SelectionTable;
use crate::targeting::compute_aim_point;
use crate::world_view::WorldView;

/// Velocity for an entity `offset` away from its target.
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use vector_core::velocity::pull_velocity;
///
/// // Proportional: 3 * 2 < 10
/// let v = pull_velocity(DVec3::new(3.0, 0.0, 0.0), 2.0, 10.0);
/// assert!((v.length() - 6.0).abs() < 1e-9);
///
/// // Capped: 8 * 2 > 10
/// let v = pull_velocity(DVec3::new(0.0, 8.0, 0.0), 2.0, 10.0);
/// assert!((v - DVec3::new(0.0, 10.0, 0.0)).length() < 1e-9);
/// ```
#[must_use]
pub fn pull_velocity(offset: DVec3, modifier: f64, max_velocity: f64) -> DVec3 {
    if offset.length() < max_velocity / modifier {
        offset * modifier
    } else {
        offset.normalize_or_zero() * max_velocity
    }
}

/// Result of [`apply_pull`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PullOutcome {
    /// A velocity was computed for the selected entity.
    Applied {
        /// The pulled entity
        entity: EntityId,
        /// Velocity to set
        velocity: DVec3,
        /// True if the selection was released (single-use mode)
        released: bool,
    },
    /// The player has no usable selection.
    NoSelection,
}

impl PullOutcome {
    /// The `SetVelocity` output for an applied pull.
    #[must_use]
    pub fn output(&self) -> Option<Output> {
        match self {
            Self::Applied { entity, velocity, .. } => Some(Output::Command(Command::SetVelocity {
                target: *entity,
                velocity: *velocity,
            })),
            Self::NoSelection => None,
        }
    }
}

/// Pulls `player`'s selected entity towards the player's aim point.
///
/// Returns [`PullOutcome::NoSelection`] without touching anything when the
/// player has no selection. A selection whose entity is gone, invalid or in
/// another world than the player is released and also reported as
/// `NoSelection`. In single-use mode the selection is released after the
/// pull.
pub fn apply_pull(
    view: &dyn WorldView,
    tracer: &dyn RayTracer,
    selections: &mut SelectionTable,
    player: &Entity,
    config: &Config,
) -> PullOutcome {
    let Some(selected) = selections.get(player.id()) else {
        return PullOutcome::NoSelection;
    };
    let Some(entity) = view.valid_entity(selected) else {
        selections.release(player.id());
        debug!(player = %player.id(), entity = %selected, "released stale selection");
        return PullOutcome::NoSelection;
    };
    if entity.world() != player.world() {
        selections.release(player.id());
        debug!(player = %player.id(), entity = %selected, "released cross-world selection");
        return PullOutcome::NoSelection;
    }

    let aim = compute_aim_point(view, tracer, player, config);
    let velocity = pull_velocity(aim - entity.location(), config.velocity_modifier, config.max_velocity);

    let released = config.single_use;
    if released {
        selections.release(player.id());
    }
    debug!(player = %player.id(), entity = %selected, speed = velocity.length(), released, "pulled entity");

    PullOutcome::Applied {
        entity: selected,
        velocity,
        released,
    }
}
