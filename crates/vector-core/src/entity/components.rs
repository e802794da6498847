//! Component structs carried by every [`Entity`](super::Entity).
//!
//! Positions are feet positions in block units. Velocities are in blocks per
//! tick, the unit the host applies them in.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Where an entity stands and where it is looking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Feet position
    pub position: DVec3,
    /// View direction (unit length for players; ignored for most mobs)
    pub direction: DVec3,
}

impl Transform {
    /// Creates a transform looking along +Z (south).
    #[must_use]
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            direction: DVec3::Z,
        }
    }

    /// Returns a copy looking along `direction` (normalized).
    #[must_use]
    pub fn looking(mut self, direction: DVec3) -> Self {
        self.direction = direction.normalize_or_zero();
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(DVec3::ZERO)
    }
}

/// Physical size of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Hit box width (X and Z)
    pub width: f64,
    /// Hit box height
    pub height: f64,
    /// Eye height above the feet
    pub eye_height: f64,
}

impl Body {
    /// Player-sized body (0.6 x 1.8, eyes at 1.62).
    pub const PLAYER: Self = Self {
        width: 0.6,
        height: 1.8,
        eye_height: 1.62,
    };

    /// Zombie-sized body.
    pub const HUMANOID: Self = Self {
        width: 0.6,
        height: 1.95,
        eye_height: 1.74,
    };

    /// Dropped-item-sized body.
    pub const SMALL: Self = Self {
        width: 0.25,
        height: 0.25,
        eye_height: 0.2,
    };
}

impl Default for Body {
    fn default() -> Self {
        Self::HUMANOID
    }
}

/// Motion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsState {
    /// Current velocity (blocks per tick)
    pub velocity: DVec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looking_normalizes_direction() {
        let transform = Transform::at(DVec3::ONE).looking(DVec3::new(0.0, 0.0, -4.0));
        assert_eq!(transform.direction, DVec3::NEG_Z);
        assert_eq!(transform.position, DVec3::ONE);
    }

    #[test]
    fn components_are_serializable() {
        let body = Body::PLAYER;
        let json = serde_json::to_string(&body).unwrap();
        let back: Body = serde_json::from_str(&json).unwrap();
        assert_eq!(body, back);
    }
}
