//! Outputs emitted by the plugin core.
//!
//! Core operations never touch the host directly. They read through a
//! [`WorldView`](crate::world_view::WorldView) and return [`Output`] values
//! which the host applies after the callback returns.
//!
//! # Categories
//!
//! - [`Command`]: Entity state changes (`SetVelocity`)
//! - [`Effect`]: Purely visual feedback (`Particle`)
//! - [`Chat`]: Text for players or the console (`Broadcast`, `Message`)
//!
//! # Example
//!
//! ```
//! use vector_core::output::{Command, Output, OutputKind};
//! use vector_core::entity::EntityId;
//! use glam::DVec3;
//!
//! let output = Output::from(Command::SetVelocity {
//!     target: EntityId::new(3),
//!     velocity: DVec3::new(0.0, 0.5, 1.0),
//! });
//!
//! assert_eq!(output.kind(), OutputKind::Command);
//! assert_eq!(output.as_command().and_then(Command::target), Some(EntityId::new(3)));
//! ```

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::command::CommandSender;
use crate::entity::{EntityId, WorldId};

// =============================================================================
// Particle Color
// =============================================================================

/// RGB colour of a dust particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticleColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl ParticleColor {
    /// Creates a colour from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Draws each channel uniformly from `0..255`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen_range(0..255),
            g: rng.gen_range(0..255),
            b: rng.gen_range(0..255),
        }
    }
}

impl fmt::Display for ParticleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// =============================================================================
// Output Categories
// =============================================================================

/// Entity state changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replace an entity's velocity.
    SetVelocity {
        /// Entity to modify
        target: EntityId,
        /// New velocity (blocks per tick)
        velocity: DVec3,
    },
}

impl Command {
    /// Returns the entity this command changes.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        match self {
            Self::SetVelocity { target, .. } => Some(*target),
        }
    }
}

/// Visual effects with no gameplay consequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// A single coloured dust particle.
    Particle {
        /// World to spawn in
        world: WorldId,
        /// Spawn position
        position: DVec3,
        /// Particle colour
        color: ParticleColor,
    },
}

/// Chat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chat {
    /// Sent to every player and the console.
    Broadcast {
        /// Message text
        text: String,
    },
    /// Sent to one command sender.
    Message {
        /// Who receives the text
        recipient: CommandSender,
        /// Message text
        text: String,
    },
}

impl Chat {
    /// The message text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Broadcast { text } | Self::Message { text, .. } => text,
        }
    }
}

/// Categories of [`Output`], used for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Entity state changes
    Command,
    /// Visual effects
    Effect,
    /// Chat text
    Chat,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Effect => write!(f, "Effect"),
            Self::Chat => write!(f, "Chat"),
        }
    }
}

/// Something the host should do on behalf of the plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Entity state change
    Command(Command),
    /// Visual effect
    Effect(Effect),
    /// Chat text
    Chat(Chat),
}

impl Output {
    /// Returns the kind of this output.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Effect(_) => OutputKind::Effect,
            Self::Chat(_) => OutputKind::Chat,
        }
    }

    /// Shorthand for a broadcast.
    #[must_use]
    pub fn broadcast(text: impl Into<String>) -> Self {
        Self::Chat(Chat::Broadcast { text: text.into() })
    }

    /// Shorthand for a message to one sender.
    #[must_use]
    pub fn message(recipient: CommandSender, text: impl Into<String>) -> Self {
        Self::Chat(Chat::Message {
            recipient,
            text: text.into(),
        })
    }

    /// Returns the command if this is a command output.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// Returns the effect if this is an effect output.
    #[must_use]
    pub const fn as_effect(&self) -> Option<&Effect> {
        match self {
            Self::Effect(effect) => Some(effect),
            _ => None,
        }
    }

    /// Returns the chat text if this is a chat output.
    #[must_use]
    pub const fn as_chat(&self) -> Option<&Chat> {
        match self {
            Self::Chat(chat) => Some(chat),
            _ => None,
        }
    }
}

impl From<Command> for Output {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}

impl From<Effect> for Output {
    fn from(effect: Effect) -> Self {
        Self::Effect(effect)
    }
}

impl From<Chat> for Output {
    fn from(chat: Chat) -> Self {
        Self::Chat(chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    mod color_tests {
        use super::*;

        #[test]
        fn random_is_reproducible_per_seed() {
            let mut a = ChaCha8Rng::seed_from_u64(7);
            let mut b = ChaCha8Rng::seed_from_u64(7);
            for _ in 0..32 {
                assert_eq!(ParticleColor::random(&mut a), ParticleColor::random(&mut b));
            }
        }

        #[test]
        fn channels_never_reach_255() {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            for _ in 0..2_000 {
                let color = ParticleColor::random(&mut rng);
                assert!(color.r < 255 && color.g < 255 && color.b < 255);
            }
        }

        #[test]
        fn display_is_hex() {
            assert_eq!(ParticleColor::new(255, 0, 16).to_string(), "#ff0010");
        }
    }

    mod output_tests {
        use super::*;

        #[test]
        fn kinds_and_accessors() {
            let chat = Output::broadcast("Vector On");
            assert_eq!(chat.kind(), OutputKind::Chat);
            assert_eq!(chat.as_chat().map(Chat::text), Some("Vector On"));
            assert!(chat.as_command().is_none());

            let effect = Output::from(Effect::Particle {
                world: WorldId::OVERWORLD,
                position: DVec3::ZERO,
                color: ParticleColor::new(1, 2, 3),
            });
            assert_eq!(effect.kind(), OutputKind::Effect);
            assert!(effect.as_effect().is_some());
        }

        #[test]
        fn serialization_roundtrip() {
            let output = Output::message(CommandSender::Player(EntityId::new(4)), "Required: key, value");
            let json = serde_json::to_string(&output).unwrap();
            let back: Output = serde_json::from_str(&json).unwrap();
            assert_eq!(output, back);
        }
    }
}
