//! Item-use events and what they trigger.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::item::ItemType;
use crate::output::Output;

/// The kind of click in an interaction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Left click at nothing
    LeftClickAir,
    /// Left click at a block
    LeftClickBlock,
    /// Right click at nothing
    RightClickAir,
    /// Right click at a block
    RightClickBlock,
    /// Stepping on a pressure plate or similar
    Physical,
}

impl Action {
    /// Returns true for either left click.
    #[must_use]
    pub const fn is_left_click(self) -> bool {
        matches!(self, Self::LeftClickAir | Self::LeftClickBlock)
    }

    /// Returns true for either right click.
    #[must_use]
    pub const fn is_right_click(self) -> bool {
        matches!(self, Self::RightClickAir | Self::RightClickBlock)
    }
}

/// A player using an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractEvent {
    /// Acting player
    pub player: EntityId,
    /// Click kind
    pub action: Action,
    /// Held item, if any
    pub item: Option<ItemType>,
}

impl InteractEvent {
    /// Creates an event with an item in hand.
    #[must_use]
    pub fn new(player: EntityId, action: Action, item: ItemType) -> Self {
        Self {
            player,
            action,
            item: Some(item),
        }
    }
}

/// What an interaction should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Pull the selection; pick a new one if there is none
    PullOrPick,
    /// Pick a new selection
    Pick,
    /// Pull the selection
    Pull,
    /// Nothing
    Ignore,
}

impl Intent {
    /// Maps a click to an intent.
    ///
    /// With both hands, right click picks and left click pulls. Otherwise
    /// right click does both and left click does nothing.
    ///
    /// ```
    /// use vector_core::interaction::{Action, Intent};
    ///
    /// assert_eq!(Intent::for_action(Action::RightClickAir, false), Intent::PullOrPick);
    /// assert_eq!(Intent::for_action(Action::LeftClickBlock, true), Intent::Pull);
    /// assert_eq!(Intent::for_action(Action::LeftClickAir, false), Intent::Ignore);
    /// ```
    #[must_use]
    pub const fn for_action(action: Action, both_hands: bool) -> Self {
        match (action.is_right_click(), action.is_left_click(), both_hands) {
            (true, _, false) => Self::PullOrPick,
            (true, _, true) => Self::Pick,
            (_, true, true) => Self::Pull,
            _ => Self::Ignore,
        }
    }
}

/// Result of handling an interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractResponse {
    /// Whether the host should cancel the event
    pub cancelled: bool,
    /// Effects to apply
    pub outputs: Vec<Output>,
}

impl InteractResponse {
    /// A response that lets the event through untouched.
    #[must_use]
    pub fn pass() -> Self {
        Self::default()
    }

    /// A cancelling response carrying `outputs`.
    #[must_use]
    pub fn cancel(outputs: Vec<Output>) -> Self {
        Self {
            cancelled: true,
            outputs,
        }
    }
}
