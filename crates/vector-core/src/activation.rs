//! The on/off toggle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the interaction listener and particle task are running.
///
/// Toggling always flips the state; there is no idempotent "turn on".
///
/// ```
/// use vector_core::activation::ActivationState;
///
/// let state = ActivationState::default();
/// assert_eq!(state.toggled(), ActivationState::Active);
/// assert_eq!(state.toggled().toggled(), state);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationState {
    /// Listener and particle task stopped
    #[default]
    Inactive,
    /// Listener and particle task running
    Active,
}

impl ActivationState {
    /// Returns true when active.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// The opposite state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Inactive => Self::Active,
            Self::Active => Self::Inactive,
        }
    }

    /// Message broadcast on entering this state.
    #[must_use]
    pub const fn announcement(self) -> &'static str {
        match self {
            Self::Active => "Vector On",
            Self::Inactive => "Vector Off",
        }
    }
}

impl fmt::Display for ActivationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Active => write!(f, "active"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announcements() {
        assert_eq!(ActivationState::Active.announcement(), "Vector On");
        assert_eq!(ActivationState::Inactive.announcement(), "Vector Off");
    }

    #[test]
    fn toggle_flips() {
        assert!(ActivationState::Inactive.toggled().is_active());
        assert!(!ActivationState::Active.toggled().is_active());
    }
}
