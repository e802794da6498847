//! Permission nodes checked by the plugin.
//!
//! Hosts answer permission checks through
//! [`WorldView::has_permission`](crate::world_view::WorldView::has_permission).
//! [`Permissions`] is a compact set used by the in-memory world to store
//! grants per player.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single permission node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Select and pull entities with the vector item
    Use,
    /// Toggle the plugin on and off
    Toggle,
    /// Read and change the configuration file
    Config,
}

impl Permission {
    /// All nodes, in declaration order.
    pub const ALL: [Self; 3] = [Self::Use, Self::Toggle, Self::Config];

    /// The host-side permission node string.
    #[must_use]
    pub const fn node(self) -> &'static str {
        match self {
            Self::Use => "command.vector.use",
            Self::Toggle => "command.vector.toggle",
            Self::Config => "command.vector.config",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.node())
    }
}

bitflags! {
    /// A set of granted [`Permission`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Permissions: u8 {
        /// `command.vector.use`
        const USE = 1 << 0;
        /// `command.vector.toggle`
        const TOGGLE = 1 << 1;
        /// `command.vector.config`
        const CONFIG = 1 << 2;
    }
}

impl Permissions {
    /// Returns true if `permission` is in the set.
    #[must_use]
    pub fn grants(self, permission: Permission) -> bool {
        self.contains(Self::from(permission))
    }
}

impl From<Permission> for Permissions {
    fn from(permission: Permission) -> Self {
        match permission {
            Permission::Use => Self::USE,
            Permission::Toggle => Self::TOGGLE,
            Permission::Config => Self::CONFIG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_strings() {
        assert_eq!(Permission::Use.node(), "command.vector.use");
        assert_eq!(Permission::Toggle.to_string(), "command.vector.toggle");
        assert_eq!(Permission::Config.node(), "command.vector.config");
    }

    #[test]
    fn grants_only_members() {
        let set = Permissions::USE | Permissions::CONFIG;
        assert!(set.grants(Permission::Use));
        assert!(set.grants(Permission::Config));
        assert!(!set.grants(Permission::Toggle));
    }

    #[test]
    fn all_grants_everything() {
        for permission in Permission::ALL {
            assert!(Permissions::all().grants(permission));
            assert!(!Permissions::empty().grants(permission));
        }
    }
}
