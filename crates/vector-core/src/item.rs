//! Item types and the registry used to validate them.
//!
//! Item names follow the host's upper-case material naming (`BLAZE_ROD`).
//! The configuration command only accepts names the [`ItemRegistry`] knows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the item shipped as the default vector item.
pub const DEFAULT_VECTOR_ITEM: &str = "BLAZE_ROD";

/// An item type, stored as its canonical upper-case name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemType(String);

impl ItemType {
    /// Creates an item type, upper-casing the name.
    ///
    /// No validation happens here; use an [`ItemRegistry`] for that.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_uppercase())
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemType {
    fn default() -> Self {
        Self::new(DEFAULT_VECTOR_ITEM)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves item names to item types.
pub trait ItemRegistry: Send + Sync {
    /// Looks up `name` case-insensitively.
    fn lookup(&self, name: &str) -> Option<ItemType>;

    /// All known item names, for tab completion.
    fn names(&self) -> Vec<String>;
}

/// A registry backed by a fixed name list.
///
/// The default list covers the hand-held items a server operator is likely
/// to pick as the vector item.
///
/// ```
/// use vector_core::item::{ItemRegistry, StaticItemRegistry};
///
/// let registry = StaticItemRegistry::default();
/// assert_eq!(registry.lookup("blaze_rod").unwrap().as_str(), "BLAZE_ROD");
/// assert!(registry.lookup("not_an_item").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct StaticItemRegistry {
    names: Vec<String>,
}

impl StaticItemRegistry {
    /// Common hand-held items.
    pub const COMMON: &'static [&'static str] = &[
        "ARROW",
        "BLAZE_ROD",
        "BONE",
        "BOW",
        "CARROT_ON_A_STICK",
        "COMPASS",
        "DIAMOND_AXE",
        "DIAMOND_HOE",
        "DIAMOND_PICKAXE",
        "DIAMOND_SHOVEL",
        "DIAMOND_SWORD",
        "ENDER_PEARL",
        "FEATHER",
        "FISHING_ROD",
        "FLINT",
        "GOLD_INGOT",
        "IRON_AXE",
        "IRON_INGOT",
        "IRON_SWORD",
        "LEAD",
        "NETHER_STAR",
        "PAPER",
        "SHEARS",
        "SLIME_BALL",
        "STICK",
        "STONE_SWORD",
        "TRIDENT",
        "WOODEN_SWORD",
    ];

    /// Creates a registry from an explicit name list.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_uppercase())
            .filter(|name| !name.is_empty())
            .collect();
        names.sort();
        names.dedup();
        Self { names }
    }
}

impl Default for StaticItemRegistry {
    fn default() -> Self {
        Self::new(Self::COMMON.iter().copied())
    }
}

impl ItemRegistry for StaticItemRegistry {
    fn lookup(&self, name: &str) -> Option<ItemType> {
        let wanted = name.trim().to_uppercase();
        self.names
            .binary_search(&wanted)
            .ok()
            .map(|_| ItemType(wanted))
    }

    fn names(&self) -> Vec<String> {
        self.names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_is_upper_cased() {
        assert_eq!(ItemType::new(" stick ").as_str(), "STICK");
        assert_eq!(ItemType::default().as_str(), DEFAULT_VECTOR_ITEM);
    }

    #[test]
    fn default_registry_contains_default_item() {
        let registry = StaticItemRegistry::default();
        assert_eq!(registry.lookup(DEFAULT_VECTOR_ITEM), Some(ItemType::default()));
    }

    #[test]
    fn custom_registry_dedups_and_sorts() {
        let registry = StaticItemRegistry::new(["stick", "Apple", "STICK", ""]);
        assert_eq!(registry.names(), vec!["APPLE".to_string(), "STICK".to_string()]);
        assert!(registry.lookup("apple").is_some());
        assert!(registry.lookup("blaze_rod").is_none());
    }
}
