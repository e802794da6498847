//! Player to entity selections.
//!
//! Each player has at most one selected entity. Entries are created by the
//! picker, removed when the player quits, when either side becomes invalid,
//! or after a single-use pull.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Map from player id to selected entity id.
///
/// Iteration is in player id order so tick output is deterministic.
///
/// ```
/// use vector_core::entity::EntityId;
/// use vector_core::selection::SelectionTable;
///
/// let mut table = SelectionTable::new();
/// let player = EntityId::new(1);
///
/// table.select(player, EntityId::new(10));
/// assert_eq!(table.select(player, EntityId::new(11)), Some(EntityId::new(10)));
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.get(player), Some(EntityId::new(11)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTable {
    entries: BTreeMap<EntityId, EntityId>,
}

impl SelectionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `entity` for `player`, returning the previous selection.
    pub fn select(&mut self, player: EntityId, entity: EntityId) -> Option<EntityId> {
        self.entries.insert(player, entity)
    }

    /// The entity selected by `player`.
    #[must_use]
    pub fn get(&self, player: EntityId) -> Option<EntityId> {
        self.entries.get(&player).copied()
    }

    /// Removes `player`'s selection.
    pub fn release(&mut self, player: EntityId) -> Option<EntityId> {
        self.entries.remove(&player)
    }

    /// Iterates `(player, entity)` pairs in player order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, EntityId)> + '_ {
        self.entries.iter().map(|(&player, &entity)| (player, entity))
    }

    /// Number of selections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nobody has a selection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every selection.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keeps only the pairs for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(EntityId, EntityId) -> bool,
    {
        self.entries.retain(|&player, &mut entity| keep(player, entity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_and_clear() {
        let mut table = SelectionTable::new();
        table.select(EntityId::new(1), EntityId::new(5));
        table.select(EntityId::new(2), EntityId::new(6));

        assert_eq!(table.release(EntityId::new(1)), Some(EntityId::new(5)));
        assert_eq!(table.release(EntityId::new(1)), None);
        assert_eq!(table.len(), 1);

        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn iterates_in_player_order() {
        let mut table = SelectionTable::new();
        table.select(EntityId::new(9), EntityId::new(1));
        table.select(EntityId::new(3), EntityId::new(2));
        let players: Vec<_> = table.iter().map(|(player, _)| player).collect();
        assert_eq!(players, vec![EntityId::new(3), EntityId::new(9)]);
    }

    #[test]
    fn retain_drops_rejected_pairs() {
        let mut table = SelectionTable::new();
        table.select(EntityId::new(1), EntityId::new(10));
        table.select(EntityId::new(2), EntityId::new(20));
        table.retain(|_, entity| entity != EntityId::new(20));
        assert_eq!(table.get(EntityId::new(1)), Some(EntityId::new(10)));
        assert_eq!(table.get(EntityId::new(2)), None);
    }
}
