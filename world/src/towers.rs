//! Authoritative tower state management utilities.

use std::collections::BTreeMap;
use std::time::Duration;

use path_defence_core::{PixelPoint, TileCoord, TowerId, TowerKind};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Tile occupied by the tower.
    pub(crate) tile: TileCoord,
    /// Pixel position of the tower's center.
    pub(crate) position: PixelPoint,
    /// Time remaining until the tower may fire again.
    pub(crate) cooldown: Duration,
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Clone, Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: u32,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: 0,
        }
    }

    /// Stores a new tower and returns the identifier allocated for it.
    ///
    /// Towers begin with an expired cooldown so they may fire immediately.
    pub(crate) fn insert(
        &mut self,
        kind: TowerKind,
        tile: TileCoord,
        position: PixelPoint,
    ) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id += 1;
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                tile,
                position,
                cooldown: Duration::ZERO,
            },
        );
        id
    }

    /// Removes the tower with the provided identifier, returning its state.
    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    /// Retrieves the tower with the provided identifier.
    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    /// Retrieves mutable access to the tower with the provided identifier.
    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Reports whether any tower occupies the provided tile.
    pub(crate) fn occupies(&self, tile: TileCoord) -> bool {
        self.entries.values().any(|tower| tower.tile == tile)
    }

    /// Iterator over the stored towers in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Mutable iterator over the stored towers in identifier order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    /// Removes every tower while keeping the identifier counter monotonic.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
