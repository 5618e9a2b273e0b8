//! Tray slots and grouped insertion.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EngineError, InvariantViolation, KindId, TileId, TileLocation, TileRegistry};

/// A tile whose tray slot changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub tile: TileId,
    pub slot: usize,
}

/// Slot changes produced by one tray mutation. Never more than a tray's worth.
pub type SlotChanges = SmallVec<[SlotAssignment; 8]>;

/// Ordered, capacity-bounded tile list.
///
/// The tray stores ids only; kinds and locations are read from and written
/// to the [`TileRegistry`] passed into each mutating call.
///
/// ## Usage
///
/// ```
/// use tile_match::core::{BoardPos, KindId, Layer, TileRegistry};
/// use tile_match::tray::Tray;
///
/// let mut tiles = TileRegistry::new();
/// let a1 = tiles.spawn(KindId(1), Layer(0), BoardPos::new(0, 0));
/// let b1 = tiles.spawn(KindId(2), Layer(0), BoardPos::new(1, 0));
/// let a2 = tiles.spawn(KindId(1), Layer(0), BoardPos::new(2, 0));
///
/// let mut tray = Tray::new(7);
/// tray.insert(&mut tiles, a1).unwrap();
/// tray.insert(&mut tiles, b1).unwrap();
///
/// // a2 joins the run of kind 1, pushing b1 one slot to the right
/// let changes = tray.insert(&mut tiles, a2).unwrap();
/// assert_eq!(tray.tiles(), &[a1, a2, b1]);
/// assert_eq!(changes.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tray {
    slots: SmallVec<[TileId; 8]>,
    capacity: usize,
}

impl Tray {
    /// Create an empty tray.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: SmallVec::new(),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.slots.len())
    }

    /// Tiles in slot order.
    #[must_use]
    pub fn tiles(&self) -> &[TileId] {
        &self.slots
    }

    /// Rightmost tile.
    #[must_use]
    pub fn last(&self) -> Option<TileId> {
        self.slots.last().copied()
    }

    #[must_use]
    pub fn contains(&self, tile: TileId) -> bool {
        self.slots.contains(&tile)
    }

    /// Slot index of a tile.
    #[must_use]
    pub fn position(&self, tile: TileId) -> Option<usize> {
        self.slots.iter().position(|&t| t == tile)
    }

    /// Raise capacity to `capacity`. Capacity never shrinks.
    ///
    /// Returns `false` if the tray is already at least that large.
    pub fn raise_capacity(&mut self, capacity: usize) -> bool {
        if capacity <= self.capacity {
            return false;
        }
        self.capacity = capacity;
        true
    }

    /// Insert a board tile next to the run of its kind.
    ///
    /// If a run of the same kind exists the tile lands right after its last
    /// tile and every later tile shifts one slot right. Otherwise the tile is
    /// appended. The tile is tagged `InTray`.
    ///
    /// Returns the new slot of every tile whose slot changed, the inserted
    /// tile included. On error nothing changes.
    pub fn insert(
        &mut self,
        registry: &mut TileRegistry,
        tile: TileId,
    ) -> Result<SlotChanges, EngineError> {
        if self.is_full() {
            return Err(EngineError::TrayFull);
        }

        let entry = registry.get(tile).ok_or(EngineError::UnknownTile(tile))?;
        if !entry.is_on_board() {
            return Err(EngineError::NotSelectable(tile));
        }
        let kind = entry.kind;

        let target = match self.run_end(registry, kind) {
            Some(end) => end + 1,
            None => self.slots.len(),
        };

        self.slots.insert(target, tile);
        registry.set_location(tile, TileLocation::InTray);

        Ok((target..self.slots.len())
            .map(|slot| SlotAssignment {
                tile: self.slots[slot],
                slot,
            })
            .collect())
    }

    /// Index of the last tile of the run holding `kind`.
    fn run_end(&self, registry: &TileRegistry, kind: KindId) -> Option<usize> {
        let start = self
            .slots
            .iter()
            .position(|&id| registry.kind_of(id) == Some(kind))?;
        let run = self.slots[start..]
            .iter()
            .take_while(|&&id| registry.kind_of(id) == Some(kind))
            .count();
        Some(start + run - 1)
    }

    /// Remove and return the rightmost tile.
    pub fn pop_last(&mut self) -> Option<TileId> {
        self.slots.pop()
    }

    /// Remove `removed` and close the gaps.
    ///
    /// Remaining tiles keep their relative order and end up in slots
    /// `0..len`. Returns every tile whose slot changed.
    pub fn remove_and_compact(&mut self, removed: &[TileId]) -> SlotChanges {
        let before = self.slots.clone();
        self.slots.retain(|id| !removed.contains(id));

        self.slots
            .iter()
            .enumerate()
            .filter(|(slot, id)| before.get(*slot) != Some(*id))
            .map(|(slot, &tile)| SlotAssignment { tile, slot })
            .collect()
    }

    /// Occurrences per kind, in order of first appearance.
    #[must_use]
    pub fn kind_counts(&self, registry: &TileRegistry) -> SmallVec<[(KindId, usize); 8]> {
        let mut counts: SmallVec<[(KindId, usize); 8]> = SmallVec::new();
        for kind in self.slots.iter().filter_map(|&id| registry.kind_of(id)) {
            match counts.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, n)) => *n += 1,
                None => counts.push((kind, 1)),
            }
        }
        counts
    }

    /// Check the tray invariants against the registry.
    pub fn check_invariants(&self, registry: &TileRegistry) -> Result<(), InvariantViolation> {
        if self.slots.len() > self.capacity {
            return Err(InvariantViolation::OverCapacity {
                len: self.slots.len(),
                capacity: self.capacity,
            });
        }

        let mut seen = FxHashSet::default();
        let mut closed_kinds = FxHashSet::default();
        let mut current: Option<KindId> = None;

        for &tile in &self.slots {
            if !seen.insert(tile) {
                return Err(InvariantViolation::DuplicateTile { tile });
            }
            if registry.location_of(tile) != Some(TileLocation::InTray) {
                return Err(InvariantViolation::LocationMismatch { tile });
            }

            let kind = registry.kind_of(tile);
            if kind != current {
                if let Some(prev) = current {
                    closed_kinds.insert(prev);
                }
                if let Some(k) = kind {
                    if closed_kinds.contains(&k) {
                        return Err(InvariantViolation::NonContiguousKind { kind: k });
                    }
                }
                current = kind;
            }
        }

        if let Some(stray) = registry
            .iter()
            .find(|t| t.is_in_tray() && !seen.contains(&t.id))
        {
            return Err(InvariantViolation::StrayTrayTile { tile: stray.id });
        }

        Ok(())
    }

    /// Registry tiles tagged `InTray` that no slot holds.
    #[must_use]
    pub fn stray_tiles(&self, registry: &TileRegistry) -> SmallVec<[TileId; 8]> {
        registry
            .iter()
            .filter(|t| t.is_in_tray() && !self.contains(t.id))
            .map(|t| t.id)
            .collect()
    }

    /// Restore the invariants after a defect.
    ///
    /// Drops duplicates and tiles not tagged `InTray`, then regroups kinds in
    /// order of first appearance while keeping the relative order within each
    /// kind. Returns every tile whose slot changed.
    pub fn heal(&mut self, registry: &TileRegistry) -> SlotChanges {
        let before = self.slots.clone();

        let mut seen = FxHashSet::default();
        let kept: SmallVec<[TileId; 8]> = self
            .slots
            .iter()
            .copied()
            .filter(|&id| registry.location_of(id) == Some(TileLocation::InTray))
            .filter(|&id| seen.insert(id))
            .collect();

        let mut regrouped: SmallVec<[TileId; 8]> = SmallVec::with_capacity(kept.len());
        for kind in Tray::kinds_in_order(&kept, registry) {
            regrouped.extend(
                kept.iter()
                    .copied()
                    .filter(|&id| registry.kind_of(id) == Some(kind)),
            );
        }
        self.slots = regrouped;

        self.slots
            .iter()
            .enumerate()
            .filter(|(slot, id)| before.get(*slot) != Some(*id))
            .map(|(slot, &tile)| SlotAssignment { tile, slot })
            .collect()
    }

    fn kinds_in_order(tiles: &[TileId], registry: &TileRegistry) -> SmallVec<[KindId; 8]> {
        let mut kinds: SmallVec<[KindId; 8]> = SmallVec::new();
        for kind in tiles.iter().filter_map(|&id| registry.kind_of(id)) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// Test-only escape hatch for building broken trays.
    #[cfg(test)]
    pub(crate) fn force_slots(&mut self, slots: &[TileId]) {
        self.slots = SmallVec::from_slice(slots);
    }
}
