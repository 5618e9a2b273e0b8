//! Undo step stack.

use serde::{Deserialize, Serialize};

use crate::core::{BoardPos, InvariantViolation, TileId, TileLocation, TileRegistry};

/// A reversible placement: the tile and where it sat on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UndoStep {
    pub tile: TileId,
    pub prior: BoardPos,
}

/// Stack of undo steps, oldest first.
///
/// Holds at most one step per tile.
///
/// ```
/// use tile_match::core::{BoardPos, TileId};
/// use tile_match::undo::UndoLedger;
///
/// let mut ledger = UndoLedger::new();
/// ledger.push(TileId(3), BoardPos::new(1, 2));
/// ledger.push(TileId(5), BoardPos::new(4, 0));
///
/// // Not necessarily the most recent push
/// let step = ledger.take_step_for(TileId(3)).unwrap();
/// assert_eq!(step.prior, BoardPos::new(1, 2));
/// assert_eq!(ledger.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoLedger {
    steps: Vec<UndoStep>,
}

impl UndoLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a placement. Replaces any older step for the same tile.
    pub fn push(&mut self, tile: TileId, prior: BoardPos) {
        self.drop_steps_for(tile);
        self.steps.push(UndoStep { tile, prior });
    }

    /// Remove the step for `tile`, keeping the order of the rest.
    ///
    /// Returns `true` if a step was removed.
    pub fn drop_steps_for(&mut self, tile: TileId) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| s.tile != tile);
        self.steps.len() != before
    }

    /// Remove every step whose tile is not currently in the tray.
    ///
    /// Returns the number of steps removed.
    pub fn prune_stale(&mut self, registry: &TileRegistry) -> usize {
        let before = self.steps.len();
        self.steps
            .retain(|s| registry.location_of(s.tile) == Some(TileLocation::InTray));
        before - self.steps.len()
    }

    /// Remove and return the step for `tile`, searching newest first.
    pub fn take_step_for(&mut self, tile: TileId) -> Option<UndoStep> {
        let index = self.steps.iter().rposition(|s| s.tile == tile)?;
        Some(self.steps.remove(index))
    }

    /// Look up the step for `tile` without removing it.
    #[must_use]
    pub fn step_for(&self, tile: TileId) -> Option<&UndoStep> {
        self.steps.iter().rev().find(|s| s.tile == tile)
    }

    /// Check that every step points at a tray tile.
    pub fn check_invariants(&self, registry: &TileRegistry) -> Result<(), InvariantViolation> {
        match self
            .steps
            .iter()
            .find(|s| registry.location_of(s.tile) != Some(TileLocation::InTray))
        {
            Some(step) => Err(InvariantViolation::StaleUndoStep { tile: step.tile }),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps oldest first.
    #[must_use]
    pub fn steps(&self) -> &[UndoStep] {
        &self.steps
    }
}
