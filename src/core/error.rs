//! Error types.
//!
//! `EngineError` covers everything a command can refuse: precondition
//! violations and exhausted resources. Both leave the engine untouched.
//!
//! `InvariantViolation` is a programming defect found by the post-command
//! consistency check. Debug builds panic on it, release builds log it and
//! self-heal.

use thiserror::Error;

use super::tile::{KindId, TileId};
use crate::economy::ResourceKind;
use crate::events::EngineEvent;

/// A command the engine refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("tray is full")]
    TrayFull,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("no hint available")]
    NoHintAvailable,

    #[error("no layer has more than one board tile to shuffle")]
    NothingToShuffle,

    #[error("another operation is still in flight")]
    Busy,

    #[error("tap arrived inside the cooldown window")]
    Debounced,

    #[error("round is already over")]
    RoundOver,

    #[error("tray capacity already upgraded")]
    CapacityAlreadyUpgraded,

    #[error("unknown tile {0}")]
    UnknownTile(TileId),

    #[error("{0} is not selectable")]
    NotSelectable(TileId),

    #[error("no {0} uses left")]
    ResourceExhausted(ResourceKind),
}

impl EngineError {
    /// The event the presentation layer shows for this refusal, if any.
    ///
    /// Refusals with a player-facing message (no hint, no undo, out of
    /// uses) map to an event; silent rejections such as `Busy` do not.
    #[must_use]
    pub fn notice(&self) -> Option<EngineEvent> {
        match self {
            EngineError::NoHintAvailable => Some(EngineEvent::HintUnavailable),
            EngineError::NothingToUndo => Some(EngineEvent::UndoUnavailable),
            EngineError::ResourceExhausted(resource) => Some(EngineEvent::PurchasePrompt {
                resource: *resource,
            }),
            _ => None,
        }
    }
}

/// Broken engine invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{kind} occupies more than one run in the tray")]
    NonContiguousKind { kind: KindId },

    #[error("{tile} appears twice in the tray")]
    DuplicateTile { tile: TileId },

    #[error("{tile} is in the tray but not tagged InTray")]
    LocationMismatch { tile: TileId },

    #[error("undo ledger holds a step for {tile} which is not in the tray")]
    StaleUndoStep { tile: TileId },

    #[error("{tile} is tagged InTray but no tray slot holds it")]
    StrayTrayTile { tile: TileId },

    #[error("tray holds {len} tiles but capacity is {capacity}")]
    OverCapacity { len: usize, capacity: usize },
}
