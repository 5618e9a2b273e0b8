//! Events the engine emits for the presentation layer.
//!
//! Every command returns the events it produced, in order. Presentation
//! collaborators animate relocations, play sounds for matches and show the
//! win, lose and purchase panels; the engine never does any of that itself.
//!
//! A `TileRelocated` event is a request: the caller animates it and reports
//! back with `notify_relocation_complete` when the engine is waiting on that
//! tile.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{BoardPos, KindId, TileId};
use crate::economy::ResourceKind;
use crate::hint::HintTier;
use crate::tray::SlotAssignment;

/// Where a relocated tile should end up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    /// A tray slot index.
    Slot(usize),
    /// A board position.
    Board(BoardPos),
}

/// Something that happened in the round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A tile moved (into the tray, along the tray, or back to the board).
    TileRelocated { tile: TileId, to: Destination },

    /// A tile was consumed by a match.
    TileDestroyed { tile: TileId },

    /// Three tiles of one kind were consumed.
    Matched {
        kind: KindId,
        tiles: SmallVec<[TileId; 3]>,
    },

    /// Board and tray are empty.
    RoundWon,

    /// Tray filled up without a match.
    RoundLost,

    /// A hint was accepted. The tiles are placed in this order.
    HintSelected {
        tier: HintTier,
        tiles: SmallVec<[TileId; 3]>,
    },

    /// A hint was requested but no tier applies.
    HintUnavailable,

    /// An undo was requested but the rightmost tile has no step.
    UndoUnavailable,

    /// The action is available but out of uses.
    PurchasePrompt { resource: ResourceKind },

    /// Tray capacity was raised.
    CapacityUpgraded { capacity: usize },

    /// Every tile moved by a shuffle has been acknowledged.
    ShuffleCompleted,

    /// The last hinted placement has been acknowledged and evaluated.
    HintCompleted,
}

impl EngineEvent {
    /// Relocation into a tray slot.
    #[must_use]
    pub fn to_slot(tile: TileId, slot: usize) -> Self {
        Self::TileRelocated {
            tile,
            to: Destination::Slot(slot),
        }
    }

    /// Relocation onto the board.
    #[must_use]
    pub fn to_board(tile: TileId, pos: BoardPos) -> Self {
        Self::TileRelocated {
            tile,
            to: Destination::Board(pos),
        }
    }
}

impl From<SlotAssignment> for EngineEvent {
    fn from(assignment: SlotAssignment) -> Self {
        EngineEvent::to_slot(assignment.tile, assignment.slot)
    }
}

/// Events produced by one command.
pub type EventBatch = Vec<EngineEvent>;
