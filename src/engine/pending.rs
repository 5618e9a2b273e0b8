//! The in-flight operation gate.
//!
//! State changes commit synchronously; anything that depends on a visual
//! relocation finishing waits here until the caller acknowledges it.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::core::TileId;

/// Operation waiting on relocation acknowledgements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Pending {
    /// Nothing in flight. Input is accepted.
    #[default]
    Idle,

    /// A player placement flying into the tray. Match detection runs on ack.
    Placement { tile: TileId },

    /// A hint sequence.
    Hint(HintRun),

    /// A shuffle; completes when every moved tile is acknowledged.
    Shuffle { outstanding: FxHashSet<TileId> },
}

impl Pending {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Pending::Idle)
    }

    /// Check if the engine is waiting on this tile's acknowledgement.
    #[must_use]
    pub fn awaits(&self, tile: TileId) -> bool {
        match self {
            Pending::Idle => false,
            Pending::Placement { tile: t } => *t == tile,
            Pending::Hint(run) => run.awaiting == Some(tile),
            Pending::Shuffle { outstanding } => outstanding.contains(&tile),
        }
    }
}

/// Progress of a hint sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintRun {
    /// Tiles not yet inserted, in order.
    pub queue: VecDeque<TileId>,

    /// Inserted tile whose acknowledgement is outstanding.
    pub awaiting: Option<TileId>,

    /// Time of the most recent hinted insertion.
    pub last_insert_ms: u64,
}

impl HintRun {
    /// Check if the next tile may be inserted at `now_ms`.
    #[must_use]
    pub fn next_due(&self, now_ms: u64, delay_ms: u64) -> bool {
        self.awaiting.is_none()
            && !self.queue.is_empty()
            && now_ms.saturating_sub(self.last_insert_ms) >= delay_ms
    }
}
