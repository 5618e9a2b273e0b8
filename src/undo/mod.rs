//! Undo ledger: reversible records of player placements.
//!
//! One step is pushed per player-initiated placement. Steps are pruned
//! eagerly: when a tile is destroyed by a match its step is dropped right
//! away, and `prune_stale` sweeps anything that no longer points at a tray
//! tile. Hinted placements never get a step, so they cannot be undone.

mod ledger;

pub use ledger::{UndoLedger, UndoStep};
