//! # tile-match
//!
//! Gameplay engine for a tile-collection puzzle: tap board tiles into a
//! bounded tray, three of a kind vanish, fill the tray and the round is lost.
//!
//! ## Design Principles
//!
//! 1. **Presentation-Agnostic**: The engine never animates, plays sounds or
//!    draws panels. It emits events and waits for relocation
//!    acknowledgements.
//!
//! 2. **Pluggable Collaborators**: Board geometry (`BoardAdapter`) and the
//!    consumable store (`Economy`) are traits supplied by the game.
//!
//! 3. **Deterministic**: Shuffles use a seeded ChaCha RNG; hints pick
//!    candidates in a fixed order. Same inputs, same round.
//!
//! ## Architecture
//!
//! - **Two-Phase Commands**: State commits synchronously; match detection
//!   and hint continuation wait on acknowledgements. Input is refused while
//!   anything is in flight.
//!
//! - **Persistent Data Structures**: The tile registry and event log use
//!   `im-rs`, so snapshots clone in O(1).
//!
//! ## Modules
//!
//! - `core`: Tile IDs, registry, RNG, configuration, errors
//! - `board`: Selectability adapter trait and two implementations
//! - `economy`: Metered resources and a reference wallet
//! - `tray`: Ordered, grouped, capacity-bounded staging area
//! - `matching`: Triple detection and round outcome
//! - `undo`: Reversible placement ledger
//! - `hint`: Tiered hint selection
//! - `shuffle`: Layer-respecting board shuffle
//! - `events`: Events emitted to the presentation layer
//! - `engine`: The round orchestrator

pub mod core;
pub mod board;
pub mod economy;
pub mod tray;
pub mod matching;
pub mod undo;
pub mod hint;
pub mod shuffle;
pub mod events;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{
    BoardPos, KindId, Layer, Tile, TileId, TileLocation, TileRegistry,
    GameRng, GameRngState,
    EngineConfig, EngineError, InvariantViolation,
};

pub use crate::board::{BoardAdapter, LayeredBoard, OpenBoard};

pub use crate::economy::{Economy, ResourceKind, Wallet, WalletError, WalletState};

pub use crate::tray::{SlotAssignment, SlotChanges, Tray};

pub use crate::matching::{MatchDetector, MatchGroup, MatchReport, RoundStatus, MATCH_SIZE};

pub use crate::undo::{UndoLedger, UndoStep};

pub use crate::hint::{Hint, HintSelector, HintTier};

pub use crate::shuffle::{ShuffleMove, ShufflePlanner};

pub use crate::events::{Destination, EngineEvent, EventBatch};

pub use crate::engine::{Engine, HintRun, Pending, RoundSnapshot};
