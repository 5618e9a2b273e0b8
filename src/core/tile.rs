//! Tile identity and per-tile attributes.
//!
//! Every tile on a level has a unique `TileId`, a `KindId` shared with the
//! tiles it can match, a `Layer` that decides covering precedence, and a
//! lifecycle `TileLocation`.
//!
//! ## ID Layout
//!
//! `TileId`s are stable registry indices handed out in spawn order by
//! [`TileRegistry`](super::TileRegistry). A destroyed tile keeps its slot, so
//! an id never changes meaning during a round.
//!
//! ```
//! use tile_match::core::{BoardPos, KindId, Layer, Tile, TileId, TileLocation};
//!
//! let tile = Tile::new(TileId(0), KindId(3), Layer(1), BoardPos::new(2, 4));
//!
//! assert!(tile.is_on_board());
//! assert_eq!(tile.location, TileLocation::OnBoard);
//! assert_eq!(tile.board_pos, BoardPos::new(2, 4));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a tile instance.
///
/// The raw value is the tile's index in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl TileId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Registry index for this ID.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TileId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// Matching key. Tiles with equal kinds are interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KindId(pub u32);

impl KindId {
    /// Create a new kind ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for KindId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Kind({})", self.0)
    }
}

/// Stacking order on the board. Higher layers cover lower ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Layer(pub i32);

impl Layer {
    /// Get the raw layer index.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Layer({})", self.0)
    }
}

/// Board coordinate owned by the caller.
///
/// The engine only stores it for undo restoration and permutes it during a
/// shuffle; the reference [`LayeredBoard`](crate::board::LayeredBoard) also
/// reads it to decide covering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardPos {
    pub col: i32,
    pub row: i32,
}

impl BoardPos {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Chebyshev distance to another position.
    #[must_use]
    pub fn distance(self, other: BoardPos) -> i32 {
        (self.col - other.col).abs().max((self.row - other.row).abs())
    }
}

/// Lifecycle tag for a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileLocation {
    /// On the board, possibly covered.
    OnBoard,
    /// Sitting in the tray.
    InTray,
    /// Consumed by a match. Terminal.
    Destroyed,
}

/// A tile instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Registry index.
    pub id: TileId,

    /// Matching key.
    pub kind: KindId,

    /// Covering precedence.
    pub layer: Layer,

    /// Current lifecycle state.
    pub location: TileLocation,

    /// Last known board position. Kept while the tile sits in the tray.
    pub board_pos: BoardPos,
}

impl Tile {
    /// Create a tile resting on the board.
    #[must_use]
    pub fn new(id: TileId, kind: KindId, layer: Layer, board_pos: BoardPos) -> Self {
        Self {
            id,
            kind,
            layer,
            location: TileLocation::OnBoard,
            board_pos,
        }
    }

    #[must_use]
    pub fn is_on_board(&self) -> bool {
        self.location == TileLocation::OnBoard
    }

    #[must_use]
    pub fn is_in_tray(&self) -> bool {
        self.location == TileLocation::InTray
    }

    /// Check if the tile still takes part in the round (board or tray).
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.location != TileLocation::Destroyed
    }
}
