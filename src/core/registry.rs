//! Tile registry with stable indices.
//!
//! The `TileRegistry` owns every tile of a round. Tiles are never removed:
//! a tile consumed by a match is tagged `Destroyed` and keeps its index, so a
//! `TileId` held anywhere (undo ledger, event log, caller) can always be
//! resolved and checked for liveness.
//!
//! Storage is an `im::Vector`, so cloning a registry for a snapshot is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::tile::{BoardPos, KindId, Layer, Tile, TileId, TileLocation};

/// Registry of all tiles in a round.
///
/// ## Example
///
/// ```
/// use tile_match::core::{BoardPos, KindId, Layer, TileRegistry};
///
/// let mut registry = TileRegistry::new();
///
/// let a = registry.spawn(KindId(1), Layer(0), BoardPos::new(0, 0));
/// let b = registry.spawn(KindId(1), Layer(1), BoardPos::new(0, 0));
///
/// assert_eq!(registry.live_count(), 2);
/// assert_eq!(registry.kind_of(b), Some(KindId(1)));
///
/// registry.destroy(a);
/// assert_eq!(registry.live_count(), 1);
/// assert!(registry.get(a).is_some()); // index is stable
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRegistry {
    tiles: Vector<Tile>,
}

impl TileRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile resting on the board. Returns its ID.
    pub fn spawn(&mut self, kind: KindId, layer: Layer, board_pos: BoardPos) -> TileId {
        let id = TileId(self.tiles.len() as u32);
        self.tiles.push_back(Tile::new(id, kind, layer, board_pos));
        id
    }

    /// Get a tile by ID.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Get a live (board or tray) tile by ID.
    #[must_use]
    pub fn get_live(&self, id: TileId) -> Option<&Tile> {
        self.get(id).filter(|t| t.is_live())
    }

    /// Kind of a tile, if it exists.
    #[must_use]
    pub fn kind_of(&self, id: TileId) -> Option<KindId> {
        self.get(id).map(|t| t.kind)
    }

    /// Location of a tile, if it exists.
    #[must_use]
    pub fn location_of(&self, id: TileId) -> Option<TileLocation> {
        self.get(id).map(|t| t.location)
    }

    /// Set a tile's location. Destroyed tiles stay destroyed.
    ///
    /// Returns `false` if the tile does not exist or is already destroyed.
    pub fn set_location(&mut self, id: TileId, location: TileLocation) -> bool {
        match self.tiles.get_mut(id.index()) {
            Some(tile) if tile.is_live() => {
                tile.location = location;
                true
            }
            _ => false,
        }
    }

    /// Set a tile's board position.
    pub fn set_board_pos(&mut self, id: TileId, pos: BoardPos) -> bool {
        match self.tiles.get_mut(id.index()) {
            Some(tile) if tile.is_live() => {
                tile.board_pos = pos;
                true
            }
            _ => false,
        }
    }

    /// Tag a tile as consumed by a match.
    pub fn destroy(&mut self, id: TileId) -> bool {
        self.set_location(id, TileLocation::Destroyed)
    }

    /// Check if the tile exists and is not destroyed.
    #[must_use]
    pub fn is_live(&self, id: TileId) -> bool {
        self.get_live(id).is_some()
    }

    /// Total number of tiles ever spawned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of tiles on the board or in the tray.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_live()).count()
    }

    /// Iterate over all tiles in spawn order, destroyed ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Iterate over board-resident tiles in spawn order.
    pub fn board_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_on_board())
    }
}
