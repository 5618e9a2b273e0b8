//! Board adapter: which board tiles may be placed right now.
//!
//! The engine consumes selectability, it does not own it. Games plug in
//! their own covering rules by implementing [`BoardAdapter`]; the crate ships
//! two implementations:
//!
//! - [`LayeredBoard`]: a tile is covered by any live board tile on a strictly
//!   higher layer within a square footprint around it
//! - [`OpenBoard`]: nothing is ever covered

use crate::core::{Tile, TileId, TileRegistry};

/// Board adapter trait.
///
/// ## Implementation Notes
///
/// - `is_selectable` must return `false` for tray and destroyed tiles
/// - implementations must be pure functions of the registry
pub trait BoardAdapter {
    /// True iff the tile is on the board and not covered.
    fn is_selectable(&self, tiles: &TileRegistry, tile: TileId) -> bool;

    /// Tiles still in play (board and tray).
    fn remaining_tiles(&self, tiles: &TileRegistry) -> usize {
        tiles.live_count()
    }

    /// Selectable board tiles in registry order.
    fn selectable_tiles<'a>(&self, tiles: &'a TileRegistry) -> Vec<&'a Tile> {
        tiles
            .board_tiles()
            .filter(|t| self.is_selectable(tiles, t.id))
            .collect()
    }
}

/// Layer-aware covering.
///
/// `footprint` is the Chebyshev radius in grid cells a tile blocks on the
/// layers below it. `0` means only the exact same cell.
///
/// ```
/// use tile_match::board::{BoardAdapter, LayeredBoard};
/// use tile_match::core::{BoardPos, KindId, Layer, TileRegistry};
///
/// let mut tiles = TileRegistry::new();
/// let bottom = tiles.spawn(KindId(1), Layer(0), BoardPos::new(0, 0));
/// let top = tiles.spawn(KindId(2), Layer(1), BoardPos::new(0, 0));
///
/// let board = LayeredBoard::new();
/// assert!(!board.is_selectable(&tiles, bottom));
/// assert!(board.is_selectable(&tiles, top));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayeredBoard {
    footprint: i32,
}

impl LayeredBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Board whose tiles block neighbouring cells too.
    #[must_use]
    pub fn with_footprint(footprint: i32) -> Self {
        Self {
            footprint: footprint.max(0),
        }
    }

    /// Check whether a higher board tile sits over `tile`.
    #[must_use]
    pub fn is_covered(&self, tiles: &TileRegistry, tile: &Tile) -> bool {
        tiles.board_tiles().any(|other| {
            other.id != tile.id
                && other.layer > tile.layer
                && other.board_pos.distance(tile.board_pos) <= self.footprint
        })
    }
}

impl BoardAdapter for LayeredBoard {
    fn is_selectable(&self, tiles: &TileRegistry, tile: TileId) -> bool {
        match tiles.get(tile) {
            Some(t) if t.is_on_board() => !self.is_covered(tiles, t),
            _ => false,
        }
    }
}

/// Flat board: every board tile is selectable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpenBoard;

impl BoardAdapter for OpenBoard {
    fn is_selectable(&self, tiles: &TileRegistry, tile: TileId) -> bool {
        tiles.get(tile).is_some_and(Tile::is_on_board)
    }
}
