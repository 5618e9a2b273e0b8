//! Tiered hint selector.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::BoardAdapter;
use crate::core::{KindId, TileId, TileRegistry};
use crate::matching::MATCH_SIZE;
use crate::tray::Tray;

/// Which heuristic produced a hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HintTier {
    TrayPair,
    BoardPairWithTraySeed,
    BoardTriple,
}

/// Board tiles to place, in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub tier: HintTier,
    pub kind: KindId,
    pub tiles: SmallVec<[TileId; 3]>,
}

/// Selectable board tiles grouped by kind.
///
/// Keeps at most `MATCH_SIZE` tiles per kind; no tier needs more.
struct BoardKinds {
    order: Vec<KindId>,
    tiles: FxHashMap<KindId, SmallVec<[TileId; 3]>>,
}

impl BoardKinds {
    fn collect<B: BoardAdapter + ?Sized>(registry: &TileRegistry, board: &B) -> Self {
        let mut order = Vec::new();
        let mut tiles: FxHashMap<KindId, SmallVec<[TileId; 3]>> = FxHashMap::default();

        for tile in board.selectable_tiles(registry) {
            let entry = tiles.entry(tile.kind).or_insert_with(|| {
                order.push(tile.kind);
                SmallVec::new()
            });
            if entry.len() < MATCH_SIZE {
                entry.push(tile.id);
            }
        }

        Self { order, tiles }
    }

    fn take(&self, kind: KindId, n: usize) -> Option<SmallVec<[TileId; 3]>> {
        let tiles = self.tiles.get(&kind)?;
        (tiles.len() >= n).then(|| tiles.iter().copied().take(n).collect())
    }
}

/// Stateless hint selector.
pub struct HintSelector;

impl HintSelector {
    /// Pick the cheapest completing move, or `None` if no tier applies.
    ///
    /// ```
    /// use tile_match::board::OpenBoard;
    /// use tile_match::core::{BoardPos, KindId, Layer, TileRegistry};
    /// use tile_match::hint::{HintSelector, HintTier};
    /// use tile_match::tray::Tray;
    ///
    /// let mut tiles = TileRegistry::new();
    /// for col in 0..3 {
    ///     tiles.spawn(KindId(7), Layer(0), BoardPos::new(col, 0));
    /// }
    ///
    /// let hint = HintSelector::select(&Tray::new(7), &tiles, &OpenBoard).unwrap();
    /// assert_eq!(hint.tier, HintTier::BoardTriple);
    /// assert_eq!(hint.tiles.len(), 3);
    /// ```
    #[must_use]
    pub fn select<B: BoardAdapter + ?Sized>(
        tray: &Tray,
        registry: &TileRegistry,
        board: &B,
    ) -> Option<Hint> {
        let free = tray.free_slots();
        let board_kinds = BoardKinds::collect(registry, board);
        let tray_kinds = tray.kind_counts(registry);

        let hint = |tier, kind, tiles| Hint { tier, kind, tiles };

        if free >= 1 {
            let pair = tray_kinds
                .iter()
                .filter(|&&(_, count)| count == MATCH_SIZE - 1)
                .find_map(|&(kind, _)| {
                    board_kinds
                        .take(kind, 1)
                        .map(|tiles| hint(HintTier::TrayPair, kind, tiles))
                });
            if pair.is_some() {
                return pair;
            }
        }

        if free >= 2 {
            let seeded = tray_kinds.iter().find_map(|&(kind, _)| {
                board_kinds
                    .take(kind, 2)
                    .map(|tiles| hint(HintTier::BoardPairWithTraySeed, kind, tiles))
            });
            if seeded.is_some() {
                return seeded;
            }
        }

        if free >= MATCH_SIZE {
            return board_kinds.order.iter().find_map(|&kind| {
                board_kinds
                    .take(kind, MATCH_SIZE)
                    .map(|tiles| hint(HintTier::BoardTriple, kind, tiles))
            });
        }

        None
    }
}
