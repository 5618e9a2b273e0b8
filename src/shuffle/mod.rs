//! Layer-respecting shuffle of board tiles.
//!
//! Only board-resident tiles move, and only among positions already used by
//! their own layer. Covering relationships between layers are therefore
//! kept; only the arrangement inside each layer changes.

use serde::{Deserialize, Serialize};

use crate::core::{BoardPos, GameRng, Layer, TileId, TileRegistry};

/// One tile's new board position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShuffleMove {
    pub tile: TileId,
    pub to: BoardPos,
}

/// Stateless shuffle planner.
pub struct ShufflePlanner;

impl ShufflePlanner {
    /// Plan a shuffle.
    ///
    /// Board tiles are partitioned by layer; each partition with more than one
    /// tile gets a uniformly random permutation of its own positions. Layers
    /// with a single tile are left alone. Moves are listed layer by layer
    /// (ascending), tiles in registry order within a layer.
    ///
    /// The planner does not mutate the registry; apply the moves with
    /// [`apply`](Self::apply).
    #[must_use]
    pub fn plan(registry: &TileRegistry, rng: &mut GameRng) -> Vec<ShuffleMove> {
        let mut layers: Vec<Layer> = registry.board_tiles().map(|t| t.layer).collect();
        layers.sort_unstable();
        layers.dedup();

        let mut moves = Vec::new();
        for layer in layers {
            let (tiles, mut positions): (Vec<TileId>, Vec<BoardPos>) = registry
                .board_tiles()
                .filter(|t| t.layer == layer)
                .map(|t| (t.id, t.board_pos))
                .unzip();

            if tiles.len() <= 1 {
                continue;
            }

            rng.shuffle(&mut positions);
            moves.extend(
                tiles
                    .into_iter()
                    .zip(positions)
                    .map(|(tile, to)| ShuffleMove { tile, to }),
            );
        }

        moves
    }

    /// Write planned positions into the registry.
    pub fn apply(registry: &mut TileRegistry, moves: &[ShuffleMove]) {
        for m in moves {
            registry.set_board_pos(m.tile, m.to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{KindId, TileLocation};
    use rustc_hash::FxHashMap;

    fn layered_registry() -> TileRegistry {
        let mut registry = TileRegistry::new();
        for i in 0..6 {
            registry.spawn(KindId(i % 3), Layer(0), BoardPos::new(i as i32, 0));
        }
        for i in 0..4 {
            registry.spawn(KindId(i % 2), Layer(1), BoardPos::new(i as i32, 1));
        }
        registry.spawn(KindId(9), Layer(2), BoardPos::new(0, 2));
        registry
    }

    fn positions_by_layer(registry: &TileRegistry) -> FxHashMap<Layer, Vec<(i32, i32)>> {
        let mut map: FxHashMap<Layer, Vec<(i32, i32)>> = FxHashMap::default();
        for t in registry.board_tiles() {
            map.entry(t.layer)
                .or_default()
                .push((t.board_pos.col, t.board_pos.row));
        }
        for v in map.values_mut() {
            v.sort_unstable();
        }
        map
    }

    #[test]
    fn test_plan_preserves_layer_position_sets() {
        let mut registry = layered_registry();
        let before = positions_by_layer(&registry);
        let layers_before: Vec<_> = registry.iter().map(|t| t.layer).collect();

        let mut rng = GameRng::new(7);
        let moves = ShufflePlanner::plan(&registry, &mut rng);
        ShufflePlanner::apply(&mut registry, &moves);

        assert_eq!(positions_by_layer(&registry), before);
        let layers_after: Vec<_> = registry.iter().map(|t| t.layer).collect();
        assert_eq!(layers_before, layers_after);
    }

    #[test]
    fn test_single_tile_layer_untouched() {
        let registry = layered_registry();
        let mut rng = GameRng::new(7);

        let moves = ShufflePlanner::plan(&registry, &mut rng);

        assert_eq!(moves.len(), 10);
        assert!(moves.iter().all(|m| m.tile != TileId(10)));
    }

    #[test]
    fn test_tray_and_destroyed_tiles_never_move() {
        let mut registry = layered_registry();
        registry.set_location(TileId(0), TileLocation::InTray);
        registry.destroy(TileId(1));

        let mut rng = GameRng::new(3);
        let moves = ShufflePlanner::plan(&registry, &mut rng);

        assert!(moves.iter().all(|m| m.tile != TileId(0) && m.tile != TileId(1)));
        assert!(moves.iter().all(|m| m.to != BoardPos::new(0, 0)));
        assert!(moves.iter().all(|m| m.to != BoardPos::new(1, 0)));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let registry = layered_registry();

        let a = ShufflePlanner::plan(&registry, &mut GameRng::new(11));
        let b = ShufflePlanner::plan(&registry, &mut GameRng::new(11));

        assert_eq!(a, b);
    }

    #[test]
    fn test_nothing_to_shuffle() {
        let mut registry = TileRegistry::new();
        registry.spawn(KindId(1), Layer(0), BoardPos::new(0, 0));
        registry.spawn(KindId(1), Layer(1), BoardPos::new(0, 0));

        let moves = ShufflePlanner::plan(&registry, &mut GameRng::new(1));
        assert!(moves.is_empty());
    }
}
