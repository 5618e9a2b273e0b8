//! Triple detection over the tray.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::BoardAdapter;
use crate::core::{KindId, TileId, TileRegistry};
use crate::events::{EngineEvent, EventBatch};
use crate::tray::{SlotChanges, Tray};
use crate::undo::UndoLedger;

/// Tiles consumed together.
pub const MATCH_SIZE: usize = 3;

/// Round state after an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundStatus {
    InProgress,
    Won,
    Lost,
}

impl RoundStatus {
    #[must_use]
    pub fn is_over(self) -> bool {
        self != RoundStatus::InProgress
    }
}

/// One consumed triple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    pub kind: KindId,
    /// Newest first (tray tail to head).
    pub tiles: SmallVec<[TileId; 3]>,
}

/// Result of one evaluation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchReport {
    /// Triples consumed, in order of the kind's first tray appearance.
    pub matches: SmallVec<[MatchGroup; 2]>,

    /// Tiles that moved left when the tray was compacted.
    pub compaction: SlotChanges,

    /// Undo steps removed because their tiles were consumed or went stale.
    pub pruned_steps: usize,

    pub outcome: RoundStatus,
}

impl MatchReport {
    /// Check if any triple was consumed.
    #[must_use]
    pub fn matched(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Events for the presentation layer, in the order they happened.
    ///
    /// Per triple: one `TileDestroyed` per tile, then `Matched`. Then the
    /// compaction relocations, then the outcome if the round ended.
    #[must_use]
    pub fn events(&self) -> EventBatch {
        let mut events = EventBatch::new();

        for group in &self.matches {
            events.extend(
                group
                    .tiles
                    .iter()
                    .map(|&tile| EngineEvent::TileDestroyed { tile }),
            );
            events.push(EngineEvent::Matched {
                kind: group.kind,
                tiles: group.tiles.clone(),
            });
        }

        events.extend(self.compaction.iter().copied().map(EngineEvent::from));

        match self.outcome {
            RoundStatus::Won => events.push(EngineEvent::RoundWon),
            RoundStatus::Lost => events.push(EngineEvent::RoundLost),
            RoundStatus::InProgress => {}
        }

        events
    }
}

/// Stateless triple detector.
pub struct MatchDetector;

impl MatchDetector {
    /// Evaluate the tray after a committed insertion.
    ///
    /// For every kind with at least three tray tiles, the three closest to
    /// the tray tail are destroyed. A fourth tile of the same kind stays for
    /// a later pass. Remaining tiles are compacted into slots `0..len`, undo
    /// steps for destroyed tiles are dropped, and the outcome is decided:
    ///
    /// - `Won` when no tile is left on the board or in the tray
    /// - `Lost` when the tray is full and nothing matched in this pass
    pub fn evaluate<B: BoardAdapter + ?Sized>(
        tray: &mut Tray,
        registry: &mut TileRegistry,
        ledger: &mut UndoLedger,
        board: &B,
    ) -> MatchReport {
        let mut matches: SmallVec<[MatchGroup; 2]> = SmallVec::new();
        let mut consumed: SmallVec<[TileId; 8]> = SmallVec::new();

        let full_kinds = tray
            .kind_counts(registry)
            .into_iter()
            .filter(|&(_, count)| count >= MATCH_SIZE)
            .map(|(kind, _)| kind);

        for kind in full_kinds {
            let tiles: SmallVec<[TileId; 3]> = tray
                .tiles()
                .iter()
                .rev()
                .copied()
                .filter(|&id| registry.kind_of(id) == Some(kind))
                .take(MATCH_SIZE)
                .collect();

            for &tile in &tiles {
                registry.destroy(tile);
                ledger.drop_steps_for(tile);
            }

            log::debug!("matched {kind}: {tiles:?}");
            consumed.extend(tiles.iter().copied());
            matches.push(MatchGroup { kind, tiles });
        }

        let compaction = if consumed.is_empty() {
            SlotChanges::new()
        } else {
            tray.remove_and_compact(&consumed)
        };
        let pruned_steps = ledger.prune_stale(registry);

        let outcome = if board.remaining_tiles(registry) == 0 {
            RoundStatus::Won
        } else if tray.is_full() && matches.is_empty() {
            RoundStatus::Lost
        } else {
            RoundStatus::InProgress
        };

        MatchReport {
            matches,
            compaction,
            pruned_steps,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::OpenBoard;
    use crate::core::{BoardPos, Layer, TileLocation};

    struct Fixture {
        tiles: TileRegistry,
        tray: Tray,
        ledger: UndoLedger,
    }

    impl Fixture {
        fn new(kinds: &[u32], capacity: usize) -> Self {
            let mut tiles = TileRegistry::new();
            for (i, &k) in kinds.iter().enumerate() {
                tiles.spawn(KindId(k), Layer(0), BoardPos::new(i as i32, 0));
            }
            Self {
                tiles,
                tray: Tray::new(capacity),
                ledger: UndoLedger::new(),
            }
        }

        fn place(&mut self, id: u32) {
            let tile = TileId(id);
            let prior = self.tiles.get(tile).map(|t| t.board_pos).unwrap();
            self.tray.insert(&mut self.tiles, tile).unwrap();
            self.ledger.push(tile, prior);
        }

        fn evaluate(&mut self) -> MatchReport {
            MatchDetector::evaluate(&mut self.tray, &mut self.tiles, &mut self.ledger, &OpenBoard)
        }
    }

    #[test]
    fn test_third_tile_matches() {
        let mut f = Fixture::new(&[1, 1, 2, 1, 3], 7);
        f.place(0);
        f.place(1);
        f.place(2);
        assert!(!f.evaluate().matched());

        f.place(3);
        let report = f.evaluate();

        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].kind, KindId(1));
        assert_eq!(
            report.matches[0].tiles.as_slice(),
            &[TileId(3), TileId(1), TileId(0)]
        );
        assert_eq!(f.tray.tiles(), &[TileId(2)]);
        assert_eq!(f.tiles.location_of(TileId(3)), Some(TileLocation::Destroyed));
        assert_eq!(report.outcome, RoundStatus::InProgress);
    }

    #[test]
    fn test_compaction_relocates_survivors() {
        // A A B C, then A: tray A A A B C -> B and C move to 0 and 1
        let mut f = Fixture::new(&[1, 1, 2, 3, 1, 4], 7);
        for id in 0..5 {
            f.place(id);
        }

        let report = f.evaluate();

        assert_eq!(f.tray.tiles(), &[TileId(2), TileId(3)]);
        assert_eq!(report.compaction.len(), 2);
        assert_eq!(report.compaction[0].tile, TileId(2));
        assert_eq!(report.compaction[0].slot, 0);
        assert_eq!(report.compaction[1].slot, 1);
    }

    #[test]
    fn test_fourth_tile_stays() {
        let mut f = Fixture::new(&[1, 1, 1, 1, 2], 7);
        // Force four of a kind into the tray before evaluating.
        for id in 0..4 {
            f.place(id);
        }

        let report = f.evaluate();

        assert_eq!(report.matches.len(), 1);
        assert_eq!(f.tray.tiles(), &[TileId(0)]);
        assert_eq!(f.tiles.location_of(TileId(0)), Some(TileLocation::InTray));

        // No re-match within the same pass; a later pass with fewer than 3 does nothing.
        let again = f.evaluate();
        assert!(!again.matched());
    }

    #[test]
    fn test_undo_steps_dropped_for_consumed_tiles() {
        let mut f = Fixture::new(&[1, 2, 1, 1], 7);
        for id in 0..4 {
            f.place(id);
        }
        assert_eq!(f.ledger.len(), 4);

        let report = f.evaluate();

        assert_eq!(f.ledger.len(), 1);
        assert!(f.ledger.step_for(TileId(1)).is_some());
        assert_eq!(report.pruned_steps, 0);
    }

    #[test]
    fn test_win_when_everything_consumed() {
        let mut f = Fixture::new(&[5, 5, 5], 7);
        for id in 0..3 {
            f.place(id);
        }

        let report = f.evaluate();
        assert_eq!(report.outcome, RoundStatus::Won);
        assert_eq!(report.events().last(), Some(&EngineEvent::RoundWon));
        assert!(!report.events().contains(&EngineEvent::RoundLost));
    }

    #[test]
    fn test_lose_when_full_without_match() {
        let mut f = Fixture::new(&[1, 2, 3, 4], 3);
        for id in 0..3 {
            f.place(id);
        }

        let report = f.evaluate();
        assert_eq!(report.outcome, RoundStatus::Lost);
        assert_eq!(report.events(), vec![EngineEvent::RoundLost]);
    }

    #[test]
    fn test_full_tray_with_match_is_not_lost() {
        // Capacity 3 filled by a triple: the match frees the tray.
        let mut f = Fixture::new(&[1, 1, 1, 2], 3);
        for id in 0..3 {
            f.place(id);
        }

        let report = f.evaluate();
        assert!(report.matched());
        assert_eq!(report.outcome, RoundStatus::InProgress);
    }

    #[test]
    fn test_events_order() {
        let mut f = Fixture::new(&[1, 1, 2, 1, 9], 7);
        for id in 0..4 {
            f.place(id);
        }

        let events = f.evaluate().events();

        assert_eq!(
            events,
            vec![
                EngineEvent::TileDestroyed { tile: TileId(3) },
                EngineEvent::TileDestroyed { tile: TileId(1) },
                EngineEvent::TileDestroyed { tile: TileId(0) },
                EngineEvent::Matched {
                    kind: KindId(1),
                    tiles: SmallVec::from_slice(&[TileId(3), TileId(1), TileId(0)]),
                },
                EngineEvent::to_slot(TileId(2), 0),
            ]
        );
    }
}
