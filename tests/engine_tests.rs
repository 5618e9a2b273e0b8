//! Engine integration tests.
//!
//! These tests drive whole rounds through the public command API and check
//! the events, tray contents, undo ledger and economy after each step.

use tile_match::board::{LayeredBoard, OpenBoard};
use tile_match::core::{BoardPos, EngineConfig, EngineError, KindId, Layer, TileId, TileLocation, TileRegistry};
use tile_match::economy::{Economy, ResourceKind, Wallet};
use tile_match::engine::Engine;
use tile_match::events::{EngineEvent, EventBatch};
use tile_match::hint::HintTier;
use tile_match::matching::RoundStatus;

const A: u32 = 1;
const B: u32 = 2;
const C: u32 = 3;
const D: u32 = 4;

/// One row of board tiles on layer 0, ids in the order given.
fn row(kinds: &[u32]) -> TileRegistry {
    let mut tiles = TileRegistry::new();
    for (col, &k) in kinds.iter().enumerate() {
        tiles.spawn(KindId(k), Layer(0), BoardPos::new(col as i32, 0));
    }
    tiles
}

/// Test harness that keeps a clock and acknowledges every relocation.
struct Round {
    engine: Engine<OpenBoard, Wallet>,
    now: u64,
}

impl Round {
    fn new(kinds: &[u32]) -> Self {
        Self::with(kinds, EngineConfig::default(), Wallet::new())
    }

    fn with(kinds: &[u32], config: EngineConfig, wallet: Wallet) -> Self {
        Self {
            engine: Engine::new(config, row(kinds), OpenBoard, wallet),
            now: 0,
        }
    }

    /// Place a tile and acknowledge it; returns both batches concatenated.
    fn place(&mut self, id: u32) -> EventBatch {
        self.now += 1_000;
        let mut events = self.engine.request_place(TileId(id), self.now).unwrap();
        events.extend(self.engine.notify_relocation_complete(TileId(id)));
        events
    }

    /// Run a hint sequence to completion.
    fn hint(&mut self) -> Result<EventBatch, EngineError> {
        self.now += 1_000;
        let mut events = self.engine.request_hint(self.now)?;

        while self.engine.is_busy() {
            let awaited = match self.engine.pending() {
                tile_match::engine::Pending::Hint(run) => run.awaiting,
                other => panic!("unexpected pending state {other:?}"),
            };
            if let Some(tile) = awaited {
                events.extend(self.engine.notify_relocation_complete(tile));
            }
            self.now += 1_000;
            events.extend(self.engine.tick(self.now));
        }

        Ok(events)
    }

    fn tray(&self) -> Vec<TileId> {
        self.engine.tray().tiles().to_vec()
    }
}

fn ids(raw: &[u32]) -> Vec<TileId> {
    raw.iter().map(|&i| TileId(i)).collect()
}

fn count_matched(events: &[EngineEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, EngineEvent::Matched { .. }))
        .count()
}

// =============================================================================
// Placement Tests
// =============================================================================

/// Test that a tile joins the run of its kind and later tiles shift right.
#[test]
fn test_insert_joins_existing_run() {
    let mut round = Round::new(&[A, B, A]);
    round.place(0);
    round.place(1);

    round.now += 1_000;
    let events = round.engine.request_place(TileId(2), round.now).unwrap();

    assert_eq!(round.tray(), ids(&[0, 2, 1]));
    assert_eq!(
        events,
        vec![
            EngineEvent::to_slot(TileId(2), 1),
            EngineEvent::to_slot(TileId(1), 2),
        ]
    );
}

/// Test that a new kind is appended at the end.
#[test]
fn test_insert_new_kind_appends() {
    let mut round = Round::new(&[A, B, C]);
    round.place(0);
    round.place(1);
    round.place(2);

    assert_eq!(round.tray(), ids(&[0, 1, 2]));
}

/// Test that a placed tile cannot be placed again.
#[test]
fn test_tray_tile_not_selectable() {
    let mut round = Round::new(&[A, B]);
    round.place(0);

    assert_eq!(
        round.engine.request_place(TileId(0), 99_000),
        Err(EngineError::NotSelectable(TileId(0)))
    );
}

/// Test that the layered board only offers uncovered tiles.
#[test]
fn test_layered_board_uncovers_after_placement() {
    let mut tiles = TileRegistry::new();
    let bottom = tiles.spawn(KindId(A), Layer(0), BoardPos::new(0, 0));
    let top = tiles.spawn(KindId(B), Layer(1), BoardPos::new(0, 0));
    let mut engine = Engine::new(
        EngineConfig::default(),
        tiles,
        LayeredBoard::new(),
        Wallet::new(),
    );

    assert_eq!(
        engine.request_place(bottom, 0),
        Err(EngineError::NotSelectable(bottom))
    );

    engine.request_place(top, 0).unwrap();
    engine.notify_relocation_complete(top);

    let selectable: Vec<TileId> = engine.selectable_tiles().iter().map(|t| t.id).collect();
    assert_eq!(selectable, vec![bottom]);
    assert!(engine.request_place(bottom, 1_000).is_ok());
}

// =============================================================================
// Matching and Outcome Tests
// =============================================================================

/// Test that the third tile of a kind removes exactly those three.
#[test]
fn test_third_tile_removes_exactly_three() {
    let mut round = Round::new(&[A, B, A, A, C]);
    round.place(0);
    round.place(1);
    round.place(2);
    let events = round.place(3);

    assert_eq!(count_matched(&events), 1);
    assert!(events.contains(&EngineEvent::Matched {
        kind: KindId(A),
        tiles: [TileId(3), TileId(2), TileId(0)].into_iter().collect(),
    }));
    assert_eq!(round.tray(), ids(&[1]));
    assert_eq!(
        round.engine.tiles().location_of(TileId(3)),
        Some(TileLocation::Destroyed)
    );
    // B slid back to the first slot
    assert!(events.contains(&EngineEvent::to_slot(TileId(1), 0)));
}

/// Test that clearing every tile wins, once.
#[test]
fn test_round_won() {
    let mut round = Round::new(&[A, B, A, B, A, B]);
    let mut all = EventBatch::new();
    for id in 0..6 {
        all.extend(round.place(id));
    }

    assert_eq!(round.engine.status(), RoundStatus::Won);
    assert_eq!(all.iter().filter(|e| **e == EngineEvent::RoundWon).count(), 1);
    assert!(!all.contains(&EngineEvent::RoundLost));
    assert_eq!(round.engine.event_log().back(), Some(&EngineEvent::RoundWon));
}

/// Test that filling the tray without a match loses.
#[test]
fn test_round_lost() {
    let config = EngineConfig::default().with_base_capacity(3);
    let mut round = Round::with(&[A, B, C, D], config, Wallet::new());
    round.place(0);
    round.place(1);
    let events = round.place(2);

    assert_eq!(events.last(), Some(&EngineEvent::RoundLost));
    assert_eq!(round.engine.status(), RoundStatus::Lost);
    assert!(!round.engine.event_log().contains(&EngineEvent::RoundWon));
    assert_eq!(
        round.engine.request_place(TileId(3), 99_000),
        Err(EngineError::RoundOver)
    );
}

/// Test that a match on the last free slot keeps the round alive.
#[test]
fn test_full_tray_with_match_continues() {
    let config = EngineConfig::default().with_base_capacity(3);
    let mut round = Round::with(&[A, A, A, B], config, Wallet::new());
    round.place(0);
    round.place(1);
    let events = round.place(2);

    assert_eq!(count_matched(&events), 1);
    assert!(!events.contains(&EngineEvent::RoundLost));
    assert_eq!(round.engine.status(), RoundStatus::InProgress);
}

// =============================================================================
// Undo Tests
// =============================================================================

/// Test that undo puts the rightmost tile back where it was.
#[test]
fn test_undo_soundness() {
    let mut round = Round::new(&[A, B, C]);
    round.place(2);

    let events = round.engine.request_undo().unwrap();

    assert_eq!(events, vec![EngineEvent::to_board(TileId(2), BoardPos::new(2, 0))]);
    assert_eq!(round.engine.tiles().location_of(TileId(2)), Some(TileLocation::OnBoard));
    assert_eq!(round.engine.tiles().get(TileId(2)).unwrap().board_pos, BoardPos::new(2, 0));
    assert!(round.tray().is_empty());
    assert!(round.engine.ledger().is_empty());
}

/// Test that undo targets the rightmost slot, not the latest placement.
#[test]
fn test_undo_targets_rightmost_slot() {
    let mut round = Round::new(&[A, B, A]);
    round.place(0);
    round.place(1);
    round.place(2);
    assert_eq!(round.tray(), ids(&[0, 2, 1]));

    let events = round.engine.request_undo().unwrap();
    assert_eq!(events, vec![EngineEvent::to_board(TileId(1), BoardPos::new(1, 0))]);

    let events = round.engine.request_undo().unwrap();
    assert_eq!(events, vec![EngineEvent::to_board(TileId(2), BoardPos::new(2, 0))]);
    assert_eq!(round.tray(), ids(&[0]));
}

/// Test that matched tiles are never resurrected by undo.
#[test]
fn test_undo_after_match_falls_through() {
    let mut round = Round::new(&[A, A, B, A, C]);
    round.place(0);
    round.place(1);
    round.place(2);
    round.place(3);
    assert_eq!(round.tray(), ids(&[2]));
    assert_eq!(round.engine.ledger().len(), 1);

    let events = round.engine.request_undo().unwrap();
    assert_eq!(events, vec![EngineEvent::to_board(TileId(2), BoardPos::new(2, 0))]);

    assert_eq!(round.engine.request_undo(), Err(EngineError::NothingToUndo));
    for id in [0, 1, 3] {
        assert_eq!(
            round.engine.tiles().location_of(TileId(id)),
            Some(TileLocation::Destroyed)
        );
    }
}

/// Test that undo with no uses left prompts a purchase and changes nothing.
#[test]
fn test_undo_exhausted() {
    let mut round = Round::with(&[A, B], EngineConfig::default(), Wallet::with_all(0));
    round.place(0);

    assert_eq!(
        round.engine.request_undo(),
        Err(EngineError::ResourceExhausted(ResourceKind::Undo))
    );
    assert_eq!(
        round.engine.event_log().back(),
        Some(&EngineEvent::PurchasePrompt {
            resource: ResourceKind::Undo
        })
    );
    assert_eq!(round.tray(), ids(&[0]));

    // Granting a use unblocks it
    round.engine.economy_mut().grant(ResourceKind::Undo, 1);
    assert!(round.engine.request_undo().is_ok());
    assert_eq!(round.engine.economy().balance(ResourceKind::Undo), 0);
}

// =============================================================================
// Hint Tests
// =============================================================================

fn hinted_tier(events: &[EngineEvent]) -> Option<(HintTier, Vec<TileId>)> {
    events.iter().find_map(|e| match e {
        EngineEvent::HintSelected { tier, tiles } => Some((*tier, tiles.to_vec())),
        _ => None,
    })
}

/// Test tier 1: tray [A, A], board {A, B, B, B} picks the single A.
#[test]
fn test_hint_tray_pair() {
    let mut round = Round::new(&[A, A, A, B, B, B]);
    round.place(0);
    round.place(1);

    let events = round.hint().unwrap();

    assert_eq!(hinted_tier(&events), Some((HintTier::TrayPair, ids(&[2]))));
    assert_eq!(count_matched(&events), 1);
    assert_eq!(events.last(), Some(&EngineEvent::HintCompleted));
    assert_eq!(round.engine.tiles().location_of(TileId(3)), Some(TileLocation::OnBoard));
}

/// Test tier 2: tray [A], board {A, A} picks both.
#[test]
fn test_hint_board_pair_with_tray_seed() {
    let mut round = Round::new(&[A, A, A, B]);
    round.place(0);

    let events = round.hint().unwrap();

    assert_eq!(
        hinted_tier(&events),
        Some((HintTier::BoardPairWithTraySeed, ids(&[1, 2])))
    );
    assert_eq!(count_matched(&events), 1);
    assert!(round.tray().is_empty());
}

/// Test tier 3: empty tray, board {C, C, C}.
#[test]
fn test_hint_board_triple() {
    let mut round = Round::new(&[C, C, C]);

    let events = round.hint().unwrap();

    assert_eq!(hinted_tier(&events), Some((HintTier::BoardTriple, ids(&[0, 1, 2]))));
    assert!(events.contains(&EngineEvent::RoundWon));
    assert_eq!(events.last(), Some(&EngineEvent::HintCompleted));
    assert_eq!(round.engine.status(), RoundStatus::Won);
}

/// Test no tier: tray [A], board {B}. No use is spent.
#[test]
fn test_hint_unavailable() {
    let mut round = Round::new(&[A, B]);
    round.place(0);

    assert_eq!(round.hint(), Err(EngineError::NoHintAvailable));
    assert_eq!(round.engine.event_log().back(), Some(&EngineEvent::HintUnavailable));
    assert_eq!(round.engine.economy().balance(ResourceKind::Hint), 3);
    assert_eq!(round.tray(), ids(&[0]));
}

/// Test that hinted tiles get no undo step.
#[test]
fn test_hinted_tiles_not_undoable() {
    let mut round = Round::new(&[A, A, A, B]);
    round.place(0);

    round.now += 1_000;
    round.engine.request_hint(round.now).unwrap();

    assert_eq!(round.tray(), ids(&[0, 1]));
    assert!(round.engine.ledger().step_for(TileId(1)).is_none());
    assert_eq!(round.engine.request_undo(), Err(EngineError::Busy));
}

/// Test that a hint spends a use and a second one can run out.
#[test]
fn test_hint_exhausted() {
    let mut wallet = Wallet::with_all(0);
    wallet.grant(ResourceKind::Hint, 1);
    let mut round = Round::with(&[C, C, C, D, D, D], EngineConfig::default(), wallet);

    round.hint().unwrap();
    assert_eq!(round.engine.economy().balance(ResourceKind::Hint), 0);

    assert_eq!(
        round.hint(),
        Err(EngineError::ResourceExhausted(ResourceKind::Hint))
    );
    assert_eq!(
        round.engine.event_log().back(),
        Some(&EngineEvent::PurchasePrompt {
            resource: ResourceKind::Hint
        })
    );
}

// =============================================================================
// Shuffle Tests
// =============================================================================

/// Test that a shuffle blocks input until every tile is acknowledged.
#[test]
fn test_shuffle_blocks_until_acknowledged() {
    let mut round = Round::new(&[A, B, C, D]);

    let events = round.engine.request_shuffle().unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(round.engine.request_place(TileId(0), 50_000), Err(EngineError::Busy));
    assert_eq!(round.engine.request_hint(50_000), Err(EngineError::Busy));

    let mut last = EventBatch::new();
    for event in &events {
        if let EngineEvent::TileRelocated { tile, .. } = event {
            last = round.engine.notify_relocation_complete(*tile);
        }
    }

    assert_eq!(last, vec![EngineEvent::ShuffleCompleted]);
    assert!(!round.engine.is_busy());
    assert_eq!(round.engine.economy().balance(ResourceKind::Shuffle), 0);
}

/// Test that a board with nothing to permute refuses without spending.
#[test]
fn test_nothing_to_shuffle() {
    let mut round = Round::new(&[A, B]);
    round.place(0);

    assert_eq!(round.engine.request_shuffle(), Err(EngineError::NothingToShuffle));
    assert_eq!(round.engine.economy().balance(ResourceKind::Shuffle), 1);
}

/// Test that equal seeds give equal shuffles.
#[test]
fn test_shuffle_is_deterministic() {
    let kinds = [A, B, C, D, A, B, C, D];
    let config = EngineConfig::default().with_seed(1234);
    let mut first = Round::with(&kinds, config.clone(), Wallet::new());
    let mut second = Round::with(&kinds, config, Wallet::new());

    assert_eq!(
        first.engine.request_shuffle().unwrap(),
        second.engine.request_shuffle().unwrap()
    );
}

// =============================================================================
// Gate and Upgrade Tests
// =============================================================================

/// Test the tap cooldown.
#[test]
fn test_debounce_window() {
    let mut round = Round::new(&[A, B, C]);
    round.engine.request_place(TileId(0), 500).unwrap();
    round.engine.notify_relocation_complete(TileId(0));

    assert_eq!(
        round.engine.request_place(TileId(1), 600),
        Err(EngineError::Debounced)
    );
    assert!(round.engine.request_place(TileId(1), 700).is_ok());
}

/// Test that stray acknowledgements are ignored.
#[test]
fn test_unexpected_acknowledgement_ignored() {
    let mut round = Round::new(&[A, B]);
    round.engine.request_place(TileId(0), 0).unwrap();

    assert!(round.engine.notify_relocation_complete(TileId(1)).is_empty());
    assert!(round.engine.is_busy());
}

/// Test that the capacity upgrade works mid-placement and only once.
#[test]
fn test_capacity_upgrade() {
    let mut round = Round::new(&[A, B]);
    round.engine.request_place(TileId(0), 0).unwrap();

    let events = round.engine.request_capacity_upgrade().unwrap();
    assert_eq!(events, vec![EngineEvent::CapacityUpgraded { capacity: 8 }]);
    assert_eq!(round.engine.tray().capacity(), 8);
    assert_eq!(round.engine.tray().len(), 1);

    assert_eq!(
        round.engine.request_capacity_upgrade(),
        Err(EngineError::CapacityAlreadyUpgraded)
    );
}

/// Test that the upgrade can save a round one tile from losing.
#[test]
fn test_capacity_upgrade_avoids_loss() {
    let config = EngineConfig::default()
        .with_base_capacity(3)
        .with_max_capacity(4);
    let mut round = Round::with(&[A, B, A, A], config, Wallet::new());
    round.place(0);
    round.place(1);

    round.engine.request_capacity_upgrade().unwrap();
    round.place(2);
    let events = round.place(3);

    assert_eq!(count_matched(&events), 1);
    assert_eq!(round.engine.status(), RoundStatus::InProgress);
}

/// Test that the upgrade is refused when no use is left.
#[test]
fn test_capacity_upgrade_exhausted() {
    let mut round = Round::with(&[A], EngineConfig::default(), Wallet::with_all(0));

    assert_eq!(
        round.engine.request_capacity_upgrade(),
        Err(EngineError::ResourceExhausted(ResourceKind::SlotUpgrade))
    );
    assert_eq!(round.engine.tray().capacity(), 7);
}
