//! The round orchestrator.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::pending::{HintRun, Pending};
use crate::board::BoardAdapter;
use crate::core::{
    EngineConfig, EngineError, GameRng, GameRngState, InvariantViolation, Tile, TileId, TileLocation,
    TileRegistry,
};
use crate::economy::{Economy, ResourceKind};
use crate::events::{EngineEvent, EventBatch};
use crate::hint::HintSelector;
use crate::matching::{MatchDetector, RoundStatus};
use crate::shuffle::ShufflePlanner;
use crate::tray::Tray;
use crate::undo::UndoLedger;

/// Read-only view of a round, cheap to take.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub tiles: TileRegistry,
    pub tray: Tray,
    pub undo_steps: usize,
    pub status: RoundStatus,
    pub busy: bool,
    /// Shuffle stream position, so a replay reproduces later shuffles.
    pub rng: GameRngState,
}

/// One round of the tile-collection puzzle.
///
/// Generic over the board geometry and the consumable store so that both
/// can be swapped in tests.
pub struct Engine<B: BoardAdapter, E: Economy> {
    config: EngineConfig,
    tiles: TileRegistry,
    tray: Tray,
    ledger: UndoLedger,
    rng: GameRng,
    board: B,
    economy: E,
    pending: Pending,
    status: RoundStatus,
    last_tap_ms: Option<u64>,
    log: im::Vector<EngineEvent>,
}

impl<B: BoardAdapter, E: Economy> Engine<B, E> {
    /// Start a round over `tiles`.
    ///
    /// The tray starts empty, so any tile the registry already tags `InTray`
    /// is returned to the board at its recorded position. `Destroyed` tiles
    /// stay destroyed.
    pub fn new(config: EngineConfig, mut tiles: TileRegistry, board: B, economy: E) -> Self {
        let rng = GameRng::new(config.seed).for_context("shuffle");
        let tray = Tray::new(config.base_capacity);

        for tile in tray.stray_tiles(&tiles) {
            log::warn!("{tile} was tagged InTray at round start; returning it to the board");
            tiles.set_location(tile, TileLocation::OnBoard);
        }

        log::info!(
            "round started: {} tiles, tray capacity {}",
            tiles.live_count(),
            config.base_capacity
        );

        Self {
            config,
            tiles,
            tray,
            ledger: UndoLedger::new(),
            rng,
            board,
            economy,
            pending: Pending::Idle,
            status: RoundStatus::InProgress,
            last_tap_ms: None,
            log: im::Vector::new(),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn tiles(&self) -> &TileRegistry {
        &self.tiles
    }

    #[must_use]
    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    #[must_use]
    pub fn ledger(&self) -> &UndoLedger {
        &self.ledger
    }

    #[must_use]
    pub fn board(&self) -> &B {
        &self.board
    }

    #[must_use]
    pub fn economy(&self) -> &E {
        &self.economy
    }

    /// Mutable access for granting purchased uses.
    pub fn economy_mut(&mut self) -> &mut E {
        &mut self.economy
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    #[must_use]
    pub fn pending(&self) -> &Pending {
        &self.pending
    }

    /// Check if an operation is waiting on acknowledgements.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.pending.is_idle()
    }

    /// Check if the one-time capacity upgrade has been applied.
    #[must_use]
    pub fn capacity_upgraded(&self) -> bool {
        self.tray.capacity() >= self.config.max_capacity
    }

    /// Every event emitted this round, refusal notices included.
    #[must_use]
    pub fn event_log(&self) -> &im::Vector<EngineEvent> {
        &self.log
    }

    /// Board tiles the player may tap right now.
    #[must_use]
    pub fn selectable_tiles(&self) -> Vec<&Tile> {
        self.board.selectable_tiles(&self.tiles)
    }

    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            tiles: self.tiles.clone(),
            tray: self.tray.clone(),
            undo_steps: self.ledger.len(),
            status: self.status,
            busy: self.is_busy(),
            rng: self.rng.state(),
        }
    }

    // === Commands ===

    /// Move a board tile into the tray.
    ///
    /// The insertion commits immediately and an undo step is recorded. Match
    /// detection waits for [`notify_relocation_complete`] on this tile; until
    /// then every other command is refused with `Busy`.
    ///
    /// [`notify_relocation_complete`]: Self::notify_relocation_complete
    pub fn request_place(&mut self, tile: TileId, now_ms: u64) -> Result<EventBatch, EngineError> {
        self.ensure_running()?;
        self.ensure_idle()?;

        if self.tray.is_full() {
            log::warn!("placement of {tile} refused: tray is full");
            return Err(EngineError::TrayFull);
        }

        if let Some(last) = self.last_tap_ms {
            if now_ms.saturating_sub(last) < self.config.tap_cooldown_ms {
                log::trace!("tap on {tile} debounced");
                return Err(EngineError::Debounced);
            }
        }

        let prior = self
            .tiles
            .get(tile)
            .ok_or(EngineError::UnknownTile(tile))?
            .board_pos;
        if !self.board.is_selectable(&self.tiles, tile) {
            return Err(EngineError::NotSelectable(tile));
        }

        let changes = self.tray.insert(&mut self.tiles, tile)?;
        self.ledger.push(tile, prior);
        self.last_tap_ms = Some(now_ms);
        self.pending = Pending::Placement { tile };
        log::debug!("placed {tile} ({} in tray)", self.tray.len());

        let mut events: EventBatch = changes.into_iter().map(EngineEvent::from).collect();
        events.extend(self.verify());
        Ok(self.record(events))
    }

    /// Return the rightmost tray tile to its board position.
    ///
    /// Only player placements are reversible. If the rightmost tile has no
    /// step (it was hinted, or nothing is in the tray) the request is refused
    /// without spending a use.
    pub fn request_undo(&mut self) -> Result<EventBatch, EngineError> {
        self.ensure_running()?;
        self.ensure_idle()?;

        let Some(target) = self
            .tray
            .last()
            .filter(|&tile| self.ledger.step_for(tile).is_some())
        else {
            return Err(self.refuse(EngineError::NothingToUndo));
        };

        if !self.economy.try_consume(ResourceKind::Undo) {
            return Err(self.refuse(EngineError::ResourceExhausted(ResourceKind::Undo)));
        }

        let step = self
            .ledger
            .take_step_for(target)
            .ok_or(EngineError::NothingToUndo)?;
        self.tray.pop_last();
        self.tiles.set_location(target, TileLocation::OnBoard);
        self.tiles.set_board_pos(target, step.prior);
        log::debug!("undid {target}, back at {:?}", step.prior);

        let mut events = vec![EngineEvent::to_board(target, step.prior)];
        events.extend(self.verify());
        Ok(self.record(events))
    }

    /// Start a hint sequence.
    ///
    /// The first hinted tile is inserted right away. Each later tile goes in
    /// from [`tick`](Self::tick) once the previous one is acknowledged and
    /// `hint_step_delay_ms` has passed since it was inserted. Hinted tiles get
    /// no undo step.
    pub fn request_hint(&mut self, now_ms: u64) -> Result<EventBatch, EngineError> {
        self.ensure_running()?;
        self.ensure_idle()?;

        let Some(hint) = HintSelector::select(&self.tray, &self.tiles, &self.board) else {
            return Err(self.refuse(EngineError::NoHintAvailable));
        };

        if !self.economy.try_consume(ResourceKind::Hint) {
            return Err(self.refuse(EngineError::ResourceExhausted(ResourceKind::Hint)));
        }

        log::info!("hint {:?} on {}: {:?}", hint.tier, hint.kind, hint.tiles);

        let mut queue: VecDeque<TileId> = hint.tiles.iter().copied().collect();
        let mut events = vec![EngineEvent::HintSelected {
            tier: hint.tier,
            tiles: hint.tiles,
        }];

        let Some(first) = queue.pop_front() else {
            return Err(EngineError::NoHintAvailable);
        };
        let changes = self.tray.insert(&mut self.tiles, first)?;
        events.extend(changes.into_iter().map(EngineEvent::from));

        self.pending = Pending::Hint(HintRun {
            queue,
            awaiting: Some(first),
            last_insert_ms: now_ms,
        });

        events.extend(self.verify());
        Ok(self.record(events))
    }

    /// Rearrange board tiles within their layers.
    ///
    /// Refused with `NothingToShuffle` (no use spent) if no layer holds more
    /// than one board tile. Input stays blocked until every moved tile is
    /// acknowledged.
    pub fn request_shuffle(&mut self) -> Result<EventBatch, EngineError> {
        self.ensure_running()?;
        self.ensure_idle()?;

        // Plan on a copy so a refused shuffle leaves the RNG untouched
        let mut rng = self.rng.clone();
        let moves = ShufflePlanner::plan(&self.tiles, &mut rng);
        if moves.is_empty() {
            return Err(EngineError::NothingToShuffle);
        }

        if !self.economy.try_consume(ResourceKind::Shuffle) {
            return Err(self.refuse(EngineError::ResourceExhausted(ResourceKind::Shuffle)));
        }

        self.rng = rng;
        ShufflePlanner::apply(&mut self.tiles, &moves);
        self.pending = Pending::Shuffle {
            outstanding: moves.iter().map(|m| m.tile).collect(),
        };
        log::info!("shuffled {} board tiles", moves.len());

        let mut events: EventBatch = moves
            .iter()
            .map(|m| EngineEvent::to_board(m.tile, m.to))
            .collect();
        events.extend(self.verify());
        Ok(self.record(events))
    }

    /// Raise tray capacity to `max_capacity`. Allowed once per round.
    ///
    /// Does not touch tray contents, so it is accepted while other
    /// operations are in flight.
    pub fn request_capacity_upgrade(&mut self) -> Result<EventBatch, EngineError> {
        self.ensure_running()?;

        if self.capacity_upgraded() {
            return Err(EngineError::CapacityAlreadyUpgraded);
        }

        if !self.economy.try_consume(ResourceKind::SlotUpgrade) {
            return Err(self.refuse(EngineError::ResourceExhausted(ResourceKind::SlotUpgrade)));
        }

        self.tray.raise_capacity(self.config.max_capacity);
        let capacity = self.tray.capacity();
        log::info!("tray capacity raised to {capacity}");

        Ok(self.record(vec![EngineEvent::CapacityUpgraded { capacity }]))
    }

    // === Acknowledgements ===

    /// Report that the presentation layer finished relocating `tile`.
    ///
    /// Acknowledgements the engine is not waiting for are ignored.
    pub fn notify_relocation_complete(&mut self, tile: TileId) -> EventBatch {
        if !self.pending.awaits(tile) {
            log::trace!("ignoring acknowledgement for {tile}");
            return EventBatch::new();
        }

        let mut events = match &mut self.pending {
            Pending::Idle => EventBatch::new(),
            Pending::Placement { .. } => {
                self.pending = Pending::Idle;
                self.evaluate()
            }
            Pending::Hint(run) => {
                run.awaiting = None;
                let finished = run.queue.is_empty();
                let mut events = self.evaluate();
                if finished || self.status.is_over() {
                    self.pending = Pending::Idle;
                    events.push(EngineEvent::HintCompleted);
                }
                events
            }
            Pending::Shuffle { outstanding } => {
                outstanding.remove(&tile);
                if outstanding.is_empty() {
                    self.pending = Pending::Idle;
                    vec![EngineEvent::ShuffleCompleted]
                } else {
                    EventBatch::new()
                }
            }
        };

        events.extend(self.verify());
        self.record(events)
    }

    /// Advance time-driven work: the next tile of a hint sequence.
    pub fn tick(&mut self, now_ms: u64) -> EventBatch {
        let delay = self.config.hint_step_delay_ms;
        let next = match &mut self.pending {
            Pending::Hint(run) if run.next_due(now_ms, delay) => run.queue.pop_front(),
            _ => None,
        };
        let Some(tile) = next else {
            return EventBatch::new();
        };

        let mut events = match self.tray.insert(&mut self.tiles, tile) {
            Ok(changes) => {
                if let Pending::Hint(run) = &mut self.pending {
                    run.awaiting = Some(tile);
                    run.last_insert_ms = now_ms;
                }
                changes.into_iter().map(EngineEvent::from).collect()
            }
            Err(err) => {
                log::warn!("hint sequence aborted at {tile}: {err}");
                self.pending = Pending::Idle;
                vec![EngineEvent::HintCompleted]
            }
        };

        events.extend(self.verify());
        self.record(events)
    }

    // === Internals ===

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.status.is_over() {
            return Err(EngineError::RoundOver);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.is_busy() {
            return Err(EngineError::Busy);
        }
        Ok(())
    }

    /// Log a refusal's notice event and hand the error back.
    fn refuse(&mut self, err: EngineError) -> EngineError {
        log::debug!("refused: {err}");
        if let Some(notice) = err.notice() {
            self.log.push_back(notice);
        }
        err
    }

    /// Run match detection and settle the round outcome.
    fn evaluate(&mut self) -> EventBatch {
        let report =
            MatchDetector::evaluate(&mut self.tray, &mut self.tiles, &mut self.ledger, &self.board);

        if report.outcome.is_over() {
            log::info!("round over: {:?}", report.outcome);
            self.status = report.outcome;
            self.pending = Pending::Idle;
        }

        report.events()
    }

    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.tray.check_invariants(&self.tiles)?;
        self.ledger.check_invariants(&self.tiles)
    }

    /// Post-command consistency check.
    ///
    /// Panics in debug builds. Release builds log the violation and repair
    /// the tray and ledger, returning any relocations the repair caused.
    fn verify(&mut self) -> EventBatch {
        let Err(violation) = self.check_invariants() else {
            return EventBatch::new();
        };

        if cfg!(debug_assertions) {
            panic!("engine invariant violated: {violation}");
        }

        log::error!("engine invariant violated: {violation}; repairing");
        let changes = self.tray.heal(&self.tiles);
        let mut events: EventBatch = changes.into_iter().map(EngineEvent::from).collect();

        for tile in self.tray.stray_tiles(&self.tiles) {
            self.tiles.set_location(tile, TileLocation::OnBoard);
            if let Some(pos) = self.tiles.get(tile).map(|t| t.board_pos) {
                events.push(EngineEvent::to_board(tile, pos));
            }
        }

        self.ledger.prune_stale(&self.tiles);
        events
    }

    fn record(&mut self, events: EventBatch) -> EventBatch {
        self.log.extend(events.iter().cloned());
        events
    }
}
