//! Match detection and round outcome.
//!
//! Runs once per acknowledged insertion. Consumes triples, compacts the
//! tray, prunes the undo ledger and decides whether the round is won, lost
//! or still going.

mod detector;

pub use detector::{MatchDetector, MatchGroup, MatchReport, RoundStatus, MATCH_SIZE};
