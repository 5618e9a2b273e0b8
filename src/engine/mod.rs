//! The round engine: command intake, the in-flight gate and the event log.
//!
//! ## Two-phase commands
//!
//! Every state change commits synchronously inside the command that caused
//! it. What happens next is deferred until the presentation layer reports
//! the relocation finished:
//!
//! - a placement is evaluated for matches on its acknowledgement
//! - a hint inserts its next tile from `tick` after the previous one is
//!   acknowledged and the step delay has passed
//! - a shuffle completes when every moved tile is acknowledged
//!
//! While anything is in flight, placement, undo, hint and shuffle requests
//! are refused with `Busy`.
//!
//! ## Key Types
//!
//! - `Engine`: owns the registry, tray, ledger and collaborators
//! - `Pending`: what the engine is waiting for
//! - `RoundSnapshot`: a read-only copy for presentation or inspection

mod pending;
mod session;

pub use pending::{HintRun, Pending};
pub use session::{Engine, RoundSnapshot};
