//! Core engine types: tiles, registry, RNG, configuration, errors.
//!
//! Everything else in the crate builds on these. None of them know about
//! the tray or the pending-operation gate.

pub mod tile;
pub mod registry;
pub mod rng;
pub mod config;
pub mod error;

pub use tile::{BoardPos, KindId, Layer, Tile, TileId, TileLocation};
pub use registry::TileRegistry;
pub use rng::{GameRng, GameRngState};
pub use config::EngineConfig;
pub use error::{EngineError, InvariantViolation};
