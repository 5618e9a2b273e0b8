//! The tray: an ordered, capacity-bounded staging area.
//!
//! ## Invariants
//!
//! - tiles of equal kind form one contiguous run
//! - no tile appears twice
//! - every tile in the tray is tagged `InTray` in the registry
//! - length never exceeds capacity
//!
//! ## Key Types
//!
//! - `Tray`: ordered tile list with grouped insertion
//! - `SlotAssignment`: a tile whose slot index changed

mod slots;

pub use slots::{SlotAssignment, SlotChanges, Tray};
