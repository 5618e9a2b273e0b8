//! Hint selection: the cheapest move that completes a triple.
//!
//! ## Tiers
//!
//! The first applicable tier wins:
//!
//! 1. `TrayPair`: a kind sits twice in the tray and a selectable board tile
//!    of that kind exists. One tile completes it.
//! 2. `BoardPairWithTraySeed`: a kind sits in the tray and two selectable
//!    board tiles of it exist. Two tiles complete it.
//! 3. `BoardTriple`: three selectable board tiles of one kind. Three tiles
//!    complete it.
//!
//! ## Capacity
//!
//! Each tier also requires that all of its tiles fit in the tray's free slots
//! (one, two or three). A tier whose tiles do not fit is skipped even when
//! its kind pattern is present, because placing them would fill the tray
//! before the triple completes and lose the round. For example, tray `[A, B]`
//! with capacity 3 and board `{A, A}` yields no hint rather than a
//! `BoardPairWithTraySeed` that could never finish.
//! Selection is deterministic: kinds are visited in tray order (tiers 1 and
//! 2) or in registry order of first occurrence (tier 3), and board tiles are
//! taken in registry order.

mod selector;

pub use selector::{Hint, HintSelector, HintTier};
