//! Metered uses for undo, hint, shuffle and the tray slot upgrade.
//!
//! The counters belong to an external collaborator. The engine only asks
//! [`Economy::try_consume`] before an action takes effect and never touches
//! the counters otherwise.
//!
//! [`Wallet`] is an in-memory reference implementation with the standard
//! starting balances, plus a compact `bincode` form the caller can persist
//! between sessions.

mod wallet;

pub use wallet::{Wallet, WalletError, WalletState};

use serde::{Deserialize, Serialize};

/// A metered resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Hint,
    Undo,
    Shuffle,
    SlotUpgrade,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Hint,
        ResourceKind::Undo,
        ResourceKind::Shuffle,
        ResourceKind::SlotUpgrade,
    ];

    /// Balance a fresh player starts with.
    #[must_use]
    pub const fn default_balance(self) -> i32 {
        match self {
            ResourceKind::Hint => 3,
            ResourceKind::Undo => 3,
            ResourceKind::Shuffle => 1,
            ResourceKind::SlotUpgrade => 1,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Hint => "hint",
            ResourceKind::Undo => "undo",
            ResourceKind::Shuffle => "shuffle",
            ResourceKind::SlotUpgrade => "slot upgrade",
        };
        f.write_str(name)
    }
}

/// Economy collaborator.
///
/// ## Implementation Notes
///
/// - `try_consume` must either spend exactly one use and return `true`, or
///   change nothing and return `false`
/// - `grant` is never called by the engine; it exists for purchase flows
pub trait Economy {
    /// Spend one use if one is available.
    fn try_consume(&mut self, resource: ResourceKind) -> bool;

    /// Add uses.
    fn grant(&mut self, resource: ResourceKind, amount: i32);

    /// Current number of uses.
    fn balance(&self, resource: ResourceKind) -> i32;
}
