//! In-memory economy with persistable counters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Economy, ResourceKind};

/// Failure to encode or decode a persisted wallet.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Persisted counters.
///
/// Counters are signed: a collaborator may carry debt or negative grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletState {
    pub hint: i32,
    pub undo: i32,
    pub shuffle: i32,
    pub slot_upgrade: i32,
}

impl Default for WalletState {
    fn default() -> Self {
        Self {
            hint: ResourceKind::Hint.default_balance(),
            undo: ResourceKind::Undo.default_balance(),
            shuffle: ResourceKind::Shuffle.default_balance(),
            slot_upgrade: ResourceKind::SlotUpgrade.default_balance(),
        }
    }
}

impl WalletState {
    fn slot(&mut self, resource: ResourceKind) -> &mut i32 {
        match resource {
            ResourceKind::Hint => &mut self.hint,
            ResourceKind::Undo => &mut self.undo,
            ResourceKind::Shuffle => &mut self.shuffle,
            ResourceKind::SlotUpgrade => &mut self.slot_upgrade,
        }
    }

    #[must_use]
    pub fn get(&self, resource: ResourceKind) -> i32 {
        match resource {
            ResourceKind::Hint => self.hint,
            ResourceKind::Undo => self.undo,
            ResourceKind::Shuffle => self.shuffle,
            ResourceKind::SlotUpgrade => self.slot_upgrade,
        }
    }
}

/// Reference [`Economy`] backed by a [`WalletState`].
///
/// ```
/// use tile_match::economy::{Economy, ResourceKind, Wallet};
///
/// let mut wallet = Wallet::new();
/// assert_eq!(wallet.balance(ResourceKind::Shuffle), 1);
///
/// assert!(wallet.try_consume(ResourceKind::Shuffle));
/// assert!(!wallet.try_consume(ResourceKind::Shuffle));
///
/// let bytes = wallet.to_bytes().unwrap();
/// let restored = Wallet::from_bytes(&bytes).unwrap();
/// assert_eq!(restored.balance(ResourceKind::Shuffle), 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Wallet {
    state: WalletState,
}

impl Wallet {
    /// Wallet with the standard starting balances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet restored from saved counters.
    #[must_use]
    pub fn from_state(state: WalletState) -> Self {
        Self { state }
    }

    /// Wallet where every resource starts at `amount`.
    #[must_use]
    pub fn with_all(amount: i32) -> Self {
        Self {
            state: WalletState {
                hint: amount,
                undo: amount,
                shuffle: amount,
                slot_upgrade: amount,
            },
        }
    }

    #[must_use]
    pub fn state(&self) -> WalletState {
        self.state
    }

    /// Compact binary form for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WalletError> {
        Ok(bincode::serialize(&self.state)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        let state: WalletState = bincode::deserialize(bytes)?;
        Ok(Self::from_state(state))
    }
}

impl Economy for Wallet {
    fn try_consume(&mut self, resource: ResourceKind) -> bool {
        let slot = self.state.slot(resource);
        if *slot > 0 {
            *slot -= 1;
            log::debug!("spent one {resource} use, {} left", *slot);
            true
        } else {
            false
        }
    }

    fn grant(&mut self, resource: ResourceKind, amount: i32) {
        let slot = self.state.slot(resource);
        *slot = slot.saturating_add(amount);
    }

    fn balance(&self, resource: ResourceKind) -> i32 {
        self.state.get(resource)
    }
}
