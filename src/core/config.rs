//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tray capacity at round start (default: 7).
    pub base_capacity: usize,

    /// Capacity after the one-time upgrade (default: 8).
    pub max_capacity: usize,

    /// Minimum gap between accepted taps, in milliseconds (default: 200).
    pub tap_cooldown_ms: u64,

    /// Delay between two hinted placements, in milliseconds (default: 300).
    pub hint_step_delay_ms: u64,

    /// Seed for the shuffle RNG.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_capacity: 7,
            max_capacity: 8,
            tap_cooldown_ms: 200,
            hint_step_delay_ms: 300,
            seed: 42,
        }
    }
}

impl EngineConfig {
    pub fn with_base_capacity(mut self, capacity: usize) -> Self {
        self.base_capacity = capacity;
        self.max_capacity = self.max_capacity.max(capacity);
        self
    }

    pub fn with_max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = capacity.max(self.base_capacity);
        self
    }

    pub fn with_tap_cooldown(mut self, ms: u64) -> Self {
        self.tap_cooldown_ms = ms;
        self
    }

    pub fn with_hint_step_delay(mut self, ms: u64) -> Self {
        self.hint_step_delay_ms = ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
