//! Tunable parameters for a game session.

use std::{ops::RangeInclusive, time::Duration};

use maze_sprint_core::{DEFAULT_MAZE_SIDE, MOVE_COOLDOWN};
use serde::{Deserialize, Serialize};

const DEFAULT_SEED: u64 = 0x2026_c0de_5eed_0001;
const DEFAULT_LOADING_SETTLE_MS: u64 = 300;
const DEFAULT_ELAPSED_SAMPLE_MS: u64 = 100;

/// Configuration applied to every session created from it.
///
/// Missing fields fall back to their defaults when deserialising, so a
/// configuration file only needs to list what it overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Requested maze width; clamped up to an odd value of at least five.
    pub maze_width: u32,
    /// Requested maze height; clamped up to an odd value of at least five.
    pub maze_height: u32,
    /// Seed for maze carving and pickup placement.
    pub seed: u64,
    /// Fewest pickups placed per session.
    pub min_collectibles: u32,
    /// Most pickups placed per session.
    pub max_collectibles: u32,
    /// Minimum time between two committed steps, in milliseconds.
    pub move_cooldown_ms: u64,
    /// Pause between loading completion and the selection screen, in milliseconds.
    pub loading_settle_ms: u64,
    /// Interval of the elapsed-time sampler, in milliseconds.
    pub elapsed_sample_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            maze_width: DEFAULT_MAZE_SIDE,
            maze_height: DEFAULT_MAZE_SIDE,
            seed: DEFAULT_SEED,
            min_collectibles: 5,
            max_collectibles: 8,
            move_cooldown_ms: MOVE_COOLDOWN.as_millis() as u64,
            loading_settle_ms: DEFAULT_LOADING_SETTLE_MS,
            elapsed_sample_ms: DEFAULT_ELAPSED_SAMPLE_MS,
        }
    }
}

impl SessionConfig {
    /// Minimum time between two committed steps.
    #[must_use]
    pub const fn move_cooldown(&self) -> Duration {
        Duration::from_millis(self.move_cooldown_ms)
    }

    /// Pause between loading completion and the selection screen.
    #[must_use]
    pub const fn loading_settle_delay(&self) -> Duration {
        Duration::from_millis(self.loading_settle_ms)
    }

    /// Interval of the elapsed-time sampler.
    #[must_use]
    pub const fn elapsed_sample_interval(&self) -> Duration {
        Duration::from_millis(self.elapsed_sample_ms)
    }

    /// Inclusive range of pickups to place; swapped bounds are reordered.
    #[must_use]
    pub fn collectible_range(&self) -> RangeInclusive<u32> {
        let low = self.min_collectibles.min(self.max_collectibles);
        let high = self.min_collectibles.max(self.max_collectibles);
        low..=high
    }
}
