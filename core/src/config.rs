//! Construction-time game configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_BOARD_DIMENSION, DEFAULT_MERGE_ANIMATION, DEFAULT_WIN_VALUE, SPAWN_TILE_VALUE};

const DEFAULT_RNG_SEED: u64 = 0x2048_d0e1_5eed_7113;

/// Throttle window expressed as a fraction of the merge animation.
const THROTTLE_NUMERATOR: u32 = 21;
const THROTTLE_DENOMINATOR: u32 = 20;

/// Policy applied when the board is full and no merge remains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    /// Two players alternate; an immobile board goes to the higher score,
    /// equal scores draw.
    #[default]
    Duel,
    /// An immobile board is lost regardless of score.
    Solo,
}

/// Parameters fixed when a world is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of cells along each edge of the board.
    pub board_dimension: u32,
    /// Tile value that ends the game with a win.
    pub win_value: u32,
    /// Length of the merge animation in milliseconds.
    pub merge_animation_ms: u64,
    /// Terminal policy for an immobile board.
    pub rules: RuleSet,
    /// Seed of the spawn policy's random generator.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_dimension: DEFAULT_BOARD_DIMENSION,
            win_value: DEFAULT_WIN_VALUE,
            merge_animation_ms: DEFAULT_MERGE_ANIMATION.as_millis() as u64,
            rules: RuleSet::Duel,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

impl GameConfig {
    /// Delay between an accepted move and its settle step.
    #[must_use]
    pub const fn merge_animation(&self) -> Duration {
        Duration::from_millis(self.merge_animation_ms)
    }

    /// Minimum interval between two admitted moves, slightly longer than the
    /// merge animation.
    #[must_use]
    pub fn throttle_window(&self) -> Duration {
        self.merge_animation() * THROTTLE_NUMERATOR / THROTTLE_DENOMINATOR
    }

    /// Checks that the configuration describes a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_dimension < 2 {
            return Err(ConfigError::BoardTooSmall(self.board_dimension));
        }
        if self.win_value <= SPAWN_TILE_VALUE || !self.win_value.is_power_of_two() {
            return Err(ConfigError::InvalidWinValue(self.win_value));
        }
        if self.merge_animation_ms == 0 {
            return Err(ConfigError::ZeroAnimation);
        }
        Ok(())
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The board needs at least two cells per edge.
    #[error("board dimension {0} is too small, expected at least 2")]
    BoardTooSmall(u32),
    /// The win value must be a power of two above the spawn value.
    #[error("win value {0} must be a power of two greater than 2")]
    InvalidWinValue(u32),
    /// Settle must be deferred by a non-zero animation window.
    #[error("merge animation duration must be greater than zero")]
    ZeroAnimation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.board_dimension, 4);
        assert_eq!(config.win_value, 2048);
        assert_eq!(config.rules, RuleSet::Duel);
    }

    #[test]
    fn throttle_window_exceeds_animation() {
        let config = GameConfig::default();
        assert_eq!(config.merge_animation(), Duration::from_millis(100));
        assert_eq!(config.throttle_window(), Duration::from_millis(105));
    }

    #[test]
    fn rejects_unplayable_configurations() {
        let small = GameConfig {
            board_dimension: 1,
            ..GameConfig::default()
        };
        assert_eq!(small.validate(), Err(ConfigError::BoardTooSmall(1)));

        let odd_target = GameConfig {
            win_value: 1000,
            ..GameConfig::default()
        };
        assert_eq!(odd_target.validate(), Err(ConfigError::InvalidWinValue(1000)));

        let trivial_target = GameConfig {
            win_value: 2,
            ..GameConfig::default()
        };
        assert_eq!(trivial_target.validate(), Err(ConfigError::InvalidWinValue(2)));

        let instant = GameConfig {
            merge_animation_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(instant.validate(), Err(ConfigError::ZeroAnimation));
    }
}
