//! Game configuration assembled from an optional TOML file and flag overrides.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use tile_duel_core::{GameConfig, RuleSet};

/// Layout of the configuration file; all game settings live under `[game]`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    game: GameConfig,
}

/// Values supplied on the command line that replace file settings.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) rng_seed: Option<u64>,
    pub(crate) board_dimension: Option<u32>,
    pub(crate) win_value: Option<u32>,
    pub(crate) merge_animation_ms: Option<u64>,
    pub(crate) solo: bool,
}

impl Overrides {
    fn apply(self, config: &mut GameConfig) {
        if let Some(seed) = self.rng_seed {
            config.rng_seed = seed;
        }
        if let Some(dimension) = self.board_dimension {
            config.board_dimension = dimension;
        }
        if let Some(win_value) = self.win_value {
            config.win_value = win_value;
        }
        if let Some(millis) = self.merge_animation_ms {
            config.merge_animation_ms = millis;
        }
        if self.solo {
            config.rules = RuleSet::Solo;
        }
    }
}

/// Loads the configuration file when one is given, applies the overrides
/// and validates the result.
pub(crate) fn load(path: Option<&Path>, overrides: Overrides) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read game config at {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("invalid game config at {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    overrides.apply(&mut config);
    config
        .validate()
        .context("game configuration describes an unplayable game")?;
    Ok(config)
}

fn parse(contents: &str) -> Result<GameConfig> {
    let file: ConfigFile =
        toml::from_str(contents).context("failed to parse game config toml contents")?;
    Ok(file.game)
}
