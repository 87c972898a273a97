#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for placing new tiles.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tile_duel_core::{Board, Tile, SPAWN_TILE_VALUE};

/// Number of tiles placed on a fresh board.
pub const SEED_TILE_COUNT: usize = 2;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Spawn policy that picks vacant cells uniformly with a seeded generator.
#[derive(Clone, Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Creates a value-2 tile on a uniformly chosen vacant cell.
    ///
    /// Returns `None` and leaves the board untouched when no cell is vacant.
    pub fn spawn_random_tile(&mut self, board: &mut Board) -> Option<Tile> {
        let vacant = board.grid().vacant_cells();
        if vacant.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..vacant.len());
        board.create_tile(vacant[index], SPAWN_TILE_VALUE)
    }

    /// Places the opening tiles of a game on distinct vacant cells.
    pub fn seed_board(&mut self, board: &mut Board) -> Vec<Tile> {
        (0..SEED_TILE_COUNT)
            .filter_map(|_| self.spawn_random_tile(board))
            .collect()
    }
}
