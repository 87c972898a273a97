#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Tile Duel.
//!
//! The [`World`] owns the board, the scores and the turn state. Every mutation
//! flows through [`apply`], which resolves moves with the pure movement
//! system, defers their settle step behind the merge animation and evaluates
//! terminal conditions once the turn has passed on.

pub mod rules;

use std::time::Duration;

use tile_duel_core::{
    Board, BoardError, Command, ConfigError, Direction, Event, GameConfig, GameStatus,
    MoveRejection, Player, Scores,
};
use tile_duel_system_movement::apply_move;
use tile_duel_system_pacing::{self as pacing, Pacing};
use tile_duel_system_spawning::{self as spawning, Spawning};
use tracing::{debug, info, trace};

/// Errors raised while constructing a world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The configuration describes an unplayable game.
    #[error("invalid game configuration")]
    Config(#[from] ConfigError),
    /// A prepared layout violates the board invariants.
    #[error("invalid board layout")]
    Board(#[from] BoardError),
    /// A prepared layout does not match the configured board size.
    #[error("layout is {actual} cells wide but the configuration expects {expected}")]
    DimensionMismatch {
        /// Configured board dimension.
        expected: u32,
        /// Dimension of the provided board.
        actual: u32,
    },
    /// A prepared layout starts before the first turn.
    #[error("turn counter must start at 1")]
    InvalidTurn,
}

/// Position prepared outside of regular play, used to resume from a known state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Board to install.
    pub board: Board,
    /// Cumulative scores to install.
    pub scores: Scores,
    /// One-based turn counter; its parity selects the active player.
    pub turn_count: u32,
}

/// Represents the authoritative Tile Duel game state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    board: Board,
    scores: Scores,
    status: GameStatus,
    active_player: Player,
    turn_count: u32,
    changed_since_settle: bool,
    clock: Duration,
    pacing: Pacing,
    spawning: Spawning,
}

impl World {
    /// Creates a world with a freshly started game.
    pub fn new(config: GameConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let mut world = Self::unstarted(config);
        let mut events = Vec::new();
        world.start_game(&mut events);
        Ok(world)
    }

    /// Creates a world that resumes from the provided layout.
    ///
    /// The layout's status is evaluated immediately so a prepared terminal
    /// position is reported as such.
    pub fn with_layout(config: GameConfig, layout: Layout) -> Result<Self, WorldError> {
        config.validate()?;
        if layout.board.dimension() != config.board_dimension {
            return Err(WorldError::DimensionMismatch {
                expected: config.board_dimension,
                actual: layout.board.dimension(),
            });
        }
        if layout.turn_count == 0 {
            return Err(WorldError::InvalidTurn);
        }
        layout.board.validate()?;

        let mut world = Self::unstarted(config);
        world.board = layout.board;
        world.scores = layout.scores;
        world.turn_count = layout.turn_count;
        world.active_player = Player::for_turn(layout.turn_count);
        world.status = rules::evaluate(
            &world.board,
            world.scores,
            world.active_player.opponent(),
            world.config.win_value,
            world.config.rules,
        );
        Ok(world)
    }

    fn unstarted(config: GameConfig) -> Self {
        let pacing = Pacing::new(pacing::Config::new(
            config.throttle_window(),
            config.merge_animation(),
        ));
        let spawning = Spawning::new(spawning::Config::new(config.rng_seed));
        Self {
            board: Board::new(config.board_dimension),
            scores: Scores::default(),
            status: GameStatus::Ongoing,
            active_player: Player::One,
            turn_count: 1,
            changed_since_settle: false,
            clock: Duration::ZERO,
            pacing,
            spawning,
            config,
        }
    }

    fn start_game(&mut self, out_events: &mut Vec<Event>) {
        if let Some(stale) = self.pacing.cancel_pending() {
            debug!(due = ?stale.due, "cancelled settle of previous game");
        }

        self.board = Board::new(self.config.board_dimension);
        self.scores = Scores::default();
        self.status = GameStatus::Ongoing;
        self.active_player = Player::One;
        self.turn_count = 1;
        self.changed_since_settle = false;

        out_events.push(Event::GameStarted);
        for tile in self.spawning.seed_board(&mut self.board) {
            out_events.push(Event::TileSpawned { tile });
        }
        info!(
            dimension = self.config.board_dimension,
            rules = ?self.config.rules,
            "game started"
        );
        self.debug_check_invariants();
    }

    fn request_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.status.is_terminal() {
            trace!(%direction, status = %self.status, "move dropped after game over");
            out_events.push(Event::MoveRejected {
                direction,
                reason: MoveRejection::GameOver,
            });
            return;
        }

        if !self.pacing.try_admit(self.clock) {
            out_events.push(Event::MoveRejected {
                direction,
                reason: MoveRejection::Throttled,
            });
            return;
        }

        let outcome = apply_move(&self.board, direction, self.active_player);
        let player = outcome.attributed_to;
        self.board = outcome.board;
        self.scores.award(player, outcome.score_delta);
        self.changed_since_settle = outcome.changed;

        debug!(
            %direction,
            %player,
            changed = outcome.changed,
            merges = outcome.merges.len(),
            "move resolved"
        );
        out_events.push(Event::TilesMoved {
            direction,
            player,
            changed: outcome.changed,
        });
        for merge in outcome.merges {
            out_events.push(Event::TilesMerged { merge });
        }
        if outcome.score_delta > 0 {
            out_events.push(Event::ScoreAwarded {
                player,
                points: outcome.score_delta,
            });
        }

        if outcome.changed {
            let pending = self.pacing.schedule_settle(self.clock);
            debug!(due = ?pending.due, "settle scheduled");
        }
    }

    fn settle(&mut self, out_events: &mut Vec<Event>) {
        let mover = self.active_player;
        let pruned = self.board.prune_absorbed();

        self.turn_count = self.turn_count.saturating_add(1);
        self.active_player = Player::for_turn(self.turn_count);
        self.changed_since_settle = false;
        debug!(pruned, turn_count = self.turn_count, "settled");
        out_events.push(Event::TurnAdvanced {
            turn_count: self.turn_count,
            active_player: self.active_player,
        });

        if let Some(tile) = self.spawning.spawn_random_tile(&mut self.board) {
            out_events.push(Event::TileSpawned { tile });
        }

        let status = rules::evaluate(
            &self.board,
            self.scores,
            mover,
            self.config.win_value,
            self.config.rules,
        );
        if status != self.status {
            info!(%status, p1 = self.scores.p1, p2 = self.scores.p2, "game over");
            self.status = status;
            out_events.push(Event::StatusChanged { status });
        }
        self.debug_check_invariants();
    }

    fn debug_check_invariants(&self) {
        debug_assert!(
            self.board.validate().is_ok(),
            "board invariant violated: {:?}",
            self.board.validate()
        );
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame => world.start_game(out_events),
        Command::RequestMove { direction } => world.request_move(direction, out_events),
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            if world.pacing.take_due(world.clock).is_some() {
                world.settle(out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use tile_duel_core::{Board, GameConfig, GameStatus, Player, Scores, Tile};

    /// Ordered snapshot of every tile, including tiles absorbed by a move
    /// that has not settled yet.
    #[must_use]
    pub fn tiles(world: &World) -> Vec<Tile> {
        world.board.snapshot()
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Cumulative scores of both players.
    #[must_use]
    pub fn scores(world: &World) -> Scores {
        world.scores
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Player expected to make the next move.
    #[must_use]
    pub fn active_player(world: &World) -> Player {
        world.active_player
    }

    /// One-based turn counter.
    #[must_use]
    pub fn turn_count(world: &World) -> u32 {
        world.turn_count
    }

    /// Reports whether the last admitted move changed the board and has not
    /// settled yet.
    #[must_use]
    pub fn changed_since_settle(world: &World) -> bool {
        world.changed_since_settle
    }

    /// Simulation time accumulated through ticks.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Simulation time at which the pending settle becomes due, if any.
    #[must_use]
    pub fn settle_due(world: &World) -> Option<Duration> {
        world.pacing.pending().map(|pending| pending.due)
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_duel_core::CellCoord;

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn new_world_starts_with_two_seed_tiles() {
        let world = World::new(GameConfig::default()).expect("valid config");
        let tiles = query::tiles(&world);
        assert_eq!(tiles.len(), 2);
        assert_ne!(tiles[0].cell, tiles[1].cell);
        assert!(tiles.iter().all(|tile| tile.value == 2));
        assert_eq!(query::status(&world), GameStatus::Ongoing);
        assert_eq!(query::turn_count(&world), 1);
        assert_eq!(query::active_player(&world), Player::One);
        assert_eq!(query::scores(&world), Scores::default());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            board_dimension: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            World::new(config),
            Err(WorldError::Config(ConfigError::BoardTooSmall(0)))
        ));
    }

    #[test]
    fn layout_must_match_configured_dimension() {
        let layout = Layout {
            board: Board::from_rows(&[&[Some(2), None], &[None, None]]),
            scores: Scores::default(),
            turn_count: 1,
        };
        assert!(matches!(
            World::with_layout(GameConfig::default(), layout),
            Err(WorldError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn settle_prunes_absorbed_tiles_and_rebuilds_order() {
        let board = Board::from_rows(&[
            &[None, None, Some(2), Some(2)],
            &[None, None, None, None],
            &[None, None, None, None],
            &[None, None, None, None],
        ]);
        let layout = Layout {
            board,
            scores: Scores::default(),
            turn_count: 1,
        };
        let mut world = World::with_layout(GameConfig::default(), layout).expect("layout");

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::RequestMove {
                direction: Direction::Left,
            },
            &mut events,
        );
        assert_eq!(query::tiles(&world).len(), 2, "absorbed tile kept until settle");
        assert!(query::changed_since_settle(&world));

        let events = tick(&mut world, 100);
        assert!(!query::changed_since_settle(&world));
        let tiles = query::tiles(&world);
        assert_eq!(tiles.len(), 2, "merged tile plus one spawn");
        assert_eq!(tiles[0].cell, CellCoord::new(0, 0));
        assert_eq!(tiles[0].value, 4);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::TileSpawned { .. })));
    }
}
