#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! State-owner handle that front-ends consume to drive a Tile Duel game.
//!
//! A [`Session`] owns the authoritative [`World`] together with the events it
//! broadcast since the last drain. Collaborators issue moves and forward time;
//! they never touch tile records directly.

use std::time::Duration;

use tile_duel_core::{
    Board, Command, Direction, Event, GameConfig, GameStatus, Player, Scores, Tile,
};
use tile_duel_world::{self as world, query, World};

pub use tile_duel_world::{Layout, WorldError};

/// Owns a game and the events it produced.
#[derive(Debug)]
pub struct Session {
    world: World,
    events: Vec<Event>,
}

impl Session {
    /// Starts a session with a fresh game.
    pub fn new(config: GameConfig) -> Result<Self, WorldError> {
        Ok(Self {
            world: World::new(config)?,
            events: Vec::new(),
        })
    }

    /// Starts a session that resumes from a prepared layout.
    pub fn with_layout(config: GameConfig, layout: Layout) -> Result<Self, WorldError> {
        Ok(Self {
            world: World::with_layout(config, layout)?,
            events: Vec::new(),
        })
    }

    /// Ordered snapshot of the tiles, including merge sources that have not
    /// settled yet.
    #[must_use]
    pub fn tiles(&self) -> Vec<Tile> {
        query::tiles(&self.world)
    }

    /// Requests a move for the active player. Dropped silently when the game
    /// is over or the request arrives inside the throttle window.
    pub fn move_tiles(&mut self, direction: Direction) {
        self.dispatch(Command::RequestMove { direction });
    }

    /// Discards the current game and starts a new one.
    pub fn start_game(&mut self) {
        self.dispatch(Command::StartGame);
    }

    /// Forwards the simulation clock, running a settle that falls due.
    pub fn advance(&mut self, dt: Duration) {
        self.dispatch(Command::Tick { dt });
    }

    /// Cumulative scores of both players.
    #[must_use]
    pub fn scores(&self) -> Scores {
        query::scores(&self.world)
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        query::status(&self.world)
    }

    /// Player expected to make the next move.
    #[must_use]
    pub fn active_player(&self) -> Player {
        query::active_player(&self.world)
    }

    /// One-based turn counter.
    #[must_use]
    pub fn turn_count(&self) -> u32 {
        query::turn_count(&self.world)
    }

    /// Configuration the game runs with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        query::config(&self.world)
    }

    /// Read-only access to the board.
    #[must_use]
    pub fn board(&self) -> &Board {
        query::board(&self.world)
    }

    /// Takes every event broadcast since the previous drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn dispatch(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_exposes_two_seed_tiles() {
        let session = Session::new(GameConfig::default()).expect("valid config");
        assert_eq!(session.tiles().len(), 2);
        assert_eq!(session.status(), GameStatus::Ongoing);
        assert_eq!(session.active_player(), Player::One);
        assert_eq!(session.turn_count(), 1);
    }

    #[test]
    fn drain_empties_the_event_buffer() {
        let mut session = Session::new(GameConfig::default()).expect("valid config");
        session.advance(Duration::from_millis(10));
        assert_eq!(
            session.drain_events(),
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(10)
            }]
        );
        assert!(session.drain_events().is_empty());
    }
}
