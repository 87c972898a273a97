#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Duel engine.
//!
//! This crate defines the data model and message surface that connects
//! adapters, the authoritative world, and pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that collaborators use to animate and display the game. The [`Board`]
//! composes the tile store and the board grid that every system reads.

mod board;
mod config;

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

pub use board::{Board, BoardError, BoardGrid, TileStore};
pub use config::{ConfigError, GameConfig, RuleSet};

/// Value carried by every freshly spawned tile.
pub const SPAWN_TILE_VALUE: u32 = 2;

/// Tile value that ends the game in favour of the player who produced it.
pub const DEFAULT_WIN_VALUE: u32 = 2048;

/// Number of cells along each edge of the default board.
pub const DEFAULT_BOARD_DIMENSION: u32 = 4;

/// Duration of the merge animation that separates a move from its settle step.
pub const DEFAULT_MERGE_ANIMATION: Duration = Duration::from_millis(100);

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards the current game and starts a fresh one.
    StartGame,
    /// Requests that every tile slides toward the provided edge.
    RequestMove {
        /// Edge the tiles should pile against.
        direction: Direction,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a fresh game replaced the previous state.
    GameStarted,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a tile was created on an empty cell.
    TileSpawned {
        /// Snapshot of the newly created tile.
        tile: Tile,
    },
    /// Confirms that a move request was admitted and resolved.
    TilesMoved {
        /// Direction of the resolved move.
        direction: Direction,
        /// Player credited with the move.
        player: Player,
        /// Whether any tile changed position or value.
        changed: bool,
    },
    /// Reports that two tiles merged during a move.
    TilesMerged {
        /// Details of the merge.
        merge: Merge,
    },
    /// Reports points credited to a player for the merges of a move.
    ScoreAwarded {
        /// Player receiving the points.
        player: Player,
        /// Number of points added to the player's score.
        points: u32,
    },
    /// Reports that a move request was dropped without touching the state.
    MoveRejected {
        /// Direction carried by the dropped request.
        direction: Direction,
        /// Reason the request was dropped.
        reason: MoveRejection,
    },
    /// Confirms that the settle step finished and the turn passed on.
    TurnAdvanced {
        /// Turn counter after the increment.
        turn_count: u32,
        /// Player that is now expected to move.
        active_player: Player,
    },
    /// Announces that the game reached a terminal status.
    StatusChanged {
        /// Status that became active.
        status: GameStatus,
    },
}

/// Reasons a move request may be dropped by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The game already reached a terminal status.
    GameOver,
    /// A previous move is still animating or the throttle window is open.
    Throttled,
}

/// Edges toward which tiles can be pushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Movement toward row zero.
    Up,
    /// Movement toward the last row.
    Down,
    /// Movement toward column zero.
    Left,
    /// Movement toward the last column.
    Right,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Lower-case name of the direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Self::Up),
            "down" | "s" => Ok(Self::Down),
            "left" | "a" => Ok(Self::Left),
            "right" | "d" => Ok(Self::Right),
            _ => Err(ParseDirectionError(value.to_owned())),
        }
    }
}

/// Error returned when text does not name a direction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a direction")]
pub struct ParseDirectionError(String);

/// The two seats of a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    /// Player that opens the game and moves on odd turns.
    One,
    /// Player that moves on even turns.
    Two,
}

impl Player {
    /// Player expected to move on the provided one-based turn.
    #[must_use]
    pub const fn for_turn(turn_count: u32) -> Self {
        if turn_count % 2 == 1 {
            Self::One
        } else {
            Self::Two
        }
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("p1"),
            Self::Two => f.write_str("p2"),
        }
    }
}

/// Cumulative scores of both players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scores {
    /// Points earned by [`Player::One`].
    pub p1: u32,
    /// Points earned by [`Player::Two`].
    pub p2: u32,
}

impl Scores {
    /// Creates a score pair with explicit values.
    #[must_use]
    pub const fn new(p1: u32, p2: u32) -> Self {
        Self { p1, p2 }
    }

    /// Score of the provided player.
    #[must_use]
    pub const fn of(&self, player: Player) -> u32 {
        match player {
            Player::One => self.p1,
            Player::Two => self.p2,
        }
    }

    /// Adds points to the provided player's score.
    pub fn award(&mut self, player: Player, points: u32) {
        let slot = match player {
            Player::One => &mut self.p1,
            Player::Two => &mut self.p2,
        };
        *slot = slot.saturating_add(points);
    }

    /// Player holding the strictly higher score, if any.
    #[must_use]
    pub fn leader(&self) -> Option<Player> {
        match self.p1.cmp(&self.p2) {
            std::cmp::Ordering::Greater => Some(Player::One),
            std::cmp::Ordering::Less => Some(Player::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Lifecycle status of a game.
///
/// The duel rule set resolves to [`GameStatus::Winner`] or [`GameStatus::Draw`];
/// the solo rule set resolves to [`GameStatus::Won`] or [`GameStatus::Lost`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are still accepted.
    #[default]
    Ongoing,
    /// The provided player won the duel.
    Winner(Player),
    /// The duel ended with equal scores on an immobile board.
    Draw,
    /// A solo game reached the win value.
    Won,
    /// A solo game ran out of moves.
    Lost,
}

impl GameStatus {
    /// Reports whether the status absorbs all further moves.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => f.write_str("ongoing"),
            Self::Winner(player) => write!(f, "{player}_wins"),
            Self::Draw => f.write_str("draw"),
            Self::Won => f.write_str("won"),
            Self::Lost => f.write_str("lost"),
        }
    }
}

/// Unique identifier assigned to a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Immutable record describing a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Identifier allocated by the tile store.
    pub id: TileId,
    /// Cell the tile occupies, or merged into.
    pub cell: CellCoord,
    /// Face value of the tile.
    pub value: u32,
}

impl Tile {
    /// Creates a tile record.
    #[must_use]
    pub const fn new(id: TileId, cell: CellCoord, value: u32) -> Self {
        Self { id, cell, value }
    }
}

/// Describes two tiles merging during a single move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Merge {
    /// Tile that stays on the board carrying the doubled value.
    pub survivor: TileId,
    /// Tile that slid into the survivor and is pruned on settle.
    pub absorbed: TileId,
    /// Cell where the merge happened.
    pub cell: CellCoord,
    /// Value after the merge.
    pub value: u32,
}
