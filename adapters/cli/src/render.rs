//! Plain-text presentation of a session.

use std::fmt::Write as _;

use tile_duel_core::{CellCoord, Event, GameStatus, MoveRejection, Player};
use tile_duel_system_session::Session;

const CELL_WIDTH: usize = 6;

/// Draws the board followed by the turn and score line.
pub(crate) fn board(session: &Session) -> String {
    let board = session.board();
    let dimension = board.dimension();
    let rule = format!("+{}+\n", "-".repeat(CELL_WIDTH * dimension as usize));

    let mut text = rule.clone();
    for row in 0..dimension {
        text.push('|');
        for column in 0..dimension {
            match board.value_at(CellCoord::new(column, row)) {
                Some(value) => {
                    let _ = write!(text, "{value:>width$}", width = CELL_WIDTH);
                }
                None => {
                    let _ = write!(text, "{:>width$}", ".", width = CELL_WIDTH);
                }
            }
        }
        text.push_str("|\n");
    }
    text.push_str(&rule);

    let scores = session.scores();
    let _ = write!(
        text,
        "turn {} | {} to move | p1 {} - p2 {}",
        session.turn_count(),
        session.active_player(),
        scores.p1,
        scores.p2
    );
    text
}

/// Describes a finished game, if it is finished.
pub(crate) fn verdict(status: GameStatus) -> Option<&'static str> {
    match status {
        GameStatus::Ongoing => None,
        GameStatus::Winner(Player::One) => Some("player one wins"),
        GameStatus::Winner(Player::Two) => Some("player two wins"),
        GameStatus::Draw => Some("draw"),
        GameStatus::Won => Some("you win"),
        GameStatus::Lost => Some("no moves left, you lose"),
    }
}

/// Message for the events a player should hear about directly.
pub(crate) fn notice(event: &Event) -> Option<String> {
    match event {
        Event::MoveRejected {
            direction,
            reason: MoveRejection::Throttled,
        } => Some(format!("{direction} ignored, tiles are still moving")),
        Event::MoveRejected {
            reason: MoveRejection::GameOver,
            ..
        } => Some(String::from("game over, type `restart` for a new game")),
        Event::TilesMoved { changed: false, direction, .. } => {
            Some(format!("nothing moves {direction}"))
        }
        _ => None,
    }
}
