//! Terminal-condition evaluation run after every settle step.

use tile_duel_core::{Board, GameStatus, Player, RuleSet, Scores};

/// Derives the status of `board` after `mover` completed a move.
///
/// A tile equal to `win_value` wins for the mover. Otherwise the game goes on
/// while a cell is vacant or two neighbours share a value. An immobile board
/// is resolved by `rules`.
#[must_use]
pub fn evaluate(
    board: &Board,
    scores: Scores,
    mover: Player,
    win_value: u32,
    rules: RuleSet,
) -> GameStatus {
    if board.tiles_on_grid().any(|tile| tile.value == win_value) {
        return match rules {
            RuleSet::Duel => GameStatus::Winner(mover),
            RuleSet::Solo => GameStatus::Won,
        };
    }

    if !board.grid().is_full() || board.has_adjacent_match() {
        return GameStatus::Ongoing;
    }

    match rules {
        RuleSet::Duel => scores
            .leader()
            .map_or(GameStatus::Draw, GameStatus::Winner),
        RuleSet::Solo => GameStatus::Lost,
    }
}
