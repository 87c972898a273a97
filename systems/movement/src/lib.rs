#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement system that slides and merges tiles toward a board edge.
//!
//! Every direction walks the same traversal: each line perpendicular to the
//! movement axis is scanned starting at the destination edge, tiles are
//! compacted into the next free slot and a tile that matches the last unmerged
//! tile of the line merges into it. The input board is never mutated; the
//! caller decides whether to commit the returned board.

use tile_duel_core::{Board, CellCoord, Direction, Merge, Player, Tile};

/// Result of resolving one move against a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Board after compaction and merging. Absorbed tiles keep a record at
    /// their survivor's cell until the board is pruned.
    pub board: Board,
    /// Whether any tile changed cell or value.
    pub changed: bool,
    /// Points earned by the merges of this move.
    pub score_delta: u32,
    /// Player credited with `score_delta`.
    pub attributed_to: Player,
    /// Merges in traversal order.
    pub merges: Vec<Merge>,
}

/// Slides every tile of `board` toward the edge named by `direction`.
///
/// Merging doubles the value of the tile nearer the destination edge and
/// awards twice the pre-merge value to `player`. A tile takes part in at most
/// one merge per move.
#[must_use]
pub fn apply_move(board: &Board, direction: Direction, player: Player) -> MoveOutcome {
    let dimension = board.dimension();
    let mut next = board.cleared();
    let mut changed = false;
    let mut score_delta: u32 = 0;
    let mut merges = Vec::new();

    for line in 0..dimension {
        let mut slot = 0;
        let mut cursor: Option<Tile> = None;

        for step in 0..dimension {
            let cell = line_cell(direction, line, step, dimension);
            let Some(current) = board.tile_at(cell).copied() else {
                continue;
            };

            match cursor {
                Some(survivor) if survivor.value == current.value => {
                    let value = survivor.value.saturating_mul(2);
                    next.place_tile(Tile::new(survivor.id, survivor.cell, value));
                    next.record_tile(Tile::new(current.id, survivor.cell, value));
                    score_delta = score_delta.saturating_add(value);
                    merges.push(Merge {
                        survivor: survivor.id,
                        absorbed: current.id,
                        cell: survivor.cell,
                        value,
                    });
                    cursor = None;
                    changed = true;
                }
                _ => {
                    let destination = line_cell(direction, line, slot, dimension);
                    let moved = Tile::new(current.id, destination, current.value);
                    next.place_tile(moved);
                    if destination != current.cell {
                        changed = true;
                    }
                    cursor = Some(moved);
                    slot += 1;
                }
            }
        }
    }

    MoveOutcome {
        board: next,
        changed,
        score_delta,
        attributed_to: player,
        merges,
    }
}

/// Cell at distance `step` from the destination edge on the given line.
fn line_cell(direction: Direction, line: u32, step: u32, dimension: u32) -> CellCoord {
    let far = dimension - 1 - step;
    match direction {
        Direction::Up => CellCoord::new(line, step),
        Direction::Down => CellCoord::new(line, far),
        Direction::Left => CellCoord::new(step, line),
        Direction::Right => CellCoord::new(far, line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_cells_start_at_destination_edge() {
        assert_eq!(line_cell(Direction::Up, 2, 0, 4), CellCoord::new(2, 0));
        assert_eq!(line_cell(Direction::Down, 2, 0, 4), CellCoord::new(2, 3));
        assert_eq!(line_cell(Direction::Left, 1, 0, 4), CellCoord::new(0, 1));
        assert_eq!(line_cell(Direction::Right, 1, 0, 4), CellCoord::new(3, 1));
        assert_eq!(line_cell(Direction::Right, 1, 3, 4), CellCoord::new(0, 1));
    }

    #[test]
    fn empty_board_never_changes() {
        let board = Board::new(4);
        for direction in Direction::ALL {
            let outcome = apply_move(&board, direction, Player::Two);
            assert!(!outcome.changed);
            assert_eq!(outcome.board, board);
        }
    }
}
