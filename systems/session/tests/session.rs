use std::time::Duration;

use tile_duel_core::{
    Board, CellCoord, Direction, Event, GameConfig, GameStatus, MoveRejection, Player, Scores,
};
use tile_duel_system_session::{Layout, Session};

fn opening_pair() -> Session {
    let layout = Layout {
        board: Board::from_rows(&[
            &[Some(2), Some(2), None, None],
            &[None, None, None, None],
            &[None, None, None, None],
            &[None, None, None, None],
        ]),
        scores: Scores::default(),
        turn_count: 1,
    };
    Session::with_layout(GameConfig::default(), layout).expect("layout is valid")
}

#[test]
fn merge_keeps_absorbed_tile_visible_until_settle() {
    let mut session = opening_pair();
    session.move_tiles(Direction::Left);

    let tiles = session.tiles();
    assert_eq!(tiles.len(), 2);
    assert!(tiles
        .iter()
        .all(|tile| tile.cell == CellCoord::new(0, 0) && tile.value == 4));
    assert_eq!(session.scores(), Scores::new(4, 0));

    session.advance(Duration::from_millis(100));
    let tiles = session.tiles();
    assert_eq!(tiles.len(), 2, "survivor plus spawned tile");
    assert_eq!(
        tiles
            .iter()
            .filter(|tile| tile.cell == CellCoord::new(0, 0))
            .count(),
        1
    );
    assert_eq!(session.active_player(), Player::Two);
    assert_eq!(session.turn_count(), 2);
}

#[test]
fn events_describe_a_full_turn() {
    let mut session = opening_pair();
    session.move_tiles(Direction::Left);
    session.advance(Duration::from_millis(100));

    let events = session.drain_events();
    let merged = events
        .iter()
        .position(|event| matches!(event, Event::TilesMerged { .. }))
        .expect("merge reported");
    let scored = events
        .iter()
        .position(|event| matches!(event, Event::ScoreAwarded { points: 4, .. }))
        .expect("score reported");
    let advanced = events
        .iter()
        .position(|event| matches!(event, Event::TurnAdvanced { .. }))
        .expect("turn reported");
    let spawned = events
        .iter()
        .position(|event| matches!(event, Event::TileSpawned { .. }))
        .expect("spawn reported");

    assert!(merged < scored);
    assert!(scored < advanced);
    assert!(advanced < spawned);
}

#[test]
fn rapid_second_move_is_dropped() {
    let mut session = opening_pair();
    session.move_tiles(Direction::Left);
    session.advance(Duration::from_millis(50));
    let _ = session.drain_events();

    session.move_tiles(Direction::Right);
    assert_eq!(
        session.drain_events(),
        vec![Event::MoveRejected {
            direction: Direction::Right,
            reason: MoveRejection::Throttled,
        }]
    );
    assert_eq!(session.turn_count(), 1);
}

#[test]
fn start_game_always_yields_a_fresh_start() {
    let mut session = opening_pair();
    session.move_tiles(Direction::Left);

    for _ in 0..5 {
        session.start_game();
        let tiles = session.tiles();
        assert_eq!(tiles.len(), 2);
        assert_ne!(tiles[0].cell, tiles[1].cell);
        assert!(tiles.iter().all(|tile| tile.value == 2));
        assert_eq!(session.scores(), Scores::default());
        assert_eq!(session.status(), GameStatus::Ongoing);
        assert_eq!(session.turn_count(), 1);
    }
}
