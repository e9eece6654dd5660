use std::collections::BTreeMap;

use color_wars_core::{
    Cell, CellCoord, Command, Event, ExplosionEvent, IllegalMove, MoveError, MoveKind, PlayerId,
    TurnPhase,
};
use color_wars_world::{self as world, query, Game, GameConfig};
use proptest::prelude::*;

const ALICE: PlayerId = PlayerId::new(0);
const BOB: PlayerId = PlayerId::new(1);
const CAROL: PlayerId = PlayerId::new(2);

fn game(width: u32, height: u32, players: u32) -> Game {
    Game::new(GameConfig::with_player_count(width, height, players)).expect("valid config")
}

fn play(game: &mut Game, player: PlayerId, column: u32, row: u32) {
    let _ = game
        .attempt_move(player, CellCoord::new(column, row))
        .expect("legal move");
}

#[test]
fn corner_growth_explodes_into_two_neighbors() {
    let mut game = game(4, 4, 2);
    play(&mut game, ALICE, 0, 0);
    let opening = game
        .attempt_move(BOB, CellCoord::new(3, 3))
        .expect("legal move");
    assert!(opening.first_round_completed);
    assert!(opening.explosions.is_empty());
    assert!(!query::is_first_round(&game));

    let outcome = game
        .attempt_move(ALICE, CellCoord::new(0, 0))
        .expect("legal move");

    assert_eq!(outcome.kind, MoveKind::Grow);
    assert_eq!(
        outcome.explosions,
        vec![ExplosionEvent {
            from: CellCoord::new(0, 0),
            owner: ALICE,
            to: vec![CellCoord::new(1, 0), CellCoord::new(0, 1)],
            wave: 1,
        }]
    );
    assert_eq!(query::cell(&game, CellCoord::new(0, 0)), Some(Cell::Empty));
    for neighbor in [CellCoord::new(1, 0), CellCoord::new(0, 1)] {
        let cell = query::cell(&game, neighbor).expect("in bounds");
        assert_eq!(cell.owner(), Some(ALICE));
        assert_eq!(cell.level(), 1);
    }
    assert_eq!(outcome.scores, BTreeMap::from([(ALICE, 2), (BOB, 3)]));
    assert_eq!(outcome.next, TurnPhase::AwaitingMove { player: BOB });
}

#[test]
fn occupied_placement_is_rejected_without_consuming_the_turn() {
    let mut game = game(4, 4, 2);
    play(&mut game, ALICE, 0, 0);
    let before = query::snapshot(&game);

    let error = game.attempt_move(BOB, CellCoord::new(0, 0)).unwrap_err();

    assert_eq!(
        error,
        MoveError::Illegal(IllegalMove::Occupied {
            cell: CellCoord::new(0, 0),
            owner: ALICE,
        })
    );
    assert_eq!(query::snapshot(&game), before);
    assert_eq!(query::current_player(&game), Some(BOB));
    assert!(query::is_first_round(&game));
}

#[test]
fn growth_outside_own_cells_is_rejected() {
    let mut game = game(4, 4, 2);
    play(&mut game, ALICE, 0, 0);
    play(&mut game, BOB, 3, 3);
    let before = query::snapshot(&game);

    assert_eq!(
        game.attempt_move(ALICE, CellCoord::new(3, 3)),
        Err(MoveError::Illegal(IllegalMove::Hostile {
            cell: CellCoord::new(3, 3),
            owner: BOB,
        }))
    );
    assert_eq!(
        game.attempt_move(ALICE, CellCoord::new(1, 1)),
        Err(MoveError::Illegal(IllegalMove::Empty {
            cell: CellCoord::new(1, 1),
        }))
    );
    assert_eq!(query::snapshot(&game), before);
    assert_eq!(query::current_player(&game), Some(ALICE));
}

#[test]
fn moves_out_of_turn_are_rejected() {
    let mut game = game(4, 4, 2);

    assert_eq!(
        game.attempt_move(BOB, CellCoord::new(1, 1)),
        Err(MoveError::Illegal(IllegalMove::NotYourTurn {
            expected: ALICE
        }))
    );
    assert!(query::snapshot(&game).is_empty());
}

#[test]
fn eliminated_player_is_skipped_for_the_rest_of_the_game() {
    let mut game = game(5, 1, 3);
    play(&mut game, ALICE, 0, 0);
    play(&mut game, BOB, 1, 0);
    play(&mut game, CAROL, 4, 0);

    let outcome = game
        .attempt_move(ALICE, CellCoord::new(0, 0))
        .expect("legal move");

    assert_eq!(outcome.explosions.len(), 2);
    assert_eq!(outcome.eliminated, vec![BOB]);
    assert_eq!(
        outcome.scores,
        BTreeMap::from([(ALICE, 2), (BOB, 0), (CAROL, 3)])
    );
    assert_eq!(query::current_player(&game), Some(CAROL));
    assert_eq!(
        game.attempt_move(BOB, CellCoord::new(1, 0)),
        Err(MoveError::Illegal(IllegalMove::Eliminated { player: BOB }))
    );

    play(&mut game, CAROL, 4, 0);
    assert_eq!(query::current_player(&game), Some(ALICE));
    play(&mut game, ALICE, 2, 0);
    assert_eq!(query::current_player(&game), Some(CAROL));

    let states = query::player_states(&game);
    assert_eq!(
        states.iter().map(|player| player.id).collect::<Vec<_>>(),
        vec![ALICE, BOB, CAROL]
    );
    assert!(!states[1].active);
}

#[test]
fn capturing_every_rival_cell_ends_the_game() {
    let mut game = game(3, 1, 2);
    let mut events = Vec::new();
    for (player, column) in [(ALICE, 0), (BOB, 1), (ALICE, 0)] {
        events.clear();
        world::apply(
            &mut game,
            Command::AttemptMove {
                player,
                cell: CellCoord::new(column, 0),
            },
            &mut events,
        );
    }

    assert_eq!(
        events,
        vec![
            Event::MoveAccepted {
                player: ALICE,
                cell: CellCoord::new(0, 0),
                kind: MoveKind::Grow,
            },
            Event::CellExploded(ExplosionEvent {
                from: CellCoord::new(0, 0),
                owner: ALICE,
                to: vec![CellCoord::new(1, 0)],
                wave: 1,
            }),
            Event::CellExploded(ExplosionEvent {
                from: CellCoord::new(1, 0),
                owner: ALICE,
                to: vec![CellCoord::new(2, 0), CellCoord::new(0, 0)],
                wave: 2,
            }),
            Event::ScoresRecomputed {
                scores: BTreeMap::from([(ALICE, 2), (BOB, 0)]),
            },
            Event::PlayerEliminated { player: BOB },
            Event::GameOver {
                winner: Some(ALICE)
            },
        ]
    );
    assert_eq!(query::current_player(&game), None);
    assert_eq!(
        game.attempt_move(ALICE, CellCoord::new(0, 0)),
        Err(MoveError::Illegal(IllegalMove::GameOver))
    );
}

#[test]
fn opening_round_emits_completion_once() {
    let mut game = game(3, 3, 2);
    let mut events = Vec::new();
    for (player, column) in [(ALICE, 0), (BOB, 2)] {
        world::apply(
            &mut game,
            Command::AttemptMove {
                player,
                cell: CellCoord::new(column, 1),
            },
            &mut events,
        );
    }

    let completions = events
        .iter()
        .filter(|event| matches!(event, Event::FirstRoundCompleted))
        .count();
    assert_eq!(completions, 1);
    assert_eq!(events.last(), Some(&Event::TurnAdvanced { player: ALICE }));
}

#[test]
fn single_player_game_ends_after_the_opening_placement() {
    let mut game = game(3, 3, 1);

    let outcome = game
        .attempt_move(ALICE, CellCoord::new(1, 1))
        .expect("legal move");

    assert_eq!(
        outcome.next,
        TurnPhase::GameOver {
            winner: Some(ALICE)
        }
    );
}

#[test]
fn reset_restores_a_fresh_game() {
    let config = GameConfig::with_player_count(5, 1, 3);
    let mut game = Game::new(config.clone()).expect("valid config");
    play(&mut game, ALICE, 0, 0);
    play(&mut game, BOB, 1, 0);
    play(&mut game, CAROL, 4, 0);
    play(&mut game, ALICE, 0, 0);

    game.reset();

    let fresh = Game::new(config).expect("valid config");
    assert_eq!(query::snapshot(&game), query::snapshot(&fresh));
    assert_eq!(query::player_states(&game), query::player_states(&fresh));
    assert_eq!(query::phase(&game), TurnPhase::AwaitingMove { player: ALICE });
    assert!(query::is_first_round(&game));
    assert!(query::player_states(&game)
        .iter()
        .all(|player| player.active && player.score == 0));
}

#[test]
fn snapshot_does_not_observe_later_moves() {
    let mut game = game(4, 4, 2);
    play(&mut game, ALICE, 0, 0);
    let snapshot = query::snapshot(&game);

    play(&mut game, BOB, 3, 3);

    assert_eq!(snapshot.cell(CellCoord::new(3, 3)), Some(Cell::Empty));
    assert_eq!(snapshot.cells_owned_by(ALICE), 1);
}

fn legal_cells(game: &Game, player: PlayerId) -> Vec<CellCoord> {
    let first_round = query::is_first_round(game);
    query::snapshot(game)
        .iter()
        .filter(|(_, cell)| {
            if first_round {
                cell.is_empty()
            } else {
                cell.owner() == Some(player)
            }
        })
        .map(|(coord, _)| coord)
        .collect()
}

proptest! {
    #[test]
    fn prop_elimination_is_permanent_and_turns_stay_consistent(
        picks in proptest::collection::vec(any::<proptest::sample::Index>(), 1..120)
    ) {
        let mut game = game(4, 4, 3);
        let mut ever_eliminated = Vec::new();

        for pick in picks {
            let Some(player) = query::current_player(&game) else {
                break;
            };
            let candidates = legal_cells(&game, player);
            prop_assert!(!candidates.is_empty());
            let cell = candidates[pick.index(candidates.len())];

            let outcome = game.attempt_move(player, cell);
            prop_assert!(outcome.is_ok());

            for (_, cell) in query::snapshot(&game).iter() {
                prop_assert_eq!(cell.level() == 0, cell.owner().is_none());
            }
            for state in query::player_states(&game) {
                if ever_eliminated.contains(&state.id) {
                    prop_assert!(!state.active);
                }
                if !state.active && !ever_eliminated.contains(&state.id) {
                    ever_eliminated.push(state.id);
                }
            }
            if let Some(next) = query::current_player(&game) {
                if !query::is_first_round(&game) {
                    prop_assert!(!ever_eliminated.contains(&next));
                }
            }
        }
    }
}
