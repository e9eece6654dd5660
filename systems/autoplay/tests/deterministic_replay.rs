use color_wars_core::{Command, Event, PlayerId};
use color_wars_system_autoplay::{Autoplay, Config, Strategy};
use color_wars_world::{self as world, query, Game, GameConfig};

const MOVE_LIMIT: usize = 400;

#[test]
fn self_play_is_deterministic_for_the_same_seed() {
    let first = replay(Strategy::Greedy, 0x5eed);
    let second = replay(Strategy::Greedy, 0x5eed);

    assert_eq!(first, second, "self-play replay diverged");
}

#[test]
fn self_play_only_submits_legal_moves() {
    for strategy in [Strategy::Random, Strategy::Greedy] {
        let log = replay(strategy, 9);
        assert!(
            !log.iter()
                .any(|event| matches!(event, Event::MoveRejected { .. })),
            "autoplay submitted an illegal move with {strategy:?}",
        );
        assert!(log
            .iter()
            .any(|event| matches!(event, Event::FirstRoundCompleted)));
    }
}

#[test]
fn greedy_self_play_produces_cascades() {
    let log = replay(Strategy::Greedy, 1);

    assert!(
        log.iter()
            .any(|event| matches!(event, Event::CellExploded(_))),
        "expected at least one explosion during self-play",
    );
}

fn replay(strategy: Strategy, seed: u64) -> Vec<Event> {
    let players: Vec<_> = (0..3).map(PlayerId::new).collect();
    let mut game = Game::new(GameConfig::new(5, 5, players.clone())).expect("valid config");
    let mut autoplay = Autoplay::new(Config::new(players, strategy, seed));

    let mut log = Vec::new();
    let mut pending = vec![Event::TurnAdvanced {
        player: query::current_player(&game).expect("opening player"),
    }];

    for _ in 0..MOVE_LIMIT {
        let mut commands: Vec<Command> = Vec::new();
        autoplay.handle(
            &pending,
            &query::snapshot(&game),
            query::is_first_round(&game),
            &mut commands,
        );
        if commands.is_empty() {
            break;
        }

        pending.clear();
        for command in commands {
            world::apply(&mut game, command, &mut pending);
        }
        log.extend(pending.iter().cloned());
    }

    log
}
