#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic autoplay system responsible for emitting moves on behalf of players.

use color_wars_core::{CellCoord, Command, Event, GridSnapshot, PlayerId};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// How the system chooses among legal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Any legal cell, uniformly.
    Random,
    /// After the opening round, only the player's highest-level cells.
    Greedy,
}

/// Configuration parameters required to construct the autoplay system.
#[derive(Clone, Debug)]
pub struct Config {
    players: Vec<PlayerId>,
    strategy: Strategy,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration controlling `players` with the given strategy and seed.
    #[must_use]
    pub fn new(players: Vec<PlayerId>, strategy: Strategy, rng_seed: u64) -> Self {
        Self {
            players,
            strategy,
            rng_seed,
        }
    }
}

/// Pure system that answers turn announcements for the players it controls.
#[derive(Debug)]
pub struct Autoplay {
    players: Vec<PlayerId>,
    strategy: Strategy,
    rng: ChaCha8Rng,
}

impl Autoplay {
    /// Creates a new autoplay system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            players: config.players,
            strategy: config.strategy,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Reports whether the system moves for `player`.
    #[must_use]
    pub fn controls(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Consumes events and a board snapshot to emit at most one move command.
    ///
    /// Only the last turn announcement in `events` is considered; earlier ones
    /// were superseded within the same batch.
    pub fn handle(
        &mut self,
        events: &[Event],
        snapshot: &GridSnapshot,
        first_round: bool,
        out: &mut Vec<Command>,
    ) {
        let announced = events.iter().rev().find_map(|event| match event {
            Event::TurnAdvanced { player } => Some(*player),
            _ => None,
        });
        let Some(player) = announced else {
            return;
        };
        if !self.controls(player) {
            return;
        }

        if let Some(cell) = self.choose(player, snapshot, first_round) {
            out.push(Command::AttemptMove { player, cell });
        }
    }

    /// Picks a legal cell for `player`, or `None` when no legal cell exists.
    pub fn choose(
        &mut self,
        player: PlayerId,
        snapshot: &GridSnapshot,
        first_round: bool,
    ) -> Option<CellCoord> {
        let candidates = legal_cells(snapshot, player, first_round);
        let candidates = match self.strategy {
            Strategy::Greedy if !first_round => strongest(snapshot, candidates),
            Strategy::Greedy | Strategy::Random => candidates,
        };
        candidates.choose(&mut self.rng).copied()
    }
}

/// Cells `player` may legally target: empty cells during the opening round,
/// the player's own cells afterwards.
#[must_use]
pub fn legal_cells(snapshot: &GridSnapshot, player: PlayerId, first_round: bool) -> Vec<CellCoord> {
    snapshot
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

fn strongest(snapshot: &GridSnapshot, candidates: Vec<CellCoord>) -> Vec<CellCoord> {
    let level_of = |coord: &CellCoord| snapshot.cell(*coord).map_or(0, |cell| cell.level());
    let Some(best) = candidates.iter().map(level_of).max() else {
        return candidates;
    };
    candidates
        .into_iter()
        .filter(|coord| level_of(coord) == best)
        .collect()
}
