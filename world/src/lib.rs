#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Color Wars.
//!
//! [`Game`] owns the board and the player roster and runs the turn state
//! machine: the expected player submits a move, the move is applied to the
//! grid, the explosion engine resolves every cascade, and the game then
//! eliminates scoreless players and hands the turn to the next active one.

use std::collections::BTreeSet;

use color_wars_core::{
    CellCoord, Command, Event, Grid, IllegalMove, MoveError, MoveKind, MoveOutcome, PlayerId,
    TurnPhase,
};
use color_wars_system_cascade::resolve;
use thiserror::Error;
use tracing::{debug, error, info};

mod roster;

use roster::Roster;

const DEFAULT_GRID_WIDTH: u32 = 5;
const DEFAULT_GRID_HEIGHT: u32 = 5;
const DEFAULT_PLAYER_COUNT: u32 = 2;

/// Parameters fixed for the lifetime of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    width: u32,
    height: u32,
    players: Vec<PlayerId>,
}

impl GameConfig {
    /// Creates a configuration from explicit dimensions and turn order.
    #[must_use]
    pub fn new(width: u32, height: u32, players: Vec<PlayerId>) -> Self {
        Self {
            width,
            height,
            players,
        }
    }

    /// Creates a configuration with `count` players numbered from zero.
    #[must_use]
    pub fn with_player_count(width: u32, height: u32, count: u32) -> Self {
        Self::new(width, height, (0..count).map(PlayerId::new).collect())
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Participating players in turn order.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Checks that the grid is non-empty and the roster is non-empty and duplicate-free.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        let mut seen = BTreeSet::new();
        for player in &self.players {
            if !seen.insert(*player) {
                return Err(ConfigError::DuplicatePlayer(*player));
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::with_player_count(
            DEFAULT_GRID_WIDTH,
            DEFAULT_GRID_HEIGHT,
            DEFAULT_PLAYER_COUNT,
        )
    }
}

/// Reasons a game configuration may be refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One of the grid dimensions is zero.
    #[error("grid dimensions must be at least 1x1, got {width}x{height}")]
    ZeroDimension {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// No players were listed.
    #[error("at least one player is required")]
    NoPlayers,
    /// A player identifier appears more than once.
    #[error("{0} is listed more than once")]
    DuplicatePlayer(PlayerId),
}

/// Represents the authoritative Color Wars game state.
#[derive(Clone, Debug)]
pub struct Game {
    grid: Grid,
    roster: Roster,
    current: usize,
    first_round: bool,
    phase: TurnPhase,
}

impl Game {
    /// Creates a game waiting for the first listed player's opening placement.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut game = Self {
            grid: Grid::new(config.width, config.height),
            roster: Roster::new(&config.players),
            current: 0,
            first_round: true,
            phase: TurnPhase::GameOver { winner: None },
        };
        game.reset();
        Ok(game)
    }

    /// Clears the board and restores every player, returning to the opening round.
    pub fn reset(&mut self) {
        self.grid.reset_all();
        self.roster.reset();
        self.current = 0;
        self.first_round = true;
        self.phase = match self.roster.get(0) {
            Some(record) => TurnPhase::AwaitingMove { player: record.id },
            None => TurnPhase::GameOver { winner: None },
        };
        info!(
            width = self.grid.width(),
            height = self.grid.height(),
            players = self.roster.len(),
            "game reset"
        );
    }

    /// Applies a move for `player` at `cell` and resolves its consequences.
    ///
    /// During the opening round the move places a fresh piece on an empty
    /// cell; afterwards it grows one of the player's own cells. A rejected
    /// move leaves the game untouched and the same player still expected to
    /// act.
    pub fn attempt_move(
        &mut self,
        player: PlayerId,
        cell: CellCoord,
    ) -> Result<MoveOutcome, MoveError> {
        let index = self.check_turn(player).inspect_err(|reason| {
            debug!(%player, %cell, %reason, "move rejected");
        })?;

        let applied = if self.first_round {
            self.grid.place(player, cell).map(|()| MoveKind::Place)
        } else {
            self.grid.grow(player, cell).map(|()| MoveKind::Grow)
        };
        let kind = match applied {
            Ok(kind) => kind,
            Err(reason @ MoveError::OutOfBounds { .. }) => {
                error!(%player, %cell, %reason, "move targeted a cell outside the grid");
                return Err(reason);
            }
            Err(reason) => {
                debug!(%player, %cell, %reason, "move rejected");
                return Err(reason);
            }
        };
        debug!(%player, %cell, ?kind, "move accepted");

        self.phase = TurnPhase::Resolving;
        let roster = &self.roster;
        let resolution = match resolve(&mut self.grid, |owner| roster.is_active(owner)) {
            Ok(resolution) => resolution,
            Err(reason) => {
                error!(%reason, "cascade resolution failed");
                self.phase = TurnPhase::AwaitingMove { player };
                return Err(reason);
            }
        };
        self.roster.refresh_scores(&resolution.scores);

        let first_round_completed = self.first_round && index + 1 == self.roster.len();
        if first_round_completed {
            self.first_round = false;
            debug!("opening round completed");
        }

        let eliminated = if self.first_round {
            Vec::new()
        } else {
            self.roster.eliminate_scoreless()
        };
        for player in &eliminated {
            info!(%player, "player eliminated");
        }

        self.phase = self.advance_from(index);

        Ok(MoveOutcome {
            kind,
            explosions: resolution.events,
            scores: self.roster.scores(),
            first_round_completed,
            eliminated,
            next: self.phase,
        })
    }

    fn check_turn(&self, player: PlayerId) -> Result<usize, IllegalMove> {
        let expected = match self.phase {
            TurnPhase::AwaitingMove { player } => player,
            TurnPhase::Resolving | TurnPhase::GameOver { .. } => return Err(IllegalMove::GameOver),
        };
        let index = self
            .roster
            .position(player)
            .ok_or(IllegalMove::UnknownPlayer { player })?;
        if !self.roster.is_active(player) {
            return Err(IllegalMove::Eliminated { player });
        }
        if player != expected {
            return Err(IllegalMove::NotYourTurn { expected });
        }
        Ok(index)
    }

    fn advance_from(&mut self, index: usize) -> TurnPhase {
        if !self.first_round && self.roster.active_count() < 2 {
            let winner = if self.roster.active_count() == 1 {
                self.roster.first_active()
            } else {
                None
            };
            info!(?winner, "game over");
            return TurnPhase::GameOver { winner };
        }

        match self.roster.next_active_after(index) {
            Some(next) => {
                self.current = next;
                match self.roster.get(next) {
                    Some(record) => {
                        debug!(player = %record.id, "turn advanced");
                        TurnPhase::AwaitingMove { player: record.id }
                    }
                    None => TurnPhase::GameOver { winner: None },
                }
            }
            None => TurnPhase::GameOver { winner: None },
        }
    }
}

/// Applies the provided command to the game, broadcasting what happened.
pub fn apply(game: &mut Game, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AttemptMove { player, cell } => match game.attempt_move(player, cell) {
            Ok(outcome) => {
                out_events.push(Event::MoveAccepted {
                    player,
                    cell,
                    kind: outcome.kind,
                });
                out_events.extend(outcome.explosions.into_iter().map(Event::CellExploded));
                out_events.push(Event::ScoresRecomputed {
                    scores: outcome.scores,
                });
                if outcome.first_round_completed {
                    out_events.push(Event::FirstRoundCompleted);
                }
                out_events.extend(
                    outcome
                        .eliminated
                        .into_iter()
                        .map(|player| Event::PlayerEliminated { player }),
                );
                match outcome.next {
                    TurnPhase::AwaitingMove { player } => {
                        out_events.push(Event::TurnAdvanced { player });
                    }
                    TurnPhase::GameOver { winner } => {
                        out_events.push(Event::GameOver { winner });
                    }
                    TurnPhase::Resolving => {}
                }
            }
            Err(reason) => out_events.push(Event::MoveRejected {
                player,
                cell,
                reason,
            }),
        },
        Command::Reset => {
            game.reset();
            out_events.push(Event::GameReset);
            if let Some(player) = query::current_player(game) {
                out_events.push(Event::TurnAdvanced { player });
            }
        }
    }
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use color_wars_core::{Cell, CellCoord, GridSnapshot, PlayerId, PlayerSnapshot, TurnPhase};

    use super::Game;

    /// Captures a value copy of the board for rendering.
    #[must_use]
    pub fn snapshot(game: &Game) -> GridSnapshot {
        game.grid.snapshot()
    }

    /// Contents of a single cell, or `None` when out of bounds.
    #[must_use]
    pub fn cell(game: &Game, cell: CellCoord) -> Option<Cell> {
        game.grid.cell(cell).ok()
    }

    /// Grid dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(game: &Game) -> (u32, u32) {
        (game.grid.width(), game.grid.height())
    }

    /// Every player's identity, activity and score in turn order.
    #[must_use]
    pub fn player_states(game: &Game) -> Vec<PlayerSnapshot> {
        game.roster.snapshots()
    }

    /// Player expected to act next; `None` once the game is over.
    #[must_use]
    pub fn current_player(game: &Game) -> Option<PlayerId> {
        match game.phase {
            TurnPhase::AwaitingMove { player } => Some(player),
            TurnPhase::Resolving | TurnPhase::GameOver { .. } => None,
        }
    }

    /// Turn-order index of the player expected to act.
    #[must_use]
    pub fn current_index(game: &Game) -> usize {
        game.current
    }

    /// Current phase of the turn state machine.
    #[must_use]
    pub fn phase(game: &Game) -> TurnPhase {
        game.phase
    }

    /// Reports whether players are still making their opening placements.
    #[must_use]
    pub fn is_first_round(game: &Game) -> bool {
        game.first_round
    }
}
