#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Color Wars engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative game, and pure systems. Adapters submit [`Command`] values
//! describing desired moves, the game executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened, including every explosion of a cascade in resolution order.
//! The board itself is modelled by [`Grid`], whose cells are either empty or
//! owned with a non-zero capacity level.

use std::{collections::BTreeMap, fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod grid;

pub use grid::{Grid, GridSnapshot};

/// Capacity level assigned to a freshly placed piece.
pub const PLACEMENT_LEVEL: NonZeroU32 = match NonZeroU32::new(3) {
    Some(level) => level,
    None => panic!("placement level must be non-zero"),
};

/// Level at or above which a cell discharges into its neighbours.
pub const EXPLOSION_THRESHOLD: u32 = 4;

/// Unique identifier assigned to a participating player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
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

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Location of a single grid cell expressed as column (x) and row (y).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index (x) of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index (y) of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the adjacent coordinate in `direction`, if it does not underflow.
    ///
    /// The result is not checked against any grid bounds.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::East => (self.column.checked_add(1)?, self.row),
            Direction::West => (self.column.checked_sub(1)?, self.row),
            Direction::South => (self.column, self.row.checked_add(1)?),
            Direction::North => (self.column, self.row.checked_sub(1)?),
        };
        Some(CellCoord::new(column, row))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Orthogonal directions along which an exploding cell discharges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward increasing column indices.
    East,
    /// Toward decreasing column indices.
    West,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing row indices.
    North,
}

impl Direction {
    /// Every direction in discharge order. Explosion events list captured
    /// neighbours in exactly this order.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];
}

/// Contents of a single grid slot.
///
/// An owned cell always carries a level of at least one, so an empty owner
/// with a non-zero level (or the reverse) cannot be represented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// No piece occupies the slot.
    #[default]
    Empty,
    /// A piece owned by a player.
    Owned {
        /// Player that controls the piece.
        owner: PlayerId,
        /// Capacity counter of the piece.
        level: NonZeroU32,
    },
}

impl Cell {
    /// Owner of the cell, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        match self {
            Self::Empty => None,
            Self::Owned { owner, .. } => Some(*owner),
        }
    }

    /// Capacity level of the cell; zero when empty.
    #[must_use]
    pub const fn level(&self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Owned { level, .. } => level.get(),
        }
    }

    /// Reports whether no piece occupies the cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Reports whether the cell has reached the explosion threshold.
    #[must_use]
    pub const fn is_explosive(&self) -> bool {
        self.level() >= EXPLOSION_THRESHOLD
    }
}

/// Kind of board mutation a successful move performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// A fresh piece was placed on an empty cell during the first round.
    Place,
    /// An owned piece was reinforced by one level.
    Grow,
}

/// One discharge of an exploding cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExplosionEvent {
    /// Cell that exploded and was consumed.
    pub from: CellCoord,
    /// Player that owned the exploding cell and now owns every captured cell.
    pub owner: PlayerId,
    /// In-bounds neighbours that were captured, in [`Direction::ALL`] order.
    pub to: Vec<CellCoord>,
    /// One-based cascade wave in which the explosion happened.
    pub wave: u32,
}

/// Read-only record describing one participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Identifier of the player.
    pub id: PlayerId,
    /// Indicates whether the player still takes turns.
    pub active: bool,
    /// Sum of levels across every cell the player owned at the last resolution.
    pub score: u32,
}

/// Observable phase of the turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The game waits for the named player to act.
    AwaitingMove {
        /// Player expected to submit the next move.
        player: PlayerId,
    },
    /// A move was accepted and its cascade is being resolved.
    Resolving,
    /// Fewer than two players remain active.
    GameOver {
        /// Last remaining active player, if any.
        winner: Option<PlayerId>,
    },
}

/// Reasons a move may be rejected without changing any state.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IllegalMove {
    /// First-round placement targeted a cell that already holds a piece.
    #[error("cell {cell} is already occupied by {owner}")]
    Occupied {
        /// Targeted cell.
        cell: CellCoord,
        /// Current owner of the targeted cell.
        owner: PlayerId,
    },
    /// Growth targeted an empty cell.
    #[error("cell {cell} is empty and cannot be grown")]
    Empty {
        /// Targeted cell.
        cell: CellCoord,
    },
    /// Growth targeted a cell owned by another player.
    #[error("cell {cell} belongs to {owner}")]
    Hostile {
        /// Targeted cell.
        cell: CellCoord,
        /// Current owner of the targeted cell.
        owner: PlayerId,
    },
    /// The move was submitted by a player other than the one expected to act.
    #[error("it is {expected}'s turn")]
    NotYourTurn {
        /// Player expected to act.
        expected: PlayerId,
    },
    /// The move was submitted by a player who has been eliminated.
    #[error("{player} has been eliminated")]
    Eliminated {
        /// Eliminated player that attempted the move.
        player: PlayerId,
    },
    /// The move was submitted by an identifier absent from the roster.
    #[error("{player} is not part of this game")]
    UnknownPlayer {
        /// Unrecognised identifier.
        player: PlayerId,
    },
    /// The game has already finished.
    #[error("the game is over")]
    GameOver,
}

/// Errors produced by grid and turn operations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// The coordinate lies outside the grid. Callers must only propose in-bounds cells.
    #[error("cell {cell} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Grid width in columns.
        width: u32,
        /// Grid height in rows.
        height: u32,
    },
    /// The move breaks a game rule and was rejected.
    #[error("illegal move: {0}")]
    Illegal(#[from] IllegalMove),
}

/// Commands that express all permissible game mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that a player act on a cell: place during the first round, grow afterwards.
    AttemptMove {
        /// Player submitting the move.
        player: PlayerId,
        /// Targeted cell.
        cell: CellCoord,
    },
    /// Restarts the game with an empty board and a fresh roster.
    Reset,
}

/// Events broadcast by the game after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a move mutated the board.
    MoveAccepted {
        /// Player that moved.
        player: PlayerId,
        /// Targeted cell.
        cell: CellCoord,
        /// Mutation that was performed.
        kind: MoveKind,
    },
    /// Reports that a move was rejected; no state changed.
    MoveRejected {
        /// Player that submitted the move.
        player: PlayerId,
        /// Targeted cell.
        cell: CellCoord,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Reports a single explosion, in cascade order.
    CellExploded(ExplosionEvent),
    /// Publishes the score totals refreshed by the latest resolution.
    ScoresRecomputed {
        /// Score of every rostered player, keyed by identifier.
        scores: BTreeMap<PlayerId, u32>,
    },
    /// Announces that every player completed their opening placement.
    FirstRoundCompleted,
    /// Announces that a player lost every cell and will be skipped from now on.
    PlayerEliminated {
        /// Player that was eliminated.
        player: PlayerId,
    },
    /// Announces the player expected to act next.
    TurnAdvanced {
        /// Player whose turn begins.
        player: PlayerId,
    },
    /// Announces that fewer than two players remain active.
    GameOver {
        /// Last remaining active player, if any.
        winner: Option<PlayerId>,
    },
    /// Confirms that the board and roster were reset.
    GameReset,
}

/// Result of an accepted move, exposed before the next turn becomes actionable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Mutation performed by the move.
    pub kind: MoveKind,
    /// Explosions triggered by the move, in cascade order.
    pub explosions: Vec<ExplosionEvent>,
    /// Score of every rostered player after resolution.
    pub scores: BTreeMap<PlayerId, u32>,
    /// Indicates whether this move completed the opening round.
    pub first_round_completed: bool,
    /// Players eliminated at the end of this turn.
    pub eliminated: Vec<PlayerId>,
    /// Phase the game entered once the turn was complete.
    pub next: TurnPhase,
}
