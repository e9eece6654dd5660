//! Plain-text presentation of boards and game events.

use std::{collections::BTreeMap, fmt::Write as _};

use color_wars_core::{Cell, CellCoord, Event, GridSnapshot, MoveKind, PlayerId};

/// Display names indexed by player identifier.
#[derive(Clone, Debug)]
pub(crate) struct Names {
    names: Vec<String>,
}

impl Names {
    pub(crate) fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub(crate) fn of(&self, player: PlayerId) -> String {
        usize::try_from(player.get())
            .ok()
            .and_then(|index| self.names.get(index))
            .cloned()
            .unwrap_or_else(|| player.to_string())
    }
}

fn glyph(player: PlayerId) -> char {
    u8::try_from(player.get())
        .ok()
        .filter(|offset| *offset < 26)
        .map_or('?', |offset| char::from(b'A' + offset))
}

/// Renders the board as rows of two-character cells under a column header.
pub(crate) fn render_board(snapshot: &GridSnapshot) -> String {
    let (width, height) = snapshot.dimensions();
    let mut out = String::from("   ");
    for column in 0..width {
        let _ = write!(out, "{column:>3}");
    }
    out.push('\n');

    for row in 0..height {
        let _ = write!(out, "{row:>3}");
        for column in 0..width {
            let label = match snapshot.cell(CellCoord::new(column, row)) {
                Some(Cell::Owned { owner, level }) => format!("{}{}", glyph(owner), level),
                Some(Cell::Empty) | None => ".".to_owned(),
            };
            let _ = write!(out, "{label:>3}");
        }
        out.push('\n');
    }
    out
}

/// Formats scores in roster order, e.g. `red 3 | blue 0`.
pub(crate) fn render_scores(scores: &BTreeMap<PlayerId, u32>, names: &Names) -> String {
    scores
        .iter()
        .map(|(player, score)| format!("{} {score}", names.of(*player)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Describes an event as a single line, or `None` for events with no narration.
pub(crate) fn describe(event: &Event, names: &Names) -> Option<String> {
    let line = match event {
        Event::MoveAccepted { player, cell, kind } => match kind {
            MoveKind::Place => format!("{} placed at {cell}", names.of(*player)),
            MoveKind::Grow => format!("{} grew {cell}", names.of(*player)),
        },
        Event::MoveRejected { player, reason, .. } => {
            format!("{}: {reason}", names.of(*player))
        }
        Event::CellExploded(explosion) => {
            let targets = explosion
                .to
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "  wave {}: {} explodes at {} -> {targets}",
                explosion.wave,
                names.of(explosion.owner),
                explosion.from
            )
        }
        Event::ScoresRecomputed { scores } => {
            format!("scores: {}", render_scores(scores, names))
        }
        Event::FirstRoundCompleted => "opening round complete".to_owned(),
        Event::PlayerEliminated { player } => {
            format!("{} has been eliminated", names.of(*player))
        }
        Event::TurnAdvanced { .. } => return None,
        Event::GameOver { winner } => match winner {
            Some(player) => format!("game over: {} wins", names.of(*player)),
            None => "game over: no winner".to_owned(),
        },
        Event::GameReset => "board reset".to_owned(),
    };
    Some(line)
}
