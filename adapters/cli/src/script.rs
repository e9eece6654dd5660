//! Line-oriented move input shared by scripts and interactive play.

use color_wars_core::CellCoord;
use thiserror::Error;

/// Single parsed input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScriptLine {
    /// The current player acts on the cell.
    Move(CellCoord),
    /// Restart the game.
    Reset,
    /// Blank line or comment.
    Skip,
}

/// Reasons an input line could not be understood.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The line is neither `x y`, `reset`, a comment nor blank.
    #[error("line {line}: expected `x y` or `reset`, got `{content}`")]
    Unrecognised {
        /// One-based line number.
        line: usize,
        /// Offending content, trimmed.
        content: String,
    },
}

/// Parses a single input line; `line` is one-based and only used for errors.
pub(crate) fn parse_line(line: usize, content: &str) -> Result<ScriptLine, ScriptError> {
    let trimmed = content.split('#').next().unwrap_or_default().trim();
    if trimmed.is_empty() {
        return Ok(ScriptLine::Skip);
    }
    if trimmed.eq_ignore_ascii_case("reset") {
        return Ok(ScriptLine::Reset);
    }

    let unrecognised = || ScriptError::Unrecognised {
        line,
        content: trimmed.to_owned(),
    };
    let mut parts = trimmed.split(|c: char| c.is_whitespace() || c == ',');
    let mut numbers = parts.by_ref().filter(|part| !part.is_empty());
    let column = numbers
        .next()
        .and_then(|part| part.parse::<u32>().ok())
        .ok_or_else(unrecognised)?;
    let row = numbers
        .next()
        .and_then(|part| part.parse::<u32>().ok())
        .ok_or_else(unrecognised)?;
    if numbers.next().is_some() {
        return Err(unrecognised());
    }

    Ok(ScriptLine::Move(CellCoord::new(column, row)))
}
