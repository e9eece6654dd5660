#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Explosion engine that drives a grid to a quiescent state.
//!
//! A resolution call processes explosive cells in waves. Each wave is a
//! worklist captured by scanning the grid (column outer, row inner); every
//! cell in the worklist discharges into its in-bounds neighbours and is
//! consumed. Cells pushed over the threshold by a wave are picked up by the
//! next scan, so the returned events are ordered wave by wave and, within a
//! wave, by scan order. The number of waves is capped at the grid's cell
//! count; any cell still explosive at the cap stays on the board and is
//! resolved by the next call.

use std::collections::BTreeMap;

use color_wars_core::{Cell, CellCoord, ExplosionEvent, Grid, MoveError, PlayerId};
use tracing::{debug, debug_span, trace, warn};

/// Outcome of a single resolution call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Every explosion in cascade order.
    pub events: Vec<ExplosionEvent>,
    /// Sum of owned cell levels per active player, taken once the cascade stopped.
    ///
    /// Players without cells are absent.
    pub scores: BTreeMap<PlayerId, u32>,
    /// Number of waves that were processed.
    pub waves: u32,
    /// Indicates whether the grid holds no explosive cell after resolution.
    pub settled: bool,
}

/// Default wave cap for `grid`: one wave per cell.
#[must_use]
pub fn wave_limit(grid: &Grid) -> u32 {
    u32::try_from(grid.cell_count()).unwrap_or(u32::MAX)
}

/// Resolves every cascade on `grid` using the default wave cap.
///
/// `is_active` decides which owners contribute to the returned scores.
pub fn resolve<F>(grid: &mut Grid, is_active: F) -> Result<Resolution, MoveError>
where
    F: FnMut(PlayerId) -> bool,
{
    let limit = wave_limit(grid);
    resolve_with_limit(grid, limit, is_active)
}

/// Resolves cascades on `grid`, processing at most `limit` waves.
pub fn resolve_with_limit<F>(
    grid: &mut Grid,
    limit: u32,
    is_active: F,
) -> Result<Resolution, MoveError>
where
    F: FnMut(PlayerId) -> bool,
{
    let _span = debug_span!("cascade", width = grid.width(), height = grid.height()).entered();

    let mut events = Vec::new();
    let mut waves = 0;
    let mut worklist = explosive_cells(grid);

    while !worklist.is_empty() {
        if waves >= limit {
            warn!(
                waves,
                pending = worklist.len(),
                "cascade hit its wave cap; remaining cells resolve on the next move"
            );
            break;
        }
        waves += 1;

        for cell in std::mem::take(&mut worklist) {
            if let Some(event) = explode(grid, cell, waves)? {
                events.push(event);
            }
        }
        worklist = explosive_cells(grid);
    }

    let settled = worklist.is_empty();
    let scores = score_totals(grid, is_active);
    debug!(explosions = events.len(), waves, settled, "cascade resolved");

    Ok(Resolution {
        events,
        scores,
        waves,
        settled,
    })
}

/// Cells at or above the explosion threshold, in scan order.
#[must_use]
pub fn explosive_cells(grid: &Grid) -> Vec<CellCoord> {
    grid.iter()
        .filter(|(_, cell)| cell.is_explosive())
        .map(|(coord, _)| coord)
        .collect()
}

/// Discharges a single cell into its in-bounds neighbours.
///
/// Every neighbour is captured for the exploding cell's owner and the source
/// is cleared. Returns `None` without touching the grid when the cell is
/// below the threshold.
pub fn explode(
    grid: &mut Grid,
    cell: CellCoord,
    wave: u32,
) -> Result<Option<ExplosionEvent>, MoveError> {
    let current = grid.cell(cell)?;
    let owner = match current.owner() {
        Some(owner) if current.is_explosive() => owner,
        _ => return Ok(None),
    };

    let to: Vec<CellCoord> = grid.neighbors(cell).collect();
    for neighbor in &to {
        grid.capture(owner, *neighbor)?;
    }
    grid.clear(cell)?;

    trace!(%cell, %owner, captured = to.len(), wave, "cell exploded");
    Ok(Some(ExplosionEvent {
        from: cell,
        owner,
        to,
        wave,
    }))
}

/// Folds the grid into per-player level sums, counting only active owners.
#[must_use]
pub fn score_totals<F>(grid: &Grid, mut is_active: F) -> BTreeMap<PlayerId, u32>
where
    F: FnMut(PlayerId) -> bool,
{
    let mut scores = BTreeMap::new();
    for (_, cell) in grid.iter() {
        if let Cell::Owned { owner, level } = cell {
            if is_active(owner) {
                let total = scores.entry(owner).or_insert(0_u32);
                *total = total.saturating_add(level.get());
            }
        }
    }
    scores
}
