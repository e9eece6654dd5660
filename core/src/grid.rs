//! Dense board storage and the primitive mutations the game is built from.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::{Cell, CellCoord, Direction, IllegalMove, MoveError, PlayerId, PLACEMENT_LEVEL};

/// Fixed-size board of [`Cell`] values.
///
/// Cells are stored column by column, so iterating the storage visits
/// coordinates with the column as the outer loop and the row as the inner
/// loop. Every operation that accepts a coordinate validates it first and
/// reports [`MoveError::OutOfBounds`] instead of touching memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![Cell::Empty; capacity],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the coordinate lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Returns the contents of the provided cell.
    pub fn cell(&self, cell: CellCoord) -> Result<Cell, MoveError> {
        let index = self.checked_index(cell)?;
        Ok(self.cells[index])
    }

    /// Places a fresh piece for `player` on an empty cell.
    pub fn place(&mut self, player: PlayerId, cell: CellCoord) -> Result<(), MoveError> {
        let index = self.checked_index(cell)?;
        let slot = &mut self.cells[index];
        if let Cell::Owned { owner, .. } = *slot {
            return Err(IllegalMove::Occupied { cell, owner }.into());
        }
        *slot = Cell::Owned {
            owner: player,
            level: PLACEMENT_LEVEL,
        };
        Ok(())
    }

    /// Reinforces a cell already owned by `player` by one level.
    pub fn grow(&mut self, player: PlayerId, cell: CellCoord) -> Result<(), MoveError> {
        let index = self.checked_index(cell)?;
        match &mut self.cells[index] {
            Cell::Empty => Err(IllegalMove::Empty { cell }.into()),
            Cell::Owned { owner, .. } if *owner != player => Err(IllegalMove::Hostile {
                cell,
                owner: *owner,
            }
            .into()),
            Cell::Owned { level, .. } => {
                *level = level.saturating_add(1);
                Ok(())
            }
        }
    }

    /// Transfers a cell to `new_owner` and raises its level by one.
    ///
    /// Prior ownership is irrelevant: empty, friendly and hostile cells are
    /// all taken over the same way. An empty cell becomes a level one piece.
    pub fn capture(&mut self, new_owner: PlayerId, cell: CellCoord) -> Result<(), MoveError> {
        let index = self.checked_index(cell)?;
        let slot = &mut self.cells[index];
        let level = match *slot {
            Cell::Empty => NonZeroU32::MIN,
            Cell::Owned { level, .. } => level.saturating_add(1),
        };
        *slot = Cell::Owned {
            owner: new_owner,
            level,
        };
        Ok(())
    }

    /// Resets a single cell to empty.
    pub fn clear(&mut self, cell: CellCoord) -> Result<(), MoveError> {
        let index = self.checked_index(cell)?;
        self.cells[index] = Cell::Empty;
        Ok(())
    }

    /// Clears every cell.
    pub fn reset_all(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Iterates every coordinate, column outer and row inner.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let height = self.height;
        (0..self.width)
            .flat_map(move |column| (0..height).map(move |row| CellCoord::new(column, row)))
    }

    /// Iterates every coordinate paired with its contents, in [`Grid::coords`] order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        self.coords().zip(self.cells.iter().copied())
    }

    /// In-bounds orthogonal neighbours of `cell`, in [`Direction::ALL`] order.
    ///
    /// Neighbours that would fall outside the grid are skipped.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.step(direction))
            .filter(move |neighbor| self.contains(*neighbor))
    }

    /// Captures a value copy of the board.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.width,
            height: self.height,
            cells: self.cells.clone(),
        }
    }

    fn checked_index(&self, cell: CellCoord) -> Result<usize, MoveError> {
        self.index(cell).ok_or(MoveError::OutOfBounds {
            cell,
            width: self.width,
            height: self.height,
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let column = usize::try_from(cell.column()).ok()?;
            let row = usize::try_from(cell.row()).ok()?;
            let height = usize::try_from(self.height).ok()?;
            Some(column * height + row)
        } else {
            None
        }
    }
}

/// Point-in-time copy of a [`Grid`], safe to hold across later moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl GridSnapshot {
    /// Provides the dimensions of the captured grid as `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the contents of the provided cell, or `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<Cell> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let height = usize::try_from(self.height).ok()?;
        self.cells.get(column * height + row).copied()
    }

    /// Iterates every coordinate paired with its contents, column outer and row inner.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let height = self.height;
        (0..self.width)
            .flat_map(move |column| (0..height).map(move |row| CellCoord::new(column, row)))
            .zip(self.cells.iter().copied())
    }

    /// Sum of every cell level on the board.
    #[must_use]
    pub fn total_mass(&self) -> u64 {
        self.cells.iter().map(|cell| u64::from(cell.level())).sum()
    }

    /// Number of cells owned by `player`.
    #[must_use]
    pub fn cells_owned_by(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.owner() == Some(player))
            .count()
    }

    /// Reports whether every cell is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}
