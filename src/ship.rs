//! Ship geometry: orientation, origin and the cells a ship covers.

use crate::common::{Coord, PlacementError};
use crate::config::BOARD_SIZE;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The other orientation.
    pub fn rotated(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Row and column step between consecutive cells.
    fn step(self) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }
}

/// A straight ship: `length` cells from `origin` towards the right or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    origin: Coord,
    length: usize,
    orientation: Orientation,
}

impl Ship {
    /// Build a ship, failing if any of its cells would leave the board.
    /// A one-cell ship is always stored as `Horizontal`.
    pub fn new(
        origin: Coord,
        length: usize,
        orientation: Orientation,
    ) -> Result<Self, PlacementError> {
        let (dr, dc) = orientation.step();
        let span = length.checked_sub(1).ok_or(PlacementError::OutOfBounds)?;
        let fits = |start: usize, step: usize| {
            (step * span)
                .checked_add(start)
                .is_some_and(|last| last < BOARD_SIZE as usize)
        };
        if !fits(origin.row(), dr) || !fits(origin.col(), dc) {
            return Err(PlacementError::OutOfBounds);
        }
        let orientation = if length == 1 {
            Orientation::Horizontal
        } else {
            orientation
        };
        Ok(Ship {
            origin,
            length,
            orientation,
        })
    }

    /// Recover a ship from a straight run of cells. The run must be
    /// non-empty and contiguous; its order does not matter.
    pub fn from_run(cells: &[Coord]) -> Option<Self> {
        let origin = *cells.iter().min()?;
        let orientation = if cells.iter().all(|c| c.row() == origin.row()) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let ship = Ship::new(origin, cells.len(), orientation).ok()?;
        if ship.cells().all(|c| cells.contains(&c)) {
            Some(ship)
        } else {
            None
        }
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Cells covered by the ship, starting at the origin.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let (dr, dc) = self.orientation.step();
        let origin = self.origin;
        (0..self.length).filter_map(move |i| Coord::new(origin.row() + dr * i, origin.col() + dc * i))
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells().any(|c| c == coord)
    }
}
