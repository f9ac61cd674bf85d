//! One player's board: ship occupancy and shot history, kept as bitboards.

use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::bitboard::BitBoard;
use crate::common::{CellState, Coord, GameError, PlacementError};
use crate::config::{BOARD_SIZE, PLACEMENT_ATTEMPTS};
use crate::ship::{Orientation, Ship};

pub(crate) type BB = BitBoard<u128, { BOARD_SIZE as usize }>;

const GRID: usize = BOARD_SIZE as usize;

#[inline]
pub(crate) fn bit(bb: &BB, c: Coord) -> bool {
    bb.get(c.row(), c.col()).unwrap_or(false)
}

#[inline]
fn set_bit(bb: &mut BB, c: Coord) {
    // Coord is always in bounds.
    let _ = bb.set(c.row(), c.col());
}

/// Serializable per-cell view of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardState {
    pub cells: [[CellState; GRID]; GRID],
    pub remaining_ship_cells: usize,
}

/// Ship cells plus every shot fired at them.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    ships: BB,
    hits: BB,
    misses: BB,
}

impl Board {
    /// Create an empty board (no ships, no shots).
    pub fn new() -> Self {
        Board {
            ships: BB::new(),
            hits: BB::new(),
            misses: BB::new(),
        }
    }

    /// State of a single cell.
    pub fn cell(&self, c: Coord) -> CellState {
        if bit(&self.hits, c) {
            CellState::Hit
        } else if bit(&self.misses, c) {
            CellState::Miss
        } else if bit(&self.ships, c) {
            CellState::Ship
        } else {
            CellState::Empty
        }
    }

    pub fn hits(&self) -> BB {
        self.hits
    }

    pub fn misses(&self) -> BB {
        self.misses
    }

    pub fn has_ship(&self, c: Coord) -> bool {
        bit(&self.ships, c)
    }

    pub fn is_hit(&self, c: Coord) -> bool {
        bit(&self.hits, c)
    }

    /// Returns `true` once a shot (or perimeter suppression) has resolved `c`.
    pub fn is_shot(&self, c: Coord) -> bool {
        bit(&self.hits, c) || bit(&self.misses, c)
    }

    /// Ship cells that have not been hit yet.
    pub fn remaining_ship_cells(&self) -> usize {
        (self.ships & !self.hits).count_ones()
    }

    /// Returns `true` when ships were placed and every one of their cells is hit.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.remaining_ship_cells() == 0
    }

    /// Cells that can still be fired at, in row-major order.
    pub fn unshot_cells(&self) -> Vec<Coord> {
        Coord::all().filter(|c| !self.is_shot(*c)).collect()
    }

    /// Validate a placement, reporting the first rule it breaks.
    pub fn check_placement(
        &self,
        origin: Coord,
        length: usize,
        orientation: Orientation,
    ) -> Result<Ship, PlacementError> {
        let ship = Ship::new(origin, length, orientation)?;
        let halo = self.ships.expand();
        for c in ship.cells() {
            if bit(&self.ships, c) || self.is_shot(c) {
                return Err(PlacementError::Overlaps);
            }
            if bit(&halo, c) {
                return Err(PlacementError::Adjacent);
            }
        }
        Ok(ship)
    }

    /// True iff every cell is in bounds, empty and not touching another ship.
    pub fn can_place(&self, origin: Coord, length: usize, orientation: Orientation) -> bool {
        self.check_placement(origin, length, orientation).is_ok()
    }

    /// Place a ship the caller has already validated with [`Board::can_place`].
    ///
    /// An invalid placement is a caller bug: it panics in debug builds and is
    /// ignored otherwise.
    pub fn place(&mut self, origin: Coord, length: usize, orientation: Orientation) {
        let checked = self.check_placement(origin, length, orientation);
        debug_assert!(
            checked.is_ok(),
            "unvalidated placement at {} (length {}, {:?}): {:?}",
            origin,
            length,
            orientation,
            checked
        );
        if let Ok(ship) = checked {
            self.commit(&ship);
        }
    }

    /// Validate and place in one step.
    pub fn try_place(
        &mut self,
        origin: Coord,
        length: usize,
        orientation: Orientation,
    ) -> Result<Ship, PlacementError> {
        let ship = self.check_placement(origin, length, orientation)?;
        self.commit(&ship);
        Ok(ship)
    }

    fn commit(&mut self, ship: &Ship) {
        for c in ship.cells() {
            set_bit(&mut self.ships, c);
        }
    }

    /// Returns a random valid placement for a ship of `length`.
    ///
    /// Draws up to `PLACEMENT_ATTEMPTS` (orientation, origin) pairs whose
    /// cells fit on the board and keeps the first one `can_place` accepts.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Result<Ship, GameError> {
        if length == 0 || length > GRID {
            return Err(GameError::InvalidPlacement(PlacementError::OutOfBounds));
        }
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let max_r = if orient == Orientation::Vertical {
                GRID - length
            } else {
                GRID - 1
            };
            let max_c = if orient == Orientation::Horizontal {
                GRID - length
            } else {
                GRID - 1
            };
            let r = rng.random_range(0..=max_r);
            let c = rng.random_range(0..=max_c);
            let Some(origin) = Coord::new(r, c) else {
                continue;
            };
            if let Ok(ship) = self.check_placement(origin, length, orient) {
                return Ok(ship);
            }
        }
        Err(GameError::PlacementExhausted { length })
    }

    /// Record a shot at an unresolved cell. Returns `true` on a ship cell.
    pub(crate) fn record_shot(&mut self, c: Coord) -> bool {
        if bit(&self.ships, c) {
            set_bit(&mut self.hits, c);
            true
        } else {
            set_bit(&mut self.misses, c);
            false
        }
    }

    /// Rule out an unshot empty cell by marking it as a miss.
    /// Returns `false` if the cell was already resolved or holds a ship.
    pub fn mark_miss(&mut self, c: Coord) -> bool {
        if self.is_shot(c) {
            return false;
        }
        debug_assert!(!bit(&self.ships, c), "ruling out a ship cell at {}", c);
        if bit(&self.ships, c) {
            return false;
        }
        set_bit(&mut self.misses, c);
        true
    }

    /// Group ship cells into 4-connected components by flood fill.
    /// Each group is sorted row-major; groups are ordered by first cell.
    pub fn ship_groups(&self) -> Vec<Vec<Coord>> {
        let mut seen = BB::new();
        let mut groups = Vec::new();
        for (r, c) in self.ships.iter_set_bits() {
            let Some(start) = Coord::new(r, c) else {
                continue;
            };
            if bit(&seen, start) {
                continue;
            }
            let mut group = Vec::new();
            let mut stack = alloc::vec![start];
            set_bit(&mut seen, start);
            while let Some(cur) = stack.pop() {
                group.push(cur);
                for n in cur.neighbors4() {
                    if bit(&self.ships, n) && !bit(&seen, n) {
                        set_bit(&mut seen, n);
                        stack.push(n);
                    }
                }
            }
            group.sort();
            groups.push(group);
        }
        groups
    }

    /// Per-cell snapshot; with `reveal == false` unshot ship cells read as empty.
    pub fn state(&self, reveal: bool) -> BoardState {
        let mut cells = [[CellState::Empty; GRID]; GRID];
        for c in Coord::all() {
            let state = match self.cell(c) {
                CellState::Ship if !reveal => CellState::Empty,
                other => other,
            };
            cells[c.row()][c.col()] = state;
        }
        BoardState {
            cells,
            remaining_ship_cells: self.remaining_ship_cells(),
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  ships: {:?},\n  hits: {:?},\n  misses: {:?}\n}}",
            self.ships, self.hits, self.misses
        )
    }
}
