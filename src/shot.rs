//! Shot resolution: hit/miss marking, sunk detection and perimeter
//! suppression around sunk ships.

use alloc::vec::Vec;

use crate::board::Board;
use crate::common::Coord;
use crate::ship::Ship;

/// Result of firing at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotOutcome {
    /// The cell was resolved before; nothing changed.
    AlreadyShot,
    Miss,
    Hit,
    /// The shot hit the last intact cell of this ship.
    HitAndSunk(Ship),
}

impl ShotOutcome {
    /// Returns `true` for `Hit` and `HitAndSunk`.
    pub fn is_hit(&self) -> bool {
        matches!(self, ShotOutcome::Hit | ShotOutcome::HitAndSunk(_))
    }
}

/// Fire at `c`, marking the cell and reporting whether a ship went down.
pub fn fire(board: &mut Board, c: Coord) -> ShotOutcome {
    if board.is_shot(c) {
        return ShotOutcome::AlreadyShot;
    }
    if !board.record_shot(c) {
        return ShotOutcome::Miss;
    }
    let run = ship_run(board, c);
    if run.iter().all(|cell| board.is_hit(*cell)) {
        match Ship::from_run(&run) {
            Some(ship) => ShotOutcome::HitAndSunk(ship),
            None => ShotOutcome::Hit,
        }
    } else {
        ShotOutcome::Hit
    }
}

/// The full straight run of ship cells (hit or not) passing through `c`.
///
/// The horizontal run wins when it spans two or more cells; otherwise the
/// vertical run is the answer, which also covers single-cell ships.
/// Empty when `c` holds no ship.
pub fn ship_run(board: &Board, c: Coord) -> Vec<Coord> {
    if !board.has_ship(c) {
        return Vec::new();
    }
    let horizontal = scan_line(board, c, 0, 1);
    if horizontal.len() >= 2 {
        return horizontal;
    }
    scan_line(board, c, 1, 0)
}

fn scan_line(board: &Board, c: Coord, dr: isize, dc: isize) -> Vec<Coord> {
    let mut cells = alloc::vec![c];
    let mut cur = c;
    while let Some(next) = cur.offset(-dr, -dc).filter(|n| board.has_ship(*n)) {
        cells.push(next);
        cur = next;
    }
    cur = c;
    while let Some(next) = cur.offset(dr, dc).filter(|n| board.has_ship(*n)) {
        cells.push(next);
        cur = next;
    }
    cells.sort();
    cells
}

/// Mark every unshot cell around a sunk ship as a miss.
///
/// Safe because ships never touch, not even diagonally. Returns the cells
/// that changed, in row-major order.
pub fn suppress_perimeter(board: &mut Board, ship: &Ship) -> Vec<Coord> {
    let mut marked = Vec::new();
    for cell in ship.cells() {
        for n in cell.neighbors8() {
            if !board.has_ship(n) && board.mark_miss(n) {
                marked.push(n);
            }
        }
    }
    marked.sort();
    marked
}
