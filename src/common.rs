//! Common types for the engine: coordinates, sides, cell states and errors.

use core::fmt;
use core::str::FromStr;

use crate::config::BOARD_SIZE;

const GRID: usize = BOARD_SIZE as usize;

/// A cell on the board. Always in bounds: the only constructor checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    row: usize,
    col: usize,
}

impl Coord {
    /// Returns `None` when either index falls outside the board.
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < GRID && col < GRID {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub const fn row(&self) -> usize {
        self.row
    }

    pub const fn col(&self) -> usize {
        self.col
    }

    /// The cell `(dr, dc)` away, if it is on the board.
    pub fn offset(&self, dr: isize, dc: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Self::new(row, col)
    }

    /// Up, down, left, right neighbours that exist on the board.
    pub fn neighbors4(self) -> impl Iterator<Item = Coord> {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }

    /// All eight surrounding cells that exist on the board.
    pub fn neighbors8(self) -> impl Iterator<Item = Coord> {
        (-1isize..=1)
            .flat_map(|dr| (-1isize..=1).map(move |dc| (dr, dc)))
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }

    /// Every cell of the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..GRID).flat_map(|row| (0..GRID).map(move |col| Coord { row, col }))
    }
}

/// Letter column, 1-based row: `(0, 0)` is `A1`, `(9, 9)` is `J10`.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col = (b'A' + self.col as u8) as char;
        write!(f, "{}{}", col, self.row + 1)
    }
}

impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let mut chars = input.chars();
        let col_ch = chars.next().ok_or(ParseCoordError)?.to_ascii_uppercase();
        if !col_ch.is_ascii_uppercase() {
            return Err(ParseCoordError);
        }
        let col = (col_ch as u8 - b'A') as usize;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseCoordError);
        }
        let row: usize = digits.parse().map_err(|_| ParseCoordError)?;
        if row == 0 {
            return Err(ParseCoordError);
        }
        Coord::new(row - 1, col).ok_or(ParseCoordError)
    }
}

/// Input was not a coordinate like `C7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseCoordError;

impl fmt::Display for ParseCoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a coordinate between A1 and J10")
    }
}

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    Empty,
    Ship,
    /// A shot landed on a ship cell.
    Hit,
    /// A shot landed on an empty cell, or the cell was ruled out.
    Miss,
}

/// The two parties of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Human,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Human => Side::Computer,
            Side::Computer => Side::Human,
        }
    }
}

/// Result of a finished game, from the human's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Win,
    Lose,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GamePhase {
    Placement,
    Playing,
    GameOver,
}

/// Why a ship cannot go where it was asked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Part of the ship would hang off the board.
    OutOfBounds,
    /// A cell is already occupied by a ship.
    Overlaps,
    /// A cell touches another ship, diagonals included.
    Adjacent,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::OutOfBounds => write!(f, "ship does not fit on the board"),
            PlacementError::Overlaps => write!(f, "ship overlaps another ship"),
            PlacementError::Adjacent => write!(f, "ship touches another ship"),
        }
    }
}

/// Errors returned by engine operations. None of them leave partial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    InvalidPlacement(PlacementError),
    /// The cell was already resolved; the turn is not consumed.
    AlreadyShot,
    /// The actor does not own the current turn.
    OutOfTurn,
    /// The actor aimed at its own board.
    WrongBoard,
    /// Random placement could not fit a ship of `length`.
    PlacementExhausted { length: usize },
    InvalidPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
    /// Every ship of the fleet has already been placed.
    FleetComplete,
}

impl From<PlacementError> for GameError {
    fn from(err: PlacementError) -> Self {
        GameError::InvalidPlacement(err)
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidPlacement(e) => write!(f, "Invalid placement: {}", e),
            GameError::AlreadyShot => write!(f, "That cell has already been fired at"),
            GameError::OutOfTurn => write!(f, "It is not your turn"),
            GameError::WrongBoard => write!(f, "Cannot fire at your own board"),
            GameError::PlacementExhausted { length } => write!(
                f,
                "Unable to place a ship of length {} after repeated attempts",
                length
            ),
            GameError::InvalidPhase { expected, actual } => {
                write!(f, "Operation requires {:?} phase, game is in {:?}", expected, actual)
            }
            GameError::FleetComplete => write!(f, "All ships have already been placed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}

#[cfg(feature = "std")]
impl std::error::Error for ParseCoordError {}
