//! Fleet placement: the human's ship-by-ship cursor and random layouts
//! for the computer.

use alloc::vec::Vec;
use rand::Rng;

use crate::board::Board;
use crate::common::GameError;
use crate::config::FLEET;
use crate::ship::Ship;

/// What the human has to place next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum PlacementProgress {
    /// Place a ship of `length`; `remaining` ships of that length are left.
    Next { length: usize, remaining: usize },
    Complete,
}

/// Walks the fleet table longest ship first: 1×4, 2×3, 3×2, 4×1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FleetCursor {
    group: usize,
    placed_in_group: usize,
}

impl FleetCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the next ship, or `None` once the fleet is complete.
    pub fn current_length(&self) -> Option<usize> {
        FLEET.get(self.group).map(|(len, _)| *len)
    }

    pub fn is_complete(&self) -> bool {
        self.group >= FLEET.len()
    }

    pub fn progress(&self) -> PlacementProgress {
        match FLEET.get(self.group) {
            Some(&(length, count)) => PlacementProgress::Next {
                length,
                remaining: count - self.placed_in_group,
            },
            None => PlacementProgress::Complete,
        }
    }

    /// Count one ship of the current length as placed.
    pub fn advance(&mut self) {
        let Some(&(_, count)) = FLEET.get(self.group) else {
            return;
        };
        self.placed_in_group += 1;
        if self.placed_in_group >= count {
            self.group += 1;
            self.placed_in_group = 0;
        }
    }
}

/// Randomly place ships of the given lengths, in order.
///
/// All or nothing: if any ship exhausts its trials the board is left as it
/// was and `PlacementExhausted` names the length that failed.
pub fn place_fleet_randomly<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
    lengths: &[usize],
) -> Result<Vec<Ship>, GameError> {
    let mut scratch = *board;
    let mut ships = Vec::with_capacity(lengths.len());
    for &length in lengths {
        let ship = scratch.random_placement(rng, length)?;
        scratch.place(ship.origin(), ship.length(), ship.orientation());
        ships.push(ship);
    }
    *board = scratch;
    Ok(ships)
}
