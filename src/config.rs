//! Board and fleet constants.

/// Side length of each square board.
pub const BOARD_SIZE: u8 = 10;

/// Fleet table as `(length, count)`, in the order ships are placed.
pub const FLEET: [(usize, usize); 4] = [(4, 1), (3, 2), (2, 3), (1, 4)];

/// Number of ships on each side.
pub const NUM_SHIPS: usize = 1 + 2 + 3 + 4;

/// Ship lengths in placement order (longest first).
pub const FLEET_LENGTHS: [usize; NUM_SHIPS] = [4, 3, 3, 2, 2, 2, 1, 1, 1, 1];

/// Total number of ship segments per side.
pub const TOTAL_SHIP_CELLS: usize = 4 + 2 * 3 + 3 * 2 + 4;

/// Random placement trials allowed per computer ship.
pub const PLACEMENT_ATTEMPTS: usize = 100;

/// Default pause before each computer shot, in milliseconds.
pub const COMPUTER_TURN_DELAY_MS: u64 = 800;
