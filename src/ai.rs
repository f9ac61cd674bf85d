// Hunt/target opponent: random search until a hit, then directed shots
// along the inferred ship line until the ship sinks.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use log::{debug, trace};
use rand::Rng;

use crate::board::Board;
use crate::common::Coord;
use crate::ship::Orientation;
use crate::shot::{suppress_perimeter, ShotOutcome};

/// Whether the AI is searching blindly or chasing a damaged ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum HuntMode {
    #[default]
    Random,
    Hunting,
}

/// Internal memory of the targeting AI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HuntState {
    pub mode: HuntMode,
    /// Queued candidates, first in first out, without duplicates.
    pub pending: VecDeque<Coord>,
    /// Hits on the ship currently being chased.
    pub confirmed: Vec<Coord>,
}

/// Stateful shot selector for the computer side.
#[derive(Debug, Clone, Default)]
pub struct Targeting {
    state: HuntState,
}

impl Targeting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &HuntState {
        &self.state
    }

    /// Forget the current target and go back to random search.
    pub fn reset(&mut self) {
        self.state = HuntState::default();
    }

    /// Choose the next cell to fire at on `board`.
    ///
    /// Returns `None` only when every cell has already been resolved.
    pub fn select_target<R: Rng + ?Sized>(&mut self, board: &Board, rng: &mut R) -> Option<Coord> {
        if self.state.mode == HuntMode::Hunting {
            if let Some(c) = self.pop_pending(board) {
                return Some(c);
            }
            if let Some(orientation) = infer_orientation(&self.state.confirmed) {
                self.state.pending =
                    extension_candidates(board, &self.state.confirmed, orientation).into();
                if let Some(c) = self.pop_pending(board) {
                    return Some(c);
                }
            }
            self.state.pending = neighbor_candidates(board, &self.state.confirmed).into();
            if let Some(c) = self.pop_pending(board) {
                return Some(c);
            }
            debug!(
                "no candidates around {:?}, back to random search",
                self.state.confirmed
            );
            self.reset();
        }
        random_cell(board, rng)
    }

    /// Update the hunt state after firing at `c`.
    ///
    /// On a sink this also rules out the cells around the ship on `board`
    /// and returns them.
    pub fn record_outcome(&mut self, board: &mut Board, c: Coord, outcome: &ShotOutcome) -> Vec<Coord> {
        match outcome {
            ShotOutcome::AlreadyShot | ShotOutcome::Miss => Vec::new(),
            ShotOutcome::Hit => {
                self.state.confirmed.push(c);
                self.state.mode = HuntMode::Hunting;
                match infer_orientation(&self.state.confirmed) {
                    Some(orientation) => {
                        self.state.pending =
                            extension_candidates(board, &self.state.confirmed, orientation).into();
                    }
                    None => {
                        for n in open_neighbors(board, c) {
                            if !self.state.pending.contains(&n) {
                                self.state.pending.push_back(n);
                            }
                        }
                    }
                }
                trace!("hunting, queue {:?}", self.state.pending);
                Vec::new()
            }
            ShotOutcome::HitAndSunk(ship) => {
                self.state.confirmed.push(c);
                let suppressed = suppress_perimeter(board, ship);
                self.state.pending.retain(|p| !suppressed.contains(p));
                debug!(
                    "sunk ship at {} (length {}), ruled out {} cells",
                    ship.origin(),
                    ship.length(),
                    suppressed.len()
                );
                self.reset();
                suppressed
            }
        }
    }

    fn pop_pending(&mut self, board: &Board) -> Option<Coord> {
        while let Some(c) = self.state.pending.pop_front() {
            if !board.is_shot(c) {
                return Some(c);
            }
        }
        None
    }
}

/// Infer the line of the chased ship from its two lowest hits (row-major).
///
/// Needs at least two hits; `None` if they share neither row nor column.
pub fn infer_orientation(hits: &[Coord]) -> Option<Orientation> {
    if hits.len() < 2 {
        return None;
    }
    let mut sorted = hits.to_vec();
    sorted.sort();
    let (first, second) = (sorted[0], sorted[1]);
    if first.row() == second.row() {
        Some(Orientation::Horizontal)
    } else if first.col() == second.col() {
        Some(Orientation::Vertical)
    } else {
        None
    }
}

/// The unshot cells just past both ends of the hit line.
pub fn extension_candidates(board: &Board, hits: &[Coord], orientation: Orientation) -> Vec<Coord> {
    let Some(&anchor) = hits.first() else {
        return Vec::new();
    };
    let (before, after) = match orientation {
        Orientation::Horizontal => {
            let min = hits.iter().map(|h| h.col()).min().unwrap_or(anchor.col());
            let max = hits.iter().map(|h| h.col()).max().unwrap_or(anchor.col());
            (
                min.checked_sub(1).and_then(|c| Coord::new(anchor.row(), c)),
                Coord::new(anchor.row(), max + 1),
            )
        }
        Orientation::Vertical => {
            let min = hits.iter().map(|h| h.row()).min().unwrap_or(anchor.row());
            let max = hits.iter().map(|h| h.row()).max().unwrap_or(anchor.row());
            (
                min.checked_sub(1).and_then(|r| Coord::new(r, anchor.col())),
                Coord::new(max + 1, anchor.col()),
            )
        }
    };
    [before, after]
        .into_iter()
        .flatten()
        .filter(|c| !board.is_shot(*c))
        .collect()
}

/// Unshot 4-neighbours of every hit, first occurrence order, no duplicates.
pub fn neighbor_candidates(board: &Board, hits: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::new();
    for &hit in hits {
        for n in open_neighbors(board, hit) {
            if !out.contains(&n) {
                out.push(n);
            }
        }
    }
    out
}

fn open_neighbors(board: &Board, c: Coord) -> impl Iterator<Item = Coord> + '_ {
    c.neighbors4().filter(move |n| !board.is_shot(*n))
}

/// Uniform pick among the cells not yet resolved.
pub fn random_cell<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Coord> {
    let open = board.unshot_cells();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.random_range(0..open.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shot::fire;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn at(row: usize, col: usize) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn orientation_from_two_lowest_hits() {
        let hits = [at(0, 0), at(0, 2), at(0, 1)];
        assert_eq!(infer_orientation(&hits), Some(Orientation::Horizontal));
        let hits = [at(5, 3), at(4, 3)];
        assert_eq!(infer_orientation(&hits), Some(Orientation::Vertical));
        assert_eq!(infer_orientation(&[at(2, 2)]), None);
        assert_eq!(infer_orientation(&[at(2, 2), at(3, 3)]), None);
    }

    #[test]
    fn extension_skips_out_of_bounds_end() {
        let mut board = Board::new();
        board.place(at(0, 0), 4, Orientation::Horizontal);
        for c in [at(0, 0), at(0, 2), at(0, 1)] {
            fire(&mut board, c);
        }
        let hits = [at(0, 0), at(0, 2), at(0, 1)];
        let orientation = infer_orientation(&hits).unwrap();
        assert_eq!(orientation, Orientation::Horizontal);
        assert_eq!(extension_candidates(&board, &hits, orientation), vec![at(0, 3)]);
    }

    #[test]
    fn extension_skips_shot_cells() {
        let mut board = Board::new();
        fire(&mut board, at(2, 5));
        let hits = [at(3, 5), at(4, 5)];
        assert_eq!(
            extension_candidates(&board, &hits, Orientation::Vertical),
            vec![at(5, 5)]
        );
    }

    #[test]
    fn neighbor_candidates_are_ordered_and_unique() {
        let board = Board::new();
        let hits = [at(4, 4), at(4, 5)];
        assert_eq!(
            neighbor_candidates(&board, &hits),
            vec![at(3, 4), at(5, 4), at(4, 3), at(4, 5), at(3, 5), at(5, 5), at(4, 4), at(4, 6)]
        );
    }

    #[test]
    fn hunts_down_a_three_cell_ship() {
        let mut board = Board::new();
        board.place(at(4, 3), 3, Orientation::Horizontal);
        let mut ai = Targeting::new();
        let mut rng = SmallRng::seed_from_u64(7);

        let first = at(4, 4);
        let outcome = fire(&mut board, first);
        assert_eq!(outcome, ShotOutcome::Hit);
        ai.record_outcome(&mut board, first, &outcome);
        assert_eq!(ai.state().mode, HuntMode::Hunting);
        assert_eq!(
            ai.state().pending.iter().copied().collect::<Vec<_>>(),
            vec![at(3, 4), at(5, 4), at(4, 3), at(4, 5)]
        );

        let mut shots = Vec::new();
        loop {
            let c = ai.select_target(&board, &mut rng).unwrap();
            let outcome = fire(&mut board, c);
            shots.push(c);
            ai.record_outcome(&mut board, c, &outcome);
            if let ShotOutcome::HitAndSunk(ship) = outcome {
                assert_eq!(ship.origin(), at(4, 3));
                assert_eq!(ship.length(), 3);
                break;
            }
        }
        assert_eq!(shots, vec![at(3, 4), at(5, 4), at(4, 3), at(4, 2), at(4, 5)]);
        assert_eq!(ai.state(), &HuntState::default());
        // Perimeter of the sunk ship is ruled out.
        for c in [at(3, 2), at(3, 6), at(5, 3), at(5, 6), at(4, 6)] {
            assert!(board.is_shot(c), "{} should be ruled out", c);
        }
    }

    #[test]
    fn random_mode_never_repeats_a_cell() {
        let mut board = Board::new();
        let mut ai = Targeting::new();
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..100 {
            let c = ai.select_target(&board, &mut rng).unwrap();
            assert_ne!(fire(&mut board, c), ShotOutcome::AlreadyShot);
        }
        assert_eq!(ai.select_target(&board, &mut rng), None);
    }
}
