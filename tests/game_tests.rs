use seabattle::{
    play_out, Board, CellState, Coord, GameError, GamePhase, GameSession, MemoryStore, Orientation,
    Outcome, PlacementError, PlacementProgress, ResultStore, Side, ShotOutcome, StoreError, Tally,
    Targeting, GameSnapshot, HuntState, NUM_SHIPS, TOTAL_SHIP_CELLS,
};

const H: Orientation = Orientation::Horizontal;

/// A valid human fleet in placement order (4, 3, 3, 2, 2, 2, 1, 1, 1, 1).
const LAYOUT: [(usize, usize, Orientation); 10] = [
    (0, 0, H),
    (0, 5, H),
    (2, 0, H),
    (2, 4, H),
    (2, 7, H),
    (4, 0, H),
    (4, 3, H),
    (4, 5, H),
    (4, 7, H),
    (4, 9, H),
];

fn at(row: usize, col: usize) -> Coord {
    Coord::new(row, col).unwrap()
}

fn new_session(seed: u64) -> GameSession {
    GameSession::seeded(seed, Box::new(MemoryStore::new())).unwrap()
}

fn playing_session(seed: u64) -> GameSession {
    let mut session = new_session(seed);
    for (r, c, o) in LAYOUT {
        session.place_human_ship(at(r, c), o).unwrap();
    }
    session
}

fn open_water(board: &Board) -> Coord {
    Coord::all()
        .find(|c| !board.has_ship(*c) && !board.is_shot(*c))
        .unwrap()
}

fn intact_ship_cell(board: &Board) -> Coord {
    Coord::all()
        .find(|c| board.has_ship(*c) && !board.is_shot(*c))
        .unwrap()
}

fn assert_perimeters_resolved(board: &Board, ships: &[seabattle::Ship]) {
    for ship in ships {
        for cell in ship.cells() {
            for n in cell.neighbors8() {
                if !board.has_ship(n) {
                    assert!(board.is_shot(n), "{} next to {:?} was not ruled out", n, ship);
                }
            }
        }
    }
}

#[test]
fn test_new_session_waits_for_placement() {
    let session = new_session(1);
    assert_eq!(session.phase(), GamePhase::Placement);
    assert_eq!(session.turn(), Side::Human);
    assert_eq!(session.outcome(), None);
    assert_eq!(session.generation(), 1);
    assert_eq!(
        session.placement_progress(),
        PlacementProgress::Next { length: 4, remaining: 1 }
    );
    assert_eq!(session.human_board().remaining_ship_cells(), 0);
    assert_eq!(session.computer_board().remaining_ship_cells(), TOTAL_SHIP_CELLS);
    assert_eq!(session.computer_board().ship_groups().len(), NUM_SHIPS);
    assert_eq!(session.tally(), Tally::default());
}

#[test]
fn test_placement_follows_fleet_order() {
    let mut session = new_session(2);
    let expected = [
        PlacementProgress::Next { length: 3, remaining: 2 },
        PlacementProgress::Next { length: 3, remaining: 1 },
        PlacementProgress::Next { length: 2, remaining: 3 },
        PlacementProgress::Next { length: 2, remaining: 2 },
        PlacementProgress::Next { length: 2, remaining: 1 },
        PlacementProgress::Next { length: 1, remaining: 4 },
        PlacementProgress::Next { length: 1, remaining: 3 },
        PlacementProgress::Next { length: 1, remaining: 2 },
        PlacementProgress::Next { length: 1, remaining: 1 },
        PlacementProgress::Complete,
    ];
    for ((r, c, o), progress) in LAYOUT.into_iter().zip(expected) {
        assert_eq!(session.phase(), GamePhase::Placement);
        assert_eq!(session.place_human_ship(at(r, c), o), Ok(progress));
    }
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.turn(), Side::Human);
    assert_eq!(session.human_board().remaining_ship_cells(), TOTAL_SHIP_CELLS);

    let phase_error = GameError::InvalidPhase {
        expected: GamePhase::Placement,
        actual: GamePhase::Playing,
    };
    assert_eq!(session.place_human_ship(at(9, 9), H), Err(phase_error.clone()));
    assert_eq!(session.auto_place_human_fleet(), Err(phase_error));
}

#[test]
fn test_rejected_placement_keeps_cursor() {
    let mut session = new_session(3);
    assert_eq!(
        session.place_human_ship(at(0, 8), H),
        Err(GameError::InvalidPlacement(PlacementError::OutOfBounds))
    );
    assert_eq!(
        session.placement_progress(),
        PlacementProgress::Next { length: 4, remaining: 1 }
    );

    session.place_human_ship(at(0, 0), H).unwrap();
    assert_eq!(
        session.place_human_ship(at(1, 0), H),
        Err(GameError::InvalidPlacement(PlacementError::Adjacent))
    );
    assert_eq!(
        session.place_human_ship(at(0, 2), Orientation::Vertical),
        Err(GameError::InvalidPlacement(PlacementError::Overlaps))
    );
    assert_eq!(
        session.placement_progress(),
        PlacementProgress::Next { length: 3, remaining: 2 }
    );
    assert_eq!(session.human_board().remaining_ship_cells(), 4);
}

#[test]
fn test_auto_place_finishes_the_fleet() {
    let mut session = new_session(4);
    session.place_human_ship(at(0, 0), H).unwrap();
    session.place_human_ship(at(9, 0), H).unwrap();
    assert_eq!(session.auto_place_human_fleet(), Ok(PlacementProgress::Complete));
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.human_board().remaining_ship_cells(), TOTAL_SHIP_CELLS);
    assert_eq!(session.human_board().ship_groups().len(), NUM_SHIPS);
    assert!(session.human_board().has_ship(at(0, 3)));
    assert!(session.human_board().has_ship(at(9, 2)));
}

#[test]
fn test_no_shots_before_playing() {
    let mut session = new_session(5);
    let phase_error = GameError::InvalidPhase {
        expected: GamePhase::Playing,
        actual: GamePhase::Placement,
    };
    assert_eq!(session.fire(at(0, 0)), Err(phase_error.clone()));
    assert_eq!(session.advance_computer_turn(), Err(phase_error));
    assert!(session.computer_board().unshot_cells().len() == 100);
}

#[test]
fn test_turn_and_board_ownership() {
    let mut session = playing_session(6);
    assert_eq!(
        session.fire_as(Side::Computer, Side::Human, at(0, 0)),
        Err(GameError::OutOfTurn)
    );
    assert_eq!(
        session.fire_as(Side::Human, Side::Human, at(0, 0)),
        Err(GameError::WrongBoard)
    );
    assert_eq!(session.advance_computer_turn(), Err(GameError::OutOfTurn));
    assert_eq!(session.human_board().unshot_cells().len(), 100);
    assert_eq!(session.computer_board().unshot_cells().len(), 100);
}

#[test]
fn test_hit_keeps_turn_and_repeat_is_free() {
    let mut session = playing_session(7);
    let target = intact_ship_cell(session.computer_board());
    let report = session.fire(target).unwrap();
    assert_eq!(report.shooter, Side::Human);
    assert_eq!(report.target, target);
    assert!(report.outcome.is_hit());
    assert_eq!(report.next_turn, Side::Human);
    assert_eq!(report.game_over, None);
    // The human plays unassisted, so nothing is ruled out for them.
    assert!(report.suppressed.is_empty());

    let before = *session.computer_board();
    assert_eq!(session.fire(target), Err(GameError::AlreadyShot));
    assert_eq!(session.turn(), Side::Human);
    assert_eq!(*session.computer_board(), before);
}

#[test]
fn test_miss_hands_turn_to_computer() {
    let mut session = playing_session(8);
    let report = session.fire(open_water(session.computer_board())).unwrap();
    assert_eq!(report.outcome, ShotOutcome::Miss);
    assert_eq!(report.next_turn, Side::Computer);
    assert_eq!(session.turn(), Side::Computer);
    assert_eq!(session.fire(at(9, 9)), Err(GameError::OutOfTurn));

    let reports = session.run_computer_turns().unwrap();
    let (last, streak) = reports.split_last().unwrap();
    for report in streak {
        assert_eq!(report.shooter, Side::Computer);
        assert!(report.outcome.is_hit());
        assert_eq!(report.next_turn, Side::Computer);
    }
    assert_eq!(last.shooter, Side::Computer);
    if last.game_over.is_none() {
        assert_eq!(last.outcome, ShotOutcome::Miss);
        assert_eq!(session.turn(), Side::Human);
    }
    let fired = 100 - session.human_board().unshot_cells().len();
    let suppressed: usize = reports.iter().map(|r| r.suppressed.len()).sum();
    assert_eq!(fired, reports.len() + suppressed);
}

#[test]
fn test_full_game_records_one_result() {
    let mut session = playing_session(9);
    let mut autopilot = Targeting::new();
    let outcome = play_out(&mut session, &mut autopilot).unwrap();

    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.outcome(), Some(outcome));
    let (loser, board) = match outcome {
        Outcome::Win => (Side::Computer, session.computer_board()),
        Outcome::Lose => (Side::Human, session.human_board()),
    };
    assert!(board.all_sunk());
    assert_eq!(session.sunk_ships(loser).len(), NUM_SHIPS);

    let tally = session.tally();
    assert_eq!(tally.total(), 1);
    assert_eq!(tally.wins, u32::from(outcome == Outcome::Win));

    // Both sides used hunt logic, so every sunk ship has a resolved perimeter.
    assert_perimeters_resolved(session.human_board(), session.sunk_ships(Side::Human));
    assert_perimeters_resolved(session.computer_board(), session.sunk_ships(Side::Computer));

    let over = GameError::InvalidPhase {
        expected: GamePhase::Playing,
        actual: GamePhase::GameOver,
    };
    assert_eq!(session.fire(at(0, 0)), Err(over.clone()));
    assert_eq!(session.advance_computer_turn(), Err(over));
    assert_eq!(session.tally().total(), 1);
}

#[test]
fn test_restart_starts_a_fresh_game() {
    let mut session = playing_session(10);
    let mut autopilot = Targeting::new();
    play_out(&mut session, &mut autopilot).unwrap();
    let tally = session.tally();

    session.restart().unwrap();
    assert_eq!(session.phase(), GamePhase::Placement);
    assert_eq!(session.turn(), Side::Human);
    assert_eq!(session.outcome(), None);
    assert_eq!(session.generation(), 2);
    assert_eq!(
        session.placement_progress(),
        PlacementProgress::Next { length: 4, remaining: 1 }
    );
    assert_eq!(session.human_board(), &Board::new());
    assert_eq!(session.computer_board().remaining_ship_cells(), TOTAL_SHIP_CELLS);
    assert_eq!(session.computer_board().unshot_cells().len(), 100);
    assert!(session.sunk_ships(Side::Human).is_empty());
    assert!(session.sunk_ships(Side::Computer).is_empty());
    assert_eq!(session.targeting().state(), &HuntState::default());
    assert_eq!(session.tally(), tally);

    play_out(&mut session, &mut Targeting::new()).unwrap();
    assert_eq!(session.tally().total(), 2);
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let mut a = new_session(42);
    let mut b = new_session(42);
    assert_eq!(a.computer_board(), b.computer_board());

    let outcome_a = play_out(&mut a, &mut Targeting::new()).unwrap();
    let outcome_b = play_out(&mut b, &mut Targeting::new()).unwrap();
    assert_eq!(outcome_a, outcome_b);
    assert_eq!(a.human_board(), b.human_board());
    assert_eq!(a.computer_board(), b.computer_board());
}

#[test]
fn test_snapshot_hides_computer_fleet_until_game_over() {
    let mut session = playing_session(11);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Playing);
    assert_eq!(snapshot.placement, PlacementProgress::Complete);
    let count = |cells: &[[CellState; 10]; 10], state: CellState| {
        cells.iter().flatten().filter(|c| **c == state).count()
    };
    assert_eq!(count(&snapshot.computer.cells, CellState::Ship), 0);
    assert_eq!(snapshot.computer.remaining_ship_cells, TOTAL_SHIP_CELLS);
    assert_eq!(count(&snapshot.human.cells, CellState::Ship), TOTAL_SHIP_CELLS);

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: GameSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);

    play_out(&mut session, &mut Targeting::new()).unwrap();
    let snapshot = session.snapshot();
    let computer_ships = session.computer_board().remaining_ship_cells();
    assert_eq!(count(&snapshot.computer.cells, CellState::Ship), computer_ships);
    assert_eq!(snapshot.outcome, session.outcome());
}

struct BrokenStore;

impl ResultStore for BrokenStore {
    fn record_result(&mut self, _outcome: Outcome) -> Result<(), StoreError> {
        Err(StoreError::Io("disk full".to_string()))
    }

    fn tally(&self) -> Tally {
        Tally::default()
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        Err(StoreError::Io("disk full".to_string()))
    }
}

#[test]
fn test_store_failure_does_not_block_game_over() {
    let mut session = GameSession::seeded(12, Box::new(BrokenStore)).unwrap();
    let outcome = play_out(&mut session, &mut Targeting::new()).unwrap();
    assert_eq!(session.outcome(), Some(outcome));
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.tally(), Tally::default());
    assert!(session.store_mut().clear().is_err());
}

#[test]
fn test_every_error_has_a_message() {
    let errors = [
        GameError::InvalidPlacement(PlacementError::Adjacent),
        GameError::AlreadyShot,
        GameError::OutOfTurn,
        GameError::WrongBoard,
        GameError::PlacementExhausted { length: 4 },
        GameError::InvalidPhase {
            expected: GamePhase::Playing,
            actual: GamePhase::Placement,
        },
        GameError::FleetComplete,
    ];
    for error in &errors {
        // Exhaustive: a new variant must be listed above.
        match error {
            GameError::InvalidPlacement(_)
            | GameError::AlreadyShot
            | GameError::OutOfTurn
            | GameError::WrongBoard
            | GameError::PlacementExhausted { .. }
            | GameError::InvalidPhase { .. }
            | GameError::FleetComplete => {}
        }
        assert!(!error.to_string().is_empty());
    }
    assert_eq!(
        GameError::PlacementExhausted { length: 4 }.to_string(),
        "Unable to place a ship of length 4 after repeated attempts"
    );
}
