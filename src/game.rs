use alloc::boxed::Box;
use alloc::vec::Vec;
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::{
    ai::Targeting,
    board::{Board, BoardState},
    common::{Coord, GameError, GamePhase, Outcome, Side},
    config::FLEET_LENGTHS,
    fleet::{place_fleet_randomly, FleetCursor, PlacementProgress},
    ship::{Orientation, Ship},
    shot::{self, ShotOutcome},
    stats::{ResultStore, Tally},
};

/// Everything a front-end needs to show after one shot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotReport {
    pub shooter: Side,
    pub target: Coord,
    pub outcome: ShotOutcome,
    /// Cells ruled out around a ship this shot sank.
    pub suppressed: Vec<Coord>,
    /// Who fires next.
    pub next_turn: Side,
    /// Set when this shot ended the game.
    pub game_over: Option<Outcome>,
}

/// Serializable view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub turn: Side,
    pub outcome: Option<Outcome>,
    pub placement: PlacementProgress,
    pub human: BoardState,
    /// Unshot computer ships stay hidden until the game is over.
    pub computer: BoardState,
    pub human_sunk: Vec<Ship>,
    pub computer_sunk: Vec<Ship>,
    pub generation: u64,
}

/// One human-versus-computer game, replayable through [`GameSession::restart`].
pub struct GameSession {
    human: Board,
    computer: Board,
    phase: GamePhase,
    turn: Side,
    outcome: Option<Outcome>,
    cursor: FleetCursor,
    targeting: Targeting,
    human_sunk: Vec<Ship>,
    computer_sunk: Vec<Ship>,
    rng: SmallRng,
    store: Box<dyn ResultStore>,
    generation: u64,
}

impl GameSession {
    /// Start a session in the placement phase with the computer fleet laid out.
    pub fn new(rng: SmallRng, store: Box<dyn ResultStore>) -> Result<Self, GameError> {
        let mut session = Self {
            human: Board::new(),
            computer: Board::new(),
            phase: GamePhase::Placement,
            turn: Side::Human,
            outcome: None,
            cursor: FleetCursor::new(),
            targeting: Targeting::new(),
            human_sunk: Vec::new(),
            computer_sunk: Vec::new(),
            rng,
            store,
            generation: 0,
        };
        session.restart()?;
        Ok(session)
    }

    /// Reproducible session for a given seed.
    pub fn seeded(seed: u64, store: Box<dyn ResultStore>) -> Result<Self, GameError> {
        Self::new(SmallRng::seed_from_u64(seed), store)
    }

    #[cfg(feature = "std")]
    pub fn from_entropy(store: Box<dyn ResultStore>) -> Result<Self, GameError> {
        let mut seed_rng = rand::rng();
        Self::new(SmallRng::from_rng(&mut seed_rng), store)
    }

    /// Clear both boards and the hunt state, hand the first turn to the
    /// human and lay out a fresh computer fleet.
    ///
    /// If the computer fleet cannot be placed nothing changes and
    /// `PlacementExhausted` is returned.
    pub fn restart(&mut self) -> Result<(), GameError> {
        let mut computer = Board::new();
        place_fleet_randomly(&mut computer, &mut self.rng, &FLEET_LENGTHS)?;

        self.human = Board::new();
        self.computer = computer;
        self.phase = GamePhase::Placement;
        self.turn = Side::Human;
        self.outcome = None;
        self.cursor = FleetCursor::new();
        self.targeting.reset();
        self.human_sunk.clear();
        self.computer_sunk.clear();
        self.generation = self.generation.wrapping_add(1);
        info!("new game #{}: place your ships", self.generation);
        Ok(())
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Bumped on every restart; lets deferred work detect a stale session.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn placement_progress(&self) -> PlacementProgress {
        self.cursor.progress()
    }

    pub fn human_board(&self) -> &Board {
        &self.human
    }

    pub fn computer_board(&self) -> &Board {
        &self.computer
    }

    /// Ships of `side` that have been sunk, in the order they went down.
    pub fn sunk_ships(&self, side: Side) -> &[Ship] {
        match side {
            Side::Human => &self.human_sunk,
            Side::Computer => &self.computer_sunk,
        }
    }

    pub fn targeting(&self) -> &Targeting {
        &self.targeting
    }

    pub fn tally(&self) -> Tally {
        self.store.tally()
    }

    pub fn store_mut(&mut self) -> &mut dyn ResultStore {
        self.store.as_mut()
    }

    fn require_phase(&self, expected: GamePhase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Place the next ship of the human fleet. The length comes from the
    /// placement order; the last ship starts the game.
    pub fn place_human_ship(
        &mut self,
        origin: Coord,
        orientation: Orientation,
    ) -> Result<PlacementProgress, GameError> {
        self.require_phase(GamePhase::Placement)?;
        let length = self.cursor.current_length().ok_or(GameError::FleetComplete)?;
        self.human.try_place(origin, length, orientation)?;
        self.cursor.advance();
        debug!("placed {}-cell ship at {} {:?}", length, origin, orientation);
        self.after_placement();
        Ok(self.cursor.progress())
    }

    /// Randomly place whatever is left of the human fleet.
    pub fn auto_place_human_fleet(&mut self) -> Result<PlacementProgress, GameError> {
        self.require_phase(GamePhase::Placement)?;
        let mut cursor = self.cursor;
        let mut lengths = Vec::new();
        while let Some(length) = cursor.current_length() {
            lengths.push(length);
            cursor.advance();
        }
        place_fleet_randomly(&mut self.human, &mut self.rng, &lengths)?;
        self.cursor = cursor;
        self.after_placement();
        Ok(self.cursor.progress())
    }

    fn after_placement(&mut self) {
        if self.cursor.is_complete() {
            self.phase = GamePhase::Playing;
            info!("fleet ready, game on");
        }
    }

    /// The human fires at the computer board.
    pub fn fire(&mut self, c: Coord) -> Result<ShotReport, GameError> {
        self.fire_as(Side::Human, Side::Computer, c)
    }

    /// `actor` fires at `target`'s board.
    ///
    /// Rejected without side effects when the game is not running, when it
    /// is not `actor`'s turn, when `actor` aims at its own board or when the
    /// cell was already resolved.
    pub fn fire_as(&mut self, actor: Side, target: Side, c: Coord) -> Result<ShotReport, GameError> {
        self.require_phase(GamePhase::Playing)?;
        if actor != self.turn {
            return Err(GameError::OutOfTurn);
        }
        if target == actor {
            return Err(GameError::WrongBoard);
        }
        self.resolve(actor, c, None)
    }

    /// Let `assistant` pick and fire the human's shot, with the same hunt
    /// logic (perimeter suppression included) the computer uses.
    pub fn fire_assisted(&mut self, assistant: &mut Targeting) -> Result<ShotReport, GameError> {
        self.require_phase(GamePhase::Playing)?;
        if self.turn != Side::Human {
            return Err(GameError::OutOfTurn);
        }
        // Every cell resolved while ships remain cannot happen.
        let c = assistant
            .select_target(&self.computer, &mut self.rng)
            .ok_or(GameError::AlreadyShot)?;
        self.resolve(Side::Human, c, Some(assistant))
    }

    /// Let the targeting AI take one computer shot.
    pub fn advance_computer_turn(&mut self) -> Result<ShotReport, GameError> {
        self.require_phase(GamePhase::Playing)?;
        if self.turn != Side::Computer {
            return Err(GameError::OutOfTurn);
        }
        let c = self
            .targeting
            .select_target(&self.human, &mut self.rng)
            .ok_or(GameError::AlreadyShot)?;
        self.resolve(Side::Computer, c, None)
    }

    /// Keep firing computer shots until the turn passes or the game ends.
    pub fn run_computer_turns(&mut self) -> Result<Vec<ShotReport>, GameError> {
        let mut reports = Vec::new();
        while self.phase == GamePhase::Playing && self.turn == Side::Computer {
            reports.push(self.advance_computer_turn()?);
        }
        Ok(reports)
    }

    fn resolve(
        &mut self,
        actor: Side,
        c: Coord,
        assistant: Option<&mut Targeting>,
    ) -> Result<ShotReport, GameError> {
        let (board, sunk) = match actor.opponent() {
            Side::Human => (&mut self.human, &mut self.human_sunk),
            Side::Computer => (&mut self.computer, &mut self.computer_sunk),
        };
        let outcome = shot::fire(board, c);
        if outcome == ShotOutcome::AlreadyShot {
            return Err(GameError::AlreadyShot);
        }
        let ai = match actor {
            Side::Computer => Some(&mut self.targeting),
            Side::Human => assistant,
        };
        let suppressed = match ai {
            Some(ai) => ai.record_outcome(board, c, &outcome),
            None => Vec::new(),
        };
        if let ShotOutcome::HitAndSunk(ship) = outcome {
            sunk.push(ship);
        }
        if !outcome.is_hit() {
            self.turn = self.turn.opponent();
        }
        debug!("{:?} fired at {}: {:?}", actor, c, outcome);
        let game_over = self.check_game_over();
        Ok(ShotReport {
            shooter: actor,
            target: c,
            outcome,
            suppressed,
            next_turn: self.turn,
            game_over,
        })
    }

    fn check_game_over(&mut self) -> Option<Outcome> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let outcome = if self.human.remaining_ship_cells() == 0 {
            Outcome::Lose
        } else if self.computer.remaining_ship_cells() == 0 {
            Outcome::Win
        } else {
            return None;
        };
        self.phase = GamePhase::GameOver;
        self.outcome = Some(outcome);
        info!("game #{} over: {:?}", self.generation, outcome);
        if let Err(e) = self.store.record_result(outcome) {
            warn!("could not record {:?}: {}", outcome, e);
        }
        Some(outcome)
    }

    /// Snapshot for rendering or serialization.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            turn: self.turn,
            outcome: self.outcome,
            placement: self.cursor.progress(),
            human: self.human.state(true),
            computer: self.computer.state(self.phase == GamePhase::GameOver),
            human_sunk: self.human_sunk.clone(),
            computer_sunk: self.computer_sunk.clone(),
            generation: self.generation,
        }
    }
}

/// Play the rest of the game with `human` choosing the human's shots.
/// Any unplaced human ships are placed at random first.
pub fn play_out(session: &mut GameSession, human: &mut Targeting) -> Result<Outcome, GameError> {
    if session.phase() == GamePhase::Placement {
        session.auto_place_human_fleet()?;
    }
    while session.phase() == GamePhase::Playing {
        match session.turn() {
            Side::Human => session.fire_assisted(human)?,
            Side::Computer => session.advance_computer_turn()?,
        };
    }
    session.outcome().ok_or(GameError::InvalidPhase {
        expected: GamePhase::GameOver,
        actual: session.phase(),
    })
}
