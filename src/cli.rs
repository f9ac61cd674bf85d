#![cfg(feature = "std")]

//! Terminal front-end: renders both boards and turns typed commands into
//! session calls. Computer turns are paced through the scheduler.

use std::fmt::Write as _;
use std::io::{self, Write};

use tokio::time::{timeout, Duration};

use crate::{
    board::Board,
    common::{CellState, Coord, GamePhase, Side},
    config::BOARD_SIZE,
    fleet::PlacementProgress,
    game::{GameSession, ShotReport},
    pacing::{lock_session, ComputerTurnScheduler, SharedSession},
    ship::{Orientation, Ship},
    shot::ShotOutcome,
    stats::Tally,
};

/// A parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place the next ship; `None` keeps the current orientation.
    Place(Coord, Option<Orientation>),
    Fire(Coord),
    Rotate,
    Auto,
    Restart,
    Stats,
    Help,
    Quit,
}

/// Parse one input line. What a bare coordinate means depends on `phase`.
pub fn parse_command(line: &str, phase: GamePhase) -> Result<Command, String> {
    let line = line.trim().to_ascii_lowercase();
    let mut parts = line.split_whitespace();
    let Some(first) = parts.next() else {
        return Err("Type a command, or 'help'.".to_string());
    };
    match first {
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "h" | "help" | "?" => return Ok(Command::Help),
        "r" | "rotate" => return Ok(Command::Rotate),
        "auto" => return Ok(Command::Auto),
        "restart" | "new" => return Ok(Command::Restart),
        "stats" => return Ok(Command::Stats),
        _ => {}
    }
    let coord: Coord = first.parse().map_err(|e| format!("{}", e))?;
    match phase {
        GamePhase::Placement => {
            let orientation = match parts.next() {
                None => None,
                Some("h") => Some(Orientation::Horizontal),
                Some("v") => Some(Orientation::Vertical),
                Some(other) => return Err(format!("Unknown orientation '{}', use h or v.", other)),
            };
            Ok(Command::Place(coord, orientation))
        }
        GamePhase::Playing => Ok(Command::Fire(coord)),
        GamePhase::GameOver => Err("The game is over. Type 'restart' or 'quit'.".to_string()),
    }
}

fn cell_char(state: CellState, reveal: bool, sunk: bool) -> char {
    match state {
        CellState::Hit if sunk => '#',
        CellState::Hit => 'X',
        CellState::Miss => 'o',
        CellState::Ship if reveal => 'S',
        CellState::Ship | CellState::Empty => '.',
    }
}

/// Draw a board; sunk ships show as `#`, unshot ships only with `reveal`.
pub fn render_board(board: &Board, reveal: bool, sunk: &[Ship]) -> String {
    let mut out = String::from("   ");
    for c in 0..BOARD_SIZE as usize {
        let ch = (b'A' + c as u8) as char;
        let _ = write!(out, " {}", ch);
    }
    out.push('\n');
    for r in 0..BOARD_SIZE as usize {
        let _ = write!(out, "{:2} ", r + 1);
        for c in 0..BOARD_SIZE as usize {
            let Some(coord) = Coord::new(r, c) else {
                continue;
            };
            let is_sunk = sunk.iter().any(|s| s.contains(coord));
            let _ = write!(out, " {}", cell_char(board.cell(coord), reveal, is_sunk));
        }
        out.push('\n');
    }
    out
}

/// Enemy waters on top, own fleet below.
pub fn render_view(session: &GameSession) -> String {
    let reveal_enemy = session.phase() == GamePhase::GameOver;
    format!(
        "Enemy waters:\n{}\nYour fleet:\n{}",
        render_board(
            session.computer_board(),
            reveal_enemy,
            session.sunk_ships(Side::Computer)
        ),
        render_board(session.human_board(), true, session.sunk_ships(Side::Human)),
    )
}

/// One line describing a shot.
pub fn describe_shot(report: &ShotReport) -> String {
    let who = match report.shooter {
        Side::Human => "You fire",
        Side::Computer => "Computer fires",
    };
    let what = match report.outcome {
        ShotOutcome::AlreadyShot => "already fired there".to_string(),
        ShotOutcome::Miss => "miss".to_string(),
        ShotOutcome::Hit => "hit!".to_string(),
        ShotOutcome::HitAndSunk(ship) => format!("hit, {}-cell ship sunk!", ship.length()),
    };
    let mut line = format!("{} at {}: {}", who, report.target, what);
    if !report.suppressed.is_empty() {
        let _ = write!(line, " ({} surrounding cells ruled out)", report.suppressed.len());
    }
    line
}

pub fn describe_tally(tally: &Tally) -> String {
    format!(
        "Games: {}  Wins: {}  Losses: {}  Win rate: {:.1}%",
        tally.total(),
        tally.wins,
        tally.losses,
        tally.win_rate()
    )
}

fn prompt(session: &GameSession, orientation: Orientation) -> String {
    match session.phase() {
        GamePhase::Placement => match session.placement_progress() {
            PlacementProgress::Next { length, remaining } => format!(
                "Place a {}-cell ship ({} left of this size, {:?}). e.g. A1 or A1 v: ",
                length, remaining, orientation
            ),
            PlacementProgress::Complete => "Fleet complete: ".to_string(),
        },
        GamePhase::Playing => "Your shot (e.g. B7): ".to_string(),
        GamePhase::GameOver => "Game over. 'restart' or 'quit': ".to_string(),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  A1 [h|v]   place the next ship (placement phase)");
    println!("  B7         fire at a cell (playing phase)");
    println!("  rotate     switch the default orientation");
    println!("  auto       place the remaining ships at random");
    println!("  restart    start a new game");
    println!("  stats      show wins and losses");
    println!("  quit       leave");
}

async fn read_line() -> anyhow::Result<Option<String>> {
    let (n, line) = tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        let n = io::stdin().read_line(&mut buf)?;
        Ok::<_, io::Error>((n, buf))
    })
    .await??;
    Ok(if n == 0 { None } else { Some(line) })
}

/// Print every paced computer shot until the human has the turn again.
async fn follow_computer_turn(
    scheduler: &mut ComputerTurnScheduler,
    reports: &mut tokio::sync::mpsc::UnboundedReceiver<ShotReport>,
    delay: Duration,
) {
    scheduler.schedule();
    loop {
        match timeout(delay + Duration::from_secs(1), reports.recv()).await {
            Ok(Some(report)) => {
                println!("{}", describe_shot(&report));
                if report.game_over.is_some() || report.next_turn == Side::Human {
                    break;
                }
            }
            Ok(None) => break,
            Err(_) if !scheduler.is_pending() => break,
            Err(_) => {}
        }
    }
}

/// Interactive game on stdin/stdout until `quit` or end of input.
pub async fn run_interactive(session: SharedSession, delay: Duration) -> anyhow::Result<()> {
    let (mut scheduler, mut reports) = ComputerTurnScheduler::new(session.clone(), delay);
    let mut orientation = Orientation::Horizontal;
    print_help();
    loop {
        let (view, ask) = {
            let guard = lock_session(&session);
            (render_view(&guard), prompt(&guard, orientation))
        };
        println!("\n{}", view);
        print!("{}", ask);
        io::stdout().flush()?;

        let Some(line) = read_line().await? else {
            break;
        };
        let phase = lock_session(&session).phase();
        let command = match parse_command(&line, phase) {
            Ok(command) => command,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => print_help(),
            Command::Rotate => {
                orientation = orientation.rotated();
                println!("Orientation: {:?}", orientation);
            }
            Command::Stats => println!("{}", describe_tally(&lock_session(&session).tally())),
            Command::Restart => {
                scheduler.restart()?;
                orientation = Orientation::Horizontal;
                println!("New game. Place your ships.");
            }
            Command::Auto => {
                let result = lock_session(&session).auto_place_human_fleet();
                match result {
                    Ok(_) => println!("Fleet placed. Fire when ready."),
                    Err(e) => println!("{}", e),
                }
            }
            Command::Place(coord, chosen) => {
                let result = lock_session(&session).place_human_ship(coord, chosen.unwrap_or(orientation));
                match result {
                    Ok(PlacementProgress::Complete) => println!("All ships placed. Fire at the enemy!"),
                    Ok(PlacementProgress::Next { .. }) => println!("Ship placed."),
                    Err(e) => println!("{}", e),
                }
            }
            Command::Fire(coord) => {
                let result = lock_session(&session).fire(coord);
                let report = match result {
                    Ok(report) => report,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                println!("{}", describe_shot(&report));
                if report.game_over.is_none() && report.next_turn == Side::Computer {
                    follow_computer_turn(&mut scheduler, &mut reports, delay).await;
                }
                let (outcome, tally) = {
                    let guard = lock_session(&session);
                    (guard.outcome(), guard.tally())
                };
                if let Some(outcome) = outcome {
                    println!("Game over: you {:?}. {}", outcome, describe_tally(&tally));
                }
            }
        }
    }
    scheduler.cancel();
    Ok(())
}
