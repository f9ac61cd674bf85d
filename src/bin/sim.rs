use clap::Parser;
use seabattle::{play_out, GameSession, MemoryStore, Outcome, Side, Targeting};
use serde_json::json;

/// Play computer-versus-computer games headlessly and print a JSON summary.
#[derive(Parser)]
struct Args {
    /// Seed of the first game; game `i` uses `seed + i`.
    seed: u64,
    /// Number of games to play.
    #[arg(default_value_t = 1)]
    games: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut wins = 0u32;
    let mut losses = 0u32;
    let mut rounds = Vec::new();
    for i in 0..args.games {
        let seed = args.seed.wrapping_add(u64::from(i));
        let mut session = GameSession::seeded(seed, Box::new(MemoryStore::new()))
            .map_err(|e| anyhow::anyhow!(e))?;
        let mut autopilot = Targeting::new();
        let outcome = play_out(&mut session, &mut autopilot).map_err(|e| anyhow::anyhow!(e))?;
        match outcome {
            Outcome::Win => wins += 1,
            Outcome::Lose => losses += 1,
        }
        let shots = |side: Side| {
            let board = match side {
                Side::Human => session.human_board(),
                Side::Computer => session.computer_board(),
            };
            board.hits().count_ones() + board.misses().count_ones()
        };
        rounds.push(json!({
            "seed": seed,
            "outcome": format!("{:?}", outcome),
            "human_cells_resolved": shots(Side::Computer),
            "computer_cells_resolved": shots(Side::Human),
        }));
    }

    let result = json!({
        "games": args.games,
        "wins": wins,
        "losses": losses,
        "rounds": rounds,
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
