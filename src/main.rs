#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::path::PathBuf;
#[cfg(feature = "std")]
use std::sync::{Arc, Mutex};

#[cfg(feature = "std")]
use anyhow::Context;
#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use log::info;
#[cfg(feature = "std")]
use seabattle::{
    cli::{describe_tally, run_interactive},
    init_logging, FileStore, GameSession, ResultStore, COMPUTER_TURN_DELAY_MS,
};
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Sea battle against the computer", long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Play an interactive game in the terminal.
    Play {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value = "seabattle.stats", help = "File holding the win/loss record")]
        stats_file: PathBuf,
        #[arg(long, default_value_t = COMPUTER_TURN_DELAY_MS, help = "Pause before each computer shot")]
        delay_ms: u64,
    },
    /// Show the win/loss record.
    Stats {
        #[arg(long, default_value = "seabattle.stats")]
        stats_file: PathBuf,
        #[arg(long, help = "Erase all recorded results")]
        clear: bool,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            seed,
            stats_file,
            delay_ms,
        } => {
            let store = FileStore::open(&stats_file)?;
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let session = match seed {
                Some(s) => GameSession::seeded(s, Box::new(store)),
                None => GameSession::from_entropy(Box::new(store)),
            }
            .map_err(|e| anyhow::anyhow!(e))
            .context("setting up the computer fleet")?;
            info!("results go to {}", stats_file.display());
            run_interactive(Arc::new(Mutex::new(session)), Duration::from_millis(delay_ms)).await?;
        }
        Commands::Stats { stats_file, clear } => {
            let mut store = FileStore::open(&stats_file)?;
            if clear {
                store
                    .clear()
                    .map_err(|e| anyhow::anyhow!(e))
                    .with_context(|| format!("clearing {}", stats_file.display()))?;
                println!("Cleared {}", stats_file.display());
            }
            println!("{}", describe_tally(&store.tally()));
        }
    }
    Ok(())
}
