//! Win/loss bookkeeping. The engine reports each finished game once through
//! [`ResultStore::record_result`]; how results are kept is up to the store.

use alloc::string::String;
use core::fmt;

use crate::common::Outcome;

/// Counts of finished games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
}

impl Tally {
    pub fn total(&self) -> u32 {
        self.wins + self.losses
    }

    /// Percentage of games won, `0.0` before the first game.
    pub fn win_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            f64::from(self.wins) * 100.0 / f64::from(self.total())
        }
    }

    fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Lose => self.losses += 1,
        }
    }
}

/// Failure reported by a result store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Io(String),
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "result store I/O error: {}", msg),
            StoreError::Corrupt(msg) => write!(f, "result store is corrupt: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StoreError {}

/// Append-only record of game results.
pub trait ResultStore: Send {
    fn record_result(&mut self, outcome: Outcome) -> Result<(), StoreError>;
    fn tally(&self) -> Tally;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Keeps the tally in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tally: Tally,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryStore {
    fn record_result(&mut self, outcome: Outcome) -> Result<(), StoreError> {
        self.tally.add(outcome);
        Ok(())
    }

    fn tally(&self) -> Tally {
        self.tally
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.tally = Tally::default();
        Ok(())
    }
}

#[cfg(feature = "std")]
pub use file::{FileStore, ResultRecord};

#[cfg(feature = "std")]
mod file {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::Context;
    use log::debug;

    use super::{ResultStore, StoreError, Tally};
    use crate::common::Outcome;

    /// One finished game.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    pub struct ResultRecord {
        pub outcome: Outcome,
        /// Seconds since the Unix epoch.
        pub recorded_at: u64,
    }

    /// Results kept in a bincode file, rewritten on every change.
    #[derive(Debug)]
    pub struct FileStore {
        path: PathBuf,
        records: Vec<ResultRecord>,
    }

    impl FileStore {
        /// Open the store at `path`; a missing file is an empty store.
        pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
            let path = path.as_ref().to_path_buf();
            let records: Vec<ResultRecord> = if path.exists() {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("reading results from {}", path.display()))?;
                bincode::deserialize(&bytes)
                    .with_context(|| format!("decoding results in {}", path.display()))?
            } else {
                Vec::new()
            };
            debug!("opened {} with {} results", path.display(), records.len());
            Ok(Self { path, records })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        pub fn records(&self) -> &[ResultRecord] {
            &self.records
        }

        fn persist(&self) -> Result<(), StoreError> {
            let bytes = bincode::serialize(&self.records)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?;
            std::fs::write(&self.path, bytes).map_err(|e| StoreError::Io(e.to_string()))
        }
    }

    impl ResultStore for FileStore {
        fn record_result(&mut self, outcome: Outcome) -> Result<(), StoreError> {
            let recorded_at = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            self.records.push(ResultRecord {
                outcome,
                recorded_at,
            });
            if let Err(e) = self.persist() {
                self.records.pop();
                return Err(e);
            }
            Ok(())
        }

        fn tally(&self) -> Tally {
            let mut tally = Tally::default();
            for record in &self.records {
                tally.add(record.outcome);
            }
            tally
        }

        fn clear(&mut self) -> Result<(), StoreError> {
            let previous = std::mem::take(&mut self.records);
            if let Err(e) = self.persist() {
                self.records = previous;
                return Err(e);
            }
            Ok(())
        }
    }
}
